//! Echoverse player client.
//!
//! The client core of a narrated text adventure: which screen is showing,
//! the player's session state and its mirror in the document store, and the
//! round-trips to the narration service. Rendering is left to whatever
//! drives [`GameController`]; the bundled binary drives it from stdin.

pub mod application;
pub mod infrastructure;
pub mod ports;
pub mod runner;

pub use application::services::{ControllerDeps, GameController};
