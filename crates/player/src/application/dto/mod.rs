//! Data transfer objects
//!
//! Types passed between the controller, its services and whatever drives
//! the controller (the headless runner, tests).

mod character_form;
mod events;
mod notice;

pub use character_form::{CharacterForm, NameField};
pub use events::{ClientEvent, RemoteChange};
pub use notice::{Notice, Severity};
