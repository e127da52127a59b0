//! Application services
//!
//! `GameController` is the entry point; the other services are its parts
//! and are exposed for callers that need one piece on its own.

pub mod action_dispatcher;
pub mod bonus_code;
pub mod game_controller;
pub mod screen_controller;
pub mod single_flight;
pub mod sync_service;

pub use action_dispatcher::{ActionDispatcher, ActionPanel, ActionPhase, PendingAction};
pub use bonus_code::{BonusCodeTracker, BONUS_SEQUENCE};
pub use game_controller::{ControllerDeps, GameController};
pub use screen_controller::{ScreenController, ScreenTicket};
pub use single_flight::{FlightGuard, SingleFlight};
pub use sync_service::{merge_document, SyncService};
