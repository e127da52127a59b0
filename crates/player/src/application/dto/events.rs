//! Events delivered to the controller from outside its call stack
//!
//! Identity changes and document pushes arrive through provider callbacks.
//! The callbacks only forward into an unbounded channel; the runner drains
//! it and hands each event to `GameController::handle_event`, so all state
//! mutation stays on one task.

use echoverse_domain::UserId;

use crate::ports::outbound::{Document, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteChange {
    Updated(Document),
    Removed,
    Failed(StoreError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    AuthChanged(Option<UserId>),
    Remote(RemoteChange),
}
