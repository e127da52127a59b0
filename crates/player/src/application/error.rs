//! Client error types
//!
//! Every failure reaching the controller is one of these. Adapter errors
//! convert in via `From`, so services can use `?` at the call site and the
//! controller turns the result into a notice.

use std::fmt;

use echoverse_domain::DomainError;

use super::dto::Notice;
use crate::ports::outbound::{IdentityError, NarrationError, StoreError};

/// Operation categories guarded against re-entrant calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Auth,
    Save,
    Narration,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Auth => f.write_str("Sign-in"),
            Operation::Save => f.write_str("Save"),
            Operation::Narration => f.write_str("Narration"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// Missing or invalid backend credentials. Fatal at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Authentication failed: {0}")]
    Authentication(#[from] IdentityError),
    /// No existing session. A normal branch, not a failure.
    #[error("No existing session")]
    NotFound,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Service error: {message}")]
    Service { status: Option<u16>, message: String },
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("Not signed in")]
    Unauthenticated,
    #[error("{0} already in progress")]
    Busy(Operation),
}

impl From<StoreError> for ClientError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(msg) => ClientError::Network(msg),
            StoreError::PermissionDenied(msg) => ClientError::Service {
                status: None,
                message: format!("Permission denied: {msg}"),
            },
            StoreError::Serialization(msg) => ClientError::Service {
                status: None,
                message: format!("Unreadable document: {msg}"),
            },
        }
    }
}

impl From<NarrationError> for ClientError {
    fn from(e: NarrationError) -> Self {
        match e {
            NarrationError::NoSession => ClientError::NotFound,
            NarrationError::Service { status, body } => ClientError::Service {
                status: Some(status),
                message: body,
            },
            NarrationError::Network(msg) => ClientError::Network(msg),
            NarrationError::InvalidResponse(msg) => ClientError::Service {
                status: None,
                message: format!("Invalid narration response: {msg}"),
            },
        }
    }
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound)
    }

    /// Whether the client keeps running normally after this error.
    ///
    /// Only configuration errors are fatal.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ClientError::Configuration(_))
    }

    /// The user-facing notice for this error.
    pub fn notice(&self) -> Notice {
        match self {
            ClientError::Configuration(msg) => {
                Notice::error(format!("The game is misconfigured: {msg}"))
            }
            ClientError::Authentication(e) => Notice::error(format!("Could not sign in: {e}")),
            ClientError::NotFound => {
                Notice::info("No saved adventure found. Create a character to begin.")
            }
            ClientError::Network(_) => {
                Notice::error("The network is unreachable. Check your connection and try again.")
            }
            ClientError::Service { status, message } => match status {
                Some(status) => Notice::error(format!("The server failed ({status}): {message}")),
                None => Notice::error(format!("The server failed: {message}")),
            },
            ClientError::Validation(e) => Notice::error(validation_message(e)),
            ClientError::Unauthenticated => Notice::error("Please sign in to continue."),
            ClientError::Busy(op) => Notice::info(format!("{op} already in progress.")),
        }
    }
}

fn validation_message(e: &DomainError) -> String {
    match e {
        DomainError::Validation(msg) | DomainError::Parse(msg) => msg.clone(),
        other => other.to_string(),
    }
}
