//! Errors raised by outbound adapters.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("Sign-in failed: {0}")]
    SignInFailed(String),
    #[error("Sign-out failed: {0}")]
    SignOutFailed(String),
    #[error("Identity provider unavailable")]
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Document store unavailable: {0}")]
    Unavailable(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NarrationError {
    /// The service answered 404: it holds no session for this player.
    #[error("No existing session")]
    NoSession,
    #[error("Narration service returned {status}: {body}")]
    Service { status: u16, body: String },
    #[error("Narration request failed: {0}")]
    Network(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
