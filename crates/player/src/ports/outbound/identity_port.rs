//! Identity Port - hosted authentication provider
//!
//! The provider owns the signed-in identity. Besides the request/response
//! methods it pushes identity changes to registered observers; the
//! composition root forwards those into the client event channel.

use async_trait::async_trait;
use echoverse_domain::UserId;

use super::IdentityError;

/// Observer invoked with the new identity (or `None` after sign-out).
pub type AuthStateCallback = Box<dyn FnMut(Option<UserId>) + Send + 'static>;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait IdentityPort: Send + Sync {
    async fn sign_in_anonymous(&self) -> Result<UserId, IdentityError>;

    /// Sign in with a token handed over by the hosting page.
    async fn sign_in_with_token(&self, token: &str) -> Result<UserId, IdentityError>;

    async fn sign_out(&self) -> Result<(), IdentityError>;

    fn current_user(&self) -> Option<UserId>;

    /// Register an observer. It is called once immediately with the current
    /// identity, then on every change.
    fn on_auth_state_change(&self, callback: AuthStateCallback);
}
