use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use echoverse_domain::UserId;
use uuid::Uuid;

use crate::ports::outbound::{AuthStateCallback, IdentityError, IdentityPort};

#[derive(Default)]
struct IdentityState {
    current: Option<UserId>,
    token_users: HashMap<String, UserId>,
    observers: Vec<AuthStateCallback>,
    unavailable: bool,
}

impl IdentityState {
    fn set_current(&mut self, user: Option<UserId>) {
        self.current = user;
        let current = self.current.clone();
        for observer in self.observers.iter_mut() {
            observer(current.clone());
        }
    }
}

/// Identity provider held in memory.
///
/// Anonymous sign-ins mint a fresh UUID. A custom token always maps to the
/// same user, so signing in twice with one token restores that user.
#[derive(Clone, Default)]
pub struct InMemoryIdentityProvider {
    state: Arc<Mutex<IdentityState>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `token` to a known user ahead of sign-in.
    pub fn register_token(&self, token: impl Into<String>, user_id: UserId) {
        self.lock().token_users.insert(token.into(), user_id);
    }

    /// Simulate a provider outage: every sign-in fails while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    fn lock(&self) -> MutexGuard<'_, IdentityState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl IdentityPort for InMemoryIdentityProvider {
    async fn sign_in_anonymous(&self) -> Result<UserId, IdentityError> {
        let mut state = self.lock();
        if state.unavailable {
            return Err(IdentityError::Unavailable);
        }
        let user_id = UserId::new(Uuid::new_v4().to_string());
        tracing::info!(user_id = %user_id, "Signed in anonymously");
        state.set_current(Some(user_id.clone()));
        Ok(user_id)
    }

    async fn sign_in_with_token(&self, token: &str) -> Result<UserId, IdentityError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(IdentityError::SignInFailed("empty token".into()));
        }
        let mut state = self.lock();
        if state.unavailable {
            return Err(IdentityError::Unavailable);
        }
        let user_id = state
            .token_users
            .entry(token.to_string())
            .or_insert_with(|| UserId::new(Uuid::new_v4().to_string()))
            .clone();
        tracing::info!(user_id = %user_id, "Signed in with token");
        state.set_current(Some(user_id.clone()));
        Ok(user_id)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        let mut state = self.lock();
        if state.current.is_some() {
            tracing::info!("Signed out");
            state.set_current(None);
        }
        Ok(())
    }

    fn current_user(&self) -> Option<UserId> {
        self.lock().current.clone()
    }

    fn on_auth_state_change(&self, mut callback: AuthStateCallback) {
        let mut state = self.lock();
        callback(state.current.clone());
        state.observers.push(callback);
    }
}
