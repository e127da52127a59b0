//! Document Store Port - per-user JSON documents with change subscriptions
//!
//! Documents are addressed by `(namespace, user, collection, document)` and
//! rendered as `artifacts/{namespace}/users/{user}/{collection}/{document}`.

use std::fmt;

use async_trait::async_trait;
use echoverse_domain::UserId;

use super::StoreError;

/// A stored document: a JSON object keyed by top-level field name.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Observer invoked with each new snapshot of a watched document.
///
/// `Ok(None)` means the document does not exist (or was removed).
pub type SnapshotCallback = Box<dyn FnMut(Result<Option<Document>, StoreError>) + Send + 'static>;

const PROFILE_COLLECTION: &str = "profile";
const PROFILE_DOCUMENT: &str = "main";
const SESSION_COLLECTION: &str = "sessions";
const SESSION_DOCUMENT: &str = "current";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    pub namespace: String,
    pub user_id: UserId,
    pub collection: String,
    pub document_id: String,
}

impl DocumentPath {
    pub fn new(
        namespace: impl Into<String>,
        user_id: UserId,
        collection: impl Into<String>,
        document_id: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            user_id,
            collection: collection.into(),
            document_id: document_id.into(),
        }
    }

    /// The user's profile document (display name).
    pub fn profile(namespace: &str, user_id: &UserId) -> Self {
        Self::new(namespace, user_id.clone(), PROFILE_COLLECTION, PROFILE_DOCUMENT)
    }

    /// The user's single live session document.
    pub fn session(namespace: &str, user_id: &UserId) -> Self {
        Self::new(namespace, user_id.clone(), SESSION_COLLECTION, SESSION_DOCUMENT)
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "artifacts/{}/users/{}/{}/{}",
            self.namespace, self.user_id, self.collection, self.document_id
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetOptions {
    /// Merge top-level fields into the existing document instead of
    /// replacing it.
    pub merge: bool,
}

impl SetOptions {
    pub fn merge() -> Self {
        Self { merge: true }
    }
}

/// Handle for an active document subscription. Dropping it unsubscribes.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait DocumentStorePort: Send + Sync {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError>;

    async fn set(
        &self,
        path: &DocumentPath,
        data: Document,
        options: SetOptions,
    ) -> Result<(), StoreError>;

    /// Watch a document. The callback receives the current snapshot first,
    /// then every later change, until the returned handle is dropped.
    fn subscribe(&self, path: &DocumentPath, on_snapshot: SnapshotCallback) -> Subscription;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn paths_render_under_the_user() {
        let user = UserId::new("u-1");
        assert_eq!(
            DocumentPath::profile("app", &user).to_string(),
            "artifacts/app/users/u-1/profile/main"
        );
        assert_eq!(
            DocumentPath::session("app", &user).to_string(),
            "artifacts/app/users/u-1/sessions/current"
        );
    }

    #[test]
    fn dropping_subscription_cancels_once() {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        let subscription = Subscription::new(move || {
            assert!(!flag.swap(true, Ordering::SeqCst));
        });
        drop(subscription);
        assert!(cancelled.load(Ordering::SeqCst));
    }
}
