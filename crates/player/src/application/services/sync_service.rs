//! Sync service - mirrors the session state into the document store
//!
//! The per-user session document is the durable copy of `SessionState`.
//! This service hydrates local state from it, persists local state into it
//! and forwards its change notifications. The profile document, which holds
//! the display name, is handled here as well.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use echoverse_domain::{DisplayName, PlayerIdentity, SessionState, UserId};
use serde_json::Value;

use super::single_flight::SingleFlight;
use crate::application::dto::RemoteChange;
use crate::application::error::{ClientError, Operation};
use crate::ports::outbound::{
    Document, DocumentPath, DocumentStorePort, SetOptions, StoreError, Subscription,
};

const DISPLAY_NAME_FIELD: &str = "displayName";
const LAST_UPDATED_FIELD: &str = "lastUpdated";

pub struct SyncService {
    store: Arc<dyn DocumentStorePort>,
    namespace: String,
    saving: SingleFlight,
}

impl SyncService {
    pub fn new(store: Arc<dyn DocumentStorePort>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            saving: SingleFlight::new(),
        }
    }

    /// Whether a persist call is in flight.
    pub fn is_saving(&self) -> bool {
        self.saving.is_busy()
    }

    /// Read the recorded display name, if any.
    ///
    /// A stored name that no longer passes validation counts as absent.
    pub async fn load_profile(&self, user_id: &UserId) -> Result<Option<DisplayName>, ClientError> {
        let path = DocumentPath::profile(&self.namespace, user_id);
        let Some(profile) = self.store.get(&path).await? else {
            return Ok(None);
        };

        let Some(raw) = profile.get(DISPLAY_NAME_FIELD).and_then(Value::as_str) else {
            return Ok(None);
        };
        match DisplayName::new(raw) {
            Ok(name) => Ok(Some(name)),
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "Ignoring invalid stored display name"
                );
                Ok(None)
            }
        }
    }

    pub async fn save_display_name(
        &self,
        user_id: &UserId,
        name: &DisplayName,
        now: DateTime<Utc>,
    ) -> Result<(), ClientError> {
        let mut profile = Document::new();
        profile.insert(DISPLAY_NAME_FIELD.into(), Value::from(name.as_str()));
        profile.insert(LAST_UPDATED_FIELD.into(), Value::from(now.to_rfc3339()));

        let path = DocumentPath::profile(&self.namespace, user_id);
        self.store.set(&path, profile, SetOptions::merge()).await?;
        tracing::info!(user_id = %user_id, "Display name saved");
        Ok(())
    }

    /// Load the saved session for `identity`.
    ///
    /// Returns `Ok(None)` when there is no session document. Otherwise the
    /// result is the default state overlaid with every stored field. Nothing
    /// is applied here: on error the caller's state is untouched.
    pub async fn hydrate(
        &self,
        identity: &PlayerIdentity,
    ) -> Result<Option<SessionState>, ClientError> {
        let path = DocumentPath::session(&self.namespace, &identity.user_id);
        let Some(stored) = self.store.get(&path).await? else {
            tracing::info!(user_id = %identity.user_id, "No saved session");
            return Ok(None);
        };

        let defaults = SessionState {
            identity: Some(identity.clone()),
            ..SessionState::default()
        };
        let restored = merge_document(&defaults, &stored)?;
        tracing::info!(user_id = %identity.user_id, "Session restored");
        Ok(Some(restored))
    }

    /// Write the full state (minus identity) with merge semantics.
    pub async fn persist(&self, state: &SessionState) -> Result<(), ClientError> {
        let user_id = state.user_id().ok_or(ClientError::Unauthenticated)?;
        let _guard = self
            .saving
            .try_acquire()
            .ok_or(ClientError::Busy(Operation::Save))?;

        let document = to_document(state)?;
        let path = DocumentPath::session(&self.namespace, user_id);
        self.store.set(&path, document, SetOptions::merge()).await?;
        tracing::info!(user_id = %user_id, entries = state.history.len(), "Session saved");
        Ok(())
    }

    /// Watch the session document. Every snapshot is handed to `on_change`
    /// until the returned handle is dropped.
    pub fn subscribe(
        &self,
        user_id: &UserId,
        mut on_change: impl FnMut(RemoteChange) + Send + 'static,
    ) -> Subscription {
        let path = DocumentPath::session(&self.namespace, user_id);
        tracing::debug!(path = %path, "Watching session document");
        self.store.subscribe(
            &path,
            Box::new(move |snapshot| {
                let change = match snapshot {
                    Ok(Some(document)) => RemoteChange::Updated(document),
                    Ok(None) => RemoteChange::Removed,
                    Err(e) => RemoteChange::Failed(e),
                };
                on_change(change);
            }),
        )
    }
}

/// Overlay `remote` onto `base` field by field; remote values win.
///
/// The merge is top-level: a remote key replaces the local value whole and
/// keys the remote document lacks keep their local value. Identity always
/// comes from `base`.
pub fn merge_document(base: &SessionState, remote: &Document) -> Result<SessionState, ClientError> {
    let mut merged = to_document(base)?;
    for (key, value) in remote {
        merged.insert(key.clone(), value.clone());
    }

    let mut state: SessionState = serde_json::from_value(Value::Object(merged))
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    state.identity = base.identity.clone();
    Ok(state)
}

fn to_document(state: &SessionState) -> Result<Document, ClientError> {
    match serde_json::to_value(state) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(_) => Err(StoreError::Serialization("session state is not an object".into()).into()),
        Err(e) => Err(StoreError::Serialization(e.to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryDocumentStore;
    use crate::ports::outbound::MockDocumentStorePort;
    use chrono::TimeZone;
    use echoverse_domain::{Character, GameMode, HistoryEntry, InventoryItem, VIGOR};
    use mockall::predicate::*;
    use serde_json::json;

    fn identity() -> PlayerIdentity {
        PlayerIdentity::new(UserId::new("user-1"))
            .with_display_name(DisplayName::new("Lyra").unwrap())
    }

    fn playing_state() -> SessionState {
        let character = Character::create(
            "Lyra",
            "explorer",
            "Weathered cloak",
            "Born between two ticks of the clock",
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        )
        .unwrap();
        let mut state = SessionState::for_character(Some(identity()), character);
        state.mode = Some(GameMode::Exploration);
        state.record_narration("You awaken in a hall of clocks.");
        state.record_player_action("Look around");
        state.grant_item_once(InventoryItem::new("Brass key", "Warm to the touch"));
        state
    }

    fn document(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[tokio::test]
    async fn persist_then_hydrate_round_trips() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let sync = SyncService::new(store, "app");
        let state = playing_state();

        sync.persist(&state).await.unwrap();
        let restored = sync.hydrate(&identity()).await.unwrap().unwrap();

        assert_eq!(restored, state);
    }

    #[tokio::test]
    async fn hydrate_without_document_signals_no_session() {
        let mut store = MockDocumentStorePort::new();
        store
            .expect_get()
            .with(eq(DocumentPath::session("app", &UserId::new("user-1"))))
            .times(1)
            .returning(|_| Ok(None));

        let sync = SyncService::new(Arc::new(store), "app");
        assert_eq!(sync.hydrate(&identity()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn hydrate_fills_missing_fields_with_defaults() {
        let mut store = MockDocumentStorePort::new();
        store
            .expect_get()
            .returning(|_| Ok(Some(document(json!({"gameMode": "mystery"})))));

        let sync = SyncService::new(Arc::new(store), "app");
        let restored = sync.hydrate(&identity()).await.unwrap().unwrap();

        assert_eq!(restored.mode, Some(GameMode::Mystery));
        assert_eq!(restored.attributes.get(VIGOR), Some(80));
        assert_eq!(restored.identity, Some(identity()));
        assert!(!restored.has_session());
    }

    #[tokio::test]
    async fn hydrate_failure_surfaces_error() {
        let mut store = MockDocumentStorePort::new();
        store
            .expect_get()
            .returning(|_| Err(StoreError::Unavailable("offline".into())));

        let sync = SyncService::new(Arc::new(store), "app");
        let err = sync.hydrate(&identity()).await.unwrap_err();
        assert_eq!(err, ClientError::Network("offline".into()));
    }

    #[tokio::test]
    async fn persist_requires_identity() {
        let store = MockDocumentStorePort::new();
        let sync = SyncService::new(Arc::new(store), "app");

        let err = sync.persist(&SessionState::default()).await.unwrap_err();
        assert_eq!(err, ClientError::Unauthenticated);
    }

    #[tokio::test]
    async fn persist_writes_merge_without_identity() {
        let mut store = MockDocumentStorePort::new();
        store
            .expect_set()
            .withf(|path, data, options| {
                path.to_string() == "artifacts/app/users/user-1/sessions/current"
                    && options.merge
                    && !data.contains_key("identity")
                    && data.contains_key("history")
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let sync = SyncService::new(Arc::new(store), "app");
        sync.persist(&playing_state()).await.unwrap();
        assert!(!sync.is_saving());
    }

    #[tokio::test]
    async fn profile_round_trips_display_name() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let sync = SyncService::new(store.clone(), "app");
        let user = UserId::new("user-1");
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();

        assert_eq!(sync.load_profile(&user).await.unwrap(), None);
        sync.save_display_name(&user, &DisplayName::new("Lyra").unwrap(), now)
            .await
            .unwrap();

        assert_eq!(
            sync.load_profile(&user).await.unwrap(),
            Some(DisplayName::new("Lyra").unwrap())
        );
        let raw = store
            .get(&DocumentPath::profile("app", &user))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(raw["lastUpdated"], json!(now.to_rfc3339()));
    }

    #[test]
    fn merge_is_idempotent() {
        let base = playing_state();
        let remote = document(json!({
            "attributes": {"vigor": 12, "ingenuity": 99},
            "location": "The flooded archive",
        }));

        let once = merge_document(&base, &remote).unwrap();
        let twice = merge_document(&once, &remote).unwrap();

        assert_eq!(once, twice);
        assert_eq!(once.attributes.get(VIGOR), Some(12));
        assert_eq!(once.location.as_deref(), Some("The flooded archive"));
        assert_eq!(once.history, base.history);
    }

    #[test]
    fn merge_remote_wins_and_keeps_identity() {
        let base = playing_state();
        let remote = document(json!({
            "history": [{"speaker": "narrator", "text": "Rewritten."}],
        }));

        let merged = merge_document(&base, &remote).unwrap();
        assert_eq!(merged.history, vec![HistoryEntry::narrator("Rewritten.")]);
        assert_eq!(merged.identity, base.identity);
        assert_eq!(merged.character, base.character);
    }

    #[test]
    fn merge_rejects_malformed_fields() {
        let remote = document(json!({"history": "not a list"}));
        let err = merge_document(&playing_state(), &remote).unwrap_err();
        assert!(matches!(err, ClientError::Service { status: None, .. }));
    }
}
