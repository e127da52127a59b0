use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use async_trait::async_trait;

use crate::ports::outbound::{
    Document, DocumentPath, DocumentStorePort, SetOptions, SnapshotCallback, StoreError,
    Subscription,
};

struct Watcher {
    id: u64,
    path: String,
    on_snapshot: SnapshotCallback,
}

#[derive(Default)]
struct StoreState {
    documents: HashMap<String, Document>,
    watchers: Vec<Watcher>,
    next_watcher_id: u64,
    failure: Option<StoreError>,
}

impl StoreState {
    fn notify(&mut self, path: &str) {
        let snapshot = self.documents.get(path).cloned();
        for watcher in self.watchers.iter_mut().filter(|w| w.path == path) {
            (watcher.on_snapshot)(Ok(snapshot.clone()));
        }
    }
}

/// Document store held in memory.
///
/// Watcher callbacks run while the store lock is held and must not call
/// back into the store.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `get` and `set` fail with `error` until cleared with
    /// `None`.
    pub fn set_failure(&self, error: Option<StoreError>) {
        self.lock().failure = error;
    }

    /// Write a document as another client would, notifying watchers.
    pub fn put_remote(&self, path: &DocumentPath, document: Document) {
        let key = path.to_string();
        let mut state = self.lock();
        state.documents.insert(key.clone(), document);
        state.notify(&key);
    }

    pub fn watcher_count(&self) -> usize {
        self.lock().watchers.len()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<StoreState>) -> MutexGuard<'_, StoreState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl DocumentStorePort for InMemoryDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        let state = self.lock();
        if let Some(error) = &state.failure {
            return Err(error.clone());
        }
        Ok(state.documents.get(&path.to_string()).cloned())
    }

    async fn set(
        &self,
        path: &DocumentPath,
        data: Document,
        options: SetOptions,
    ) -> Result<(), StoreError> {
        let key = path.to_string();
        let mut state = self.lock();
        if let Some(error) = &state.failure {
            return Err(error.clone());
        }

        let written = match state.documents.remove(&key) {
            Some(mut existing) if options.merge => {
                existing.extend(data);
                existing
            }
            _ => data,
        };
        state.documents.insert(key.clone(), written);
        tracing::debug!(path = %key, merge = options.merge, "Document written");
        state.notify(&key);
        Ok(())
    }

    fn subscribe(&self, path: &DocumentPath, mut on_snapshot: SnapshotCallback) -> Subscription {
        let key = path.to_string();
        let mut state = self.lock();

        on_snapshot(Ok(state.documents.get(&key).cloned()));

        let id = state.next_watcher_id;
        state.next_watcher_id += 1;
        state.watchers.push(Watcher {
            id,
            path: key,
            on_snapshot,
        });

        let weak: Weak<Mutex<StoreState>> = Arc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                lock_state(&state).watchers.retain(|w| w.id != id);
            }
        })
    }
}
