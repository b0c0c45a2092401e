//! Shared application state.
//!
//! One in-memory document guarded by a `RwLock`. Mutations snapshot the
//! document under the write lock and hand it to a background save.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, RwLock, RwLockReadGuard};
use tracing::warn;

use carpool_core::model::CarpoolState;
use carpool_core::storage::{StateStore, StorageError};

/// Orders background saves so an older snapshot never overwrites a newer one.
#[derive(Debug, Default)]
struct SaveSequence {
    issued: AtomicU64,
    written: Mutex<u64>,
}

impl SaveSequence {
    fn next(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    ledger: Arc<RwLock<CarpoolState>>,
    store: Arc<StateStore>,
    saves: Arc<SaveSequence>,
}

impl AppState {
    /// Wraps an already loaded document.
    #[must_use]
    pub fn new(ledger: CarpoolState, store: StateStore) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            store: Arc::new(store),
            saves: Arc::new(SaveSequence::default()),
        }
    }

    /// Loads the document from `store`, falling back to an empty one.
    pub async fn load(store: StateStore) -> Self {
        let ledger = store.load().await;
        Self::new(ledger, store)
    }

    /// Read access to the current document.
    pub async fn read(&self) -> RwLockReadGuard<'_, CarpoolState> {
        self.ledger.read().await
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Applies `op` under the write lock and schedules a save on success.
    ///
    /// The save runs in the background; failures are logged and the
    /// in-memory change stands.
    ///
    /// # Errors
    ///
    /// Returns whatever `op` returns. Nothing is saved in that case.
    pub async fn mutate<T, E>(
        &self,
        op: impl FnOnce(&mut CarpoolState) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut ledger = self.ledger.write().await;
        let out = op(&mut *ledger)?;
        let snapshot = ledger.clone();
        let version = self.saves.next();
        drop(ledger);

        let store = Arc::clone(&self.store);
        let saves = Arc::clone(&self.saves);
        tokio::spawn(async move {
            if let Err(e) = save_in_order(&store, &saves, &snapshot, version).await {
                warn!(error = %e, "Failed to save state");
            }
        });

        Ok(out)
    }

    /// Replaces the whole document and waits for it to be saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the save fails. The in-memory document is
    /// replaced regardless.
    pub async fn replace(&self, next: CarpoolState) -> Result<(), StorageError> {
        let mut ledger = self.ledger.write().await;
        *ledger = next.clone();
        let version = self.saves.next();
        drop(ledger);

        save_in_order(&self.store, &self.saves, &next, version).await
    }

    /// Returns true once every scheduled save has been written or skipped.
    pub async fn is_flushed(&self) -> bool {
        *self.saves.written.lock().await >= self.saves.issued.load(Ordering::SeqCst)
    }
}

async fn save_in_order(
    store: &StateStore,
    saves: &SaveSequence,
    snapshot: &CarpoolState,
    version: u64,
) -> Result<(), StorageError> {
    let mut written = saves.written.lock().await;
    if *written > version {
        return Ok(());
    }
    store.save(snapshot).await?;
    *written = version;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use carpool_core::model::{DomainError, LedgerService};

    #[tokio::test]
    async fn test_mutation_is_saved_in_background() {
        let state = AppState::load(StateStore::memory().unwrap()).await;
        state
            .mutate(|s| LedgerService::add_person(s, "Alice"))
            .await
            .unwrap();

        for _ in 0..50 {
            if state.is_flushed().await {
                break;
            }
            tokio::task::yield_now().await;
        }

        let saved = state.store().try_load().await.unwrap().unwrap();
        assert_eq!(saved.people.len(), 1);
        assert_eq!(*state.read().await, saved);
    }

    #[tokio::test]
    async fn test_failed_mutation_changes_nothing() {
        let state = AppState::load(StateStore::memory().unwrap()).await;
        let err = state
            .mutate(|s| LedgerService::add_car(s, "  ", "petrol"))
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::Blank { field: "name" });
        assert!(state.read().await.is_empty());
        assert!(state.is_flushed().await);
    }

    #[tokio::test]
    async fn test_replace_saves_immediately() {
        let state = AppState::load(StateStore::memory().unwrap()).await;
        let mut next = CarpoolState::default();
        LedgerService::add_car(&mut next, "Sedan", "diesel").unwrap();

        state.replace(next.clone()).await.unwrap();

        assert_eq!(state.store().try_load().await.unwrap(), Some(next));
    }

    #[tokio::test]
    async fn test_stale_snapshot_is_skipped() {
        let store = StateStore::memory().unwrap();
        let saves = SaveSequence::default();
        let newer = CarpoolState::default();
        let mut older = CarpoolState::default();
        LedgerService::add_person(&mut older, "Stale").unwrap();

        save_in_order(&store, &saves, &newer, 2).await.unwrap();
        save_in_order(&store, &saves, &older, 1).await.unwrap();

        assert_eq!(store.try_load().await.unwrap(), Some(newer));
    }
}
