//! # Persistence
//!
//! Mirrors persisted state slices into local storage after each commit.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Store::dispatch(action)                                               │
//! │       │  commit (in memory, synchronous)                                │
//! │       ▼                                                                 │
//! │  PersistenceSubscriber::on_commit                                      │
//! │       │  for each changed slice with a storage key:                     │
//! │       │      StorageWrite { key, value: slice JSON }                    │
//! │       ▼                                                                 │
//! │  ════════ unbounded mpsc channel ════════                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StorageWriter::flush / run (async)                                    │
//! │       │  last write per key wins within a batch                         │
//! │       ▼                                                                 │
//! │  local_storage table (one transaction per batch)                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The writer only ever sees serialized values, never the live state.

use storefront_core::store::{AppState, Commit, StateSlice, Subscriber};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::LocalStorageRepository;

/// One pending local storage write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageWrite {
    pub key: String,
    pub value: String,
}

impl StorageWrite {
    /// Serializes `slice` of `state`. `None` for memory-only slices.
    pub fn for_slice(slice: StateSlice, state: &AppState) -> Option<DbResult<StorageWrite>> {
        let key = slice.storage_key()?;
        Some(
            slice
                .to_json(state)
                .map(|value| StorageWrite {
                    key: key.to_string(),
                    value,
                })
                .map_err(|e| DbError::serialization(key, e)),
        )
    }
}

/// Creates a connected subscriber/writer pair.
pub fn storage_channel(storage: LocalStorageRepository) -> (PersistenceSubscriber, StorageWriter) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        PersistenceSubscriber { tx },
        StorageWriter { rx, storage },
    )
}

/// Every persisted slice of `state`, in hydration order.
pub fn snapshot_writes(state: &AppState) -> DbResult<Vec<StorageWrite>> {
    StateSlice::PERSISTED
        .into_iter()
        .filter_map(|slice| StorageWrite::for_slice(slice, state))
        .collect()
}

// =============================================================================
// Subscriber
// =============================================================================

/// Store subscriber that queues a write for every changed persisted slice.
#[derive(Debug, Clone)]
pub struct PersistenceSubscriber {
    tx: mpsc::UnboundedSender<StorageWrite>,
}

impl PersistenceSubscriber {
    /// Queues writes directly, bypassing the store.
    pub fn queue(&self, writes: impl IntoIterator<Item = StorageWrite>) {
        for write in writes {
            if self.tx.send(write).is_err() {
                warn!("Storage writer is gone; dropping write");
                return;
            }
        }
    }
}

impl Subscriber for PersistenceSubscriber {
    fn on_commit(&mut self, commit: &Commit<'_>) {
        for slice in commit.changed {
            match StorageWrite::for_slice(*slice, commit.current) {
                None => {}
                Some(Ok(write)) => {
                    debug!(key = %write.key, action = commit.action, "Queued storage write");
                    self.queue([write]);
                }
                Some(Err(e)) => error!(error = %e, "Failed to serialize state slice"),
            }
        }
    }
}

// =============================================================================
// Writer
// =============================================================================

/// Drains queued writes into local storage.
#[derive(Debug)]
pub struct StorageWriter {
    rx: mpsc::UnboundedReceiver<StorageWrite>,
    storage: LocalStorageRepository,
}

impl StorageWriter {
    /// Writes everything queued so far. Returns the number of keys written.
    pub async fn flush(&mut self) -> DbResult<usize> {
        let mut pending = Vec::new();
        while let Ok(write) = self.rx.try_recv() {
            pending.push(write);
        }
        write_batch(&self.storage, pending).await
    }

    /// Writes batches until every subscriber is dropped.
    pub async fn run(mut self) -> DbResult<()> {
        info!("Storage writer starting");

        while let Some(first) = self.rx.recv().await {
            let mut pending = vec![first];
            while let Ok(write) = self.rx.try_recv() {
                pending.push(write);
            }
            if let Err(e) = write_batch(&self.storage, pending).await {
                error!(error = %e, "Failed to persist state");
                return Err(e);
            }
        }

        info!("Storage writer stopped");
        Ok(())
    }
}

async fn write_batch(storage: &LocalStorageRepository, pending: Vec<StorageWrite>) -> DbResult<usize> {
    if pending.is_empty() {
        return Ok(0);
    }

    let queued = pending.len();
    let mut latest: Vec<(String, String)> = Vec::new();
    for write in pending {
        match latest.iter_mut().find(|(key, _)| *key == write.key) {
            Some(slot) => slot.1 = write.value,
            None => latest.push((write.key, write.value)),
        }
    }

    storage.set_items(&latest).await?;
    info!(queued, written = latest.len(), "Flushed state to local storage");
    Ok(latest.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use storefront_core::store::{Action, Store};
    use storefront_core::CartItem;

    async fn setup() -> (Database, Store, StorageWriter) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (subscriber, writer) = storage_channel(db.local_storage());
        let mut store = Store::default();
        store.subscribe(Box::new(subscriber));
        (db, store, writer)
    }

    #[tokio::test]
    async fn test_changed_slices_are_written() {
        let (db, mut store, mut writer) = setup().await;

        store.dispatch(Action::AddToCart(CartItem::new("1", 1).with_id("a")));
        store.dispatch(Action::AddToCart(CartItem::new("1", 1).with_id("b")));
        store.dispatch(Action::AddToWishlist("3".into()));

        // two cart writes collapse into one
        assert_eq!(writer.flush().await.unwrap(), 2);

        let storage = db.local_storage();
        let cart: Vec<CartItem> =
            serde_json::from_str(&storage.get_item("fixderma_cart").await.unwrap().unwrap())
                .unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].quantity, 2);
        assert_eq!(
            storage.get_item("fixderma_wishlist").await.unwrap().as_deref(),
            Some(r#"["3"]"#)
        );
    }

    #[tokio::test]
    async fn test_memory_only_slices_are_not_written() {
        let (db, mut store, mut writer) = setup().await;

        store.dispatch(Action::SetSearchQuery("serum".into()));
        store.dispatch(Action::SetSelectedCategory("Serum".into()));

        assert_eq!(writer.flush().await.unwrap(), 0);
        assert!(db.local_storage().keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_logout_writes_null_current_user() {
        let (db, mut store, mut writer) = setup().await;
        let admin = storefront_core::seed::admin_user(String::new(), chrono::Utc::now());

        store.dispatch(Action::SetCurrentUser(Some(admin)));
        store.dispatch(Action::SetCurrentUser(None));
        writer.flush().await.unwrap();

        assert_eq!(
            db.local_storage()
                .get_item("fixderma_currentUser")
                .await
                .unwrap()
                .as_deref(),
            Some("null")
        );
    }

    #[tokio::test]
    async fn test_run_stops_when_subscribers_drop() {
        let (db, mut store, writer) = setup().await;
        let handle = tokio::spawn(writer.run());

        store.dispatch(Action::AddToWishlist("1".into()));
        drop(store);

        handle.await.unwrap().unwrap();
        assert_eq!(db.local_storage().keys().await.unwrap(), vec!["fixderma_wishlist"]);
    }

    #[test]
    fn test_snapshot_covers_persisted_slices() {
        let writes = snapshot_writes(&AppState::default()).unwrap();
        let keys: Vec<&str> = writes.iter().map(|w| w.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "fixderma_products",
                "fixderma_users",
                "fixderma_orders",
                "fixderma_cart",
                "fixderma_wishlist",
                "fixderma_currentUser",
            ]
        );
    }
}
