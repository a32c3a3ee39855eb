//! # Session State
//!
//! One storefront session: the hydrated store, its storage writer and the
//! configuration it was opened with.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Session::open(db, config)                                             │
//! │       │                                                                 │
//! │       ├── health_check + migration_status                               │
//! │       ├── hydrate(db)            ──► Store (seed fallback)              │
//! │       ├── storage_channel(db)    ──► PersistenceSubscriber + Writer     │
//! │       └── queue snapshot_writes  ──► storage mirrors the hydrated state │
//! │                                                                         │
//! │  command ── session.dispatch(action) ──► commit ──► queued writes       │
//! │          └─ session.save().await     ──► local_storage table            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use storefront_core::store::{Action, AppState, Store};
use storefront_db::migrations::migration_status;
use storefront_db::{hydrate, snapshot_writes, storage_channel, Database, StorageWriter};
use tracing::{debug, info, warn};

use super::ConfigState;
use crate::error::{ApiError, ErrorCode};

/// A hydrated store wired to local storage.
#[derive(Debug)]
pub struct Session {
    store: Store,
    writer: StorageWriter,
    db: Database,
    config: ConfigState,
}

impl Session {
    /// Hydrates the store from `db` and attaches persistence.
    pub async fn open(db: Database, config: ConfigState) -> Result<Self, ApiError> {
        if !db.health_check().await {
            return Err(ApiError::new(
                ErrorCode::DatabaseError,
                "Local storage is not responding",
            ));
        }
        let (total, applied) = migration_status(db.pool()).await?;
        if applied < total {
            warn!(total, applied, "Local storage has pending migrations");
        } else {
            debug!(total, "Local storage schema is current");
        }

        let mut store = hydrate(&db, &config.hydrate_options()).await?;

        let (subscriber, writer) = storage_channel(db.local_storage());
        subscriber.queue(snapshot_writes(store.state())?);
        store.subscribe(Box::new(subscriber));

        info!(store = %config.store_name, "Session opened");
        Ok(Session {
            store,
            writer,
            db,
            config,
        })
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn config(&self) -> &ConfigState {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Clock used for registrations and orders.
    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Dispatches `action`; persisted slices are queued for the next save.
    pub fn dispatch(&mut self, action: Action) -> &AppState {
        self.store.dispatch(action)
    }

    /// Writes queued slices to local storage. Returns the number of keys written.
    pub async fn save(&mut self) -> Result<usize, ApiError> {
        let written = self.writer.flush().await?;
        debug!(written, "Session saved");
        Ok(written)
    }

    /// Saves and closes the database.
    pub async fn close(mut self) -> Result<(), ApiError> {
        self.save().await?;
        self.db.close().await;
        Ok(())
    }
}
