//! # storefront-db: Local Storage for the Storefront
//!
//! Keeps the persisted state slices in a SQLite key/value table and
//! rebuilds the store from it at startup.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Data Flow                             │
//! │                                                                         │
//! │  CLI startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  storefront-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │   hydrate()   │    │  persist     │  │   │
//! │  │   │   (pool.rs)   │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ storage ──►   │    │ Subscriber ──┼──┼── Store
//! │  │   │ migrations    │    │ Store + seed  │    │ Writer       │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────┬───────┘  │   │
//! │  │           │      LocalStorageRepository            │          │   │
//! │  │           └────────────────────┬───────────────────┘          │   │
//! │  └────────────────────────────────┼──────────────────────────────┘   │
//! │                                   ▼                                     │
//! │                     local_storage(key, value, updated_at)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let db = Database::new(DbConfig::new(path)).await?;
//! let mut store = hydrate(&db, &HydrateOptions::default()).await?;
//!
//! let (subscriber, mut writer) = storage_channel(db.local_storage());
//! subscriber.queue(snapshot_writes(store.state())?);
//! store.subscribe(Box::new(subscriber));
//!
//! store.dispatch(Action::ClearCart);
//! writer.flush().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod hydrate;
pub mod migrations;
pub mod persist;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use hydrate::{hydrate, HydrateOptions};
pub use persist::{snapshot_writes, storage_channel, PersistenceSubscriber, StorageWrite, StorageWriter};
pub use pool::{Database, DbConfig};
pub use repository::LocalStorageRepository;
