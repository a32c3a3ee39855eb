//! # Repository Module
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  hydrate() / StorageWriter                                              │
//! │       │                                                                 │
//! │       │  db.local_storage().set_item("fixderma_cart", json)             │
//! │       ▼                                                                 │
//! │  LocalStorageRepository                                                 │
//! │  ├── get_item(&self, key)                                               │
//! │  ├── set_item(&self, key, value)                                        │
//! │  ├── remove_item(&self, key)                                            │
//! │  ├── keys(&self)                                                        │
//! │  └── clear(&self)                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  local_storage table                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod local_storage;

pub use local_storage::LocalStorageRepository;
