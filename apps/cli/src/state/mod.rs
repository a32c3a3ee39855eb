//! # State Module
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────────────────┐  │
//! │  │   ConfigState        │        │   Session                        │  │
//! │  │                      │        │                                  │  │
//! │  │  store_name          │───────►│  Store (state + subscribers)     │  │
//! │  │  GST / shipping      │        │  StorageWriter                   │  │
//! │  │  admin seed, db path │        │  Database                        │  │
//! │  └──────────────────────┘        └──────────────────────────────────┘  │
//! │                                                                         │
//! │  ConfigState: read-only after startup                                  │
//! │  Session: owned by the running command, `&mut` for dispatch            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

pub use config::{ConfigError, ConfigState};
pub use session::Session;
