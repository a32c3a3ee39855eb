//! # storefront-core: Pure Business Logic for the Storefront
//!
//! This crate is the **heart** of the storefront. It holds the state tree,
//! the closed set of transition requests, the reducer, and every derived
//! computation the screens need, as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    CLI commands (apps/cli)                      │   │
//! │  │    products, cart, checkout, wishlist, admin, login ...         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Store::dispatch(Action)               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   store   │  │  catalog  │  │  pricing  │  │  account  │  │   │
//! │  │   │  Action   │  │  filter   │  │  GST      │  │  register │  │   │
//! │  │   │  reduce   │  │  sort     │  │  shipping │  │  login    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Subscriber::on_commit                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 storefront-db (Local Storage)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, User, CartItem, Order, Category)
//! - [`money`] - Money type with integer arithmetic (paise, no floats)
//! - [`store`] - State tree, actions, reducer, subscribers
//! - [`catalog`] - Derived product listings (search, filter, sort)
//! - [`pricing`] - Cart totals: subtotal, GST, shipping
//! - [`checkout`] - Order placement from the current cart
//! - [`account`] - Registration and login
//! - [`dashboard`] - Admin statistics
//! - [`seed`] - Fallback records used when storage is empty
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::store::{Action, Store};
//! use storefront_core::CartItem;
//!
//! let mut store = Store::default();
//! store.dispatch(Action::AddToCart(CartItem::new("1", 1)));
//! store.dispatch(Action::AddToCart(CartItem::new("1", 1)));
//!
//! assert_eq!(store.state().cart.len(), 1);
//! assert_eq!(store.state().cart[0].quantity, 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod account;
pub mod catalog;
pub mod checkout;
pub mod dashboard;
pub mod error;
pub mod money;
pub mod pricing;
pub mod seed;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use store::{Action, AppState, Store};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Email of the built-in administrator account.
pub const ADMIN_EMAIL: &str = "admin@fixderma.com";

/// Selector value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Maximum quantity of a single cart entry.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest accepted product price: ₹1,00,00,000 (one crore) in paise.
///
/// Keeps `price × MAX_ITEM_QUANTITY` and cart sums far inside `i64`.
pub const MAX_PRICE_PAISE: i64 = 1_000_000_000;
