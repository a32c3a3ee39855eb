//! # State Tree
//!
//! The single source of truth read by every screen.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppState                                                               │
//! │                                                                         │
//! │  Collections (admin-managed)     Session (shopper-scoped)               │
//! │  ───────────────────────────     ────────────────────────               │
//! │  products    ─► persisted        cart              ─► persisted         │
//! │  users       ─► persisted        wishlist          ─► persisted         │
//! │  orders      ─► persisted        current_user      ─► persisted         │
//! │  categories  (static seed)       search_query      (memory only)        │
//! │                                  selected_category (memory only)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{CartItem, Category, Order, Product, User};
use crate::ALL_CATEGORIES;

/// The whole application state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub products: Vec<Product>,
    pub users: Vec<User>,
    pub orders: Vec<Order>,
    pub categories: Vec<Category>,
    pub cart: Vec<CartItem>,
    /// Product ids; set semantics, insertion ordered.
    pub wishlist: Vec<String>,
    pub current_user: Option<User>,
    pub search_query: String,
    pub selected_category: String,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            products: Vec::new(),
            users: Vec::new(),
            orders: Vec::new(),
            categories: Vec::new(),
            cart: Vec::new(),
            wishlist: Vec::new(),
            current_user: None,
            search_query: String::new(),
            selected_category: ALL_CATEGORIES.to_string(),
        }
    }
}

impl AppState {
    /// Looks up a product by id.
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Looks up an order by id.
    pub fn order(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// Looks up a user by id.
    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Looks up a user by email (case-insensitive).
    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.has_email(email))
    }

    /// The cart entry holding `product_id`, if any.
    pub fn cart_entry_for(&self, product_id: &str) -> Option<&CartItem> {
        self.cart.iter().find(|item| item.product_id == product_id)
    }

    /// Whether `product_id` is in the wishlist.
    pub fn is_wishlisted(&self, product_id: &str) -> bool {
        self.wishlist.iter().any(|id| id == product_id)
    }

    /// Total units in the cart (header badge).
    pub fn cart_count(&self) -> i64 {
        self.cart.iter().fold(0i64, |n, item| n.saturating_add(item.quantity))
    }

    /// Orders placed by `user_id`, newest first.
    pub fn orders_for_user(&self, user_id: &str) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self.orders.iter().filter(|o| o.user_id == user_id).collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// Whether the signed-in user is an administrator.
    pub fn is_admin_session(&self) -> bool {
        self.current_user.as_ref().is_some_and(|u| u.is_admin)
    }

    /// Slices whose value differs between `self` and `next`.
    pub fn changed_slices(&self, next: &AppState) -> Vec<StateSlice> {
        StateSlice::ALL
            .into_iter()
            .filter(|slice| !slice.equal_in(self, next))
            .collect()
    }
}

// =============================================================================
// Slices
// =============================================================================

/// One top-level field of [`AppState`]; the unit of change notification
/// and of persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateSlice {
    Products,
    Users,
    Orders,
    Categories,
    Cart,
    Wishlist,
    CurrentUser,
    SearchQuery,
    SelectedCategory,
}

impl StateSlice {
    pub const ALL: [StateSlice; 9] = [
        StateSlice::Products,
        StateSlice::Users,
        StateSlice::Orders,
        StateSlice::Categories,
        StateSlice::Cart,
        StateSlice::Wishlist,
        StateSlice::CurrentUser,
        StateSlice::SearchQuery,
        StateSlice::SelectedCategory,
    ];

    /// Slices written to local storage, in hydration order.
    pub const PERSISTED: [StateSlice; 6] = [
        StateSlice::Products,
        StateSlice::Users,
        StateSlice::Orders,
        StateSlice::Cart,
        StateSlice::Wishlist,
        StateSlice::CurrentUser,
    ];

    /// Local storage key, or `None` for memory-only slices.
    pub fn storage_key(&self) -> Option<&'static str> {
        match self {
            StateSlice::Products => Some("fixderma_products"),
            StateSlice::Users => Some("fixderma_users"),
            StateSlice::Orders => Some("fixderma_orders"),
            StateSlice::Cart => Some("fixderma_cart"),
            StateSlice::Wishlist => Some("fixderma_wishlist"),
            StateSlice::CurrentUser => Some("fixderma_currentUser"),
            StateSlice::Categories | StateSlice::SearchQuery | StateSlice::SelectedCategory => {
                None
            }
        }
    }

    /// Serializes this slice of `state` to JSON.
    pub fn to_json(&self, state: &AppState) -> serde_json::Result<String> {
        match self {
            StateSlice::Products => serde_json::to_string(&state.products),
            StateSlice::Users => serde_json::to_string(&state.users),
            StateSlice::Orders => serde_json::to_string(&state.orders),
            StateSlice::Categories => serde_json::to_string(&state.categories),
            StateSlice::Cart => serde_json::to_string(&state.cart),
            StateSlice::Wishlist => serde_json::to_string(&state.wishlist),
            StateSlice::CurrentUser => serde_json::to_string(&state.current_user),
            StateSlice::SearchQuery => serde_json::to_string(&state.search_query),
            StateSlice::SelectedCategory => serde_json::to_string(&state.selected_category),
        }
    }

    fn equal_in(&self, a: &AppState, b: &AppState) -> bool {
        match self {
            StateSlice::Products => a.products == b.products,
            StateSlice::Users => a.users == b.users,
            StateSlice::Orders => a.orders == b.orders,
            StateSlice::Categories => a.categories == b.categories,
            StateSlice::Cart => a.cart == b.cart,
            StateSlice::Wishlist => a.wishlist == b.wishlist,
            StateSlice::CurrentUser => a.current_user == b.current_user,
            StateSlice::SearchQuery => a.search_query == b.search_query,
            StateSlice::SelectedCategory => a.selected_category == b.selected_category,
        }
    }
}

impl fmt::Display for StateSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateSlice::Products => "products",
            StateSlice::Users => "users",
            StateSlice::Orders => "orders",
            StateSlice::Categories => "categories",
            StateSlice::Cart => "cart",
            StateSlice::Wishlist => "wishlist",
            StateSlice::CurrentUser => "currentUser",
            StateSlice::SearchQuery => "searchQuery",
            StateSlice::SelectedCategory => "selectedCategory",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_selects_all_categories() {
        let state = AppState::default();
        assert_eq!(state.selected_category, "all");
        assert!(state.current_user.is_none());
        assert!(state.cart.is_empty());
    }

    #[test]
    fn test_changed_slices_reports_only_differences() {
        let a = AppState::default();
        let mut b = a.clone();
        b.wishlist.push("1".into());
        b.search_query = "serum".into();

        assert_eq!(
            a.changed_slices(&b),
            vec![StateSlice::Wishlist, StateSlice::SearchQuery]
        );
        assert!(a.changed_slices(&a.clone()).is_empty());
    }

    #[test]
    fn test_persisted_slices_have_keys() {
        for slice in StateSlice::PERSISTED {
            assert!(slice.storage_key().is_some(), "{slice} has no key");
        }
        assert_eq!(StateSlice::SearchQuery.storage_key(), None);
    }

    #[test]
    fn test_current_user_serializes_null_when_signed_out() {
        let state = AppState::default();
        assert_eq!(StateSlice::CurrentUser.to_json(&state).unwrap(), "null");
    }
}
