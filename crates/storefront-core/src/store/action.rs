//! # Actions
//!
//! The closed set of transition requests the store accepts.

use crate::types::{CartItem, Category, Order, Product, User};

/// A named request to change state.
///
/// Every variant is infallible: ids that match nothing leave the state
/// unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // -- products ------------------------------------------------------------
    SetProducts(Vec<Product>),
    AddProduct(Product),
    /// Replaces the product with the same id.
    UpdateProduct(Product),
    /// Removes the product with this id.
    DeleteProduct(String),

    // -- users ---------------------------------------------------------------
    SetUsers(Vec<User>),
    AddUser(User),
    UpdateUser(User),

    // -- orders --------------------------------------------------------------
    SetOrders(Vec<Order>),
    AddOrder(Order),
    UpdateOrder(Order),

    // -- categories ----------------------------------------------------------
    SetCategories(Vec<Category>),

    // -- cart ----------------------------------------------------------------
    /// Merges into an existing entry for the same product, else appends.
    AddToCart(CartItem),
    /// Removes the entry with this entry id.
    RemoveFromCart(String),
    /// Sets the quantity of the entry with this id. No clamping.
    UpdateCartQuantity { id: String, quantity: i64 },
    ClearCart,

    // -- wishlist ------------------------------------------------------------
    AddToWishlist(String),
    RemoveFromWishlist(String),
    ClearWishlist,

    // -- session -------------------------------------------------------------
    /// `None` signs out.
    SetCurrentUser(Option<User>),
    SetSearchQuery(String),
    SetSelectedCategory(String),
}

impl Action {
    /// Stable name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetProducts(_) => "SET_PRODUCTS",
            Action::AddProduct(_) => "ADD_PRODUCT",
            Action::UpdateProduct(_) => "UPDATE_PRODUCT",
            Action::DeleteProduct(_) => "DELETE_PRODUCT",
            Action::SetUsers(_) => "SET_USERS",
            Action::AddUser(_) => "ADD_USER",
            Action::UpdateUser(_) => "UPDATE_USER",
            Action::SetOrders(_) => "SET_ORDERS",
            Action::AddOrder(_) => "ADD_ORDER",
            Action::UpdateOrder(_) => "UPDATE_ORDER",
            Action::SetCategories(_) => "SET_CATEGORIES",
            Action::AddToCart(_) => "ADD_TO_CART",
            Action::RemoveFromCart(_) => "REMOVE_FROM_CART",
            Action::UpdateCartQuantity { .. } => "UPDATE_CART_QUANTITY",
            Action::ClearCart => "CLEAR_CART",
            Action::AddToWishlist(_) => "ADD_TO_WISHLIST",
            Action::RemoveFromWishlist(_) => "REMOVE_FROM_WISHLIST",
            Action::ClearWishlist => "CLEAR_WISHLIST",
            Action::SetCurrentUser(_) => "SET_CURRENT_USER",
            Action::SetSearchQuery(_) => "SET_SEARCH_QUERY",
            Action::SetSelectedCategory(_) => "SET_SELECTED_CATEGORY",
        }
    }
}
