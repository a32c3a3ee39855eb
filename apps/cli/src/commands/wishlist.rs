//! # Wishlist Commands

use serde::Serialize;
use storefront_core::catalog::wishlist_products;
use storefront_core::store::Action;
use storefront_core::{CartItem, CoreError};
use tracing::debug;

use super::{render_products, ProductSummary, Render};
use crate::error::ApiError;
use crate::state::{ConfigState, Session};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistView {
    pub products: Vec<ProductSummary>,
}

impl WishlistView {
    fn build(session: &Session) -> Self {
        let state = session.state();
        WishlistView {
            products: ProductSummary::list(state, wishlist_products(state)),
        }
    }
}

pub fn get_wishlist(session: &Session) -> WishlistView {
    debug!("get_wishlist command");
    WishlistView::build(session)
}

/// Adds a product to the wishlist. Adding it twice changes nothing.
pub async fn add_to_wishlist(session: &mut Session, product_id: &str) -> Result<WishlistView, ApiError> {
    debug!(product_id = %product_id, "add_to_wishlist command");

    if session.state().product(product_id).is_none() {
        return Err(ApiError::not_found("Product", product_id));
    }
    session.dispatch(Action::AddToWishlist(product_id.to_string()));
    session.save().await?;
    Ok(WishlistView::build(session))
}

pub async fn remove_from_wishlist(
    session: &mut Session,
    product_id: &str,
) -> Result<WishlistView, ApiError> {
    debug!(product_id = %product_id, "remove_from_wishlist command");

    if !session.state().is_wishlisted(product_id) {
        return Err(ApiError::not_found("Wishlist item", product_id));
    }
    session.dispatch(Action::RemoveFromWishlist(product_id.to_string()));
    session.save().await?;
    Ok(WishlistView::build(session))
}

/// Heart button: adds when absent, removes when present.
pub async fn toggle_wishlist(session: &mut Session, product_id: &str) -> Result<WishlistView, ApiError> {
    if session.state().is_wishlisted(product_id) {
        remove_from_wishlist(session, product_id).await
    } else {
        add_to_wishlist(session, product_id).await
    }
}

/// Moves a wishlisted product into the cart (one unit, first size).
pub async fn move_to_cart(session: &mut Session, product_id: &str) -> Result<WishlistView, ApiError> {
    debug!(product_id = %product_id, "move_to_cart command");

    let state = session.state();
    if !state.is_wishlisted(product_id) {
        return Err(ApiError::not_found("Wishlist item", product_id));
    }
    let product = state
        .product(product_id)
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;
    if !product.in_stock {
        return Err(CoreError::OutOfStock {
            name: product.name.clone(),
        }
        .into());
    }

    let item = CartItem::for_product(product, 1, product.sizes.first().cloned());
    session.dispatch(Action::AddToCart(item));
    session.dispatch(Action::RemoveFromWishlist(product_id.to_string()));
    session.save().await?;
    Ok(WishlistView::build(session))
}

pub async fn clear_wishlist(session: &mut Session) -> Result<WishlistView, ApiError> {
    debug!("clear_wishlist command");
    session.dispatch(Action::ClearWishlist);
    session.save().await?;
    Ok(WishlistView::build(session))
}

impl Render for WishlistView {
    fn render(&self, config: &ConfigState) -> String {
        if self.products.is_empty() {
            return "Your wishlist is empty".to_string();
        }
        let mut out = String::new();
        render_products(
            &mut out,
            &format!("Wishlist ({} item(s))", self.products.len()),
            &self.products,
            config,
        );
        out
    }
}
