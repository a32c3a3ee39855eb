//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │       │
//! │  │  Cart    │     │          │     │          │     │  placed  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                  │             │
//! │                   add_to_cart                        ClearCart          │
//! │                   set_quantity (≤ 0 removes)              │             │
//! │                   remove_from_cart                        ▼             │
//! │                   clear_cart ─────────────────────► (back to empty)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::fmt::Write;
use storefront_core::pricing::{cart_lines, price_cart, CartPricing};
use storefront_core::store::Action;
use storefront_core::validation::validate_quantity;
use storefront_core::{CartItem, CoreError, MAX_ITEM_QUANTITY};
use tracing::debug;

use super::Render;
use crate::error::ApiError;
use crate::state::{ConfigState, Session};

/// One priced cart line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    /// Cart entry id (used by `remove` / `set`).
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub size: Option<String>,
    pub quantity: i64,
    pub unit_price_paise: i64,
    pub line_total_paise: i64,
}

/// Cart response including lines and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub pricing: CartPricing,
    pub gst_rate_bps: u32,
}

impl CartView {
    pub(crate) fn build(session: &Session) -> Self {
        let state = session.state();
        let rules = session.config().pricing_rules();

        CartView {
            lines: cart_lines(&state.cart, &state.products)
                .into_iter()
                .map(|line| CartLineView {
                    id: line.item.id.clone(),
                    product_id: line.product.id.clone(),
                    name: line.product.name.clone(),
                    size: line.item.size.clone(),
                    quantity: line.item.quantity,
                    unit_price_paise: line.product.price_paise,
                    line_total_paise: line.line_total.paise(),
                })
                .collect(),
            pricing: price_cart(&state.cart, &state.products, &rules),
            gst_rate_bps: rules.tax_rate.bps(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Gets the current cart contents.
pub fn get_cart(session: &Session) -> CartView {
    debug!("get_cart command");
    CartView::build(session)
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - If the product is already in the cart: quantities are summed
/// - Otherwise a new entry is added
/// - `size` must be one of the product's sizes; defaults to the first
pub async fn add_to_cart(
    session: &mut Session,
    product_id: &str,
    quantity: i64,
    size: Option<String>,
) -> Result<CartView, ApiError> {
    debug!(product_id = %product_id, quantity = %quantity, ?size, "add_to_cart command");

    validate_quantity(quantity).map_err(CoreError::from)?;

    let state = session.state();
    let product = state
        .product(product_id)
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    if !product.in_stock {
        return Err(CoreError::OutOfStock {
            name: product.name.clone(),
        }
        .into());
    }

    let size = match size {
        Some(size) => {
            let size = size.trim();
            let known = product
                .sizes
                .iter()
                .find(|s| s.eq_ignore_ascii_case(size))
                .ok_or_else(|| {
                    ApiError::validation(format!(
                        "{} is not available in {} (sizes: {})",
                        product.name,
                        size,
                        product.sizes.join(", ")
                    ))
                })?;
            Some(known.clone())
        }
        None => product.sizes.first().cloned(),
    };

    let in_cart = state.cart_entry_for(product_id).map_or(0, |e| e.quantity);
    if in_cart + quantity > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: in_cart + quantity,
            max: MAX_ITEM_QUANTITY,
        }
        .into());
    }

    let item = CartItem::for_product(product, quantity, size);
    session.dispatch(Action::AddToCart(item));
    session.save().await?;

    Ok(CartView::build(session))
}

/// Removes a cart entry, given its entry id or its product id.
pub async fn remove_from_cart(session: &mut Session, id: &str) -> Result<CartView, ApiError> {
    debug!(id = %id, "remove_from_cart command");

    let entry_id = resolve_entry(session, id)?;
    session.dispatch(Action::RemoveFromCart(entry_id));
    session.save().await?;

    Ok(CartView::build(session))
}

/// Sets the quantity of a cart entry. Zero or less removes the entry.
pub async fn set_quantity(
    session: &mut Session,
    id: &str,
    quantity: i64,
) -> Result<CartView, ApiError> {
    debug!(id = %id, quantity = %quantity, "set_quantity command");

    let entry_id = resolve_entry(session, id)?;
    if quantity <= 0 {
        session.dispatch(Action::RemoveFromCart(entry_id));
    } else {
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            }
            .into());
        }
        session.dispatch(Action::UpdateCartQuantity {
            id: entry_id,
            quantity,
        });
    }
    session.save().await?;

    Ok(CartView::build(session))
}

/// Empties the cart.
pub async fn clear_cart(session: &mut Session) -> Result<CartView, ApiError> {
    debug!("clear_cart command");
    session.dispatch(Action::ClearCart);
    session.save().await?;
    Ok(CartView::build(session))
}

fn resolve_entry(session: &Session, id: &str) -> Result<String, ApiError> {
    let state = session.state();
    state
        .cart
        .iter()
        .find(|entry| entry.id == id)
        .or_else(|| state.cart_entry_for(id))
        .map(|entry| entry.id.clone())
        .ok_or_else(|| CoreError::CartItemNotFound(id.to_string()).into())
}

impl Render for CartView {
    fn render(&self, config: &ConfigState) -> String {
        if self.is_empty() {
            return "Your cart is empty".to_string();
        }

        let mut out = String::new();
        let p = &self.pricing;
        let _ = writeln!(out, "Shopping cart ({} item(s))", p.item_count);
        for line in &self.lines {
            let _ = writeln!(
                out,
                "  {}  x{}  {}{}  = {}",
                line.name,
                line.quantity,
                config.format_currency(line.unit_price_paise),
                line.size
                    .as_deref()
                    .map(|s| format!(" ({})", s))
                    .unwrap_or_default(),
                config.format_currency(line.line_total_paise),
            );
            let _ = writeln!(out, "    entry {}  product {}", line.id, line.product_id);
        }

        let _ = writeln!(out, "Subtotal: {}", config.money(p.subtotal));
        if p.has_free_shipping() {
            out.push_str("Shipping: FREE\n");
        } else {
            let _ = writeln!(out, "Shipping: {}", config.money(p.shipping));
        }
        let _ = writeln!(
            out,
            "GST ({}%): {}",
            self.gst_rate_bps as f64 / 100.0,
            config.money(p.tax)
        );
        let _ = writeln!(out, "Total: {}", config.money(p.total));
        if p.amount_to_free_shipping.is_positive() {
            let _ = writeln!(
                out,
                "Add {} more for free shipping",
                config.money(p.amount_to_free_shipping)
            );
        }
        out
    }
}
