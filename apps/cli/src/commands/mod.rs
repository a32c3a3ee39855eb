//! # Commands Module
//!
//! One module per storefront route.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (Render, shared product view)
//! ├── home.rs      ◄─── Home page sections
//! ├── product.rs   ◄─── Listing with filters, product detail
//! ├── cart.rs      ◄─── Cart manipulation and pricing
//! ├── wishlist.rs  ◄─── Wishlist
//! ├── checkout.rs  ◄─── Place order
//! ├── order.rs     ◄─── Order confirmation, order history
//! ├── account.rs   ◄─── Login, register, logout
//! └── admin.rs     ◄─── Dashboard, product and order management
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  storefront cart add 1 --quantity 2                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  pub async fn add_to_cart(                                              │
//! │      session: &mut Session,   ◄── hydrated store + writer               │
//! │      product_id: &str,        ◄── from clap args                        │
//! │      quantity: i64,                                                     │
//! │      size: Option<String>,                                              │
//! │  ) -> Result<CartView, ApiError>                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  view.render(config)   or   serde_json (--json)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Read-only routes take `&Session`; mutating routes take `&mut Session`,
//! dispatch actions and save before returning.

pub mod account;
pub mod admin;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod order;
pub mod product;
pub mod wishlist;

use serde::Serialize;
use std::fmt::Write;
use storefront_core::{AppState, Product};

use crate::state::ConfigState;

/// Human-readable rendering of a command result.
pub trait Render: Serialize {
    fn render(&self, config: &ConfigState) -> String;
}

/// Plain confirmation such as "Cart cleared".
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Notice {
            message: message.into(),
        }
    }
}

impl Render for Notice {
    fn render(&self, _config: &ConfigState) -> String {
        self.message.clone()
    }
}

/// A product as shown in listings and strips.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price_paise: i64,
    pub original_price_paise: Option<i64>,
    pub discount_percent: Option<u32>,
    pub rating: f64,
    pub reviews: u32,
    pub in_stock: bool,
    pub is_new: bool,
    /// Units of this product in the cart.
    pub in_cart: i64,
    pub wishlisted: bool,
}

impl ProductSummary {
    pub fn new(state: &AppState, product: &Product) -> Self {
        ProductSummary {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            price_paise: product.price_paise,
            original_price_paise: product.original_price_paise,
            discount_percent: product.discount_percent(),
            rating: product.rating,
            reviews: product.reviews,
            in_stock: product.in_stock,
            is_new: product.is_new,
            in_cart: state
                .cart_entry_for(&product.id)
                .map_or(0, |entry| entry.quantity),
            wishlisted: state.is_wishlisted(&product.id),
        }
    }

    pub fn list<'a>(state: &AppState, products: impl IntoIterator<Item = &'a Product>) -> Vec<Self> {
        products
            .into_iter()
            .map(|product| ProductSummary::new(state, product))
            .collect()
    }

    /// `[1] Skarfix-Plus Brightening Face Serum  ₹499.00 (was ₹599.00, 17% off)  ★4.5 (245)`
    pub fn line(&self, config: &ConfigState) -> String {
        let mut line = format!(
            "[{}] {}  {}",
            self.id,
            self.name,
            config.format_currency(self.price_paise)
        );
        if let (Some(original), Some(off)) = (self.original_price_paise, self.discount_percent) {
            let _ = write!(line, " (was {}, {}% off)", config.format_currency(original), off);
        }
        let _ = write!(line, "  ★{:.1} ({})", self.rating, self.reviews);
        if self.is_new {
            line.push_str("  NEW");
        }
        if !self.in_stock {
            line.push_str("  OUT OF STOCK");
        }
        if self.in_cart > 0 {
            let _ = write!(line, "  [in cart: {}]", self.in_cart);
        }
        if self.wishlisted {
            line.push_str("  ♥");
        }
        line
    }
}

/// Renders a titled block of product lines.
pub(crate) fn render_products(
    out: &mut String,
    title: &str,
    products: &[ProductSummary],
    config: &ConfigState,
) {
    let _ = writeln!(out, "{}", title);
    if products.is_empty() {
        out.push_str("  (none)\n");
    }
    for product in products {
        let _ = writeln!(out, "  {}", product.line(config));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::seed;

    #[test]
    fn test_summary_line() {
        let state = AppState {
            products: seed::products(),
            wishlist: vec!["1".into()],
            ..AppState::default()
        };
        let summary = ProductSummary::new(&state, state.product("1").unwrap());
        let line = summary.line(&ConfigState::default());

        assert!(line.starts_with("[1] Skarfix-Plus Brightening Face Serum  ₹499.00"));
        assert!(line.contains("(was ₹599.00, 17% off)"));
        assert!(line.contains("NEW"));
        assert!(line.ends_with("♥"));
    }
}
