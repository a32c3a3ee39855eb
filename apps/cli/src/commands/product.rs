//! # Product Commands
//!
//! ## Listing Flow
//! ```text
//! storefront products --query serum --category Serum --sort price-low
//!        │
//!        ├── SetSearchQuery("serum")        (memory-only slice)
//!        ├── SetSelectedCategory("Serum")   (memory-only slice)
//!        ▼
//! ProductQuery::from_session(state) + price range + sort
//!        │
//!        ▼
//! catalog::filter_products ──► ProductListView
//! ```

use serde::Serialize;
use std::fmt::Write;
use storefront_core::catalog::{self, PriceRange, ProductQuery, SortKey};
use storefront_core::store::Action;
use storefront_core::validation::validate_search_query;
use storefront_core::{Money, Product, ALL_CATEGORIES};
use tracing::debug;

use super::{render_products, ProductSummary, Render};
use crate::error::ApiError;
use crate::state::{ConfigState, Session};

/// Related products shown under a product.
const RELATED_LEN: usize = 4;

/// Listing filters as given on the command line. Prices in whole rupees.
#[derive(Debug, Clone, Default)]
pub struct ListArgs {
    pub query: Option<String>,
    pub category: Option<String>,
    pub sort: SortKey,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListView {
    pub query: String,
    pub category: String,
    pub sort: SortKey,
    pub categories: Vec<String>,
    pub products: Vec<ProductSummary>,
}

/// Lists products matching the search box, category and price filters.
pub fn list_products(session: &mut Session, args: ListArgs) -> Result<ProductListView, ApiError> {
    debug!(?args, "list_products command");

    let price = PriceRange {
        min_paise: rupees_filter("min price", args.min_price)?,
        max_paise: rupees_filter("max price", args.max_price)?,
    };
    if let (Some(min), Some(max)) = (price.min_paise, price.max_paise) {
        if min > max {
            return Err(ApiError::validation("min price must not exceed max price"));
        }
    }

    let text = validate_search_query(args.query.as_deref().unwrap_or_default())
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let category = args
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| ALL_CATEGORIES.to_string());

    session.dispatch(Action::SetSearchQuery(text));
    let state = session.dispatch(Action::SetSelectedCategory(category));

    let query = ProductQuery {
        price,
        sort: args.sort,
        ..ProductQuery::from_session(state)
    };
    let listed = catalog::filter_products(&state.products, &query);

    Ok(ProductListView {
        query: state.search_query.clone(),
        category: state.selected_category.clone(),
        sort: query.sort,
        categories: state.categories.iter().map(|c| c.name.clone()).collect(),
        products: ProductSummary::list(state, listed),
    })
}

fn rupees_filter(field: &str, rupees: Option<i64>) -> Result<Option<i64>, ApiError> {
    match rupees {
        Some(r) if r < 0 => Err(ApiError::validation(format!("{} must not be negative", field))),
        Some(r) => Money::checked_from_rupees(r)
            .map(|m| Some(m.paise()))
            .ok_or_else(|| ApiError::validation(format!("{} is too large", field))),
        None => Ok(None),
    }
}

impl Render for ProductListView {
    fn render(&self, config: &ConfigState) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Categories: {}, {}",
            ALL_CATEGORIES,
            self.categories.join(", ")
        );
        let _ = writeln!(
            out,
            "Search: {:?}  Category: {}  Sort: {}",
            self.query, self.category, self.sort
        );
        render_products(
            &mut out,
            &format!("{} product(s)", self.products.len()),
            &self.products,
            config,
        );
        out
    }
}

// =============================================================================
// Product Detail
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailView {
    pub product: Product,
    pub discount_percent: Option<u32>,
    pub in_cart: i64,
    pub wishlisted: bool,
    pub related: Vec<ProductSummary>,
}

/// Full product page with related products.
pub fn product_detail(session: &Session, id: &str) -> Result<ProductDetailView, ApiError> {
    debug!(id = %id, "product_detail command");

    let state = session.state();
    let product = state
        .product(id)
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    Ok(ProductDetailView {
        product: product.clone(),
        discount_percent: product.discount_percent(),
        in_cart: state.cart_entry_for(id).map_or(0, |entry| entry.quantity),
        wishlisted: state.is_wishlisted(id),
        related: ProductSummary::list(state, catalog::related(&state.products, product, RELATED_LEN)),
    })
}

impl Render for ProductDetailView {
    fn render(&self, config: &ConfigState) -> String {
        let p = &self.product;
        let mut out = String::new();
        let _ = writeln!(out, "{}  [{}]", p.name, p.id);
        let _ = writeln!(out, "{}  ★{:.1} ({} reviews)", p.category, p.rating, p.reviews);

        let _ = write!(out, "Price: {}", config.format_currency(p.price_paise));
        if let (Some(original), Some(off)) = (p.original_price_paise, self.discount_percent) {
            let _ = write!(out, "  MRP {}  {}% OFF", config.format_currency(original), off);
        }
        out.push('\n');
        let _ = writeln!(
            out,
            "{}",
            if p.in_stock { "In stock" } else { "Out of stock" }
        );
        if !p.sizes.is_empty() {
            let _ = writeln!(out, "Sizes: {}", p.sizes.join(" / "));
        }
        if !p.description.is_empty() {
            let _ = writeln!(out, "\n{}", p.description);
        }
        if !p.key_highlights.is_empty() {
            out.push_str("\nKey highlights\n");
            for highlight in &p.key_highlights {
                let _ = writeln!(out, "  • {}", highlight);
            }
        }

        let d = &p.details;
        for (label, value) in [
            ("Brand", d.brand.as_deref()),
            ("How to use", d.how_to_use.as_deref()),
            ("Weight", d.weight.as_deref()),
            ("Country of origin", d.country_of_origin.as_deref()),
        ] {
            if let Some(value) = value {
                let _ = writeln!(out, "{}: {}", label, value);
            }
        }
        for (label, values) in [
            ("Ingredients", &d.ingredients),
            ("Benefits", &d.benefits),
            ("Skin type", &d.skin_type),
        ] {
            if !values.is_empty() {
                let _ = writeln!(out, "{}: {}", label, values.join(", "));
            }
        }

        if self.in_cart > 0 {
            let _ = writeln!(out, "\nIn your cart: {}", self.in_cart);
        }
        if self.wishlisted {
            out.push_str("In your wishlist\n");
        }
        out.push('\n');
        render_products(&mut out, "You may also like", &self.related, config);
        out
    }
}
