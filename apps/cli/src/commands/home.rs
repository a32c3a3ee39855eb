//! # Home Command
//!
//! The landing page: categories, the essentials strip, trending products,
//! new arrivals and offers.

use serde::Serialize;
use std::fmt::Write;
use storefront_core::catalog::{self, EssentialsTab, HOME_STRIP_LEN};
use storefront_core::ALL_CATEGORIES;
use tracing::debug;

use super::{render_products, ProductSummary, Render};
use crate::state::{ConfigState, Session};

/// Category tile with the number of products filed under it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTile {
    pub name: String,
    pub description: String,
    pub product_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub store_name: String,
    pub signed_in_as: Option<String>,
    pub cart_count: i64,
    pub wishlist_count: usize,
    pub categories: Vec<CategoryTile>,
    pub featured: Vec<ProductSummary>,
    pub essentials_tab: EssentialsTab,
    pub essentials: Vec<ProductSummary>,
    pub trending_category: String,
    pub trending: Vec<ProductSummary>,
    pub new_arrivals: Vec<ProductSummary>,
    pub on_sale: Vec<ProductSummary>,
}

/// Builds the home page.
///
/// `trending_category` defaults to every category.
pub fn home(
    session: &Session,
    essentials_tab: EssentialsTab,
    trending_category: Option<&str>,
) -> HomeView {
    debug!(tab = essentials_tab.label(), ?trending_category, "home command");

    let state = session.state();
    let products = &state.products;
    let trending_category = trending_category.unwrap_or(ALL_CATEGORIES).to_string();

    HomeView {
        store_name: session.config().store_name.clone(),
        signed_in_as: state.current_user.as_ref().map(|u| u.name.clone()),
        cart_count: state.cart_count(),
        wishlist_count: state.wishlist.len(),
        categories: state
            .categories
            .iter()
            .map(|category| CategoryTile {
                name: category.name.clone(),
                description: category.description.clone(),
                product_count: products
                    .iter()
                    .filter(|p| p.in_category(&category.name))
                    .count(),
            })
            .collect(),
        featured: ProductSummary::list(state, catalog::featured(products, HOME_STRIP_LEN)),
        essentials_tab,
        essentials: ProductSummary::list(state, catalog::essentials(products, essentials_tab)),
        trending: ProductSummary::list(state, catalog::trending(products, &trending_category)),
        trending_category,
        new_arrivals: ProductSummary::list(state, catalog::new_arrivals(products)),
        on_sale: ProductSummary::list(state, catalog::on_sale(products)),
    }
}

impl Render for HomeView {
    fn render(&self, config: &ConfigState) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "== {} ==", self.store_name);
        match &self.signed_in_as {
            Some(name) => {
                let _ = writeln!(out, "Hello, {}", name);
            }
            None => out.push_str("Not signed in\n"),
        }
        let _ = writeln!(
            out,
            "Cart: {} item(s)  Wishlist: {}\n",
            self.cart_count, self.wishlist_count
        );

        out.push_str("Shop by category\n");
        for tile in &self.categories {
            let _ = writeln!(out, "  {} ({})", tile.name, tile.product_count);
        }
        out.push('\n');

        render_products(&mut out, "Featured", &self.featured, config);
        out.push('\n');
        render_products(
            &mut out,
            &format!("Essentials: {}", self.essentials_tab.label()),
            &self.essentials,
            config,
        );
        out.push('\n');
        let trending_title = if self.trending_category.eq_ignore_ascii_case(ALL_CATEGORIES) {
            "Trending: All Products".to_string()
        } else {
            format!("Trending: {}", self.trending_category)
        };
        render_products(&mut out, &trending_title, &self.trending, config);
        out.push('\n');
        render_products(&mut out, "New arrivals", &self.new_arrivals, config);
        out.push('\n');
        render_products(&mut out, "On sale", &self.on_sale, config);
        out
    }
}
