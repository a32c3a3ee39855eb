//! # Catalog Views
//!
//! Derived, read-only product listings. Nothing here is stored in state;
//! every function recomputes from the product collection it is given.
//!
//! ## Listing Pipeline
//! ```text
//! products ──► query (name/description, case-insensitive substring)
//!          ──► category ("all" = no filter, else case-insensitive equality)
//!          ──► price bounds (inclusive)
//!          ──► stable sort by SortKey
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::store::AppState;
use crate::types::Product;
use crate::ALL_CATEGORIES;

/// Number of products in each home-page strip.
pub const HOME_STRIP_LEN: usize = 4;

/// Number of products in the trending grid.
pub const TRENDING_LEN: usize = 8;

// =============================================================================
// Sort Key
// =============================================================================

/// Listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Name ascending, case-insensitive.
    #[default]
    Name,
    /// Price ascending.
    PriceLow,
    /// Price descending.
    PriceHigh,
    /// Rating descending.
    Rating,
    /// Review count descending.
    Reviews,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Name,
        SortKey::PriceLow,
        SortKey::PriceHigh,
        SortKey::Rating,
        SortKey::Reviews,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Rating => "rating",
            SortKey::Reviews => "reviews",
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::PriceLow => a.price_paise.cmp(&b.price_paise),
            SortKey::PriceHigh => b.price_paise.cmp(&a.price_paise),
            SortKey::Rating => b.rating.total_cmp(&a.rating),
            SortKey::Reviews => b.reviews.cmp(&a.reviews),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "sort".to_string(),
                allowed: SortKey::ALL.iter().map(|k| k.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Query
// =============================================================================

/// Inclusive price bounds in paise. `None` leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceRange {
    pub min_paise: Option<i64>,
    pub max_paise: Option<i64>,
}

impl PriceRange {
    pub fn contains(&self, paise: i64) -> bool {
        self.min_paise.map_or(true, |min| paise >= min)
            && self.max_paise.map_or(true, |max| paise <= max)
    }
}

/// Everything a product listing is filtered and ordered by.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    /// Free text; empty matches everything.
    pub text: String,
    /// `None` or `"all"` means no category filter.
    pub category: Option<String>,
    pub price: PriceRange,
    pub sort: SortKey,
}

impl ProductQuery {
    /// Query seeded from the session's search box and category selector.
    pub fn from_session(state: &AppState) -> Self {
        ProductQuery {
            text: state.search_query.clone(),
            category: Some(state.selected_category.clone()),
            ..ProductQuery::default()
        }
    }

    fn matches(&self, product: &Product) -> bool {
        matches_text(product, &self.text)
            && self
                .category
                .as_deref()
                .map_or(true, |category| matches_category(product, category))
            && self.price.contains(product.price_paise)
    }
}

fn matches_text(product: &Product, text: &str) -> bool {
    let needle = text.trim().to_lowercase();
    needle.is_empty()
        || product.name.to_lowercase().contains(&needle)
        || product.description.to_lowercase().contains(&needle)
}

fn matches_category(product: &Product, category: &str) -> bool {
    category.eq_ignore_ascii_case(ALL_CATEGORIES) || product.in_category(category)
}

/// Filters and sorts `products`. Ties keep collection order.
///
/// ## Example
/// ```rust
/// use storefront_core::catalog::{filter_products, ProductQuery, SortKey};
/// use storefront_core::seed;
///
/// let products = seed::products();
/// let query = ProductQuery {
///     category: Some("sunscreen".into()),
///     sort: SortKey::PriceLow,
///     ..ProductQuery::default()
/// };
/// let listed = filter_products(&products, &query);
/// assert!(listed.iter().all(|p| p.category == "Sunscreen"));
/// ```
pub fn filter_products<'a>(products: &'a [Product], query: &ProductQuery) -> Vec<&'a Product> {
    let mut listed: Vec<&Product> = products.iter().filter(|p| query.matches(p)).collect();
    listed.sort_by(|a, b| query.sort.compare(a, b));
    listed
}

/// Distinct product categories in first-seen order.
pub fn categories_in_use(products: &[Product]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for product in products {
        if !seen.iter().any(|c| c.eq_ignore_ascii_case(&product.category)) {
            seen.push(&product.category);
        }
    }
    seen
}

// =============================================================================
// Home Page
// =============================================================================

/// Tabs of the home-page "essentials" strip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EssentialsTab {
    #[default]
    NewLaunches,
    Bestsellers,
    BestOffers,
    ComboKits,
}

impl EssentialsTab {
    pub const ALL: [EssentialsTab; 4] = [
        EssentialsTab::NewLaunches,
        EssentialsTab::Bestsellers,
        EssentialsTab::BestOffers,
        EssentialsTab::ComboKits,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EssentialsTab::NewLaunches => "New Launches",
            EssentialsTab::Bestsellers => "Bestsellers",
            EssentialsTab::BestOffers => "Best Offers",
            EssentialsTab::ComboKits => "Combo Kits",
        }
    }
}

impl FromStr for EssentialsTab {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_'], " ");
        EssentialsTab::ALL
            .into_iter()
            .find(|tab| tab.label().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "tab".to_string(),
                allowed: EssentialsTab::ALL
                    .iter()
                    .map(|t| t.label().to_string())
                    .collect(),
            })
    }
}

/// Products for one essentials tab, at most [`HOME_STRIP_LEN`].
pub fn essentials(products: &[Product], tab: EssentialsTab) -> Vec<&Product> {
    let mut picked: Vec<&Product> = match tab {
        EssentialsTab::NewLaunches => products.iter().collect(),
        EssentialsTab::Bestsellers => {
            let mut all: Vec<&Product> = products.iter().collect();
            all.sort_by(|a, b| b.reviews.cmp(&a.reviews));
            all
        }
        EssentialsTab::BestOffers => {
            let mut all: Vec<&Product> = products.iter().collect();
            all.sort_by(|a, b| b.discount_amount().cmp(&a.discount_amount()));
            all
        }
        EssentialsTab::ComboKits => products
            .iter()
            .filter(|p| p.category.to_lowercase().contains("combo"))
            .collect(),
    };
    picked.truncate(HOME_STRIP_LEN);
    picked
}

/// The first `limit` products.
pub fn featured(products: &[Product], limit: usize) -> Vec<&Product> {
    products.iter().take(limit).collect()
}

/// Products flagged as new.
pub fn new_arrivals(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| p.is_new).collect()
}

/// Products flagged as on sale.
pub fn on_sale(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| p.is_on_sale).collect()
}

/// First [`TRENDING_LEN`] products in `category` (`"all"` for any).
pub fn trending<'a>(products: &'a [Product], category: &str) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| matches_category(p, category))
        .take(TRENDING_LEN)
        .collect()
}

// =============================================================================
// Product Page
// =============================================================================

/// Same-category products other than `product`, at most `limit`.
pub fn related<'a>(products: &'a [Product], product: &Product, limit: usize) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| p.id != product.id && p.category == product.category)
        .take(limit)
        .collect()
}

/// Wishlisted products that still exist, in wishlist order.
pub fn wishlist_products(state: &AppState) -> Vec<&Product> {
    state
        .wishlist
        .iter()
        .filter_map(|id| state.product(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn ids<'a>(products: &[&'a Product]) -> Vec<&'a str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_category_filter_is_case_insensitive() {
        let products = seed::products();
        let query = ProductQuery {
            category: Some("SUNSCREEN".into()),
            ..ProductQuery::default()
        };
        let listed = filter_products(&products, &query);
        assert!(!listed.is_empty());
        assert!(listed.iter().all(|p| p.category.eq_ignore_ascii_case("Sunscreen")));
    }

    #[test]
    fn test_all_category_and_empty_text_match_everything() {
        let products = seed::products();
        let query = ProductQuery {
            category: Some("all".into()),
            ..ProductQuery::default()
        };
        assert_eq!(filter_products(&products, &query).len(), products.len());
    }

    #[test]
    fn test_text_matches_name_or_description() {
        let products = seed::products();
        let by_name = ProductQuery {
            text: "face WASH".into(),
            ..ProductQuery::default()
        };
        assert_eq!(ids(&filter_products(&products, &by_name)), vec!["8", "5"]);

        let by_description = ProductQuery {
            text: "salicylic".into(),
            ..ProductQuery::default()
        };
        assert_eq!(ids(&filter_products(&products, &by_description)), vec!["6"]);
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let products = seed::products();
        let query = ProductQuery {
            price: PriceRange {
                min_paise: Some(42900),
                max_paise: Some(49900),
            },
            sort: SortKey::PriceLow,
            ..ProductQuery::default()
        };
        assert_eq!(ids(&filter_products(&products, &query)), vec!["3", "1", "4"]);
    }

    #[test]
    fn test_price_sorts_are_reversed_for_distinct_prices() {
        let mut products = seed::products();
        // product 4 shares ₹499 with product 1
        products.retain(|p| p.id != "4");

        let low = ProductQuery {
            sort: SortKey::PriceLow,
            ..ProductQuery::default()
        };
        let high = ProductQuery {
            sort: SortKey::PriceHigh,
            ..ProductQuery::default()
        };
        let mut ascending = ids(&filter_products(&products, &low));
        ascending.reverse();
        assert_eq!(ascending, ids(&filter_products(&products, &high)));
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let products = seed::products();
        let query = ProductQuery {
            sort: SortKey::PriceLow,
            ..ProductQuery::default()
        };
        let listed = ids(&filter_products(&products, &query));
        let one = listed.iter().position(|id| *id == "1").unwrap();
        let four = listed.iter().position(|id| *id == "4").unwrap();
        assert_eq!(four, one + 1);
    }

    #[test]
    fn test_rating_and_reviews_sort_descending() {
        let products = seed::products();
        let by_rating = ProductQuery {
            sort: SortKey::Rating,
            ..ProductQuery::default()
        };
        assert_eq!(filter_products(&products, &by_rating)[0].id, "6");

        let by_reviews = ProductQuery {
            sort: SortKey::Reviews,
            ..ProductQuery::default()
        };
        assert_eq!(filter_products(&products, &by_reviews)[0].id, "3");
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let mut products = seed::products();
        products[0].name = "aaa lowercase first".into();
        let listed = filter_products(&products, &ProductQuery::default());
        assert_eq!(listed[0].id, "1");
        assert_eq!(listed[1].name, "Anti-Acne Serum");
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("price-high".parse::<SortKey>().unwrap(), SortKey::PriceHigh);
        assert!("popularity".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_home_sections() {
        let products = seed::products();
        assert_eq!(ids(&featured(&products, 4)), vec!["1", "2", "3", "4"]);
        assert_eq!(ids(&new_arrivals(&products)), vec!["1", "6"]);
        assert_eq!(on_sale(&products).len(), 8);
        assert_eq!(ids(&trending(&products, "cream")), vec!["3", "7"]);
        assert_eq!(trending(&products, "all").len(), 8);
        assert_eq!(essentials(&products, EssentialsTab::Bestsellers)[0].id, "3");
        assert_eq!(essentials(&products, EssentialsTab::BestOffers)[0].id, "1");
        assert!(essentials(&products, EssentialsTab::ComboKits).is_empty());
        assert_eq!(
            "best-offers".parse::<EssentialsTab>().unwrap(),
            EssentialsTab::BestOffers
        );
    }

    #[test]
    fn test_related_excludes_self() {
        let products = seed::products();
        let serum = &products[0];
        assert_eq!(ids(&related(&products, serum, 4)), vec!["6"]);
    }

    #[test]
    fn test_categories_in_use_first_seen_order() {
        let products = seed::products();
        assert_eq!(
            categories_in_use(&products),
            vec!["Serum", "Sunscreen", "Cream", "Foot Care", "Face Wash"]
        );
    }
}
