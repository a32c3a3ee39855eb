//! # Admin Commands
//!
//! Every command here starts with `require_admin`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  admin dashboard        DashboardStats + recent orders                  │
//! │  admin product save     AddProduct (new id) / UpdateProduct (known id)  │
//! │  admin product delete   DeleteProduct                                   │
//! │  admin orders           every order, optionally one status              │
//! │  admin order-status     UpdateOrder with the new status                 │
//! │  admin users            accounts without credentials                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::fmt::Write;
use storefront_core::account::require_admin;
use storefront_core::dashboard::DashboardStats;
use storefront_core::store::Action;
use storefront_core::validation::validate_product;
use storefront_core::{AppState, CoreError, Money, Order, OrderStatus, Product, ProductDetails};
use tracing::{debug, info};

use super::account::AccountView;
use super::order::order_line;
use super::{render_products, Notice, ProductSummary, Render};
use crate::error::ApiError;
use crate::state::{ConfigState, Session};

/// Recent orders shown on the dashboard.
const RECENT_ORDERS: usize = 5;

/// Image used when a new product is saved without one.
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.pexels.com/photos/3685530/pexels-photo-3685530.jpeg?auto=compress&cs=tinysrgb&w=500";

fn guard(session: &Session) -> Result<(), ApiError> {
    require_admin(session.state().current_user.as_ref())?;
    Ok(())
}

// =============================================================================
// Dashboard
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub recent_orders: Vec<Order>,
    pub products: Vec<ProductSummary>,
}

pub fn dashboard(session: &Session) -> Result<DashboardView, ApiError> {
    debug!("dashboard command");
    guard(session)?;

    let state = session.state();
    let mut recent: Vec<&Order> = state.orders.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(DashboardView {
        stats: DashboardStats::compute(state),
        recent_orders: recent.into_iter().take(RECENT_ORDERS).cloned().collect(),
        products: ProductSummary::list(state, &state.products),
    })
}

impl Render for DashboardView {
    fn render(&self, config: &ConfigState) -> String {
        let s = &self.stats;
        let mut out = String::new();
        out.push_str("Admin dashboard\n");
        let _ = writeln!(out, "  Total revenue:       {}", config.money(s.total_revenue));
        let _ = writeln!(out, "  Orders:              {}", s.order_count);
        let _ = writeln!(out, "  Average order value: {}", config.money(s.average_order_value));
        let _ = writeln!(out, "  Users:               {}", s.user_count);
        let _ = writeln!(out, "  Products:            {}", s.product_count);
        let _ = writeln!(out, "  Wishlisted products: {}", s.wishlisted_products);
        out.push_str("Orders by status\n");
        for (status, count) in &s.orders_by_status {
            let _ = writeln!(out, "  {:<10} {}", status.as_str(), count);
        }
        out.push_str("Recent orders\n");
        if self.recent_orders.is_empty() {
            out.push_str("  (none)\n");
        }
        for order in &self.recent_orders {
            let _ = writeln!(out, "  {}", order_line(order, config));
        }
        out.push('\n');
        render_products(&mut out, "Products", &self.products, config);
        out
    }
}

// =============================================================================
// Products
// =============================================================================

/// Admin product form. With an `id` of an existing product, only the given
/// fields change; otherwise a new product is created and `name`, `price`
/// and `category` are required. Prices in whole rupees.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: Option<i64>,
    pub original_price: Option<i64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub additional_images: Vec<String>,
    pub key_highlights: Vec<String>,
    pub sizes: Vec<String>,
    pub rating: Option<f64>,
    pub reviews: Option<u32>,
    pub in_stock: Option<bool>,
    pub on_sale: Option<bool>,
    pub is_new: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProduct {
    pub created: bool,
    pub product: Product,
}

/// Creates or updates a product.
pub async fn save_product(session: &mut Session, form: ProductForm) -> Result<SavedProduct, ApiError> {
    debug!(id = ?form.id, "save_product command");
    guard(session)?;

    let state = session.state();
    let existing = form.id.as_deref().and_then(|id| state.product(id)).cloned();
    let created = existing.is_none();

    let mut product = match existing {
        Some(product) => product,
        None => Product {
            id: match form.id.clone() {
                Some(id) => id,
                None => next_product_id(session),
            },
            name: required(form.name.clone(), "name")?,
            price_paise: 0,
            original_price_paise: None,
            image: PLACEHOLDER_IMAGE.to_string(),
            images: Vec::new(),
            additional_images: Vec::new(),
            category: required(form.category.clone(), "category")?,
            description: String::new(),
            key_highlights: Vec::new(),
            reviews: 0,
            rating: 0.0,
            in_stock: true,
            sizes: Vec::new(),
            is_on_sale: false,
            is_new: false,
            details: ProductDetails::default(),
        },
    };
    if created && form.price.is_none() {
        return Err(ApiError::validation("price is required"));
    }

    apply_form(&mut product, form)?;
    validate_product(&product).map_err(CoreError::from)?;

    if created {
        info!(product_id = %product.id, "Product added");
        session.dispatch(Action::AddProduct(product.clone()));
    } else {
        info!(product_id = %product.id, "Product updated");
        session.dispatch(Action::UpdateProduct(product.clone()));
    }
    session.save().await?;

    Ok(SavedProduct { created, product })
}

fn apply_form(product: &mut Product, form: ProductForm) -> Result<(), ApiError> {
    if let Some(name) = form.name {
        product.name = name.trim().to_string();
    }
    if let Some(price) = form.price {
        product.price_paise = rupees_to_paise("price", price)?;
    }
    if let Some(original) = form.original_price {
        product.original_price_paise = Some(rupees_to_paise("original price", original)?);
    }
    if let Some(category) = form.category {
        product.category = category.trim().to_string();
    }
    if let Some(description) = form.description {
        product.description = description;
    }
    if let Some(image) = form.image.filter(|i| !i.trim().is_empty()) {
        product.image = image;
    }
    if !form.additional_images.is_empty() {
        product.additional_images = form.additional_images;
    }
    // gallery is the primary image followed by the additional ones
    product.images = std::iter::once(product.image.clone())
        .chain(product.additional_images.iter().cloned())
        .filter(|i| !i.is_empty())
        .collect();
    if !form.key_highlights.is_empty() {
        product.key_highlights = form.key_highlights;
    }
    if !form.sizes.is_empty() {
        product.sizes = form
            .sizes
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Some(rating) = form.rating {
        product.rating = rating;
    }
    if let Some(reviews) = form.reviews {
        product.reviews = reviews;
    }
    if let Some(in_stock) = form.in_stock {
        product.in_stock = in_stock;
    }
    if let Some(on_sale) = form.on_sale {
        product.is_on_sale = on_sale;
    }
    if let Some(is_new) = form.is_new {
        product.is_new = is_new;
    }
    Ok(())
}

fn rupees_to_paise(field: &str, rupees: i64) -> Result<i64, ApiError> {
    Money::checked_from_rupees(rupees)
        .map(|m| m.paise())
        .ok_or_else(|| ApiError::validation(format!("{} is too large", field)))
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation(format!("{} is required", field)))
}

/// Millisecond timestamp id, bumped past any id already taken.
fn next_product_id(session: &Session) -> String {
    let mut candidate = session.now().timestamp_millis();
    while session.state().product(&candidate.to_string()).is_some() {
        candidate += 1;
    }
    candidate.to_string()
}

pub async fn delete_product(session: &mut Session, id: &str) -> Result<Notice, ApiError> {
    debug!(id = %id, "delete_product command");
    guard(session)?;

    let name = session
        .state()
        .product(id)
        .map(|p| p.name.clone())
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    session.dispatch(Action::DeleteProduct(id.to_string()));
    session.save().await?;
    info!(product_id = %id, "Product deleted");
    Ok(Notice::new(format!("Deleted {} [{}]", name, id)))
}

impl Render for SavedProduct {
    fn render(&self, config: &ConfigState) -> String {
        format!(
            "{} {}",
            if self.created { "Added" } else { "Updated" },
            ProductSummary::new(&AppState::default(), &self.product).line(config)
        )
    }
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListView {
    pub orders: Vec<Order>,
}

/// Every order, newest first, optionally limited to one status.
pub fn list_orders(session: &Session, status: Option<OrderStatus>) -> Result<OrderListView, ApiError> {
    debug!(?status, "list_orders command");
    guard(session)?;

    let mut orders: Vec<Order> = session
        .state()
        .orders
        .iter()
        .filter(|o| status.map_or(true, |s| o.status == s))
        .cloned()
        .collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(OrderListView { orders })
}

pub async fn set_order_status(
    session: &mut Session,
    id: &str,
    status: OrderStatus,
) -> Result<Order, ApiError> {
    debug!(id = %id, status = status.as_str(), "set_order_status command");
    guard(session)?;

    let mut order = session
        .state()
        .order(id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("Order", id))?;
    order.status = status;

    session.dispatch(Action::UpdateOrder(order.clone()));
    session.save().await?;
    info!(order_id = %id, status = status.as_str(), "Order status changed");
    Ok(order)
}

impl Render for OrderListView {
    fn render(&self, config: &ConfigState) -> String {
        if self.orders.is_empty() {
            return "No orders".to_string();
        }
        let mut out = String::new();
        for order in &self.orders {
            let _ = writeln!(out, "{}", order_line(order, config));
            if let Some(info) = &order.customer_info {
                let _ = writeln!(out, "    {} <{}>  {}", info.full_name, info.email, info.phone);
            }
        }
        out
    }
}

impl Render for Order {
    fn render(&self, config: &ConfigState) -> String {
        order_line(self, config)
    }
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListView {
    pub users: Vec<AccountView>,
}

pub fn list_users(session: &Session) -> Result<UserListView, ApiError> {
    debug!("list_users command");
    guard(session)?;

    Ok(UserListView {
        users: session.state().users.iter().map(AccountView::from).collect(),
    })
}

impl Render for UserListView {
    fn render(&self, _config: &ConfigState) -> String {
        let mut out = String::new();
        for user in &self.users {
            let _ = writeln!(
                out,
                "{}  {} <{}>{}",
                user.id,
                user.name,
                user.email,
                if user.is_admin { "  (admin)" } else { "" }
            );
        }
        out
    }
}
