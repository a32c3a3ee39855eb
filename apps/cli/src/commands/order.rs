//! # Order Commands
//!
//! Order confirmation and the signed-in user's order history. Shoppers only
//! see their own orders; administrators see every order.

use serde::Serialize;
use std::fmt::Write;
use storefront_core::account::require_user;
use storefront_core::{AppState, Order};
use tracing::debug;

use super::Render;
use crate::error::ApiError;
use crate::state::{ConfigState, Session};

/// An order line joined with the product name, when the product still exists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineView {
    pub product_id: String,
    pub name: Option<String>,
    pub size: Option<String>,
    pub quantity: i64,
}

/// Order confirmation page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub order: Order,
    pub lines: Vec<OrderLineView>,
}

impl OrderView {
    pub(crate) fn new(state: &AppState, order: &Order) -> Self {
        OrderView {
            order: order.clone(),
            lines: order
                .items
                .iter()
                .map(|item| OrderLineView {
                    product_id: item.product_id.clone(),
                    name: state.product(&item.product_id).map(|p| p.name.clone()),
                    size: item.size.clone(),
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

/// Shows one order, or the signed-in user's latest order when `id` is `None`.
pub fn order_confirmation(session: &Session, id: Option<&str>) -> Result<OrderView, ApiError> {
    debug!(?id, "order_confirmation command");

    let state = session.state();
    let user = require_user(state.current_user.as_ref())?;

    let order = match id {
        Some(id) => state
            .order(id)
            .filter(|order| user.is_admin || order.user_id == user.id)
            .ok_or_else(|| ApiError::not_found("Order", id))?,
        None => state
            .orders_for_user(&user.id)
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::not_found("Order", "latest"))?,
    };

    Ok(OrderView::new(state, order))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistoryView {
    pub orders: Vec<Order>,
}

/// The signed-in user's orders, newest first.
pub fn my_orders(session: &Session) -> Result<OrderHistoryView, ApiError> {
    debug!("my_orders command");

    let state = session.state();
    let user = require_user(state.current_user.as_ref())?;
    Ok(OrderHistoryView {
        orders: state
            .orders_for_user(&user.id)
            .into_iter()
            .cloned()
            .collect(),
    })
}

pub(crate) fn order_line(order: &Order, config: &ConfigState) -> String {
    format!(
        "{}  {}  {}  {} item(s)  {}",
        order.id,
        order.created_at.format("%Y-%m-%d %H:%M"),
        order.status.as_str(),
        order.item_count(),
        config.money(order.total())
    )
}

impl Render for OrderView {
    fn render(&self, config: &ConfigState) -> String {
        let order = &self.order;
        let mut out = String::new();
        out.push_str("Order confirmed! Thank you for your purchase.\n");
        let _ = writeln!(out, "Order ID: {}", order.id);
        let _ = writeln!(out, "Placed: {}", order.created_at.format("%d %b %Y, %H:%M"));
        let _ = writeln!(out, "Status: {}", order.status.as_str());
        if let Some(method) = order.payment_method {
            let _ = writeln!(out, "Payment: {}", method.as_str().to_uppercase());
        }
        let _ = writeln!(out, "Ship to: {}", order.shipping_address);
        out.push_str("Items\n");
        for line in &self.lines {
            let _ = writeln!(
                out,
                "  {}{}  x{}",
                line.name.as_deref().unwrap_or(&line.product_id),
                line.size
                    .as_deref()
                    .map(|s| format!(" ({})", s))
                    .unwrap_or_default(),
                line.quantity
            );
        }
        let _ = writeln!(out, "Total: {}", config.money(order.total()));
        out
    }
}

impl Render for OrderHistoryView {
    fn render(&self, config: &ConfigState) -> String {
        if self.orders.is_empty() {
            return "No orders yet".to_string();
        }
        let mut out = String::new();
        for order in &self.orders {
            let _ = writeln!(out, "{}", order_line(order, config));
        }
        out
    }
}
