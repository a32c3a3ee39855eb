//! Admin dashboard statistics.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::money::Money;
use crate::store::AppState;
use crate::types::OrderStatus;

/// Headline numbers for the admin overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_revenue: Money,
    pub order_count: usize,
    pub user_count: usize,
    pub product_count: usize,
    /// Zero when there are no orders.
    pub average_order_value: Money,
    /// Wishlist ids that still resolve to a product.
    pub wishlisted_products: usize,
    /// Every status is present, with zero where no order has it.
    pub orders_by_status: BTreeMap<OrderStatus, usize>,
}

impl DashboardStats {
    pub fn compute(state: &AppState) -> Self {
        let total_revenue: Money = state.orders.iter().map(|o| o.total()).sum();
        let order_count = state.orders.len();
        let average_order_value = match order_count {
            0 => Money::zero(),
            n => Money::from_paise(total_revenue.paise() / n as i64),
        };

        let mut orders_by_status: BTreeMap<OrderStatus, usize> =
            OrderStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        for order in &state.orders {
            *orders_by_status.entry(order.status).or_default() += 1;
        }

        DashboardStats {
            total_revenue,
            order_count,
            user_count: state.users.len(),
            product_count: state.products.len(),
            average_order_value,
            wishlisted_products: state
                .products
                .iter()
                .filter(|p| state.is_wishlisted(&p.id))
                .count(),
            orders_by_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use crate::types::{CartItem, Order};
    use chrono::Utc;

    fn order(id: &str, rupees: i64, status: OrderStatus) -> Order {
        Order {
            id: id.into(),
            user_id: "u".into(),
            items: vec![CartItem::new("1", 1)],
            total_paise: rupees * 100,
            status,
            created_at: Utc::now(),
            shipping_address: String::new(),
            payment_method: None,
            customer_info: None,
        }
    }

    #[test]
    fn test_empty_store() {
        let stats = DashboardStats::compute(&AppState::default());
        assert_eq!(stats.total_revenue, Money::zero());
        assert_eq!(stats.average_order_value, Money::zero());
        assert_eq!(stats.orders_by_status.len(), 5);
        assert!(stats.orders_by_status.values().all(|n| *n == 0));
    }

    #[test]
    fn test_totals_and_status_counts() {
        let state = AppState {
            products: seed::products(),
            orders: vec![
                order("a", 639, OrderStatus::Pending),
                order("b", 1178, OrderStatus::Shipped),
                order("c", 400, OrderStatus::Pending),
            ],
            wishlist: vec!["1".into(), "gone".into(), "3".into()],
            ..AppState::default()
        };
        let stats = DashboardStats::compute(&state);

        assert_eq!(stats.total_revenue, Money::from_rupees(2217));
        assert_eq!(stats.order_count, 3);
        assert_eq!(stats.average_order_value, Money::from_rupees(739));
        assert_eq!(stats.product_count, 8);
        assert_eq!(stats.wishlisted_products, 2);
        assert_eq!(stats.orders_by_status[&OrderStatus::Pending], 2);
        assert_eq!(stats.orders_by_status[&OrderStatus::Shipped], 1);
        assert_eq!(stats.orders_by_status[&OrderStatus::Delivered], 0);
    }
}
