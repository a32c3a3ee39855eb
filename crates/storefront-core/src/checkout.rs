//! # Checkout
//!
//! Turns the current cart into an [`Order`]. The function is pure: the
//! caller dispatches `AddOrder(order)` and then `ClearCart`.

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::pricing::{cart_lines, price_cart, PricingRules};
use crate::store::AppState;
use crate::types::{CustomerInfo, Order, OrderStatus, PaymentMethod, User};
use crate::validation::validate_customer_info;

/// Builds a pending order from `state.cart`.
///
/// ## Errors
/// - `NotSignedIn` when `user` is `None`
/// - `EmptyCart` when no cart entry refers to an existing product
/// - `OutOfStock` when a cart product is marked unavailable
/// - `Validation` when a shipping field is missing or malformed
pub fn place_order(
    state: &AppState,
    user: Option<&User>,
    shipping: &CustomerInfo,
    payment_method: PaymentMethod,
    rules: &PricingRules,
    now: DateTime<Utc>,
) -> CoreResult<Order> {
    let user = user.ok_or(CoreError::NotSignedIn)?;

    let lines = cart_lines(&state.cart, &state.products);
    if lines.is_empty() {
        return Err(CoreError::EmptyCart);
    }
    if let Some(line) = lines.iter().find(|line| !line.product.in_stock) {
        return Err(CoreError::OutOfStock {
            name: line.product.name.clone(),
        });
    }

    validate_customer_info(shipping)?;

    let pricing = price_cart(&state.cart, &state.products, rules);
    let order = Order {
        id: Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        items: lines.iter().map(|line| line.item.clone()).collect(),
        total_paise: pricing.total.paise(),
        status: OrderStatus::Pending,
        created_at: now,
        shipping_address: shipping.shipping_address(),
        payment_method: Some(payment_method),
        customer_info: Some(shipping.clone()),
    };

    debug!(order_id = %order.id, total = %pricing.total, items = order.items.len(), "Order built");
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use crate::store::{Action, Store};
    use crate::types::CartItem;
    use crate::Money;

    fn shipping() -> CustomerInfo {
        CustomerInfo {
            full_name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            phone: "9876543210".into(),
            address: "12 MG Road".into(),
            city: "Mumbai".into(),
            state: "MH".into(),
            pincode: "400001".into(),
        }
    }

    fn shopper() -> User {
        seed::admin_user(String::new(), Utc::now())
    }

    fn store_with_cart() -> Store {
        let mut store = Store::new(AppState {
            products: seed::products(),
            ..AppState::default()
        });
        store.dispatch(Action::AddToCart(CartItem::new("1", 1)));
        store.dispatch(Action::AddToCart(CartItem::new("5", 2)));
        store
    }

    #[test]
    fn test_place_order_snapshots_cart_and_totals() {
        let store = store_with_cart();
        let user = shopper();
        let order = place_order(
            store.state(),
            Some(&user),
            &shipping(),
            PaymentMethod::Upi,
            &PricingRules::default(),
            Utc::now(),
        )
        .unwrap();

        // 499 + 598 = 1097, free shipping, GST round(197.46) = 197
        assert_eq!(order.total(), Money::from_rupees(1097 + 197));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items, store.state().cart);
        assert_eq!(order.user_id, user.id);
        assert_eq!(order.shipping_address, "12 MG Road, Mumbai, MH - 400001");
        assert_eq!(order.payment_method, Some(PaymentMethod::Upi));
    }

    #[test]
    fn test_caller_commits_order_then_clears_cart() {
        let mut store = store_with_cart();
        let user = shopper();
        let order = place_order(
            store.state(),
            Some(&user),
            &shipping(),
            PaymentMethod::Cod,
            &PricingRules::default(),
            Utc::now(),
        )
        .unwrap();

        store.dispatch(Action::AddOrder(order.clone()));
        store.dispatch(Action::ClearCart);
        assert!(store.state().cart.is_empty());
        assert_eq!(store.state().orders, vec![order]);
    }

    #[test]
    fn test_requires_user_and_items() {
        let store = store_with_cart();
        let rules = PricingRules::default();
        assert!(matches!(
            place_order(store.state(), None, &shipping(), PaymentMethod::Card, &rules, Utc::now()),
            Err(CoreError::NotSignedIn)
        ));

        let empty = AppState::default();
        let user = shopper();
        assert!(matches!(
            place_order(&empty, Some(&user), &shipping(), PaymentMethod::Card, &rules, Utc::now()),
            Err(CoreError::EmptyCart)
        ));
    }

    #[test]
    fn test_rejects_bad_shipping_info() {
        let store = store_with_cart();
        let user = shopper();
        let mut info = shipping();
        info.pincode = "4000".into();
        assert!(matches!(
            place_order(
                store.state(),
                Some(&user),
                &info,
                PaymentMethod::Card,
                &PricingRules::default(),
                Utc::now()
            ),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_out_of_stock() {
        let mut store = store_with_cart();
        let mut serum = store.state().product("1").cloned().unwrap();
        serum.in_stock = false;
        store.dispatch(Action::UpdateProduct(serum));

        let user = shopper();
        assert!(matches!(
            place_order(
                store.state(),
                Some(&user),
                &shipping(),
                PaymentMethod::Card,
                &PricingRules::default(),
                Utc::now()
            ),
            Err(CoreError::OutOfStock { .. })
        ));
    }
}
