//! # Reducer
//!
//! `reduce(state, action) -> state'`, the only code that changes state.
//!
//! ## Cart Merge Rule
//! ```text
//! cart: [{id: a, product 1, qty 1}]
//!
//! AddToCart({id: b, product 1, qty 2})   ──► [{id: a, product 1, qty 3}]
//! AddToCart({id: c, product 2, qty 1})   ──► [{id: a, ...}, {id: c, product 2, qty 1}]
//! ```
//! The incoming entry id is dropped on merge; the existing entry keeps its id.

use super::action::Action;
use super::state::AppState;

/// Applies `action` to `state`, returning the next state.
///
/// Never fails and never performs I/O.
pub fn reduce(state: &AppState, action: Action) -> AppState {
    let mut next = state.clone();
    apply(&mut next, action);
    next
}

fn apply(state: &mut AppState, action: Action) {
    match action {
        // ---------------------------------------------------------------- products
        Action::SetProducts(products) => state.products = products,
        Action::AddProduct(product) => state.products.push(product),
        Action::UpdateProduct(product) => {
            if let Some(slot) = state.products.iter_mut().find(|p| p.id == product.id) {
                *slot = product;
            }
        }
        Action::DeleteProduct(id) => state.products.retain(|p| p.id != id),

        // ------------------------------------------------------------------- users
        Action::SetUsers(users) => state.users = users,
        Action::AddUser(user) => state.users.push(user),
        Action::UpdateUser(user) => {
            if let Some(slot) = state.users.iter_mut().find(|u| u.id == user.id) {
                *slot = user;
            }
        }

        // ------------------------------------------------------------------ orders
        Action::SetOrders(orders) => state.orders = orders,
        Action::AddOrder(order) => state.orders.push(order),
        Action::UpdateOrder(order) => {
            if let Some(slot) = state.orders.iter_mut().find(|o| o.id == order.id) {
                *slot = order;
            }
        }

        Action::SetCategories(categories) => state.categories = categories,

        // -------------------------------------------------------------------- cart
        Action::AddToCart(item) => {
            match state
                .cart
                .iter_mut()
                .find(|existing| existing.product_id == item.product_id)
            {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
                None => state.cart.push(item),
            }
        }
        Action::RemoveFromCart(id) => state.cart.retain(|item| item.id != id),
        Action::UpdateCartQuantity { id, quantity } => {
            if let Some(item) = state.cart.iter_mut().find(|item| item.id == id) {
                item.quantity = quantity;
            }
        }
        Action::ClearCart => state.cart.clear(),

        // ---------------------------------------------------------------- wishlist
        Action::AddToWishlist(product_id) => {
            if !state.is_wishlisted(&product_id) {
                state.wishlist.push(product_id);
            }
        }
        Action::RemoveFromWishlist(product_id) => state.wishlist.retain(|id| *id != product_id),
        Action::ClearWishlist => state.wishlist.clear(),

        // ----------------------------------------------------------------- session
        Action::SetCurrentUser(user) => state.current_user = user,
        Action::SetSearchQuery(query) => state.search_query = query,
        Action::SetSelectedCategory(category) => state.selected_category = category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use crate::store::StateSlice;
    use crate::types::{CartItem, OrderStatus};
    use chrono::Utc;

    fn seeded() -> AppState {
        AppState {
            products: seed::products(),
            categories: seed::categories(),
            ..AppState::default()
        }
    }

    #[test]
    fn test_add_same_product_twice_merges_quantities() {
        let s1 = reduce(&AppState::default(), Action::AddToCart(CartItem::new("1", 1)));
        let s2 = reduce(&s1, Action::AddToCart(CartItem::new("1", 2)));

        assert_eq!(s2.cart.len(), 1);
        assert_eq!(s2.cart[0].quantity, 3);
        assert_eq!(s2.cart[0].id, s1.cart[0].id);
    }

    #[test]
    fn test_merge_saturates_instead_of_overflowing() {
        let s = reduce(&AppState::default(), Action::AddToCart(CartItem::new("1", i64::MAX)));
        let s = reduce(&s, Action::AddToCart(CartItem::new("1", 1)));
        assert_eq!(s.cart[0].quantity, i64::MAX);
    }

    #[test]
    fn test_add_different_products_appends() {
        let s = reduce(&AppState::default(), Action::AddToCart(CartItem::new("1", 1)));
        let s = reduce(&s, Action::AddToCart(CartItem::new("2", 1)));
        let ids: Vec<&str> = s.cart.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_remove_from_cart_removes_exactly_that_entry() {
        let s = reduce(
            &AppState::default(),
            Action::AddToCart(CartItem::new("1", 1).with_id("a")),
        );
        let s = reduce(&s, Action::AddToCart(CartItem::new("2", 1).with_id("b")));
        let s = reduce(&s, Action::RemoveFromCart("a".into()));

        assert_eq!(s.cart.len(), 1);
        assert_eq!(s.cart[0].id, "b");
    }

    #[test]
    fn test_update_cart_quantity_does_not_clamp() {
        let s = reduce(
            &AppState::default(),
            Action::AddToCart(CartItem::new("1", 1).with_id("a")),
        );
        let s = reduce(
            &s,
            Action::UpdateCartQuantity {
                id: "a".into(),
                quantity: 0,
            },
        );
        assert_eq!(s.cart.len(), 1);
        assert_eq!(s.cart[0].quantity, 0);
    }

    #[test]
    fn test_unknown_ids_are_no_ops() {
        let state = seeded();
        let mut ghost = state.products[0].clone();
        ghost.id = "missing".into();

        for action in [
            Action::UpdateProduct(ghost),
            Action::DeleteProduct("missing".into()),
            Action::RemoveFromCart("missing".into()),
            Action::UpdateCartQuantity {
                id: "missing".into(),
                quantity: 5,
            },
            Action::RemoveFromWishlist("missing".into()),
        ] {
            assert_eq!(reduce(&state, action), state);
        }
    }

    #[test]
    fn test_wishlist_is_a_set() {
        let s = reduce(&AppState::default(), Action::AddToWishlist("1".into()));
        let again = reduce(&s, Action::AddToWishlist("1".into()));
        assert_eq!(again.wishlist, vec!["1".to_string()]);

        let removed = reduce(&again, Action::RemoveFromWishlist("1".into()));
        assert!(removed.wishlist.is_empty());
    }

    #[test]
    fn test_update_and_delete_product() {
        let state = seeded();
        let mut edited = state.products[0].clone();
        edited.name = "Renamed".into();

        let s = reduce(&state, Action::UpdateProduct(edited.clone()));
        assert_eq!(s.products[0], edited);
        assert_eq!(s.products.len(), state.products.len());

        let s = reduce(&s, Action::DeleteProduct(edited.id.clone()));
        assert!(s.product(&edited.id).is_none());
        assert_eq!(s.products.len(), state.products.len() - 1);
    }

    #[test]
    fn test_update_order_status() {
        let order = crate::types::Order {
            id: "o1".into(),
            user_id: "u1".into(),
            items: vec![CartItem::new("1", 1)],
            total_paise: 59900,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            shipping_address: String::new(),
            payment_method: None,
            customer_info: None,
        };
        let s = reduce(&AppState::default(), Action::AddOrder(order.clone()));
        let shipped = crate::types::Order {
            status: OrderStatus::Shipped,
            ..order
        };
        let s = reduce(&s, Action::UpdateOrder(shipped));
        assert_eq!(s.orders[0].status, OrderStatus::Shipped);
    }

    #[test]
    fn test_session_fields() {
        let s = reduce(&AppState::default(), Action::SetSearchQuery("spf".into()));
        let s = reduce(&s, Action::SetSelectedCategory("Sunscreen".into()));
        assert_eq!(s.search_query, "spf");
        assert_eq!(s.selected_category, "Sunscreen");
        assert_eq!(
            AppState::default().changed_slices(&s),
            vec![StateSlice::SearchQuery, StateSlice::SelectedCategory]
        );
    }

    #[test]
    fn test_reduce_leaves_input_untouched() {
        let state = AppState::default();
        let _ = reduce(&state, Action::AddToWishlist("1".into()));
        assert!(state.wishlist.is_empty());
    }
}
