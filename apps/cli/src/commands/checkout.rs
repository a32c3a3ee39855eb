//! # Checkout Command
//!
//! ```text
//! storefront checkout --city Pune --state Maharashtra --pincode 411001 --payment upi
//!        │
//!        ├── shipping form: account details, overridden by flags
//!        ├── place_order(state, user, shipping, payment, rules, now)
//!        ├── AddOrder(order)
//!        ├── ClearCart
//!        ▼
//! save ──► OrderView (confirmation)
//! ```

use storefront_core::checkout::place_order;
use storefront_core::store::Action;
use storefront_core::{CoreError, CustomerInfo, PaymentMethod};
use tracing::{debug, info};

use super::order::OrderView;
use crate::error::ApiError;
use crate::state::Session;

/// Shipping fields given on the command line. Missing fields are filled from
/// the signed-in account where it has them.
#[derive(Debug, Clone, Default)]
pub struct ShippingArgs {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

/// Places an order for the cart and empties it.
pub async fn checkout(
    session: &mut Session,
    shipping: ShippingArgs,
    payment_method: PaymentMethod,
) -> Result<OrderView, ApiError> {
    debug!(payment = payment_method.as_str(), "checkout command");

    let state = session.state();
    let user = state.current_user.as_ref().ok_or(CoreError::NotSignedIn)?;

    let mut info = CustomerInfo::from_user(user);
    let fields = [
        (&mut info.full_name, shipping.full_name),
        (&mut info.email, shipping.email),
        (&mut info.phone, shipping.phone),
        (&mut info.address, shipping.address),
        (&mut info.city, shipping.city),
        (&mut info.state, shipping.state),
        (&mut info.pincode, shipping.pincode),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            *field = value.trim().to_string();
        }
    }

    let rules = session.config().pricing_rules();
    let order = place_order(state, Some(user), &info, payment_method, &rules, session.now())?;

    info!(order_id = %order.id, total = %order.total(), "Order placed");
    session.dispatch(Action::AddOrder(order.clone()));
    let state = session.dispatch(Action::ClearCart);
    let view = OrderView::new(state, &order);
    session.save().await?;

    Ok(view)
}
