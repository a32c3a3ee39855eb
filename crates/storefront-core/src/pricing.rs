//! # Cart Pricing
//!
//! ## Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal = Σ price × qty        (entries whose product still exists)  │
//! │  shipping = 0 if subtotal > ₹499, else ₹50                             │
//! │  tax      = 18% GST on subtotal, rounded to the whole rupee            │
//! │  total    = subtotal + shipping + tax                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use crate::money::Money;
use crate::types::{CartItem, Product, TaxRate};

/// Store-wide pricing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingRules {
    pub tax_rate: TaxRate,
    /// Shipping is free when the subtotal is strictly above this.
    pub free_shipping_threshold: Money,
    pub flat_shipping: Money,
}

impl Default for PricingRules {
    fn default() -> Self {
        PricingRules {
            tax_rate: TaxRate::GST,
            free_shipping_threshold: Money::from_rupees(499),
            flat_shipping: Money::from_rupees(50),
        }
    }
}

/// A cart entry joined with its product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine<'a> {
    pub item: &'a CartItem,
    pub product: &'a Product,
    pub line_total: Money,
}

/// Priced cart summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPricing {
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
    /// How much more is needed for free shipping; zero once reached.
    pub amount_to_free_shipping: Money,
    /// Units across priced lines.
    pub item_count: i64,
}

impl CartPricing {
    pub fn has_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// Joins cart entries to products, dropping entries whose product is gone.
pub fn cart_lines<'a>(cart: &'a [CartItem], products: &'a [Product]) -> Vec<CartLine<'a>> {
    cart.iter()
        .filter_map(|item| {
            products
                .iter()
                .find(|p| p.id == item.product_id)
                .map(|product| CartLine {
                    item,
                    product,
                    line_total: product.price().multiply_quantity(item.quantity),
                })
        })
        .collect()
}

/// Prices `cart` against `products`.
///
/// ## Example
/// ```rust
/// use storefront_core::pricing::{price_cart, PricingRules};
/// use storefront_core::{seed, CartItem, Money};
///
/// let products = seed::products();
/// let cart = vec![CartItem::new("1", 1)]; // ₹499
/// let priced = price_cart(&cart, &products, &PricingRules::default());
///
/// assert_eq!(priced.shipping, Money::from_rupees(50));
/// assert_eq!(priced.tax, Money::from_rupees(90));
/// assert_eq!(priced.total, Money::from_rupees(639));
/// ```
pub fn price_cart(cart: &[CartItem], products: &[Product], rules: &PricingRules) -> CartPricing {
    let lines = cart_lines(cart, products);
    let subtotal: Money = lines.iter().map(|line| line.line_total).sum();
    let item_count = lines
        .iter()
        .fold(0i64, |n, line| n.saturating_add(line.item.quantity));

    let shipping = if subtotal > rules.free_shipping_threshold {
        Money::zero()
    } else {
        rules.flat_shipping
    };
    let tax = subtotal.calculate_tax(rules.tax_rate).round_to_rupee();

    CartPricing {
        subtotal,
        shipping,
        tax,
        total: subtotal + shipping + tax,
        amount_to_free_shipping: rules.free_shipping_threshold.saturating_sub_floor(subtotal),
        item_count,
    }
}
