//! # Domain Types
//!
//! Core domain types held in the storefront state tree.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Order       │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name, category │   │  user_id        │   │  email          │       │
//! │  │  price_paise    │   │  items (snap)   │   │  password_hash  │       │
//! │  │  rating/reviews │   │  status         │   │  is_admin       │       │
//! │  └────────┬────────┘   └─────────────────┘   └─────────────────┘       │
//! │           │ product_id                                                  │
//! │  ┌────────▼────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    CartItem     │   │   OrderStatus   │   │    Category     │       │
//! │  │  id (entry)     │   │  Pending        │   │  id, name       │       │
//! │  │  quantity       │   │  Processing     │   │  image          │       │
//! │  │  size?          │   │  Shipped ...    │   │  description    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! Every type serializes with camelCase field names; this is the exact
//! layout written to local storage, one JSON value per slice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%; 1800 bps = 18% GST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Standard GST rate applied at checkout.
    pub const GST: TaxRate = TaxRate(1800);

    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
///
/// Shoppers only read products; the admin panel creates, edits and deletes
/// them through store actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,

    /// Display name.
    pub name: String,

    /// Selling price in paise.
    pub price_paise: i64,

    /// Pre-discount price in paise, shown struck through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price_paise: Option<i64>,

    /// Primary image URL.
    pub image: String,

    /// Gallery images, primary first.
    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub additional_images: Vec<String>,

    /// Category label, matched case-insensitively against `Category::name`.
    pub category: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub key_highlights: Vec<String>,

    /// Number of reviews.
    #[serde(default)]
    pub reviews: u32,

    /// Average rating, 0.0 - 5.0.
    #[serde(default)]
    pub rating: f64,

    pub in_stock: bool,

    /// Size variants such as "15ml" / "30ml".
    #[serde(default)]
    pub sizes: Vec<String>,

    #[serde(default)]
    pub is_on_sale: bool,

    #[serde(default)]
    pub is_new: bool,

    #[serde(flatten)]
    pub details: ProductDetails,
}

/// Optional merchandising details shown on the product page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_to_use: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub benefits: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skin_type: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concerns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacture_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_of_origin: Option<String>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_paise(self.price_paise)
    }

    /// Returns the original price, if the product has one.
    #[inline]
    pub fn original_price(&self) -> Option<Money> {
        self.original_price_paise.map(Money::from_paise)
    }

    /// Savings against the original price (zero when there is none).
    pub fn discount_amount(&self) -> Money {
        self.original_price()
            .map(|orig| orig.saturating_sub_floor(self.price()))
            .unwrap_or_default()
    }

    /// Whole-percent discount, rounded half up.
    ///
    /// ## Example
    /// ₹599 → ₹499 is 16.69% off, shown as "17% OFF".
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price_paise?;
        if original <= 0 || original <= self.price_paise {
            return None;
        }
        let saved = original - self.price_paise;
        Some((saved.saturating_mul(100).saturating_add(original / 2) / original) as u32)
    }

    /// Gallery images, falling back to the primary image.
    pub fn gallery(&self) -> Vec<&str> {
        if self.images.is_empty() {
            vec![self.image.as_str()]
        } else {
            self.images.iter().map(String::as_str).collect()
        }
    }

    /// Case-insensitive category comparison.
    pub fn in_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category)
    }
}

// =============================================================================
// User
// =============================================================================

/// A storefront account.
///
/// ## Credentials
/// `password_hash` is an Argon2 PHC string, never the plain password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password_hash: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Case-insensitive email comparison.
    pub fn has_email(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }

    /// Whether this account has a usable credential.
    pub fn has_credential(&self) -> bool {
        !self.password_hash.is_empty()
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// An entry in the shopping cart.
///
/// ## Identity
/// `id` identifies the entry (remove / set quantity target it);
/// `product_id` is what deduplication merges on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub product_id: String,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CartItem {
    /// Creates a cart entry with a fresh entry id.
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        CartItem {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.into(),
            quantity,
            size: None,
            description: None,
        }
    }

    /// Creates a cart entry for `product`, carrying its description.
    pub fn for_product(product: &Product, quantity: i64, size: Option<String>) -> Self {
        CartItem {
            size,
            description: Some(product.description.clone()),
            ..CartItem::new(product.id.clone(), quantity)
        }
    }

    /// Sets the entry id (used when replaying persisted carts and in tests).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Fulfilment status of an order. Admins move orders between these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: OrderStatus::ALL
                    .iter()
                    .map(|s| s.as_str().to_string())
                    .collect(),
            })
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// Payment method label chosen at checkout. Nothing is charged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Upi,
    /// Cash on delivery.
    Cod,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Cod => "cod",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" => Ok(PaymentMethod::Card),
            "upi" => Ok(PaymentMethod::Upi),
            "cod" => Ok(PaymentMethod::Cod),
            _ => Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: vec!["card".into(), "upi".into(), "cod".into()],
            }),
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// Shipping and contact details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl CustomerInfo {
    /// Prefills name, email, phone and address from an account.
    pub fn from_user(user: &User) -> Self {
        CustomerInfo {
            full_name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
            ..CustomerInfo::default()
        }
    }

    /// One-line address: `"{address}, {city}, {state} - {pincode}"`.
    pub fn shipping_address(&self) -> String {
        format!(
            "{}, {}, {} - {}",
            self.address, self.city, self.state, self.pincode
        )
    }
}

/// A placed order. Items are a snapshot of the cart at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub items: Vec<CartItem>,
    /// Grand total in paise (subtotal + shipping + GST).
    pub total_paise: i64,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_info: Option<CustomerInfo>,
}

impl Order {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_paise)
    }

    /// Total number of units across all items.
    pub fn item_count(&self) -> i64 {
        self.items.iter().fold(0i64, |n, i| n.saturating_add(i.quantity))
    }
}

// =============================================================================
// Category
// =============================================================================

/// Static catalog category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub image: String,
    pub description: String,
}
