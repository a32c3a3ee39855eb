//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    ₹499.00 = 49900 paise                                                │
//! │    GST, shipping and totals are all integer arithmetic                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Money;
//!
//! let price = Money::from_rupees(499);
//! assert_eq!(price.paise(), 49900);
//!
//! let total = price * 2 + Money::from_rupees(50);
//! assert_eq!(total.rupees(), 1048);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::TaxRate;

/// Paise per rupee.
const PAISE_PER_RUPEE: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (the smallest INR unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences such as "₹30 more for free shipping"
///   can go negative before being clamped by the caller
/// - **Single field tuple struct**: zero-cost abstraction over i64
///
/// ```text
/// Product.price_paise ──► CartLine.line_total ──► CartPricing.subtotal
///                                                     │
///                              GST + shipping ◄───────┘
///                                    │
///                                    ▼
///                           CartPricing.total ──► Order.total_paise
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees(50).paise(), 5000);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees.saturating_mul(PAISE_PER_RUPEE))
    }

    /// Creates a Money value from whole rupees, or `None` when the amount
    /// does not fit in paise.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::checked_from_rupees(499), Some(Money::from_paise(49900)));
    /// assert_eq!(Money::checked_from_rupees(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn checked_from_rupees(rupees: i64) -> Option<Self> {
        match rupees.checked_mul(PAISE_PER_RUPEE) {
            Some(paise) => Some(Money(paise)),
            None => None,
        }
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion (truncated toward zero).
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / PAISE_PER_RUPEE
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % PAISE_PER_RUPEE).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates tax at `rate`, rounded half up to the nearest paisa.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    /// use storefront_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_rupees(499);
    /// let gst = subtotal.calculate_tax(TaxRate::from_bps(1800));
    /// assert_eq!(gst.paise(), 8982); // ₹89.82
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 so large carts cannot overflow the intermediate product
        let tax = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_paise(tax.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Rounds to the nearest whole rupee, halves away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(8982).round_to_rupee().paise(), 9000);
    /// assert_eq!(Money::from_paise(8949).round_to_rupee().paise(), 8900);
    /// assert_eq!(Money::from_paise(8950).round_to_rupee().paise(), 9000);
    /// ```
    pub const fn round_to_rupee(&self) -> Money {
        let half = PAISE_PER_RUPEE / 2;
        let rounded = if self.0 >= 0 {
            self.0.saturating_add(half) / PAISE_PER_RUPEE
        } else {
            self.0.saturating_sub(half) / PAISE_PER_RUPEE
        };
        Money(rounded.saturating_mul(PAISE_PER_RUPEE))
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Returns `self - other`, floored at zero.
    #[inline]
    pub const fn saturating_sub_floor(&self, other: Money) -> Money {
        if self.0 > other.0 {
            Money(self.0 - other.0)
        } else {
            Money(0)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `₹499.00`. The CLI formats through `ConfigState` instead.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}₹{}.{:02}",
            sign,
            self.rupees().abs(),
            self.paise_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rupees_and_parts() {
        let money = Money::from_paise(49950);
        assert_eq!(money.rupees(), 499);
        assert_eq!(money.paise_part(), 50);
        assert_eq!(Money::from_rupees(499).paise(), 49900);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_rupees(499).to_string(), "₹499.00");
        assert_eq!(Money::from_paise(8982).to_string(), "₹89.82");
        assert_eq!(Money::from_paise(-550).to_string(), "-₹5.50");
        assert_eq!(Money::zero().to_string(), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupees(10);
        let b = Money::from_rupees(5);

        assert_eq!((a + b).rupees(), 15);
        assert_eq!((a - b).rupees(), 5);
        assert_eq!((a * 3).rupees(), 30);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.rupees(), 20);
    }

    #[test]
    fn test_gst_on_whole_rupees() {
        // 18% of ₹499 = ₹89.82, which the storefront rounds to ₹90
        let gst = Money::from_rupees(499).calculate_tax(TaxRate::from_bps(1800));
        assert_eq!(gst.paise(), 8982);
        assert_eq!(gst.round_to_rupee(), Money::from_rupees(90));
    }

    #[test]
    fn test_round_to_rupee_negative() {
        assert_eq!(Money::from_paise(-150).round_to_rupee().paise(), -200);
        assert_eq!(Money::from_paise(-149).round_to_rupee().paise(), -100);
    }

    #[test]
    fn test_saturating_sub_floor() {
        let threshold = Money::from_rupees(499);
        assert_eq!(
            threshold.saturating_sub_floor(Money::from_rupees(299)),
            Money::from_rupees(200)
        );
        assert_eq!(
            threshold.saturating_sub_floor(Money::from_rupees(600)),
            Money::zero()
        );
    }

    #[test]
    fn test_huge_amounts_do_not_overflow() {
        assert_eq!(Money::checked_from_rupees(i64::MAX / 100 + 1), None);
        assert_eq!(Money::from_rupees(i64::MAX).paise(), i64::MAX);

        let huge = Money::from_paise(i64::MAX);
        assert_eq!(huge.multiply_quantity(999).paise(), i64::MAX);
        assert_eq!((huge + Money::from_rupees(1)).paise(), i64::MAX);
        let total: Money = vec![huge, huge].into_iter().sum();
        assert_eq!(total.paise(), i64::MAX);
        assert!(huge.round_to_rupee().is_positive());
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_paise(1).is_positive());
        assert!(Money::from_paise(-1).is_negative());
        assert_eq!(Money::from_paise(-100).abs().paise(), 100);
    }
}
