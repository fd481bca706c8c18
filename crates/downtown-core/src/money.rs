//! # Money Module
//!
//! Provides the `Amount` type for currency values (NGN).
//!
//! ## Plain Float Arithmetic
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AMOUNTS ARE f64                                                        │
//! │                                                                         │
//! │  Labour pay is a per-kg rate times a kg weight, and kg is fractional:  │
//! │    12.5 kg × ₦40/kg = ₦500.0                                            │
//! │    ₦500.0 / 3 staff = ₦166.666…                                         │
//! │                                                                         │
//! │  No rounding is applied anywhere in the engine. The same inputs in     │
//! │  the same order always give the same bits; display rounding belongs    │
//! │  to whoever renders the number.                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use downtown_core::money::Amount;
//!
//! let share = Amount::new(500.0);
//! let total = share + share;
//! assert_eq!(total.value(), 1000.0);
//! assert_eq!(total.to_string(), "₦1000.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul};
use ts_rs::TS;

// =============================================================================
// Amount Type
// =============================================================================

/// A currency value.
///
/// Serializes as a bare JSON number so stored documents and report output
/// keep the `amount: 1000.0` shape.
///
/// ## Where Amounts Flow
/// ```text
/// PriceTable.labour_prices ──► allocate() ──► LabourRecord.amount
///                                         └─► LabourRecord.member_share
///                                                   │
///                                                   ▼
///                                 monthly_wages() total_wage / breakdown
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Amount(f64);

impl Amount {
    /// Wraps a raw currency value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Amount(value)
    }

    /// Returns zero.
    #[inline]
    pub const fn zero() -> Self {
        Amount(0.0)
    }

    /// Returns the raw value.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Checks if the value is exactly zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Checks if the value is negative.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }

    /// Splits the amount evenly across `parts` shares.
    ///
    /// Zero parts gives zero, never a division by zero.
    ///
    /// ## Example
    /// ```rust
    /// use downtown_core::money::Amount;
    ///
    /// assert_eq!(Amount::new(900.0).split(3).value(), 300.0);
    /// assert_eq!(Amount::new(900.0).split(0).value(), 0.0);
    /// ```
    pub fn split(&self, parts: usize) -> Self {
        if parts == 0 {
            Amount::zero()
        } else {
            Amount(self.0 / parts as f64)
        }
    }
}

// =============================================================================
// Arithmetic Operations
// =============================================================================

impl Add for Amount {
    type Output = Amount;

    #[inline]
    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    #[inline]
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

/// Rate × quantity.
impl Mul<f64> for Amount {
    type Output = Amount;

    #[inline]
    fn mul(self, rhs: f64) -> Amount {
        Amount(self.0 * rhs)
    }
}

impl Div<f64> for Amount {
    type Output = Amount;

    #[inline]
    fn div(self, rhs: f64) -> Amount {
        Amount(self.0 / rhs)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::zero(), |acc, a| acc + a)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.fold(Amount::zero(), |acc, a| acc + *a)
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount(value)
    }
}

impl From<Amount> for f64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

// =============================================================================
// Display
// =============================================================================

/// Formats for humans: `₦1000.00`.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0.0 {
            write!(f, "-₦{:.2}", -self.0)
        } else {
            write!(f, "₦{:.2}", self.0)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_is_conservative() {
        let amount = Amount::new(1000.0);
        let share = amount.split(4);
        assert_eq!(share.value(), 250.0);
        assert_eq!((share * 4.0).value(), amount.value());
    }

    #[test]
    fn test_split_zero_parts() {
        assert!(Amount::new(123.0).split(0).is_zero());
    }

    #[test]
    fn test_sum() {
        let amounts = vec![Amount::new(1.5), Amount::new(2.5), Amount::new(6.0)];
        let total: Amount = amounts.iter().sum();
        assert_eq!(total.value(), 10.0);

        let owned: Amount = amounts.into_iter().sum();
        assert_eq!(owned.value(), 10.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::new(1099.5).to_string(), "₦1099.50");
        assert_eq!(Amount::new(-20.0).to_string(), "-₦20.00");
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&Amount::new(500.0)).unwrap();
        assert_eq!(json, "500.0");

        let back: Amount = serde_json::from_str("12").unwrap();
        assert_eq!(back.value(), 12.0);
    }
}
