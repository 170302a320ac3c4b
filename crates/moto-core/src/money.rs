//! # Money Module
//!
//! Provides the `Money` type for Colombian peso amounts.
//!
//! ## Why Integer Pesos?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  COP has no minor unit in everyday use                                  │
//! │                                                                         │
//! │  A motorcycle costs $8.500.000 and a day of rental $90.000.             │
//! │  Both fit comfortably in an i64 of whole pesos, so every amount in     │
//! │  the system (listing price, daily price, amount paid) is an integer.   │
//! │                                                                         │
//! │  Floats never touch money: 0.1 + 0.2 = 0.30000000000000004             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use moto_core::money::Money;
//!
//! let price = Money::from_pesos(8_500_000);
//! assert_eq!(price.to_string(), "$8.500.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole Colombian pesos.
///
/// ## Design Decisions
/// - **i64 (signed)**: leaves room for adjustments and refunds
/// - **Newtype**: serializes as a plain JSON number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole pesos.
    #[inline]
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos)
    }

    /// Returns the value in whole pesos.
    #[inline]
    pub const fn pesos(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Colombian formatting: `$` prefix and `.` as thousands separator.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.unsigned_abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        write!(f, "{}${}", sign, grouped)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<i64> for Money {
    fn from(pesos: i64) -> Self {
        Money(pesos)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::from_pesos(0).to_string(), "$0");
        assert_eq!(Money::from_pesos(999).to_string(), "$999");
        assert_eq!(Money::from_pesos(1_000).to_string(), "$1.000");
        assert_eq!(Money::from_pesos(90_000).to_string(), "$90.000");
        assert_eq!(Money::from_pesos(8_500_000).to_string(), "$8.500.000");
        assert_eq!(Money::from_pesos(-125_000).to_string(), "-$125.000");
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&Money::from_pesos(100)).unwrap();
        assert_eq!(json, "100");

        let back: Money = serde_json::from_str("100").unwrap();
        assert_eq!(back.pesos(), 100);
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::from_pesos(1).is_positive());
        assert!(!Money::zero().is_positive());
        assert!(!Money::from_pesos(-1).is_positive());
    }
}
