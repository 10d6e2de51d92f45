//! # Credits Module
//!
//! The `Credits` type: the storefront's only currency.
//!
//! ## Why Unsigned?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE BALANCE INVARIANT                                                  │
//! │                                                                         │
//! │    credits ≥ 0, always                                                  │
//! │                                                                         │
//! │  A u64 cannot represent a negative balance, so the invariant is held   │
//! │  by the type instead of by every caller. Debits go through             │
//! │  `checked_sub`, which returns None instead of wrapping.                │
//! │                                                                         │
//! │    50 000.checked_sub(57 500) → None  → "INSUFFICIENT FUNDS"           │
//! │    50 000.checked_sub(12 500) → 37 500                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cyber_core::credits::Credits;
//!
//! let balance = Credits::from_units(50_000);
//! let price = Credits::from_units(12_500);
//!
//! assert_eq!(balance.checked_sub(price), Some(Credits::from_units(37_500)));
//! assert_eq!(price.checked_sub(balance), None);
//! assert_eq!(balance.to_string(), "¥ 50,000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use ts_rs::TS;

/// A non-negative credit amount in the smallest unit.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Credits(u64);

impl Credits {
    /// Creates a credit amount from whole units.
    #[inline]
    pub const fn from_units(units: u64) -> Self {
        Credits(units)
    }

    /// Returns the raw unit count.
    #[inline]
    pub const fn units(&self) -> u64 {
        self.0
    }

    /// Zero credits.
    #[inline]
    pub const fn zero() -> Self {
        Credits(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Subtracts `other`, or returns `None` if the result would be negative.
    ///
    /// This is the only way to debit a balance.
    #[inline]
    pub const fn checked_sub(self, other: Credits) -> Option<Credits> {
        match self.0.checked_sub(other.0) {
            Some(units) => Some(Credits(units)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders as `¥ 12,500`, the storefront's display format.
impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        write!(f, "¥ {}", grouped)
    }
}

/// Saturating addition.
impl Add for Credits {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Credits(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Credits {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sum for Credits {
    fn sum<I: Iterator<Item = Credits>>(iter: I) -> Self {
        iter.fold(Credits::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Credits> for Credits {
    fn sum<I: Iterator<Item = &'a Credits>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<u64> for Credits {
    fn from(units: u64) -> Self {
        Credits(units)
    }
}
