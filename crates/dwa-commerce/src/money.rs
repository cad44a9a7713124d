//! Money type for representing monetary values.
//!
//! Uses a pesewa-based integer representation to avoid floating-point
//! drift when summing order lines. The shop trades in a single currency,
//! the Ghana cedi, so no currency tag is carried.
//!
//! On the wire a `Money` is a plain decimal number (`35.5`), matching the
//! totals stored in order snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};

/// Display symbol for the shop currency.
pub const CURRENCY_SYMBOL: &str = "GH\u{20b5}";

/// Minor units per cedi.
const MINOR_PER_UNIT: i64 = 100;

/// A monetary value in the shop currency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(into = "f64", from = "f64")]
pub struct Money {
    /// Amount in pesewas (1/100 cedi).
    pub amount_minor: i64,
}

impl Money {
    /// Create a new Money value from pesewas.
    pub const fn new(amount_minor: i64) -> Self {
        Self { amount_minor }
    }

    /// Create a Money value from a decimal amount, rounded to the pesewa.
    ///
    /// Non-finite input yields zero.
    ///
    /// ```
    /// use dwa_commerce::money::Money;
    /// let price = Money::from_decimal(49.99);
    /// assert_eq!(price.amount_minor, 4999);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        if !amount.is_finite() {
            return Self::zero();
        }
        Self::new((amount * MINOR_PER_UNIT as f64).round() as i64)
    }

    /// Zero.
    pub const fn zero() -> Self {
        Self::new(0)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_minor as f64 / MINOR_PER_UNIT as f64
    }

    /// Format as a display string (e.g., "GH₵49.99").
    pub fn display(&self) -> String {
        self.display_with(CURRENCY_SYMBOL)
    }

    /// Format with a custom symbol.
    pub fn display_with(&self, symbol: &str) -> String {
        format!("{}{}", symbol, self.display_amount())
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        format!("{:.2}", self.to_decimal())
    }

    /// Shortest decimal text for this value ("10", "12.5"), as typed into
    /// an amount field.
    pub fn to_input_text(&self) -> String {
        self.to_decimal().to_string()
    }

    /// Add another Money value, saturating at the numeric bounds.
    pub fn saturating_add(&self, other: &Money) -> Money {
        Money::new(self.amount_minor.saturating_add(other.amount_minor))
    }

    /// Multiply by a whole count, saturating at the numeric bounds.
    pub fn multiply(&self, factor: i64) -> Money {
        Money::new(self.amount_minor.saturating_mul(factor))
    }

    /// Multiply by a whole count, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_minor.checked_mul(factor).map(Money::new)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        self.saturating_add(&other)
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, factor: i64) -> Money {
        self.multiply(factor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl From<f64> for Money {
    fn from(amount: f64) -> Self {
        Money::from_decimal(amount)
    }
}

impl From<Money> for f64 {
    fn from(money: Money) -> f64 {
        money.to_decimal()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
