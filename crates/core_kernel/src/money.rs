//! Money types with precise decimal arithmetic
//!
//! Every monetary value in the claims system is denominated in US dollars.
//! `Money` wraps a `rust_decimal::Decimal` so cost estimates and savings
//! never accumulate floating-point drift, and serializes transparently as a
//! plain JSON number.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use thiserror::Error;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Division by zero")]
    DivisionByZero,
}

/// A US dollar amount
///
/// Amounts are stored with at most 4 decimal places; per-call API costs are
/// fractions of a cent, so rounding to cents happens only at presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp(4))
    }

    /// Creates Money from an integer amount in cents
    pub fn from_cents(cents: i64) -> Self {
        Self::new(Decimal::new(cents, 2))
    }

    /// Creates a zero amount
    pub fn zero() -> Self {
        Self(dec!(0))
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Rounds to whole cents
    pub fn round_to_cents(&self) -> Self {
        Self(self.0.round_dp(2))
    }

    /// Rounds to the given number of decimal places
    pub fn round_dp(&self, dp: u32) -> Self {
        Self(self.0.round_dp(dp))
    }

    /// Floors negative amounts at zero
    pub fn non_negative(&self) -> Self {
        if self.0.is_sign_negative() {
            Self::zero()
        } else {
            *self
        }
    }

    /// Returns this amount as a percentage of `whole`, rounded to one decimal place
    pub fn percentage_of(&self, whole: Money) -> Result<Decimal, MoneyError> {
        if whole.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        Ok((self.0 / whole.0 * dec!(100)).round_dp(1))
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money::new(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::new(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::new(self.0 - other.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, factor: Decimal) -> Money {
        Money::new(self.0 * factor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}
