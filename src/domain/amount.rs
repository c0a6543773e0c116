//! Raw token amount with checked arithmetic.

use core::fmt;

use primitive_types::U256;

use super::Rounding;
use crate::error::{PairError, Result};

/// A raw token amount in the smallest unit of its asset.
///
/// `Amount` is decimal-agnostic; all `u128` values are valid. Arithmetic is
/// checked: the fallible methods return a typed [`PairError`] instead of
/// panicking or wrapping.
///
/// # Examples
///
/// ```
/// use liquidity_book::domain::Amount;
///
/// let a = Amount::new(100);
/// let b = Amount::new(200);
/// assert_eq!(a.checked_add(b), Ok(Amount::new(300)));
/// assert_eq!(b.checked_sub(a), Ok(Amount::new(100)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[must_use]
pub struct Amount(u128);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Maximum representable amount.
    pub const MAX: Self = Self(u128::MAX);

    /// Creates a new `Amount` from a raw `u128` value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`PairError::Overflow`] on overflow.
    pub const fn checked_add(self, other: Self) -> Result<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Ok(Self(v)),
            None => Err(PairError::Overflow),
        }
    }

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`PairError::Overflow`] on underflow.
    pub const fn checked_sub(self, other: Self) -> Result<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Ok(Self(v)),
            None => Err(PairError::Overflow),
        }
    }

    /// Saturating subtraction, clamping at zero.
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Returns the smaller of the two amounts.
    pub const fn min(self, other: Self) -> Self {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// Computes `self * numerator / denominator` with a 256-bit
    /// intermediate product and an explicit rounding direction.
    ///
    /// # Errors
    ///
    /// - [`PairError::DivisionByZero`] if `denominator` is zero.
    /// - [`PairError::Overflow`] if the quotient exceeds `u128::MAX`.
    pub fn checked_mul_div(self, numerator: u128, denominator: u128, rounding: Rounding) -> Result<Self> {
        if denominator == 0 {
            return Err(PairError::DivisionByZero);
        }
        let product = U256::from(self.0) * U256::from(numerator);
        let denom = U256::from(denominator);
        let quotient = product / denom;
        let remainder = product % denom;
        let floor = u128::try_from(quotient).map_err(|_| PairError::Overflow)?;
        let rem = u128::try_from(remainder).map_err(|_| PairError::Overflow)?;
        // apply() can bump past u128::MAX only when floor == u128::MAX.
        if rounding.is_up() && rem != 0 && floor == u128::MAX {
            return Err(PairError::Overflow);
        }
        Ok(Self(rounding.apply(floor, rem)))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
