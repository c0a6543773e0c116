//! Full-width multiply-divide helpers.
//!
//! Products of two 256-bit operands are computed in 512 bits so that
//! `a * b / d` and the 128-bit shift variants never lose high bits before
//! the division. Every helper takes an explicit [`Rounding`] direction.

use primitive_types::{U256, U512};

use crate::domain::{Amount, Rounding};
use crate::error::{PairError, Result};

/// Narrows a 512-bit value to 256 bits.
///
/// # Errors
///
/// Returns [`PairError::Overflow`] if any of the high 256 bits are set.
pub fn u512_to_u256(value: U512) -> Result<U256> {
    let limbs = value.0;
    if limbs[4] | limbs[5] | limbs[6] | limbs[7] != 0 {
        return Err(PairError::Overflow);
    }
    Ok(U256([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

/// Narrows a 256-bit value to a raw `u128`.
///
/// # Errors
///
/// Returns [`PairError::Overflow`] if any of the high 128 bits are set.
pub fn u256_to_u128(value: U256) -> Result<u128> {
    if value.0[2] | value.0[3] != 0 {
        return Err(PairError::Overflow);
    }
    Ok(value.low_u128())
}

/// Computes `a * b / denominator` with a 512-bit intermediate product.
///
/// # Errors
///
/// - [`PairError::DivisionByZero`] if `denominator` is zero.
/// - [`PairError::Overflow`] if the quotient exceeds 256 bits.
pub fn mul_div(a: U256, b: U256, denominator: U256, rounding: Rounding) -> Result<U256> {
    if denominator.is_zero() {
        return Err(PairError::DivisionByZero);
    }
    let product = a.full_mul(b);
    let denominator = U512::from(denominator);
    let quotient = product / denominator;
    let remainder = product % denominator;
    let floor = u512_to_u256(quotient)?;
    if rounding.is_up() && !remainder.is_zero() {
        return floor.checked_add(U256::one()).ok_or(PairError::Overflow);
    }
    Ok(floor)
}

/// Computes `amount * multiplier >> 128` where `multiplier` is a 128.128
/// fixed-point number, narrowing the result back to an [`Amount`].
///
/// # Errors
///
/// Returns [`PairError::Overflow`] if the shifted result exceeds `u128`.
pub fn mul_shift(amount: Amount, multiplier: U256, rounding: Rounding) -> Result<Amount> {
    let product = U256::from(amount.get()).full_mul(multiplier);
    let floor = u512_to_u256(product >> 128)?;
    let truncated = !(product & low_128_mask()).is_zero();
    let mut out = u256_to_u128(floor)?;
    if rounding.is_up() && truncated {
        out = out.checked_add(1).ok_or(PairError::Overflow)?;
    }
    Ok(Amount::new(out))
}

/// Computes `(amount << 128) / divisor` where `divisor` is a 128.128
/// fixed-point number, narrowing the result back to an [`Amount`].
///
/// # Errors
///
/// - [`PairError::DivisionByZero`] if `divisor` is zero.
/// - [`PairError::Overflow`] if the quotient exceeds `u128`.
pub fn shift_div(amount: Amount, divisor: U256, rounding: Rounding) -> Result<Amount> {
    if divisor.is_zero() {
        return Err(PairError::DivisionByZero);
    }
    let shifted = U512::from(amount.get()) << 128;
    let divisor = U512::from(divisor);
    let quotient = u512_to_u256(shifted / divisor)?;
    let remainder = shifted % divisor;
    let mut out = u256_to_u128(quotient)?;
    if rounding.is_up() && !remainder.is_zero() {
        out = out.checked_add(1).ok_or(PairError::Overflow)?;
    }
    Ok(Amount::new(out))
}

/// Mask of the low 128 bits of a 512-bit value.
fn low_128_mask() -> U512 {
    (U512::one() << 128) - U512::one()
}
