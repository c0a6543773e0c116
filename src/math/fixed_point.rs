//! Unsigned 128.128 fixed-point exponentiation and binary logarithm.
//!
//! A 128.128 number stores its integer part in the high 128 bits and its
//! fraction in the low 128 bits of a `U256`; [`SCALE`] is 1.0. Both
//! functions are exact integer algorithms — exponentiation by squaring over
//! the binary expansion of the exponent, and bit-by-bit logarithm
//! extraction by repeated squaring — so results are bit-reproducible.

use primitive_types::U256;

use super::mul_div::u512_to_u256;
use crate::error::{PairError, Result};

/// Number of fractional bits in the 128.128 representation.
pub const SCALE_OFFSET: u32 = 128;

/// The 128.128 representation of 1.0 (`1 << 128`).
pub const SCALE: U256 = U256([0, 0, 1, 0]);

/// Raises a 128.128 fixed-point base to a signed integer power.
///
/// Bases at or above 1.0 are inverted up front (`x -> MAX / x`), which
/// keeps every intermediate square strictly below `2^128` so the shifted
/// products never overflow; the inversion is undone at the end. Negative
/// exponents invert the final result the same way.
///
/// # Errors
///
/// - [`PairError::PowUnderflow`] if the result truncates to zero (the
///   magnitude is below `2^-128`) or the base is zero with a non-zero
///   exponent.
///
/// # Examples
///
/// ```
/// use liquidity_book::math::{pow, SCALE};
///
/// assert_eq!(pow(SCALE * 2, 0), Ok(SCALE)); // x^0 == 1
/// let almost_one = pow(SCALE, 42).expect("1^42 is representable");
/// let diff = if almost_one > SCALE { almost_one - SCALE } else { SCALE - almost_one };
/// assert!(diff < SCALE >> 100); // 1^42 ≈ 1, truncation only
/// ```
pub fn pow(x: U256, y: i32) -> Result<U256> {
    if y == 0 {
        return Ok(SCALE);
    }
    if x.is_zero() {
        return Err(PairError::PowUnderflow);
    }

    let mut invert = y < 0;
    let mut remaining = y.unsigned_abs();

    let mut squared = x;
    if x > U256::from(u128::MAX) {
        // Base >= 1.0: work with its reciprocal so squares stay < 2^128.
        squared = U256::MAX / squared;
        invert = !invert;
    }

    let mut result = SCALE;
    while remaining != 0 {
        if remaining & 1 != 0 {
            result = scale_mul(result, squared)?;
        }
        remaining >>= 1;
        if remaining != 0 {
            squared = scale_mul(squared, squared)?;
        }
    }

    if result.is_zero() {
        return Err(PairError::PowUnderflow);
    }
    if invert {
        Ok(U256::MAX / result)
    } else {
        Ok(result)
    }
}

/// Binary logarithm of a 128.128 fixed-point number.
///
/// Returns `(integer_part, fraction)` such that
/// `log2(x / 2^128) = integer_part + fraction / 2^128`, with
/// `integer_part` the floor (possibly negative) and `fraction` always in
/// `[0, 2^128)`. The fraction is extracted one bit per squaring, 128
/// iterations total.
///
/// # Errors
///
/// Returns [`PairError::InvalidInput`] if `x` is zero.
///
/// # Examples
///
/// ```
/// use primitive_types::U256;
/// use liquidity_book::math::{log2, SCALE};
///
/// assert_eq!(log2(SCALE), Ok((0, U256::zero())));     // log2(1) == 0
/// assert_eq!(log2(SCALE * 4), Ok((2, U256::zero()))); // log2(4) == 2
/// assert_eq!(log2(SCALE / 2), Ok((-1, U256::zero()))); // log2(0.5) == -1
/// ```
pub fn log2(x: U256) -> Result<(i32, U256)> {
    if x.is_zero() {
        return Err(PairError::InvalidInput("log2 of zero"));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let msb = x.bits() as i32 - 1;
    let integer_part = msb - 128;

    // Normalize into [1.0, 2.0) in 128.128 form.
    let mut ux = if msb >= 128 {
        x >> (msb - 128) as usize
    } else {
        x << (128 - msb) as usize
    };

    let two = SCALE * 2;
    let mut fraction = U256::zero();
    for bit in (0..SCALE_OFFSET).rev() {
        // ux in [1.0, 2.0) ⇒ ux² in [1.0, 4.0); fits after the shift.
        ux = square_scaled(ux);
        if ux >= two {
            fraction |= U256::one() << bit;
            ux >>= 1;
        }
    }

    Ok((integer_part, fraction))
}

/// `(a * b) >> 128` for operands below `2^128`; the product fits in 256
/// bits but is taken through 512 to keep the invariant local.
fn scale_mul(a: U256, b: U256) -> Result<U256> {
    u512_to_u256(a.full_mul(b) >> 128)
}

/// `(x * x) >> 128` for `x < 2^130`.
fn square_scaled(x: U256) -> U256 {
    let p = x.full_mul(x) >> 128;
    // x < 2^130 ⇒ p < 2^132 < 2^256; the high limbs are zero.
    U256([p.0[0], p.0[1], p.0[2], p.0[3]])
}
