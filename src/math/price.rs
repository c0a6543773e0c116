//! Bin id ↔ price conversion on the geometric grid.
//!
//! The grid assigns bin `id` the price `(1 + step/10_000)^(id - ONE)` as a
//! 128.128 fixed-point number, where `ONE` is the centre of the 24-bit id
//! space. The conversion is only approximately invertible: fixed-point
//! truncation in [`pow`] and [`log2`] means a `price_at_id` →
//! `id_at_price` round trip may land one id off. Callers must treat ±1 as
//! agreement.

use primitive_types::U256;

use super::fixed_point::{log2, pow, SCALE};
use crate::domain::{BinId, BinStep};
use crate::error::{PairError, Result};

/// Returns the grid base `1 + step/10_000` in 128.128 fixed point.
#[must_use]
pub fn grid_base(bin_step: BinStep) -> U256 {
    SCALE + (U256::from(bin_step.get()) << 128) / U256::from(10_000u64)
}

/// Computes the price of a bin: `base^(id - ONE)`.
///
/// # Errors
///
/// Returns [`PairError::PowUnderflow`] if the price truncates to zero
/// (deeply negative exponents on large steps).
///
/// # Examples
///
/// ```
/// use liquidity_book::domain::{BinId, BinStep};
/// use liquidity_book::math::{price_at_id, SCALE};
///
/// let step = BinStep::new(100).expect("valid step");
/// assert_eq!(price_at_id(BinId::ONE, step), Ok(SCALE)); // centre bin: price 1.0
/// ```
pub fn price_at_id(id: BinId, bin_step: BinStep) -> Result<U256> {
    pow(grid_base(bin_step), id.exponent())
}

/// Computes the bin id whose price is nearest-below the given price:
/// `ONE + log2(price) / log2(base)`, with the quotient truncated toward
/// zero.
///
/// # Errors
///
/// - [`PairError::InvalidInput`] if `price` is zero.
/// - [`PairError::IdOutOfBounds`] if the id falls outside the 24-bit
///   space.
pub fn id_at_price(price: U256, bin_step: BinStep) -> Result<BinId> {
    let (int_part, fraction) = log2(price)?;
    let (_, base_fraction) = log2(grid_base(bin_step))?;
    // base > 1 and < 2, so log2(base) is a pure nonzero fraction.
    debug_assert!(!base_fraction.is_zero());

    let (negative, magnitude) = if int_part >= 0 {
        let mag = (U256::from(int_part.unsigned_abs()) << 128) | fraction;
        (false, mag)
    } else {
        // value = int + frac/2^128 < 0; magnitude = |int| - frac/2^128.
        let mag = (U256::from(int_part.unsigned_abs()) << 128) - fraction;
        (true, mag)
    };

    let delta = magnitude / base_fraction;
    if delta > U256::from(BinId::MAX.get()) {
        return Err(PairError::IdOutOfBounds);
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let delta = delta.low_u64() as i32;
    BinId::ONE.checked_offset(if negative { -delta } else { delta })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn step(bps: u16) -> BinStep {
        let Ok(s) = BinStep::new(bps) else {
            panic!("valid step");
        };
        s
    }

    fn id(raw: u32) -> BinId {
        let Ok(i) = BinId::new(raw) else {
            panic!("valid id");
        };
        i
    }

    fn abs_diff(a: U256, b: U256) -> U256 {
        if a > b {
            a - b
        } else {
            b - a
        }
    }

    // -- grid_base ----------------------------------------------------------

    #[test]
    fn base_for_one_percent_step() {
        // 1 + 100/10000 = 1.01
        let expected = SCALE + SCALE / 100;
        assert_eq!(grid_base(step(100)), expected);
    }

    #[test]
    fn base_grows_with_step() {
        assert!(grid_base(step(1)) < grid_base(step(10)));
        assert!(grid_base(step(10)) < grid_base(step(200)));
    }

    // -- price_at_id --------------------------------------------------------

    #[test]
    fn centre_bin_prices_one() {
        assert_eq!(price_at_id(BinId::ONE, step(1)), Ok(SCALE));
        assert_eq!(price_at_id(BinId::ONE, step(200)), Ok(SCALE));
    }

    #[test]
    fn one_step_above_centre() {
        let Ok(p) = price_at_id(id(BinId::ONE.get() + 1), step(100)) else {
            panic!("expected Ok");
        };
        // one bin above centre: price = 1.01
        assert!(
            abs_diff(p, grid_base(step(100))) < SCALE >> 90,
            "price one bin above centre should be the base"
        );
    }

    #[test]
    fn price_monotonic_in_id() {
        let s = step(25);
        let ids = [
            BinId::ONE.get() - 5_000,
            BinId::ONE.get() - 1,
            BinId::ONE.get(),
            BinId::ONE.get() + 1,
            BinId::ONE.get() + 5_000,
        ];
        let mut last = U256::zero();
        for raw in ids {
            let Ok(p) = price_at_id(id(raw), s) else {
                panic!("expected Ok for id {raw}");
            };
            assert!(p > last, "price must increase with id");
            last = p;
        }
    }

    #[test]
    fn symmetric_ids_invert_price() {
        let s = step(50);
        let Ok(above) = price_at_id(id(BinId::ONE.get() + 300), s) else {
            panic!("expected Ok");
        };
        let Ok(below) = price_at_id(id(BinId::ONE.get() - 300), s) else {
            panic!("expected Ok");
        };
        let Ok(product) = super::super::mul_div::u512_to_u256(above.full_mul(below) >> 128)
        else {
            panic!("product fits");
        };
        assert!(
            abs_diff(product, SCALE) < SCALE >> 64,
            "p(+e) * p(-e) should be 1"
        );
    }

    #[test]
    fn known_value_1pct_step() {
        // (1.01)^10 = 1.104622125...
        let Ok(p) = price_at_id(id(BinId::ONE.get() + 10), step(100)) else {
            panic!("expected Ok");
        };
        let expected = (U256::from(1_104_622_125_411_204_506u128) << 128)
            / U256::from(1_000_000_000_000_000_000u128);
        assert!(
            abs_diff(p, expected) < SCALE >> 40,
            "1.01^10 far from reference value"
        );
    }

    // -- id_at_price --------------------------------------------------------

    #[test]
    fn zero_price_rejected() {
        assert!(matches!(
            id_at_price(U256::zero(), step(1)),
            Err(PairError::InvalidInput(_))
        ));
    }

    #[test]
    fn price_one_is_centre() {
        let Ok(i) = id_at_price(SCALE, step(100)) else {
            panic!("expected Ok");
        };
        assert_eq!(i, BinId::ONE);
    }

    #[test]
    fn round_trip_within_one_id() {
        for bps in [1u16, 10, 100, 200] {
            let s = step(bps);
            for offset in [-50_000i32, -777, -1, 0, 1, 777, 50_000] {
                let Ok(original) = BinId::ONE.checked_offset(offset) else {
                    panic!("valid offset");
                };
                let Ok(p) = price_at_id(original, s) else {
                    panic!("expected Ok for offset {offset} step {bps}");
                };
                let Ok(back) = id_at_price(p, s) else {
                    panic!("expected Ok for offset {offset} step {bps}");
                };
                assert!(
                    back.distance(original) <= 1,
                    "round trip drifted {} ids at offset {offset}, step {bps}",
                    back.distance(original)
                );
            }
        }
    }

    #[test]
    fn extreme_ids_underflow_on_fine_grids() {
        // On a 1bp grid the edge-of-grid prices (~2^±1210) leave the
        // 128.128 representable range, surfacing as a pow underflow.
        assert_eq!(
            price_at_id(BinId::MAX, step(1)),
            Err(PairError::PowUnderflow)
        );
        assert_eq!(
            price_at_id(BinId::MIN, step(1)),
            Err(PairError::PowUnderflow)
        );
    }
}
