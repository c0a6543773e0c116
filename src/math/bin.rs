//! Bin-local constant-sum swap math.
//!
//! Within one bin the two assets trade at a single fixed price, so the bin
//! behaves as a constant-sum micro-market: output is a straight
//! multiplication (or division) by the bin price, bounded by the bin's
//! opposite-asset inventory. Rounding always favors the protocol — input
//! requirements round up, payouts round down.

use primitive_types::U256;

use super::mul_div::{mul_shift, shift_div};
use crate::domain::{Amount, Rounding, SwapDirection};
use crate::error::{PairError, Result};

/// Output obtainable from a bin for a net (post-fee) input at the bin's
/// price, before capping by the bin's inventory. Rounds down.
///
/// Prices are Y per X: an X input multiplies by the price, a Y input
/// divides by it.
///
/// # Errors
///
/// Propagates [`PairError::Overflow`] / [`PairError::DivisionByZero`] from
/// the fixed-point helpers.
pub fn amount_out(net_in: Amount, price: U256, direction: SwapDirection) -> Result<Amount> {
    match direction {
        SwapDirection::XForY => mul_shift(net_in, price, Rounding::Down),
        SwapDirection::YForX => shift_div(net_in, price, Rounding::Down),
    }
}

/// Net input required to extract a given output from a bin at its price.
/// Rounds up, so the trader can never underpay by a truncated unit.
///
/// # Errors
///
/// Propagates [`PairError::Overflow`] / [`PairError::DivisionByZero`] from
/// the fixed-point helpers.
pub fn amount_in_for_out(out: Amount, price: U256, direction: SwapDirection) -> Result<Amount> {
    match direction {
        SwapDirection::XForY => shift_div(out, price, Rounding::Up),
        SwapDirection::YForX => mul_shift(out, price, Rounding::Up),
    }
}

/// Liquidity of a reserve pair at a bin price: `L = price·x + y·2^128`.
///
/// Shares minted against a bin are denominated in this liquidity measure,
/// so deposits of either asset are comparable through the bin's price.
///
/// # Errors
///
/// Returns [`PairError::LiquidityOverflow`] if `L` exceeds 256 bits.
pub fn liquidity(x: Amount, y: Amount, price: U256) -> Result<U256> {
    let from_x = price.full_mul(U256::from(x.get()));
    let from_y = U256::from(y.get()).full_mul(U256([0, 0, 1, 0]));
    let total = from_x
        .checked_add(from_y)
        .ok_or(PairError::LiquidityOverflow)?;
    let limbs = total.0;
    if limbs[4] | limbs[5] | limbs[6] | limbs[7] != 0 {
        return Err(PairError::LiquidityOverflow);
    }
    Ok(U256([limbs[0], limbs[1], limbs[2], limbs[3]]))
}
