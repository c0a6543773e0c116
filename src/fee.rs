//! Fee model: static base fee, volatility-driven variable fee, and the
//! fee-amount helpers used by the swap and mint paths.
//!
//! Rates are expressed on a 1e18 scale ([`PRECISION`]): a rate of
//! `3_000_000_000_000_000` is 0.3%. The total swap fee is the sum of a
//! base component, proportional to the configured base factor and the
//! bin step, and a variable component that grows quadratically with the
//! volatility accumulator. The sum is capped at [`MAX_FEE_RATE`] (10%).
//!
//! The volatility accumulator is the dynamic half of the model. It is
//! tracked by [`VariableFeeState`] and follows two rules:
//!
//! - Between swaps, once the market has been quiet for longer than the
//!   filter period, the accumulated volatility decays (by the reduction
//!   factor) or resets entirely (past the decay period).
//! - During a swap, every bin crossed pushes the accumulator up by one
//!   bin-step worth of volatility, up to a configured ceiling.

use primitive_types::U256;

use crate::config::StaticFeeParameters;
use crate::domain::{Amount, BinId, Rounding, Timestamp, BASIS_POINT_MAX};
use crate::error::{PairError, Result};
use crate::math::mul_div::u256_to_u128;

/// Scale for fee rates: 1e18 represents 100%.
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Ceiling on the total swap fee rate: 10%.
pub const MAX_FEE_RATE: u128 = PRECISION / 10;

// -- Rates -------------------------------------------------------------------

/// Base fee rate for the given static parameters and bin step, 1e18 scale.
///
/// `base_factor * bin_step * 1e10`, so a base factor of 5000 on a 100 bps
/// grid yields 0.5%.
#[must_use]
pub fn base_fee_rate(params: &StaticFeeParameters, bin_step: u16) -> u128 {
    u128::from(params.base_factor()) * u128::from(bin_step) * 10_000_000_000
}

/// Variable fee rate for a given volatility accumulator value, 1e18 scale.
///
/// Quadratic in `volatility_accumulator * bin_step`, scaled by the
/// variable fee control and rounded up to the next unit of 1e18.
#[must_use]
pub fn variable_fee_rate(
    params: &StaticFeeParameters,
    bin_step: u16,
    volatility_accumulator: u32,
) -> u128 {
    let control = u128::from(params.variable_fee_control());
    if control == 0 {
        return 0;
    }
    let prod = u128::from(volatility_accumulator) * u128::from(bin_step);
    (prod * prod * control + 99) / 100
}

/// Total swap fee rate, capped at [`MAX_FEE_RATE`].
#[must_use]
pub fn total_fee_rate(
    params: &StaticFeeParameters,
    bin_step: u16,
    volatility_accumulator: u32,
) -> u128 {
    let total = base_fee_rate(params, bin_step)
        + variable_fee_rate(params, bin_step, volatility_accumulator);
    total.min(MAX_FEE_RATE)
}

// -- Fee amounts -------------------------------------------------------------

/// Fee charged on a gross input amount: `ceil(amount * rate / 1e18)`.
///
/// # Errors
///
/// Returns [`PairError::Overflow`](crate::error::PairError::Overflow) if
/// the result does not fit in an [`Amount`].
pub fn fee_from_gross(amount: Amount, rate: u128) -> Result<Amount> {
    amount.checked_mul_div(rate, PRECISION, Rounding::Up)
}

/// Fee to add on top of a net amount so that the fee is `rate` of the
/// gross total: `ceil(net * rate / (1e18 - rate))`.
///
/// # Errors
///
/// Returns [`PairError::Overflow`](crate::error::PairError::Overflow) if
/// the result does not fit in an [`Amount`].
pub fn fee_on_net(net: Amount, rate: u128) -> Result<Amount> {
    if rate >= PRECISION {
        return Err(PairError::InvalidInput("fee rate at or above 100%"));
    }
    net.checked_mul_div(rate, PRECISION - rate, Rounding::Up)
}

/// Composition fee charged when a mint shifts the active bin's asset
/// ratio: `amount * rate * (rate + 1e18) / 1e36`, rounded down.
///
/// # Errors
///
/// Returns [`PairError::Overflow`](crate::error::PairError::Overflow) if
/// the result does not fit in an [`Amount`].
pub fn composition_fee(amount: Amount, rate: u128) -> Result<Amount> {
    let numerator = U256::from(amount.get())
        * U256::from(rate)
        * (U256::from(rate) + U256::from(PRECISION));
    let denominator = U256::from(PRECISION) * U256::from(PRECISION);
    let fee = u256_to_u128(numerator / denominator)?;
    Ok(Amount::new(fee))
}

// -- Volatility tracking -----------------------------------------------------

/// Dynamic half of the fee model.
///
/// Tracks how far the active bin has moved recently. The reference pair
/// (`id_reference`, `volatility_reference`) is refreshed at the start of
/// each swap based on elapsed time; the accumulator is then bumped once
/// per bin visited during the swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableFeeState {
    volatility_accumulator: u32,
    volatility_reference: u32,
    id_reference: BinId,
    last_update: Timestamp,
}

impl VariableFeeState {
    /// Fresh state anchored at the given active bin, with no recorded
    /// volatility.
    #[must_use]
    pub const fn new(active_id: BinId) -> Self {
        Self {
            volatility_accumulator: 0,
            volatility_reference: 0,
            id_reference: active_id,
            last_update: 0,
        }
    }

    /// Current volatility accumulator.
    #[must_use]
    pub const fn volatility_accumulator(&self) -> u32 {
        self.volatility_accumulator
    }

    /// Volatility reference carried over from the previous swap window.
    #[must_use]
    pub const fn volatility_reference(&self) -> u32 {
        self.volatility_reference
    }

    /// Bin id the accumulator measures distance from.
    #[must_use]
    pub const fn id_reference(&self) -> BinId {
        self.id_reference
    }

    /// Timestamp of the last reference update.
    #[must_use]
    pub const fn last_update(&self) -> Timestamp {
        self.last_update
    }

    /// Refreshes the reference pair at the start of a swap.
    ///
    /// If the elapsed time since the last swap is at least the filter
    /// period, the id reference snaps to the current active bin and the
    /// volatility reference decays (reduction factor applied) or, past
    /// the decay period, resets to zero. The update timestamp always
    /// advances.
    pub fn update_references(
        &mut self,
        now: Timestamp,
        active_id: BinId,
        params: &StaticFeeParameters,
    ) {
        let elapsed = now.saturating_sub(self.last_update);
        if elapsed >= u64::from(params.filter_period()) {
            self.id_reference = active_id;
            self.volatility_reference = if elapsed < u64::from(params.decay_period()) {
                let reduced = u64::from(self.volatility_accumulator)
                    * u64::from(params.reduction_factor())
                    / u64::from(BASIS_POINT_MAX);
                // reduction_factor <= BASIS_POINT_MAX keeps this in range
                reduced as u32
            } else {
                0
            };
        }
        self.last_update = now;
    }

    /// Bumps the accumulator for the bin currently being visited.
    ///
    /// Called once per bin during a swap walk. The accumulator is the
    /// reference volatility plus one bin-step unit (10_000) per bin of
    /// distance from the id reference, clamped to the configured
    /// maximum.
    pub fn update_volatility_accumulator(
        &mut self,
        active_id: BinId,
        params: &StaticFeeParameters,
    ) {
        let distance = u64::from(active_id.distance(self.id_reference));
        let accumulated =
            u64::from(self.volatility_reference) + distance * u64::from(BASIS_POINT_MAX);
        self.volatility_accumulator =
            accumulated.min(u64::from(params.max_volatility_accumulator())) as u32;
    }
}
