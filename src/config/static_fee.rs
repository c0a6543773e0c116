//! Static (governance-set) fee parameters.

use crate::domain::BASIS_POINT_MAX;
use crate::error::{PairError, Result};

/// Ceiling on `max_volatility_accumulator` (2^20, in accumulator units).
const MAX_VOLATILITY_ACCUMULATOR_BOUND: u32 = 1 << 20;

/// The static half of the fee model, set at pair creation and replaceable
/// only by the factory.
///
/// Together with the per-swap [`VariableFeeState`](crate::fee::VariableFeeState)
/// these parameters determine the effective fee rate:
///
/// ```text
/// base     = base_factor × bin_step × 1e10          (1e18 scale)
/// variable = (accumulator × bin_step)² × control / 100
/// total    = min(base + variable, 10%)
/// ```
///
/// # Validation
///
/// - `filter_period < decay_period`
/// - `reduction_factor ≤ 10_000` (≤ 100%)
/// - `protocol_share ≤ 10_000` (≤ 100%)
/// - `max_volatility_accumulator ≤ 2^20`
///
/// All bounds are checked in [`StaticFeeParameters::new`] before the value
/// exists, so a live pair can never hold an out-of-bounds parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticFeeParameters {
    base_factor: u16,
    filter_period: u16,
    decay_period: u16,
    reduction_factor: u16,
    variable_fee_control: u32,
    protocol_share: u16,
    max_volatility_accumulator: u32,
}

impl StaticFeeParameters {
    /// Creates a validated parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`PairError::InvalidStaticFeeParameters`] naming the first
    /// violated bound; nothing is constructed on failure.
    pub const fn new(
        base_factor: u16,
        filter_period: u16,
        decay_period: u16,
        reduction_factor: u16,
        variable_fee_control: u32,
        protocol_share: u16,
        max_volatility_accumulator: u32,
    ) -> Result<Self> {
        let params = Self {
            base_factor,
            filter_period,
            decay_period,
            reduction_factor,
            variable_fee_control,
            protocol_share,
            max_volatility_accumulator,
        };
        match params.validate() {
            Ok(()) => Ok(params),
            Err(e) => Err(e),
        }
    }

    /// Re-checks every bound.
    ///
    /// # Errors
    ///
    /// Returns [`PairError::InvalidStaticFeeParameters`] on the first
    /// violated bound.
    pub const fn validate(&self) -> Result<()> {
        if self.filter_period >= self.decay_period {
            return Err(PairError::InvalidStaticFeeParameters(
                "filter period must be shorter than decay period",
            ));
        }
        if self.reduction_factor > BASIS_POINT_MAX {
            return Err(PairError::InvalidStaticFeeParameters(
                "reduction factor above 100%",
            ));
        }
        if self.protocol_share > BASIS_POINT_MAX {
            return Err(PairError::InvalidStaticFeeParameters(
                "protocol share above 100%",
            ));
        }
        if self.max_volatility_accumulator > MAX_VOLATILITY_ACCUMULATOR_BOUND {
            return Err(PairError::InvalidStaticFeeParameters(
                "max volatility accumulator above 2^20",
            ));
        }
        Ok(())
    }

    /// Multiplier of the bin step in the static fee component.
    #[must_use]
    pub const fn base_factor(&self) -> u16 {
        self.base_factor
    }

    /// Seconds of calm before the volatility reference is re-anchored.
    #[must_use]
    pub const fn filter_period(&self) -> u16 {
        self.filter_period
    }

    /// Seconds of calm after which accumulated volatility is forgotten.
    #[must_use]
    pub const fn decay_period(&self) -> u16 {
        self.decay_period
    }

    /// Fraction (bps) of the accumulator surviving a reference reset.
    #[must_use]
    pub const fn reduction_factor(&self) -> u16 {
        self.reduction_factor
    }

    /// Scale of the quadratic volatility surcharge; zero disables it.
    #[must_use]
    pub const fn variable_fee_control(&self) -> u32 {
        self.variable_fee_control
    }

    /// Fraction (bps) of collected fees routed to the protocol.
    #[must_use]
    pub const fn protocol_share(&self) -> u16 {
        self.protocol_share
    }

    /// Hard clamp on the volatility accumulator.
    #[must_use]
    pub const fn max_volatility_accumulator(&self) -> u32 {
        self.max_volatility_accumulator
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn valid() -> StaticFeeParameters {
        let Ok(p) = StaticFeeParameters::new(5_000, 30, 600, 5_000, 40_000, 1_000, 350_000)
        else {
            panic!("valid parameters");
        };
        p
    }

    #[test]
    fn accessors() {
        let p = valid();
        assert_eq!(p.base_factor(), 5_000);
        assert_eq!(p.filter_period(), 30);
        assert_eq!(p.decay_period(), 600);
        assert_eq!(p.reduction_factor(), 5_000);
        assert_eq!(p.variable_fee_control(), 40_000);
        assert_eq!(p.protocol_share(), 1_000);
        assert_eq!(p.max_volatility_accumulator(), 350_000);
    }

    #[test]
    fn filter_not_below_decay_rejected() {
        let r = StaticFeeParameters::new(5_000, 600, 600, 5_000, 40_000, 1_000, 350_000);
        assert!(matches!(r, Err(PairError::InvalidStaticFeeParameters(_))));
    }

    #[test]
    fn reduction_factor_above_full_rejected() {
        let r = StaticFeeParameters::new(5_000, 30, 600, 10_001, 40_000, 1_000, 350_000);
        assert!(matches!(r, Err(PairError::InvalidStaticFeeParameters(_))));
    }

    #[test]
    fn protocol_share_above_full_rejected() {
        let r = StaticFeeParameters::new(5_000, 30, 600, 5_000, 40_000, 10_001, 350_000);
        assert!(matches!(r, Err(PairError::InvalidStaticFeeParameters(_))));
    }

    #[test]
    fn accumulator_cap_bound() {
        let at_bound = StaticFeeParameters::new(5_000, 30, 600, 5_000, 40_000, 1_000, 1 << 20);
        let above = StaticFeeParameters::new(5_000, 30, 600, 5_000, 40_000, 1_000, (1 << 20) + 1);
        assert!(at_bound.is_ok());
        assert!(matches!(
            above,
            Err(PairError::InvalidStaticFeeParameters(_))
        ));
    }

    #[test]
    fn boundary_shares_accepted() {
        let r = StaticFeeParameters::new(0, 0, 1, 10_000, 0, 10_000, 0);
        assert!(r.is_ok());
    }
}
