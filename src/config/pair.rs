//! Pair-creation configuration.

use super::StaticFeeParameters;
use crate::domain::{AccountId, BinId, BinStep};
use crate::error::{PairError, Result};
use crate::fee::MAX_FEE_RATE;

/// Immutable blueprint for a pair engine.
///
/// Carries everything the engine needs at birth: the grid geometry
/// (`bin_step`, starting `active_id`), the fee model's static half, the
/// oracle's initial capacity, the factory account allowed to administer
/// the pair, and the flash-loan fee rate.
///
/// An `oracle_size` of zero starts the pair with the oracle disabled;
/// samples are recorded once capacity is granted via
/// [`PairEngine::increase_oracle_length`](crate::pair::PairEngine::increase_oracle_length).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairConfig {
    bin_step: BinStep,
    active_id: BinId,
    static_fee: StaticFeeParameters,
    oracle_size: u16,
    factory: AccountId,
    flash_loan_fee_rate: u128,
}

impl PairConfig {
    /// Creates a validated pair configuration.
    ///
    /// # Errors
    ///
    /// - [`PairError::InvalidInput`] if `factory` is the null account
    ///   (the pair would be permanently un-administrable) or the
    ///   flash-loan fee rate exceeds the global fee ceiling.
    pub fn new(
        bin_step: BinStep,
        active_id: BinId,
        static_fee: StaticFeeParameters,
        oracle_size: u16,
        factory: AccountId,
        flash_loan_fee_rate: u128,
    ) -> Result<Self> {
        let config = Self {
            bin_step,
            active_id,
            static_fee,
            oracle_size,
            factory,
            flash_loan_fee_rate,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PairError::InvalidInput`] on the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.factory.is_null() {
            return Err(PairError::InvalidInput("factory is the null account"));
        }
        if self.flash_loan_fee_rate > MAX_FEE_RATE {
            return Err(PairError::InvalidInput(
                "flash loan fee rate above the fee ceiling",
            ));
        }
        Ok(())
    }

    /// Price step between adjacent bins.
    #[must_use]
    pub const fn bin_step(&self) -> BinStep {
        self.bin_step
    }

    /// Bin considered at the market price at creation.
    #[must_use]
    pub const fn active_id(&self) -> BinId {
        self.active_id
    }

    /// Static fee parameters.
    #[must_use]
    pub const fn static_fee(&self) -> StaticFeeParameters {
        self.static_fee
    }

    /// Initial oracle capacity in samples.
    #[must_use]
    pub const fn oracle_size(&self) -> u16 {
        self.oracle_size
    }

    /// Account authorized for parameter updates and fee collection.
    #[must_use]
    pub const fn factory(&self) -> AccountId {
        self.factory
    }

    /// Flash-loan fee rate, 1e18 scale.
    #[must_use]
    pub const fn flash_loan_fee_rate(&self) -> u128 {
        self.flash_loan_fee_rate
    }
}
