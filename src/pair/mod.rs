//! The pair engine: one trading pair over the bin grid.
//!
//! [`PairEngine`] owns everything a pair needs: the bin ledger, the
//! volatility-tracked fee state, the oracle ring, the vault balances of
//! both assets, and the protocol fee pot. All mutation goes through
//! `&mut self`, and every externally-reachable mutator holds an explicit
//! reentrancy lock for its duration, so a flash-loan callback that tries
//! to re-enter the pair observably fails instead of corrupting state.
//!
//! Swaps are pull-based: the trader first moves tokens into the vault
//! with [`PairEngine::transfer_in`], and [`PairEngine::swap`] treats the
//! vault surplus over booked reserves and protocol fees as the input
//! amount. Quotes ([`PairEngine::get_swap_out`],
//! [`PairEngine::get_swap_in`]) run the same walk read-only and report
//! liquidity exhaustion instead of failing.
//!
//! Time never comes from an ambient clock. Every operation that cares
//! about time takes an explicit `now` timestamp, which keeps the engine
//! deterministic and trivially testable.

use primitive_types::U256;

use crate::config::{PairConfig, StaticFeeParameters};
use crate::domain::{
    AccountId, Amount, Asset, BinId, BinStep, Rounding, SwapDirection, SwapInQuote, SwapOutQuote,
    SwapResult, Timestamp, BASIS_POINT_MAX,
};
use crate::error::{PairError, Result};
use crate::fee::{
    composition_fee, fee_from_gross, fee_on_net, total_fee_rate, VariableFeeState,
};
use crate::ledger::{Bin, BinLedger};
use crate::math::mul_div::{mul_div, u256_to_u128};
use crate::math::{amount_in_for_out, amount_out, liquidity, price_at_id};
use crate::oracle::{OracleParams, OracleRing, OracleSample};

#[cfg(test)]
mod proptest_properties;

/// One step of a computed swap walk, ready to be applied to a bin.
#[derive(Debug, Clone, Copy)]
struct SwapStep {
    id: BinId,
    /// Input credited to the bin (gross minus the protocol slice).
    bin_in: Amount,
    /// Output taken from the bin.
    out: Amount,
    protocol_fee: Amount,
}

/// Outcome of a swap walk over scratch state.
#[derive(Debug, Clone)]
struct WalkOutcome {
    steps: Vec<SwapStep>,
    amount_in_used: Amount,
    amount_in_left: Amount,
    amount_out: Amount,
    total_fee: Amount,
    protocol_fee: Amount,
    bins_crossed: u32,
    end_id: BinId,
    fee_state: VariableFeeState,
}

/// One planned bin deposit, computed read-only before any state change.
#[derive(Debug, Clone, Copy)]
struct MintStep {
    id: BinId,
    /// Amounts credited to the bin (deposit minus the protocol slice of
    /// any composition fee).
    bin_x: Amount,
    bin_y: Amount,
    shares: U256,
    protocol_x: Amount,
    protocol_y: Amount,
    /// Whether this deposit paid a composition fee.
    composition: bool,
}

/// A single trading pair.
#[derive(Debug, Clone)]
pub struct PairEngine {
    bin_step: BinStep,
    static_fee: StaticFeeParameters,
    factory: AccountId,
    flash_loan_fee_rate: u128,
    active_id: BinId,
    ledger: BinLedger,
    fee_state: VariableFeeState,
    oracle: OracleRing,
    vault_x: Amount,
    vault_y: Amount,
    protocol_fee_x: Amount,
    protocol_fee_y: Amount,
    locked: bool,
}

impl PairEngine {
    /// Creates a pair from a validated configuration.
    #[must_use]
    pub fn new(config: PairConfig) -> Self {
        Self {
            bin_step: config.bin_step(),
            static_fee: config.static_fee(),
            factory: config.factory(),
            flash_loan_fee_rate: config.flash_loan_fee_rate(),
            active_id: config.active_id(),
            ledger: BinLedger::new(),
            fee_state: VariableFeeState::new(config.active_id()),
            oracle: OracleRing::new(config.oracle_size()),
            vault_x: Amount::ZERO,
            vault_y: Amount::ZERO,
            protocol_fee_x: Amount::ZERO,
            protocol_fee_y: Amount::ZERO,
            locked: false,
        }
    }

    // -- Vault -------------------------------------------------------------

    /// Moves `amount` of `asset` into the pair's vault.
    ///
    /// This models the token transfer that precedes a pull-based swap or
    /// mint, or repays a flash loan. It is deliberately callable while
    /// the pair is locked so a flash-loan callback can repay.
    ///
    /// # Errors
    ///
    /// [`PairError::Overflow`] if the vault balance would overflow.
    pub fn transfer_in(&mut self, asset: Asset, amount: Amount) -> Result<()> {
        match asset {
            Asset::X => self.vault_x = self.vault_x.checked_add(amount)?,
            Asset::Y => self.vault_y = self.vault_y.checked_add(amount)?,
        }
        Ok(())
    }

    /// Vault balance of `asset`.
    #[must_use]
    pub const fn vault_balance(&self, asset: Asset) -> Amount {
        match asset {
            Asset::X => self.vault_x,
            Asset::Y => self.vault_y,
        }
    }

    /// Vault surplus of `asset` over booked reserves and protocol fees.
    /// This is what a swap would consume as its input.
    #[must_use]
    pub fn pending_input(&self, asset: Asset) -> Amount {
        let (total_x, total_y) = self.ledger.totals();
        let (booked, fees) = match asset {
            Asset::X => (total_x, self.protocol_fee_x),
            Asset::Y => (total_y, self.protocol_fee_y),
        };
        self.vault_balance(asset)
            .saturating_sub(booked)
            .saturating_sub(fees)
    }

    // -- Swaps -------------------------------------------------------------

    /// Executes a swap of the pending vault input in `direction`,
    /// crediting the output to `to`.
    ///
    /// State is committed only if the whole input is absorbed and the
    /// output clears `min_amount_out`; on any error the pair is exactly
    /// as it was.
    ///
    /// # Errors
    ///
    /// - [`PairError::ReentrantCall`] if called from within a locked
    ///   operation.
    /// - [`PairError::InsufficientAmountIn`] if no pending input exists.
    /// - [`PairError::OutOfLiquidity`] if the book cannot absorb the
    ///   full input.
    /// - [`PairError::InsufficientAmountOut`] if the output is below
    ///   `min_amount_out`.
    pub fn swap(
        &mut self,
        now: Timestamp,
        direction: SwapDirection,
        to: &AccountId,
        min_amount_out: Amount,
    ) -> Result<SwapResult> {
        self.lock()?;
        let result = self.swap_inner(now, direction, to, min_amount_out);
        self.unlock();
        result
    }

    fn swap_inner(
        &mut self,
        now: Timestamp,
        direction: SwapDirection,
        _to: &AccountId,
        min_amount_out: Amount,
    ) -> Result<SwapResult> {
        let amount_in = self.pending_input(direction.input_asset());
        if amount_in.is_zero() {
            return Err(PairError::InsufficientAmountIn);
        }
        // the volatility state advances with every time-touching commit,
        // so this holds even with a zero-capacity oracle
        if now < self.fee_state.last_update() {
            return Err(PairError::InvalidInput("swap timestamp went backwards"));
        }

        let outcome = self.walk(now, amount_in, direction)?;
        if !outcome.amount_in_left.is_zero() {
            return Err(PairError::OutOfLiquidity);
        }
        if outcome.amount_out.is_zero() || outcome.amount_out < min_amount_out {
            return Err(PairError::InsufficientAmountOut);
        }

        // apply to a scratch ledger first so a late failure reverts cleanly
        let mut ledger = self.ledger.clone();
        for step in &outcome.steps {
            ledger.apply_swap(step.id, direction, step.bin_in, step.out)?;
        }

        self.ledger = ledger;
        self.active_id = outcome.end_id;
        self.fee_state = outcome.fee_state;
        match direction.input_asset() {
            Asset::X => {
                self.protocol_fee_x = self.protocol_fee_x.checked_add(outcome.protocol_fee)?;
            }
            Asset::Y => {
                self.protocol_fee_y = self.protocol_fee_y.checked_add(outcome.protocol_fee)?;
            }
        }
        // output leaves the vault toward the recipient
        match direction.output_asset() {
            Asset::X => self.vault_x = self.vault_x.saturating_sub(outcome.amount_out),
            Asset::Y => self.vault_y = self.vault_y.saturating_sub(outcome.amount_out),
        }
        self.oracle.update(
            now,
            outcome.end_id,
            outcome.fee_state.volatility_accumulator(),
            outcome.bins_crossed,
        )?;

        Ok(SwapResult::new(
            outcome.amount_in_used,
            outcome.amount_out,
            outcome.total_fee,
            outcome.protocol_fee,
            outcome.bins_crossed,
            outcome.end_id,
        ))
    }

    /// Quotes the output obtainable for `amount_in`. Read-only; reports
    /// liquidity exhaustion through `amount_in_left` instead of failing.
    ///
    /// # Errors
    ///
    /// Propagates arithmetic errors from the price and fee math.
    pub fn get_swap_out(
        &self,
        now: Timestamp,
        amount_in: Amount,
        direction: SwapDirection,
    ) -> Result<SwapOutQuote> {
        let outcome = self.walk(now, amount_in, direction)?;
        Ok(SwapOutQuote {
            amount_in_left: outcome.amount_in_left,
            amount_out: outcome.amount_out,
            fee: outcome.total_fee,
        })
    }

    /// Quotes the gross input needed to receive `amount_out`. Read-only;
    /// a nonzero `amount_out_left` means the book cannot produce the
    /// full desired output.
    ///
    /// # Errors
    ///
    /// Propagates arithmetic errors from the price and fee math.
    pub fn get_swap_in(
        &self,
        now: Timestamp,
        amount_out: Amount,
        direction: SwapDirection,
    ) -> Result<SwapInQuote> {
        let params = self.static_fee;
        let step = self.bin_step.get();
        let mut fee_state = self.fee_state;
        fee_state.update_references(now, self.active_id, &params);

        let mut id = self.active_id;
        let mut out_left = amount_out;
        let mut amount_in = Amount::ZERO;
        let mut total_fee = Amount::ZERO;

        loop {
            fee_state.update_volatility_accumulator(id, &params);
            let reserve_out = self
                .ledger
                .bin(id)
                .map_or(Amount::ZERO, |bin| bin.reserve(direction.output_asset()));
            if !reserve_out.is_zero() {
                let price = price_at_id(id, self.bin_step)?;
                let rate = total_fee_rate(&params, step, fee_state.volatility_accumulator());
                let take = out_left.min(reserve_out);
                let net_in = amount_in_for_out(take, price, direction)?;
                let fee = fee_on_net(net_in, rate)?;
                amount_in = amount_in.checked_add(net_in)?.checked_add(fee)?;
                total_fee = total_fee.checked_add(fee)?;
                out_left = out_left.saturating_sub(take);
            }
            if out_left.is_zero() {
                break;
            }
            match self.ledger.next_non_empty_bin(direction, id) {
                Some(next) => id = next,
                None => break,
            }
        }

        Ok(SwapInQuote {
            amount_in,
            amount_out_left: out_left,
            fee: total_fee,
        })
    }

    /// Walks the bin grid for `amount_in`, mutating only scratch copies
    /// of the active id and fee state.
    fn walk(
        &self,
        now: Timestamp,
        amount_in: Amount,
        direction: SwapDirection,
    ) -> Result<WalkOutcome> {
        let params = self.static_fee;
        let step = self.bin_step.get();
        let mut fee_state = self.fee_state;
        fee_state.update_references(now, self.active_id, &params);

        let mut id = self.active_id;
        let mut in_left = amount_in;
        let mut total_out = Amount::ZERO;
        let mut total_fee = Amount::ZERO;
        let mut protocol_fee = Amount::ZERO;
        let mut bins_crossed = 0u32;
        let mut steps = Vec::new();

        loop {
            fee_state.update_volatility_accumulator(id, &params);
            let reserve_out = self
                .ledger
                .bin(id)
                .map_or(Amount::ZERO, |bin| bin.reserve(direction.output_asset()));
            if !reserve_out.is_zero() {
                let price = price_at_id(id, self.bin_step)?;
                let rate = total_fee_rate(&params, step, fee_state.volatility_accumulator());

                let max_in_net = amount_in_for_out(reserve_out, price, direction)?;
                let max_fee = fee_on_net(max_in_net, rate)?;
                let max_gross = max_in_net.checked_add(max_fee)?;

                let (in_gross, fee, out) = if in_left >= max_gross {
                    (max_gross, max_fee, reserve_out)
                } else {
                    let fee = fee_from_gross(in_left, rate)?;
                    let net = in_left.saturating_sub(fee);
                    let out = amount_out(net, price, direction)?.min(reserve_out);
                    (in_left, fee, out)
                };

                if !in_gross.is_zero() {
                    let step_protocol = protocol_slice(fee, params.protocol_share())?;
                    steps.push(SwapStep {
                        id,
                        bin_in: in_gross.saturating_sub(step_protocol),
                        out,
                        protocol_fee: step_protocol,
                    });
                    in_left = in_left.saturating_sub(in_gross);
                    total_out = total_out.checked_add(out)?;
                    total_fee = total_fee.checked_add(fee)?;
                    protocol_fee = protocol_fee.checked_add(step_protocol)?;
                }
            }
            if in_left.is_zero() {
                break;
            }
            match self.ledger.next_non_empty_bin(direction, id) {
                Some(next) => {
                    bins_crossed += id.distance(next);
                    id = next;
                }
                None => break,
            }
        }

        Ok(WalkOutcome {
            steps,
            amount_in_used: amount_in.saturating_sub(in_left),
            amount_in_left: in_left,
            amount_out: total_out,
            total_fee,
            protocol_fee,
            bins_crossed,
            end_id: id,
            fee_state,
        })
    }

    // -- Liquidity ----------------------------------------------------------

    /// Deposits liquidity into the given bins, minting shares to `to`.
    ///
    /// `ids` and `amounts` are parallel slices; each entry deposits
    /// `(amount_x, amount_y)` into its bin. Bins above the active id
    /// accept only X, bins below only Y, and the active bin accepts any
    /// mix (paying a composition fee when the deposit shifts the bin's
    /// ratio). The deposit must already sit in the vault as pending
    /// input. Returns the shares minted per bin.
    ///
    /// # Errors
    ///
    /// - [`PairError::MintToAddress0`] if `to` is the null account.
    /// - [`PairError::InvalidInput`] on slice mismatch, empty input, or
    ///   a deposit on the wrong side of the active bin.
    /// - [`PairError::InsufficientAmountIn`] if the vault surplus does
    ///   not cover the deposit.
    /// - [`PairError::ZeroShares`] if any entry would mint nothing.
    pub fn mint(
        &mut self,
        now: Timestamp,
        to: &AccountId,
        ids: &[BinId],
        amounts: &[(Amount, Amount)],
    ) -> Result<Vec<U256>> {
        self.lock()?;
        let result = self.mint_inner(now, to, ids, amounts);
        self.unlock();
        result
    }

    fn mint_inner(
        &mut self,
        now: Timestamp,
        to: &AccountId,
        ids: &[BinId],
        amounts: &[(Amount, Amount)],
    ) -> Result<Vec<U256>> {
        if to.is_null() {
            return Err(PairError::MintToAddress0);
        }
        if ids.is_empty() {
            return Err(PairError::InvalidInput("no bins to mint into"));
        }
        if ids.len() != amounts.len() {
            return Err(PairError::InvalidInput("ids and amounts differ in length"));
        }

        let mut need_x = Amount::ZERO;
        let mut need_y = Amount::ZERO;
        for (x, y) in amounts {
            need_x = need_x.checked_add(*x)?;
            need_y = need_y.checked_add(*y)?;
        }
        if self.pending_input(Asset::X) < need_x || self.pending_input(Asset::Y) < need_y {
            return Err(PairError::InsufficientAmountIn);
        }

        // scratch volatility state, committed only when a deposit pays a
        // composition fee; plain mints are not market activity
        let mut fee_state = self.fee_state;
        fee_state.update_references(now, self.active_id, &self.static_fee);

        // plan every deposit read-only, then commit
        let mut plan = Vec::with_capacity(ids.len());
        for (id, (amount_x, amount_y)) in ids.iter().zip(amounts) {
            let step = self.plan_mint(*id, *amount_x, *amount_y, &mut fee_state)?;
            plan.push(step);
        }

        // a composition fee is market activity the oracle records
        let composed = plan.iter().any(|step| step.composition);
        if composed && now < self.fee_state.last_update() {
            return Err(PairError::InvalidInput("mint timestamp went backwards"));
        }

        let mut ledger = self.ledger.clone();
        let mut protocol_x = self.protocol_fee_x;
        let mut protocol_y = self.protocol_fee_y;
        let mut shares_out = Vec::with_capacity(plan.len());
        for step in &plan {
            ledger.mint(step.id, to, step.bin_x, step.bin_y, step.shares)?;
            protocol_x = protocol_x.checked_add(step.protocol_x)?;
            protocol_y = protocol_y.checked_add(step.protocol_y)?;
            shares_out.push(step.shares);
        }
        self.ledger = ledger;
        self.protocol_fee_x = protocol_x;
        self.protocol_fee_y = protocol_y;
        if composed {
            self.fee_state = fee_state;
            self.oracle.update(
                now,
                self.active_id,
                self.fee_state.volatility_accumulator(),
                0,
            )?;
        }
        Ok(shares_out)
    }

    /// Computes shares and fees for one bin deposit without touching
    /// pair state.
    fn plan_mint(
        &self,
        id: BinId,
        amount_x: Amount,
        amount_y: Amount,
        fee_state: &mut VariableFeeState,
    ) -> Result<MintStep> {
        if id > self.active_id && !amount_y.is_zero() {
            return Err(PairError::InvalidInput("Y deposit above the active bin"));
        }
        if id < self.active_id && !amount_x.is_zero() {
            return Err(PairError::InvalidInput("X deposit below the active bin"));
        }

        let price = price_at_id(id, self.bin_step)?;
        let (reserve_x, reserve_y) = self.ledger.reserves(id);
        let supply = self.ledger.total_supply(id);

        let user_liquidity = liquidity(amount_x, amount_y, price)?;
        if supply.is_zero() {
            if user_liquidity.is_zero() {
                return Err(PairError::ZeroShares);
            }
            return Ok(MintStep {
                id,
                bin_x: amount_x,
                bin_y: amount_y,
                shares: user_liquidity,
                protocol_x: Amount::ZERO,
                protocol_y: Amount::ZERO,
                composition: false,
            });
        }

        let bin_liquidity = liquidity(reserve_x, reserve_y, price)?;
        let mut shares = mul_div(user_liquidity, supply, bin_liquidity, Rounding::Down)?;

        let mut bin_x = amount_x;
        let mut bin_y = amount_y;
        let mut protocol_x = Amount::ZERO;
        let mut protocol_y = Amount::ZERO;
        let mut composition = false;

        if id == self.active_id {
            fee_state.update_volatility_accumulator(id, &self.static_fee);
            let rate = total_fee_rate(
                &self.static_fee,
                self.bin_step.get(),
                fee_state.volatility_accumulator(),
            );
            let denom = supply
                .checked_add(shares)
                .ok_or(PairError::LiquidityOverflow)?;
            let received_x = pro_rata_amount(reserve_x.checked_add(amount_x)?, shares, denom)?;
            let received_y = pro_rata_amount(reserve_y.checked_add(amount_y)?, shares, denom)?;

            // the overpaid side was implicitly swapped inside the bin
            let (fee_x, fee_y) = if amount_x > received_x {
                (
                    composition_fee(amount_x.saturating_sub(received_x), rate)?,
                    Amount::ZERO,
                )
            } else if amount_y > received_y {
                (
                    Amount::ZERO,
                    composition_fee(amount_y.saturating_sub(received_y), rate)?,
                )
            } else {
                (Amount::ZERO, Amount::ZERO)
            };

            if !fee_x.is_zero() || !fee_y.is_zero() {
                composition = true;
                let net = liquidity(
                    amount_x.saturating_sub(fee_x),
                    amount_y.saturating_sub(fee_y),
                    price,
                )?;
                shares = mul_div(net, supply, bin_liquidity, Rounding::Down)?;
                protocol_x = protocol_slice(fee_x, self.static_fee.protocol_share())?;
                protocol_y = protocol_slice(fee_y, self.static_fee.protocol_share())?;
                bin_x = amount_x.saturating_sub(protocol_x);
                bin_y = amount_y.saturating_sub(protocol_y);
            }
        }

        if shares.is_zero() {
            return Err(PairError::ZeroShares);
        }
        Ok(MintStep {
            id,
            bin_x,
            bin_y,
            shares,
            protocol_x,
            protocol_y,
            composition,
        })
    }

    /// Burns shares from the given bins and pays the released reserves
    /// out of the vault. Returns the total `(x, y)` released.
    ///
    /// # Errors
    ///
    /// - [`PairError::InvalidInput`] on slice mismatch or empty input.
    /// - [`PairError::ZeroShares`] / [`PairError::BurnExceedsBalance`]
    ///   from any entry; nothing is committed on failure.
    pub fn burn(
        &mut self,
        now: Timestamp,
        from: &AccountId,
        ids: &[BinId],
        shares: &[U256],
    ) -> Result<(Amount, Amount)> {
        self.lock()?;
        let result = self.burn_inner(now, from, ids, shares);
        self.unlock();
        result
    }

    fn burn_inner(
        &mut self,
        _now: Timestamp,
        from: &AccountId,
        ids: &[BinId],
        shares: &[U256],
    ) -> Result<(Amount, Amount)> {
        if ids.is_empty() {
            return Err(PairError::InvalidInput("no bins to burn from"));
        }
        if ids.len() != shares.len() {
            return Err(PairError::InvalidInput("ids and shares differ in length"));
        }

        let mut ledger = self.ledger.clone();
        let mut total_x = Amount::ZERO;
        let mut total_y = Amount::ZERO;
        for (id, share) in ids.iter().zip(shares) {
            let (x, y) = ledger.burn(*id, from, *share)?;
            total_x = total_x.checked_add(x)?;
            total_y = total_y.checked_add(y)?;
        }

        self.ledger = ledger;
        self.vault_x = self.vault_x.saturating_sub(total_x);
        self.vault_y = self.vault_y.saturating_sub(total_y);
        Ok((total_x, total_y))
    }

    // -- Flash loans ---------------------------------------------------------

    /// Lends `amount` of `asset` to `callback` for the duration of the
    /// call. The callback receives the locked engine, the loaned amount,
    /// and the fee owed, and must repay principal plus fee via
    /// [`Self::transfer_in`] before returning. Returns the fee charged.
    ///
    /// The pair stays locked across the callback, so re-entering `swap`,
    /// `mint`, or `burn` from inside it fails with
    /// [`PairError::ReentrantCall`].
    ///
    /// # Errors
    ///
    /// - [`PairError::OutOfLiquidity`] if the vault cannot cover the
    ///   loan.
    /// - [`PairError::FlashLoanNotRepaid`] if the vault does not hold
    ///   principal plus fee after the callback. On any error the pair
    ///   is rolled back to its pre-loan state.
    pub fn flash_loan<F>(&mut self, asset: Asset, amount: Amount, callback: F) -> Result<Amount>
    where
        F: FnOnce(&mut Self, Amount, Amount) -> Result<()>,
    {
        self.lock()?;
        // the callback mutates the engine freely, so a failed loan
        // restores a full snapshot rather than unwinding piecemeal
        let snapshot = self.clone();
        let result = self.flash_loan_inner(asset, amount, callback);
        if result.is_err() {
            *self = snapshot;
        }
        self.unlock();
        result
    }

    fn flash_loan_inner<F>(&mut self, asset: Asset, amount: Amount, callback: F) -> Result<Amount>
    where
        F: FnOnce(&mut Self, Amount, Amount) -> Result<()>,
    {
        let balance_before = self.vault_balance(asset);
        if balance_before < amount {
            return Err(PairError::OutOfLiquidity);
        }
        let fee = fee_from_gross(amount, self.flash_loan_fee_rate)?;
        let owed = balance_before.checked_add(fee)?;

        // principal leaves the vault for the duration of the callback
        match asset {
            Asset::X => self.vault_x = self.vault_x.saturating_sub(amount),
            Asset::Y => self.vault_y = self.vault_y.saturating_sub(amount),
        }
        callback(self, amount, fee)?;
        if self.vault_balance(asset) < owed {
            return Err(PairError::FlashLoanNotRepaid);
        }

        let protocol_cut = protocol_slice(fee, self.static_fee.protocol_share())?;
        let lp_cut = fee.saturating_sub(protocol_cut);
        match asset {
            Asset::X => self.protocol_fee_x = self.protocol_fee_x.checked_add(protocol_cut)?,
            Asset::Y => self.protocol_fee_y = self.protocol_fee_y.checked_add(protocol_cut)?,
        }
        // LP slice accrues to the active bin; with no active-bin
        // liquidity it goes to the protocol instead
        if !lp_cut.is_zero() {
            if self.ledger.bin(self.active_id).is_some() {
                self.ledger.credit(self.active_id, asset, lp_cut)?;
            } else {
                match asset {
                    Asset::X => self.protocol_fee_x = self.protocol_fee_x.checked_add(lp_cut)?,
                    Asset::Y => self.protocol_fee_y = self.protocol_fee_y.checked_add(lp_cut)?,
                }
            }
        }
        Ok(fee)
    }

    // -- Administration ------------------------------------------------------

    /// Replaces the static fee parameters. Factory only.
    ///
    /// # Errors
    ///
    /// [`PairError::Unauthorized`] if `caller` is not the factory.
    pub fn set_static_fee_parameters(
        &mut self,
        caller: &AccountId,
        params: StaticFeeParameters,
    ) -> Result<()> {
        if *caller != self.factory {
            return Err(PairError::Unauthorized);
        }
        params.validate()?;
        self.static_fee = params;
        Ok(())
    }

    /// Drains the accrued protocol fees out of the vault toward `to`.
    /// Factory only. Returns the `(x, y)` collected.
    ///
    /// # Errors
    ///
    /// - [`PairError::Unauthorized`] if `caller` is not the factory.
    /// - [`PairError::InvalidInput`] if `to` is the null account.
    pub fn collect_protocol_fees(
        &mut self,
        caller: &AccountId,
        to: &AccountId,
    ) -> Result<(Amount, Amount)> {
        if *caller != self.factory {
            return Err(PairError::Unauthorized);
        }
        if to.is_null() {
            return Err(PairError::InvalidInput("fee recipient is the null account"));
        }
        let x = self.protocol_fee_x;
        let y = self.protocol_fee_y;
        self.protocol_fee_x = Amount::ZERO;
        self.protocol_fee_y = Amount::ZERO;
        self.vault_x = self.vault_x.saturating_sub(x);
        self.vault_y = self.vault_y.saturating_sub(y);
        Ok((x, y))
    }

    // -- Oracle --------------------------------------------------------------

    /// Grows the oracle ring to `new_size` samples.
    ///
    /// # Errors
    ///
    /// [`PairError::InvalidInput`] if `new_size` does not exceed the
    /// current capacity.
    pub fn increase_oracle_length(&mut self, new_size: u16) -> Result<()> {
        self.oracle.increase_length(new_size)
    }

    /// Shape of the oracle ring.
    #[must_use]
    pub fn oracle_params(&self) -> OracleParams {
        self.oracle.params()
    }

    /// Cumulative oracle values as of `now - lookback`.
    ///
    /// # Errors
    ///
    /// See [`OracleRing::sample_at`].
    pub fn oracle_sample_at(&self, now: Timestamp, lookback: u64) -> Result<OracleSample> {
        self.oracle.sample_at(now, lookback)
    }

    // -- Getters -------------------------------------------------------------

    /// Current active bin id.
    #[must_use]
    pub const fn active_id(&self) -> BinId {
        self.active_id
    }

    /// Price step between adjacent bins.
    #[must_use]
    pub const fn bin_step(&self) -> BinStep {
        self.bin_step
    }

    /// Current static fee parameters.
    #[must_use]
    pub const fn static_fee_parameters(&self) -> StaticFeeParameters {
        self.static_fee
    }

    /// Current volatility tracking state.
    #[must_use]
    pub const fn variable_fee_state(&self) -> VariableFeeState {
        self.fee_state
    }

    /// Total reserves booked across all bins, `(x, y)`.
    #[must_use]
    pub const fn reserves(&self) -> (Amount, Amount) {
        self.ledger.totals()
    }

    /// Accrued protocol fees, `(x, y)`.
    #[must_use]
    pub const fn protocol_fees(&self) -> (Amount, Amount) {
        (self.protocol_fee_x, self.protocol_fee_y)
    }

    /// The bin at `id`, if populated.
    #[must_use]
    pub fn bin(&self, id: BinId) -> Option<&Bin> {
        self.ledger.bin(id)
    }

    /// Reserves of the bin at `id`.
    #[must_use]
    pub fn bin_reserves(&self, id: BinId) -> (Amount, Amount) {
        self.ledger.reserves(id)
    }

    /// Share supply of the bin at `id`.
    #[must_use]
    pub fn total_supply(&self, id: BinId) -> U256 {
        self.ledger.total_supply(id)
    }

    /// Share balance of `account` in the bin at `id`.
    #[must_use]
    pub fn balance_of(&self, id: BinId, account: &AccountId) -> U256 {
        self.ledger.balance_of(id, account)
    }

    /// Next populated bin strictly beyond `from` in the direction a
    /// swap would walk.
    #[must_use]
    pub fn next_non_empty_bin(&self, direction: SwapDirection, from: BinId) -> Option<BinId> {
        self.ledger.next_non_empty_bin(direction, from)
    }

    /// Price of the bin at `id` on this pair's grid, 128.128 fixed
    /// point.
    ///
    /// # Errors
    ///
    /// See [`price_at_id`].
    pub fn price_of(&self, id: BinId) -> Result<U256> {
        price_at_id(id, self.bin_step)
    }

    // -- Lock ----------------------------------------------------------------

    fn lock(&mut self) -> Result<()> {
        if self.locked {
            return Err(PairError::ReentrantCall);
        }
        self.locked = true;
        Ok(())
    }

    fn unlock(&mut self) {
        self.locked = false;
    }
}

/// `floor(fee * protocol_share / 10_000)`.
fn protocol_slice(fee: Amount, protocol_share: u16) -> Result<Amount> {
    fee.checked_mul_div(
        u128::from(protocol_share),
        u128::from(BASIS_POINT_MAX),
        Rounding::Down,
    )
}

/// `floor(amount * shares / supply)` as an [`Amount`].
fn pro_rata_amount(amount: Amount, shares: U256, supply: U256) -> Result<Amount> {
    let raw = mul_div(U256::from(amount.get()), shares, supply, Rounding::Down)?;
    Ok(Amount::new(u256_to_u128(raw)?))
}
