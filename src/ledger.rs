//! Bin storage: reserves, share supply, and per-account share balances.
//!
//! Bins live in a `BTreeMap` keyed by [`BinId`], so the map itself is
//! the non-empty-bin index: a bin is present exactly while it holds
//! shares or reserves, and the swap walk finds the next populated bin
//! with an ordered range query instead of scanning the 24-bit id space.

use std::collections::BTreeMap;
use std::ops::Bound::Excluded;

use primitive_types::U256;

use crate::domain::{AccountId, Amount, Asset, BinId, Rounding, SwapDirection};
use crate::error::{PairError, Result};
use crate::math::mul_div::{mul_div, u256_to_u128};

/// A single liquidity bin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bin {
    reserve_x: Amount,
    reserve_y: Amount,
    total_shares: U256,
    balances: BTreeMap<AccountId, U256>,
}

impl Bin {
    /// Reserve of asset X.
    #[must_use]
    pub const fn reserve_x(&self) -> Amount {
        self.reserve_x
    }

    /// Reserve of asset Y.
    #[must_use]
    pub const fn reserve_y(&self) -> Amount {
        self.reserve_y
    }

    /// Reserve of the given asset.
    #[must_use]
    pub const fn reserve(&self, asset: Asset) -> Amount {
        match asset {
            Asset::X => self.reserve_x,
            Asset::Y => self.reserve_y,
        }
    }

    /// Total share supply of this bin.
    #[must_use]
    pub const fn total_shares(&self) -> U256 {
        self.total_shares
    }

    /// Share balance of `account`.
    #[must_use]
    pub fn balance_of(&self, account: &AccountId) -> U256 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    fn is_empty(&self) -> bool {
        self.total_shares.is_zero() && self.reserve_x.is_zero() && self.reserve_y.is_zero()
    }
}

/// All bins of a pair, plus running reserve totals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BinLedger {
    bins: BTreeMap<BinId, Bin>,
    total_x: Amount,
    total_y: Amount,
}

impl BinLedger {
    /// Empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The bin at `id`, if populated.
    #[must_use]
    pub fn bin(&self, id: BinId) -> Option<&Bin> {
        self.bins.get(&id)
    }

    /// Reserves of the bin at `id`, zero if the bin is empty.
    #[must_use]
    pub fn reserves(&self, id: BinId) -> (Amount, Amount) {
        self.bins
            .get(&id)
            .map_or((Amount::ZERO, Amount::ZERO), |bin| {
                (bin.reserve_x, bin.reserve_y)
            })
    }

    /// Share supply of the bin at `id`, zero if empty.
    #[must_use]
    pub fn total_supply(&self, id: BinId) -> U256 {
        self.bins
            .get(&id)
            .map_or_else(U256::zero, |bin| bin.total_shares)
    }

    /// Share balance of `account` in the bin at `id`.
    #[must_use]
    pub fn balance_of(&self, id: BinId, account: &AccountId) -> U256 {
        self.bins
            .get(&id)
            .map_or_else(U256::zero, |bin| bin.balance_of(account))
    }

    /// Sum of all bin reserves, per asset.
    #[must_use]
    pub const fn totals(&self) -> (Amount, Amount) {
        (self.total_x, self.total_y)
    }

    /// Number of populated bins.
    #[must_use]
    pub fn populated_bins(&self) -> usize {
        self.bins.len()
    }

    /// Next populated bin strictly beyond `from` in the direction the
    /// swap walks: downward for X-to-Y, upward for Y-to-X.
    #[must_use]
    pub fn next_non_empty_bin(&self, direction: SwapDirection, from: BinId) -> Option<BinId> {
        if direction.is_descending() {
            self.bins.range(..from).next_back().map(|(id, _)| *id)
        } else {
            self.bins
                .range((Excluded(from), std::ops::Bound::Unbounded))
                .next()
                .map(|(id, _)| *id)
        }
    }

    /// Adds reserves and mints shares in the bin at `id`.
    ///
    /// The share amount is decided by the caller (it depends on prices
    /// the ledger does not know); this only applies it.
    ///
    /// # Errors
    ///
    /// [`PairError::Overflow`] if a reserve total would overflow,
    /// [`PairError::LiquidityOverflow`] if the share supply would.
    pub fn mint(
        &mut self,
        id: BinId,
        to: &AccountId,
        amount_x: Amount,
        amount_y: Amount,
        shares: U256,
    ) -> Result<()> {
        let bin = self.bins.entry(id).or_default();
        bin.reserve_x = bin.reserve_x.checked_add(amount_x)?;
        bin.reserve_y = bin.reserve_y.checked_add(amount_y)?;
        bin.total_shares = bin
            .total_shares
            .checked_add(shares)
            .ok_or(PairError::LiquidityOverflow)?;
        let balance = bin.balances.entry(*to).or_default();
        *balance = balance
            .checked_add(shares)
            .ok_or(PairError::LiquidityOverflow)?;
        self.total_x = self.total_x.checked_add(amount_x)?;
        self.total_y = self.total_y.checked_add(amount_y)?;
        Ok(())
    }

    /// Burns `shares` from `from` in the bin at `id` and returns the
    /// pro-rata reserves released, rounded down.
    ///
    /// The bin is dropped from the map once nothing remains in it.
    ///
    /// # Errors
    ///
    /// - [`PairError::ZeroShares`] if `shares` is zero.
    /// - [`PairError::BurnExceedsBalance`] if `from` holds fewer shares.
    pub fn burn(&mut self, id: BinId, from: &AccountId, shares: U256) -> Result<(Amount, Amount)> {
        if shares.is_zero() {
            return Err(PairError::ZeroShares);
        }
        let bin = self
            .bins
            .get_mut(&id)
            .ok_or(PairError::BurnExceedsBalance)?;
        let balance = bin.balance_of(from);
        if balance < shares {
            return Err(PairError::BurnExceedsBalance);
        }

        let supply = bin.total_shares;
        let out_x = pro_rata(bin.reserve_x, shares, supply)?;
        let out_y = pro_rata(bin.reserve_y, shares, supply)?;

        bin.reserve_x = bin.reserve_x.saturating_sub(out_x);
        bin.reserve_y = bin.reserve_y.saturating_sub(out_y);
        bin.total_shares -= shares;
        let remaining = balance - shares;
        if remaining.is_zero() {
            bin.balances.remove(from);
        } else {
            bin.balances.insert(*from, remaining);
        }
        if bin.is_empty() {
            self.bins.remove(&id);
        }

        self.total_x = self.total_x.saturating_sub(out_x);
        self.total_y = self.total_y.saturating_sub(out_y);
        Ok((out_x, out_y))
    }

    /// Applies one swap step to the bin at `id`: the input-side reserve
    /// grows by `amount_in` and the output-side reserve shrinks by
    /// `amount_out`.
    ///
    /// # Errors
    ///
    /// - [`PairError::OutOfLiquidity`] if the bin cannot cover
    ///   `amount_out`.
    /// - [`PairError::Overflow`] if the input-side reserve would
    ///   overflow.
    pub fn apply_swap(
        &mut self,
        id: BinId,
        direction: SwapDirection,
        amount_in: Amount,
        amount_out: Amount,
    ) -> Result<()> {
        let bin = self.bins.get_mut(&id).ok_or(PairError::OutOfLiquidity)?;
        let (in_reserve, out_reserve) = match direction {
            SwapDirection::XForY => (&mut bin.reserve_x, &mut bin.reserve_y),
            SwapDirection::YForX => (&mut bin.reserve_y, &mut bin.reserve_x),
        };
        if *out_reserve < amount_out {
            return Err(PairError::OutOfLiquidity);
        }
        *in_reserve = in_reserve.checked_add(amount_in)?;
        *out_reserve = out_reserve.saturating_sub(amount_out);

        match direction {
            SwapDirection::XForY => {
                self.total_x = self.total_x.checked_add(amount_in)?;
                self.total_y = self.total_y.saturating_sub(amount_out);
            }
            SwapDirection::YForX => {
                self.total_y = self.total_y.checked_add(amount_in)?;
                self.total_x = self.total_x.saturating_sub(amount_out);
            }
        }
        Ok(())
    }

    /// Credits `amount` of `asset` to the bin at `id` without minting
    /// shares. Used to leave the LP slice of flash-loan fees in the
    /// active bin.
    ///
    /// # Errors
    ///
    /// - [`PairError::OutOfLiquidity`] if the bin is not populated.
    /// - [`PairError::Overflow`] if a reserve would overflow.
    pub fn credit(&mut self, id: BinId, asset: Asset, amount: Amount) -> Result<()> {
        let bin = self.bins.get_mut(&id).ok_or(PairError::OutOfLiquidity)?;
        match asset {
            Asset::X => {
                bin.reserve_x = bin.reserve_x.checked_add(amount)?;
                self.total_x = self.total_x.checked_add(amount)?;
            }
            Asset::Y => {
                bin.reserve_y = bin.reserve_y.checked_add(amount)?;
                self.total_y = self.total_y.checked_add(amount)?;
            }
        }
        Ok(())
    }
}

/// `floor(amount * shares / supply)`.
fn pro_rata(amount: Amount, shares: U256, supply: U256) -> Result<Amount> {
    if supply.is_zero() {
        return Ok(Amount::ZERO);
    }
    let raw = mul_div(U256::from(amount.get()), shares, supply, Rounding::Down)?;
    Ok(Amount::new(u256_to_u128(raw)?))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn id(delta: i32) -> BinId {
        let Ok(id) = BinId::ONE.checked_offset(delta) else {
            panic!("in range");
        };
        id
    }

    fn alice() -> AccountId {
        AccountId::from_bytes([1u8; 32])
    }

    fn bob() -> AccountId {
        AccountId::from_bytes([2u8; 32])
    }

    #[test]
    fn mint_populates_bin_and_totals() {
        let mut ledger = BinLedger::new();
        let Ok(()) = ledger.mint(
            id(0),
            &alice(),
            Amount::new(100),
            Amount::new(200),
            U256::from(500u64),
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(ledger.reserves(id(0)), (Amount::new(100), Amount::new(200)));
        assert_eq!(ledger.total_supply(id(0)), U256::from(500u64));
        assert_eq!(ledger.balance_of(id(0), &alice()), U256::from(500u64));
        assert_eq!(ledger.totals(), (Amount::new(100), Amount::new(200)));
        assert_eq!(ledger.populated_bins(), 1);
    }

    #[test]
    fn empty_bin_reads_as_zero() {
        let ledger = BinLedger::new();
        assert_eq!(ledger.reserves(id(7)), (Amount::ZERO, Amount::ZERO));
        assert!(ledger.total_supply(id(7)).is_zero());
        assert!(ledger.bin(id(7)).is_none());
    }

    #[test]
    fn burn_returns_pro_rata_reserves() {
        let mut ledger = BinLedger::new();
        let Ok(()) = ledger.mint(
            id(0),
            &alice(),
            Amount::new(100),
            Amount::new(200),
            U256::from(400u64),
        ) else {
            panic!("expected Ok");
        };
        let Ok(()) = ledger.mint(
            id(0),
            &bob(),
            Amount::new(100),
            Amount::new(200),
            U256::from(400u64),
        ) else {
            panic!("expected Ok");
        };

        let Ok((x, y)) = ledger.burn(id(0), &alice(), U256::from(400u64)) else {
            panic!("expected Ok");
        };
        assert_eq!((x, y), (Amount::new(100), Amount::new(200)));
        assert_eq!(ledger.total_supply(id(0)), U256::from(400u64));
        assert!(ledger.balance_of(id(0), &alice()).is_zero());
        assert_eq!(ledger.totals(), (Amount::new(100), Amount::new(200)));
    }

    #[test]
    fn full_burn_drops_the_bin() {
        let mut ledger = BinLedger::new();
        let Ok(()) = ledger.mint(
            id(3),
            &alice(),
            Amount::new(10),
            Amount::ZERO,
            U256::from(10u64),
        ) else {
            panic!("expected Ok");
        };
        let Ok(_) = ledger.burn(id(3), &alice(), U256::from(10u64)) else {
            panic!("expected Ok");
        };
        assert!(ledger.bin(id(3)).is_none());
        assert_eq!(ledger.populated_bins(), 0);
    }

    #[test]
    fn burn_more_than_balance_fails() {
        let mut ledger = BinLedger::new();
        let Ok(()) = ledger.mint(
            id(0),
            &alice(),
            Amount::new(10),
            Amount::ZERO,
            U256::from(10u64),
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(
            ledger.burn(id(0), &alice(), U256::from(11u64)),
            Err(PairError::BurnExceedsBalance)
        );
        assert_eq!(
            ledger.burn(id(0), &bob(), U256::from(1u64)),
            Err(PairError::BurnExceedsBalance)
        );
        assert_eq!(
            ledger.burn(id(0), &alice(), U256::zero()),
            Err(PairError::ZeroShares)
        );
    }

    #[test]
    fn next_non_empty_walks_in_direction() {
        let mut ledger = BinLedger::new();
        for delta in [-5, -2, 0, 3, 7] {
            let Ok(()) = ledger.mint(
                id(delta),
                &alice(),
                Amount::new(1),
                Amount::new(1),
                U256::from(1u64),
            ) else {
                panic!("expected Ok");
            };
        }

        assert_eq!(
            ledger.next_non_empty_bin(SwapDirection::XForY, id(0)),
            Some(id(-2))
        );
        assert_eq!(
            ledger.next_non_empty_bin(SwapDirection::YForX, id(0)),
            Some(id(3))
        );
        // strictly beyond, even from an unpopulated id
        assert_eq!(
            ledger.next_non_empty_bin(SwapDirection::XForY, id(-5)),
            None
        );
        assert_eq!(ledger.next_non_empty_bin(SwapDirection::YForX, id(7)), None);
        assert_eq!(
            ledger.next_non_empty_bin(SwapDirection::XForY, id(1)),
            Some(id(0))
        );
    }

    #[test]
    fn apply_swap_moves_reserves_across_sides() {
        let mut ledger = BinLedger::new();
        let Ok(()) = ledger.mint(
            id(0),
            &alice(),
            Amount::new(1_000),
            Amount::new(1_000),
            U256::from(1u64),
        ) else {
            panic!("expected Ok");
        };
        let Ok(()) = ledger.apply_swap(
            id(0),
            SwapDirection::XForY,
            Amount::new(300),
            Amount::new(290),
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(ledger.reserves(id(0)), (Amount::new(1_300), Amount::new(710)));
        assert_eq!(ledger.totals(), (Amount::new(1_300), Amount::new(710)));
    }

    #[test]
    fn apply_swap_cannot_overdraw() {
        let mut ledger = BinLedger::new();
        let Ok(()) = ledger.mint(
            id(0),
            &alice(),
            Amount::new(1_000),
            Amount::new(100),
            U256::from(1u64),
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(
            ledger.apply_swap(
                id(0),
                SwapDirection::XForY,
                Amount::new(300),
                Amount::new(101),
            ),
            Err(PairError::OutOfLiquidity)
        );
        // untouched on failure
        assert_eq!(ledger.reserves(id(0)), (Amount::new(1_000), Amount::new(100)));
    }

    #[test]
    fn credit_grows_reserves_without_shares() {
        let mut ledger = BinLedger::new();
        let Ok(()) = ledger.mint(
            id(0),
            &alice(),
            Amount::new(100),
            Amount::ZERO,
            U256::from(100u64),
        ) else {
            panic!("expected Ok");
        };
        let Ok(()) = ledger.credit(id(0), Asset::X, Amount::new(5)) else {
            panic!("expected Ok");
        };
        assert_eq!(ledger.reserves(id(0)).0, Amount::new(105));
        assert_eq!(ledger.total_supply(id(0)), U256::from(100u64));
        assert_eq!(
            ledger.credit(id(99), Asset::X, Amount::new(5)),
            Err(PairError::OutOfLiquidity)
        );
    }
}
