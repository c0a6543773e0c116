//! Swap direction, result, and quote types.

use core::fmt;

use super::{Amount, BinId};

/// One of the pair's two assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    /// The base asset.
    X,
    /// The quote asset.
    Y,
}

impl Asset {
    /// Returns the other asset of the pair.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

/// Trade direction through the bin grid.
///
/// Prices are quoted as Y per X, so selling X pushes the active id down
/// (through the Y-side bins) and selling Y pushes it up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapDirection {
    /// Sell asset X for asset Y; the active id walks downward.
    XForY,
    /// Sell asset Y for asset X; the active id walks upward.
    YForX,
}

impl SwapDirection {
    /// The asset the trader sends in.
    #[must_use]
    pub const fn input_asset(self) -> Asset {
        match self {
            Self::XForY => Asset::X,
            Self::YForX => Asset::Y,
        }
    }

    /// The asset the trader receives.
    #[must_use]
    pub const fn output_asset(self) -> Asset {
        self.input_asset().other()
    }

    /// Returns `true` if the active id decreases in this direction.
    #[must_use]
    pub const fn is_descending(self) -> bool {
        matches!(self, Self::XForY)
    }
}

/// Settlement summary of an executed swap.
///
/// Amounts are denominated in the direction's input/output assets; fees are
/// denominated in the input asset (fees are always charged on the way in).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct SwapResult {
    amount_in: Amount,
    amount_out: Amount,
    total_fee: Amount,
    protocol_fee: Amount,
    bins_crossed: u32,
    end_id: BinId,
}

impl SwapResult {
    /// Assembles a settlement summary.
    pub(crate) const fn new(
        amount_in: Amount,
        amount_out: Amount,
        total_fee: Amount,
        protocol_fee: Amount,
        bins_crossed: u32,
        end_id: BinId,
    ) -> Self {
        Self {
            amount_in,
            amount_out,
            total_fee,
            protocol_fee,
            bins_crossed,
            end_id,
        }
    }

    /// Gross input consumed, fees included.
    #[must_use]
    pub const fn amount_in(&self) -> Amount {
        self.amount_in
    }

    /// Output credited to the recipient.
    #[must_use]
    pub const fn amount_out(&self) -> Amount {
        self.amount_out
    }

    /// Total fee charged, in the input asset.
    #[must_use]
    pub const fn total_fee(&self) -> Amount {
        self.total_fee
    }

    /// Portion of the fee credited to the protocol.
    #[must_use]
    pub const fn protocol_fee(&self) -> Amount {
        self.protocol_fee
    }

    /// Number of bin boundaries crossed during the walk.
    #[must_use]
    pub const fn bins_crossed(&self) -> u32 {
        self.bins_crossed
    }

    /// Active id after settlement.
    #[must_use]
    pub const fn end_id(&self) -> BinId {
        self.end_id
    }
}

impl fmt::Display for SwapResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "in={} out={} fee={} (protocol {}) bins_crossed={} end={}",
            self.amount_in,
            self.amount_out,
            self.total_fee,
            self.protocol_fee,
            self.bins_crossed,
            self.end_id
        )
    }
}

/// Result of a `get_swap_out` quote: how much comes out for a given input.
///
/// `amount_in_left` is nonzero when the book cannot absorb the full input;
/// quotes report exhaustion instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct SwapOutQuote {
    /// Input that could not be consumed.
    pub amount_in_left: Amount,
    /// Output obtainable for the consumed input.
    pub amount_out: Amount,
    /// Fee that would be charged, in the input asset.
    pub fee: Amount,
}

/// Result of a `get_swap_in` quote: input needed for a desired output.
///
/// `amount_out_left` is nonzero when the book cannot produce the full
/// desired output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct SwapInQuote {
    /// Gross input required, fees included.
    pub amount_in: Amount,
    /// Desired output that cannot be produced.
    pub amount_out_left: Amount,
    /// Fee that would be charged, in the input asset.
    pub fee: Amount,
}
