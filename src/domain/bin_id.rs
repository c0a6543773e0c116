//! Discrete price-bin identifier on the geometric grid.

use core::fmt;

use crate::error::{PairError, Result};

/// Width of the bin id space in bits.
const ID_BITS: u32 = 24;

/// Largest valid bin id (`2^24 - 1`).
const MAX_ID: u32 = (1 << ID_BITS) - 1;

/// A discrete price bin identifier.
///
/// Bin ids live on an unsigned 24-bit grid. The grid is centered on
/// [`BinId::ONE`] (`2^23 = 8388608`), the bin whose price is exactly 1:
/// `price(id) = (1 + bin_step / 10_000)^(id - ONE)`. Ids above `ONE` price
/// asset X richer than asset Y; ids below price it cheaper.
///
/// # Examples
///
/// ```
/// use liquidity_book::domain::BinId;
///
/// let id = BinId::new(8_388_608).expect("center id is valid");
/// assert_eq!(id, BinId::ONE);
/// assert_eq!(id.exponent(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BinId(u32);

impl BinId {
    /// Smallest valid bin id.
    pub const MIN: Self = Self(0);

    /// Largest valid bin id (`2^24 - 1`).
    pub const MAX: Self = Self(MAX_ID);

    /// The bin whose price is exactly 1 (`2^23`).
    pub const ONE: Self = Self(1 << (ID_BITS - 1));

    /// Creates a new `BinId` with range validation.
    ///
    /// # Errors
    ///
    /// Returns [`PairError::IdOutOfBounds`] if `value` exceeds `2^24 - 1`.
    pub const fn new(value: u32) -> Result<Self> {
        if value > MAX_ID {
            return Err(PairError::IdOutOfBounds);
        }
        Ok(Self(value))
    }

    /// Returns the raw 24-bit id.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the signed exponent of this id relative to [`BinId::ONE`].
    ///
    /// This is the power the grid base is raised to when computing the
    /// bin's price.
    #[must_use]
    pub const fn exponent(&self) -> i32 {
        self.0 as i32 - Self::ONE.0 as i32
    }

    /// Absolute id distance to another bin.
    #[must_use]
    pub const fn distance(&self, other: Self) -> u32 {
        self.0.abs_diff(other.0)
    }

    /// Checked signed offset from this id.
    ///
    /// # Errors
    ///
    /// Returns [`PairError::IdOutOfBounds`] if the result leaves the
    /// 24-bit id space.
    pub const fn checked_offset(&self, delta: i32) -> Result<Self> {
        let shifted = self.0 as i64 + delta as i64;
        if shifted < 0 || shifted > MAX_ID as i64 {
            return Err(PairError::IdOutOfBounds);
        }
        Ok(Self(shifted as u32))
    }
}

impl fmt::Display for BinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BinId({})", self.0)
    }
}
