//! Inter-bin price step in basis points.

use core::fmt;

use crate::error::{PairError, Result};

/// Number of basis points in 100%.
pub const BASIS_POINT_MAX: u16 = 10_000;

/// The fixed percentage price difference between adjacent bins, in basis
/// points.
///
/// Adjacent bins differ in price by a factor of `1 + step / 10_000`. A step
/// of `100` means each bin is 1% away from its neighbours. The step is set
/// at pair creation and never changes.
///
/// # Examples
///
/// ```
/// use liquidity_book::domain::BinStep;
///
/// let step = BinStep::new(100).expect("1% step is valid");
/// assert_eq!(step.get(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BinStep(u16);

impl BinStep {
    /// Creates a new `BinStep` with bounds validation.
    ///
    /// # Errors
    ///
    /// Returns [`PairError::InvalidStaticFeeParameters`] if the step is
    /// zero (adjacent bins would share a price) or exceeds
    /// [`BASIS_POINT_MAX`] (a bin would more than double its neighbour).
    pub const fn new(value: u16) -> Result<Self> {
        if value == 0 {
            return Err(PairError::InvalidStaticFeeParameters("bin step is zero"));
        }
        if value > BASIS_POINT_MAX {
            return Err(PairError::InvalidStaticFeeParameters(
                "bin step above 10000 bps",
            ));
        }
        Ok(Self(value))
    }

    /// Returns the step in basis points.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for BinStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bps", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn valid_steps() {
        for bps in [1u16, 10, 25, 100, 200, 10_000] {
            let Ok(step) = BinStep::new(bps) else {
                panic!("expected Ok for step {bps}");
            };
            assert_eq!(step.get(), bps);
        }
    }

    #[test]
    fn zero_rejected() {
        assert!(matches!(
            BinStep::new(0),
            Err(PairError::InvalidStaticFeeParameters(_))
        ));
    }

    #[test]
    fn above_max_rejected() {
        assert!(matches!(
            BinStep::new(10_001),
            Err(PairError::InvalidStaticFeeParameters(_))
        ));
    }

    #[test]
    fn display() {
        let Ok(step) = BinStep::new(25) else {
            panic!("expected Ok");
        };
        assert_eq!(format!("{step}"), "25bps");
    }
}
