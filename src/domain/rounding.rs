//! Explicit rounding direction for arithmetic operations.

/// Rounding direction for division-like operations.
///
/// Every division in the engine takes an explicit `Rounding` so that no
/// financial amount is ever rounded silently. The convention throughout the
/// crate is that rounding always favors the protocol: amounts owed *to* the
/// pair round up, amounts paid *out* of the pair round down.
///
/// # Examples
///
/// ```
/// use liquidity_book::domain::Rounding;
///
/// assert_eq!(Rounding::Up.apply(3, 1), 4);
/// assert_eq!(Rounding::Down.apply(3, 1), 3);
/// assert_eq!(Rounding::Up.apply(3, 0), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
}

impl Rounding {
    /// Adjusts a floor quotient for this rounding direction given the
    /// division remainder: bumps the quotient by one when rounding up and
    /// the remainder is nonzero.
    #[must_use]
    pub const fn apply(self, floor_quotient: u128, remainder: u128) -> u128 {
        match self {
            Self::Down => floor_quotient,
            Self::Up => {
                if remainder == 0 {
                    floor_quotient
                } else {
                    floor_quotient + 1
                }
            }
        }
    }

    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(self) -> bool {
        matches!(self, Self::Up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_down_ignores_remainder() {
        assert_eq!(Rounding::Down.apply(7, 3), 7);
        assert_eq!(Rounding::Down.apply(7, 0), 7);
    }

    #[test]
    fn apply_up_bumps_on_remainder() {
        assert_eq!(Rounding::Up.apply(7, 3), 8);
        assert_eq!(Rounding::Up.apply(7, 0), 7);
    }

    #[test]
    fn is_up() {
        assert!(Rounding::Up.is_up());
        assert!(!Rounding::Down.is_up());
    }

    #[test]
    fn equality() {
        assert_eq!(Rounding::Up, Rounding::Up);
        assert_ne!(Rounding::Up, Rounding::Down);
    }
}
