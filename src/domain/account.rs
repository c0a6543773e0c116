//! Opaque 32-byte account identifier.

use core::fmt;

/// An opaque 32-byte account identifier.
///
/// Used for share recipients, the factory authority, and fee collection.
/// The all-zero value is the null account: shares can never be minted to
/// it, mirroring the burn-address convention of the embedding environment.
///
/// # Examples
///
/// ```
/// use liquidity_book::domain::AccountId;
///
/// let alice = AccountId::from_bytes([1u8; 32]);
/// assert!(!alice.is_null());
/// assert!(AccountId::NULL.is_null());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId([u8; 32]);

impl AccountId {
    /// The null (all-zero) account.
    pub const NULL: Self = Self([0u8; 32]);

    /// Creates an `AccountId` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns `true` if this is the null account.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for AccountId {
    /// Shortened hex form: first and last four bytes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for b in &self.0[..4] {
            write!(f, "{b:02x}")?;
        }
        write!(f, "..")?;
        for b in &self.0[28..] {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}
