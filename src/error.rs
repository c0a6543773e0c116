//! Unified error types for the liquidity book engine.
//!
//! All fallible operations across the crate return [`PairError`] as their
//! error type. Every failure is synchronous and typed, and aborts the
//! operation with no partial state change.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, PairError>;

/// Unified error enum for all pair-engine operations.
///
/// Variants fall into four categories:
///
/// - **Input validation** (`InvalidInput`, `InvalidStaticFeeParameters`,
///   `IdOutOfBounds`, `MintToAddress0`, `ZeroShares`) — rejected before any
///   state mutation.
/// - **Market conditions** (`OutOfLiquidity`, `InsufficientAmountIn`,
///   `InsufficientAmountOut`) — legitimate outcomes the caller may retry
///   with different sizing.
/// - **State-machine misuse** (`ReentrantCall`, `Unauthorized`,
///   `FlashLoanNotRepaid`, `BurnExceedsBalance`) — non-retryable.
/// - **Oracle range** (`OracleNotInitialized`, `OracleLookbackTooLong`) —
///   "no samples yet" is reported distinctly from "lookback past retained
///   history".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PairError {
    /// No input amount was transferred in before the swap.
    #[error("swap amount in is zero")]
    InsufficientAmountIn,

    /// The swap produced no output, or less than the caller's stated floor.
    #[error("swap amount out is below the requested minimum")]
    InsufficientAmountOut,

    /// The bin walk ran past the last non-empty bin with input remaining.
    #[error("not enough liquidity to satisfy the swap")]
    OutOfLiquidity,

    /// A static fee parameter violates its documented bound.
    #[error("invalid static fee parameters: {0}")]
    InvalidStaticFeeParameters(&'static str),

    /// The oracle ring holds no samples yet.
    #[error("oracle is not initialized")]
    OracleNotInitialized,

    /// The requested lookback precedes the oldest retained sample.
    #[error("oracle lookback exceeds retained history")]
    OracleLookbackTooLong,

    /// An account tried to burn more shares than it holds.
    #[error("burn exceeds share balance")]
    BurnExceedsBalance,

    /// A mint or burn resolved to zero shares.
    #[error("operation resolves to zero shares")]
    ZeroShares,

    /// Shares cannot be minted to the null account.
    #[error("mint to the null account")]
    MintToAddress0,

    /// A mutating operation re-entered the engine before settlement.
    #[error("reentrant call")]
    ReentrantCall,

    /// The caller is not the configured factory account.
    #[error("caller is not authorized")]
    Unauthorized,

    /// The flash-loan callback returned without repaying principal + fee.
    #[error("flash loan was not repaid")]
    FlashLoanNotRepaid,

    /// Malformed request (mismatched array lengths, wrong-side deposit, ...).
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// A bin id fell outside the 24-bit id space.
    #[error("bin id out of bounds")]
    IdOutOfBounds,

    /// Arithmetic overflow in a financial computation.
    #[error("arithmetic overflow")]
    Overflow,

    /// Division by zero in a financial computation.
    #[error("division by zero")]
    DivisionByZero,

    /// Fixed-point exponentiation underflowed to zero.
    #[error("fixed-point power underflow")]
    PowUnderflow,

    /// Bin liquidity does not fit in 256 bits.
    #[error("bin liquidity overflows 256 bits")]
    LiquidityOverflow,
}
