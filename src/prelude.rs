//! Convenience re-exports for common types.
//!
//! A single import brings the usual working set into scope:
//!
//! ```rust
//! use liquidity_book::prelude::*;
//! ```

// Domain value types
pub use crate::domain::{
    AccountId, Amount, Asset, BinId, BinStep, Rounding, SwapDirection, SwapInQuote, SwapOutQuote,
    SwapResult, Timestamp,
};

// Configuration
pub use crate::config::{PairConfig, StaticFeeParameters};

// The pair aggregate
pub use crate::pair::PairEngine;

// Fee model
pub use crate::fee::{VariableFeeState, MAX_FEE_RATE, PRECISION};

// Oracle
pub use crate::oracle::{OracleParams, OracleRing, OracleSample};

// Error types
pub use crate::error::{PairError, Result};
