//! Domain value types for the liquidity book engine.
//!
//! Every quantity the engine manipulates is wrapped in a newtype with
//! validated construction and checked arithmetic: raw token amounts
//! ([`Amount`]), 24-bit bin ids ([`BinId`]), the inter-bin price step
//! ([`BinStep`]), account identifiers ([`AccountId`]), and the swap
//! request/result types.

mod account;
mod amount;
mod bin_id;
mod bin_step;
mod rounding;
mod swap;

pub use account::AccountId;
pub use amount::Amount;
pub use bin_id::BinId;
pub use bin_step::{BinStep, BASIS_POINT_MAX};
pub use rounding::Rounding;
pub use swap::{Asset, SwapDirection, SwapInQuote, SwapOutQuote, SwapResult};

/// Wall-clock timestamp in seconds. The engine has no ambient clock; the
/// embedder supplies block time explicitly on every time-sensitive call.
pub type Timestamp = u64;
