//! # Liquidity Book
//!
//! Bin-based AMM engine: discretized liquidity on a geometric price
//! grid, with volatility-adaptive fees, a time-weighted oracle, and
//! flash loans.
//!
//! Liquidity lives in *bins*. Each bin covers one fixed price on a
//! geometric grid — adjacent bins differ by the pair's *bin step* in
//! basis points — and trades as a constant-sum micro-market at that
//! price. Swaps walk the grid bin by bin: selling X pushes the active
//! bin downward through the Y-side inventory, selling Y pushes it
//! upward. All price math is 128.128 fixed point, bit-for-bit
//! reproducible across platforms.
//!
//! # Quick Start
//!
//! ```rust
//! use liquidity_book::config::{PairConfig, StaticFeeParameters};
//! use liquidity_book::domain::{AccountId, Amount, Asset, BinId, BinStep, SwapDirection};
//! use liquidity_book::pair::PairEngine;
//!
//! // 1. Configure a pair: 100 bps grid, 0.3% base fee, 8 oracle slots
//! let fee = StaticFeeParameters::new(3_000, 30, 600, 5_000, 40_000, 1_000, 350_000)
//!     .expect("valid fee parameters");
//! let config = PairConfig::new(
//!     BinStep::new(100).expect("valid step"),
//!     BinId::ONE,
//!     fee,
//!     8,
//!     AccountId::from_bytes([9u8; 32]),
//!     0,
//! )
//! .expect("valid config");
//! let mut pair = PairEngine::new(config);
//!
//! // 2. Seed the active bin with both assets
//! let lp = AccountId::from_bytes([1u8; 32]);
//! pair.transfer_in(Asset::X, Amount::new(1_000_000)).expect("vault deposit");
//! pair.transfer_in(Asset::Y, Amount::new(1_000_000)).expect("vault deposit");
//! pair.mint(
//!     0,
//!     &lp,
//!     &[BinId::ONE],
//!     &[(Amount::new(1_000_000), Amount::new(1_000_000))],
//! )
//! .expect("mint");
//!
//! // 3. Pull-based swap: deposit input, then swap the surplus
//! pair.transfer_in(Asset::X, Amount::new(10_000)).expect("vault deposit");
//! let result = pair
//!     .swap(5, SwapDirection::XForY, &lp, Amount::ZERO)
//!     .expect("swap");
//!
//! assert!(result.amount_out().get() > 0);
//! assert!(result.total_fee().get() > 0);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │  PairEngine   │  swaps, quotes, mint/burn, flash loans, admin
//! └──────┬───────┘
//!        │ owns
//!        ▼
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │   BinLedger   │   │ Fee model     │   │  OracleRing   │
//! │ bins, shares  │   │ base+variable │   │ TWAP samples  │
//! └──────┬───────┘   └──────┬───────┘   └──────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌──────────────────────────────────┐
//! │   math: 128.128 fixed point       │  pow, log2, mul_div, bin amounts
//! └──────────────────────────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Amount`](domain::Amount), [`BinId`](domain::BinId), [`BinStep`](domain::BinStep), swap types |
//! | [`config`] | Validated blueprints: [`PairConfig`](config::PairConfig), [`StaticFeeParameters`](config::StaticFeeParameters) |
//! | [`math`]   | Deterministic 128.128 fixed point: price grid, pow/log2, full-width mul-div |
//! | [`fee`]    | Base and variable fee rates, [`VariableFeeState`](fee::VariableFeeState) volatility tracking |
//! | [`ledger`] | [`BinLedger`](ledger::BinLedger): bin reserves, share supply, account balances |
//! | [`oracle`] | [`OracleRing`](oracle::OracleRing): cumulative time-weighted samples |
//! | [`pair`]   | [`PairEngine`](pair::PairEngine): the pair aggregate and all operations |
//! | [`error`]  | [`PairError`](error::PairError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types |

pub mod config;
pub mod domain;
pub mod error;
pub mod fee;
pub mod ledger;
pub mod math;
pub mod oracle;
pub mod pair;
pub mod prelude;
