//! Deterministic fixed-point math for the bin grid.
//!
//! All price math runs on unsigned 128.128 fixed-point numbers held in
//! `U256`, with 512-bit intermediates where products can exceed 256 bits.
//! Nothing in this module is approximate in the floating-point sense: the
//! same inputs produce the same bits on every platform. The only tolerated
//! imprecision is fixed-point truncation, and every truncation direction is
//! explicit.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`fixed_point`] | 128.128 exponentiation and binary logarithm |
//! | [`mul_div`] | full-width multiply-divide and shift helpers |
//! | [`price`] | bin id ↔ price conversion on the geometric grid |
//! | [`bin`] | bin-local constant-sum swap amounts and liquidity |

pub mod bin;
pub mod fixed_point;
pub mod mul_div;
pub mod price;

pub use bin::{amount_in_for_out, amount_out, liquidity};
pub use fixed_point::{log2, pow, SCALE, SCALE_OFFSET};
pub use price::{grid_base, id_at_price, price_at_id};
