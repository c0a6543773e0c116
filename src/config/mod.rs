//! Validated construction blueprints for the pair engine.
//!
//! Both structs follow the same discipline: a `new` constructor that runs
//! `validate` before the value can exist, so an invalid configuration is
//! unrepresentable downstream and parameter updates are all-or-nothing by
//! construction.

mod pair;
mod static_fee;

pub use pair::PairConfig;
pub use static_fee::StaticFeeParameters;
