//! Balance computation.
//!
//! Turns cars, people, trips, rates and adjustments into a signed
//! per-car, per-person balance. Pure and uncached.

pub mod engine;

#[cfg(test)]
mod engine_props;

pub use engine::{BalanceEngine, BalanceEntry, BalanceMatrix, CarBalances, PersonBalance};
