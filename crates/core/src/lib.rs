//! Core logic for the carpool ledger.
//!
//! This crate contains the domain model, balance computation and query
//! shaping with ZERO web dependencies. The only I/O lives in `storage`.
//!
//! # Modules
//!
//! - `model` - Cars, people, trips, adjustments and their mutations
//! - `balance` - Per-car, per-person balance computation
//! - `query` - Filtered and sorted views for display
//! - `storage` - Loading and saving the state document

pub mod balance;
pub mod model;
pub mod query;
pub mod storage;
