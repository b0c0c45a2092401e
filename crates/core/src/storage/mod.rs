//! Persistence gateway for the state document, built on Apache OpenDAL.
//!
//! The whole state is one JSON document with `cars`, `people`, `trips` and
//! `adjustments` arrays, stored under a single key on any of:
//! - Local filesystem (default)
//! - S3-compatible object storage
//! - Process memory (tests)
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                Apache OpenDAL                 │
//! ├───────────────────────────────────────────────┤
//! │ op.read("data.json")  │ op.write("data.json") │
//! └───────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod store;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use store::StateStore;
