//! Shared types, errors, and configuration for the carpool ledger.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for car, person, trip and adjustment references
//! - Money formatting for rupee amounts
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ServerConfig, StorageSettings};
pub use error::{AppError, AppResult};
