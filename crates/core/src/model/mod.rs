//! Carpool domain model.
//!
//! This module implements:
//! - Record types for cars, people, trips and adjustments
//! - The persisted state document
//! - Input validation and normalization
//! - Mutations with referential cleanup on delete

pub mod error;
pub mod service;
pub mod types;
pub mod validation;

pub use error::DomainError;
pub use service::{LedgerService, NewAdjustment, NewTrip};
pub use types::{Adjustment, Car, CarpoolState, FuelType, Person, Trip};
pub use validation::parse_amount;
