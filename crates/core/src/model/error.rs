//! Domain error types for carpool mutations.
//!
//! Every variant is recoverable: the rejected operation leaves state unchanged.

use thiserror::Error;

use carpool_shared::AppError;
use carpool_shared::types::{CarId, PersonId};

/// Errors that can occur during domain operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    // ========== Validation Errors ==========
    /// A required text field is empty.
    #[error("{field} must not be blank")]
    Blank {
        /// Name of the offending field.
        field: &'static str,
    },

    /// Fuel type is not one of the known kinds.
    #[error("Unrecognized fuel type: {0}")]
    UnknownFuelType(String),

    /// Amount text is not a finite number below `MAX_AMOUNT`.
    #[error("Amount is not a finite number in range: {value:?}")]
    InvalidAmount {
        /// The rejected input.
        value: String,
    },

    /// Trip date is not a `YYYY-MM-DD` calendar date.
    #[error("Invalid date {0}, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Calendar month out of range.
    #[error("Invalid calendar month {year}-{month}")]
    InvalidMonth {
        /// Requested year.
        year: i32,
        /// Requested month (1-12).
        month: u32,
    },

    /// A new trip references a car that does not exist.
    #[error("Trip references unknown car {0}")]
    UnknownCar(CarId),

    /// A new trip references a driver that does not exist.
    #[error("Trip references unknown driver {0}")]
    UnknownDriver(PersonId),

    // ========== Lookup Errors ==========
    /// Person not found.
    #[error("Person not found: {0}")]
    PersonNotFound(PersonId),
}

impl DomainError {
    /// Create an invalid amount error.
    #[must_use]
    pub fn invalid_amount(value: impl Into<String>) -> Self {
        Self::InvalidAmount {
            value: value.into(),
        }
    }

    /// Returns true for input validation failures.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::PersonNotFound(_))
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Blank { .. } => "BLANK_FIELD",
            Self::UnknownFuelType(_) => "UNKNOWN_FUEL_TYPE",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::InvalidDate(_) => "INVALID_DATE",
            Self::InvalidMonth { .. } => "INVALID_MONTH",
            Self::UnknownCar(_) => "UNKNOWN_CAR",
            Self::UnknownDriver(_) => "UNKNOWN_DRIVER",
            Self::PersonNotFound(_) => "PERSON_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        if self.is_validation() { 400 } else { 404 }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        if err.is_validation() {
            Self::Validation(err.to_string())
        } else {
            Self::NotFound(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DomainError::Blank { field: "name" }.error_code(), "BLANK_FIELD");
        assert_eq!(
            DomainError::invalid_amount("NaN").error_code(),
            "INVALID_AMOUNT"
        );
        assert_eq!(
            DomainError::UnknownCar(CarId::from("c1")).error_code(),
            "UNKNOWN_CAR"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(DomainError::Blank { field: "name" }.http_status_code(), 400);
        assert_eq!(
            DomainError::UnknownDriver(PersonId::from("p1")).http_status_code(),
            400
        );
        assert_eq!(
            DomainError::PersonNotFound(PersonId::from("p1")).http_status_code(),
            404
        );
    }

    #[test]
    fn test_converts_to_app_error() {
        let app: AppError = DomainError::InvalidDate("yesterday".into()).into();
        assert_eq!(app.status_code(), 400);
        assert_eq!(
            app.to_string(),
            "Validation error: Invalid date yesterday, expected YYYY-MM-DD"
        );

        let app: AppError = DomainError::PersonNotFound(PersonId::from("p9")).into();
        assert_eq!(app.status_code(), 404);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::Blank { field: "name" }.to_string(),
            "name must not be blank"
        );
        assert_eq!(
            DomainError::invalid_amount("abc").to_string(),
            "Amount is not a finite number in range: \"abc\""
        );
    }
}
