//! Input validation and normalization for domain mutations.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use carpool_shared::types::PersonId;

use super::error::DomainError;

/// ISO calendar date format used for trip dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Amounts must be strictly smaller than this in magnitude.
///
/// Keeps balance sums far from the `Decimal` range and, together with
/// [`AMOUNT_DECIMAL_PLACES`], bounds amounts to 14 significant digits so
/// they survive a JSON number round trip exactly.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Amounts are rounded half away from zero to this many places (paise).
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// Parses user-entered amount text into a decimal.
///
/// Accepts plain and scientific notation. Rejects empty input, `NaN`,
/// infinities, anything else that is not a finite number, and magnitudes
/// at or above [`MAX_AMOUNT`]. The result is rounded to paise.
///
/// # Errors
///
/// Returns `DomainError::InvalidAmount` when the text is not a finite number
/// or is out of range.
pub fn parse_amount(raw: &str) -> Result<Decimal, DomainError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(DomainError::invalid_amount(raw));
    }

    let amount = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| DomainError::invalid_amount(raw))?;
    if amount.abs() >= MAX_AMOUNT {
        return Err(DomainError::invalid_amount(raw));
    }

    Ok(amount
        .round_dp_with_strategy(AMOUNT_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero))
}

/// Trims `value` and rejects it if nothing is left.
///
/// # Errors
///
/// Returns `DomainError::Blank` naming `field`.
pub fn require_non_blank(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Blank { field });
    }
    Ok(trimmed.to_string())
}

/// Checks that a trip date is a real `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns `DomainError::Blank` for empty input and
/// `DomainError::InvalidDate` for anything unparseable.
pub fn validate_trip_date(raw: &str) -> Result<String, DomainError> {
    let date = require_non_blank("date", raw)?;
    NaiveDate::parse_from_str(&date, DATE_FORMAT)
        .map_err(|_| DomainError::InvalidDate(date.clone()))?;
    Ok(date)
}

/// Drops the driver and any repeated ids from a passenger list.
///
/// The first occurrence of each passenger keeps its position.
#[must_use]
pub fn normalize_passengers(driver_id: &PersonId, passenger_ids: Vec<PersonId>) -> Vec<PersonId> {
    let mut seen = HashSet::with_capacity(passenger_ids.len());
    passenger_ids
        .into_iter()
        .filter(|id| id != driver_id && !id.is_blank())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("100", dec!(100))]
    #[case(" -40 ", dec!(-40))]
    #[case("0", dec!(0))]
    #[case("12.75", dec!(12.75))]
    #[case("1e3", dec!(1000))]
    #[case("999999999999.99", dec!(999999999999.99))]
    #[case("-999999999999.99", dec!(-999999999999.99))]
    #[case("1.005", dec!(1.01))]
    #[case("-12.345", dec!(-12.35))]
    #[case("0.001", dec!(0))]
    fn test_parse_amount_accepts_finite_numbers(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("NaN")]
    #[case("Infinity")]
    #[case("-inf")]
    #[case("twelve")]
    fn test_parse_amount_rejects_non_finite(#[case] raw: &str) {
        assert!(matches!(
            parse_amount(raw),
            Err(DomainError::InvalidAmount { .. })
        ));
    }

    #[rstest]
    #[case("1e12")]
    #[case("-1000000000000")]
    #[case("5e28")]
    #[case("79000000000000000000000000000")]
    #[case("79228162514264337593543950335")]
    fn test_parse_amount_rejects_out_of_range(#[case] raw: &str) {
        assert_eq!(parse_amount(raw), Err(DomainError::invalid_amount(raw)));
    }

    #[test]
    fn test_max_amount_is_one_trillion() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000));
    }

    #[test]
    fn test_require_non_blank_trims() {
        assert_eq!(require_non_blank("name", "  Sedan ").unwrap(), "Sedan");
        assert!(matches!(
            require_non_blank("name", " \t"),
            Err(DomainError::Blank { field: "name" })
        ));
    }

    #[rstest]
    #[case("2024-01-05", true)]
    #[case("2024-02-29", true)]
    #[case("2023-02-29", false)]
    #[case("05/01/2024", false)]
    #[case("", false)]
    fn test_validate_trip_date(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(validate_trip_date(raw).is_ok(), ok);
    }

    #[test]
    fn test_normalize_passengers_removes_driver_and_duplicates() {
        let driver = PersonId::from("bob");
        let passengers = vec![
            PersonId::from("alice"),
            PersonId::from("bob"),
            PersonId::from("carol"),
            PersonId::from("alice"),
            PersonId::from(""),
        ];

        assert_eq!(
            normalize_passengers(&driver, passengers),
            vec![PersonId::from("alice"), PersonId::from("carol")]
        );
    }
}
