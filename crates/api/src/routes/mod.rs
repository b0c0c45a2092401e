//! API route definitions.

use axum::Router;
use rust_decimal::Decimal;
use serde::Deserialize;

use carpool_core::model::{DomainError, parse_amount};

use crate::AppState;

pub mod adjustments;
pub mod balances;
pub mod calendar;
pub mod cars;
pub mod health;
pub mod people;
pub mod state;
pub mod trips;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(health::routes()).nest(
        "/api",
        Router::new()
            .merge(state::routes())
            .merge(cars::routes())
            .merge(people::routes())
            .merge(trips::routes())
            .merge(adjustments::routes())
            .merge(balances::routes())
            .merge(calendar::routes()),
    )
}

/// An amount sent either as a JSON number or as entered text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// `120`, `-40.5`
    Number(serde_json::Number),
    /// `"120"`, `" 1e3 "`
    Text(String),
}

impl AmountInput {
    /// Parses into a decimal. A missing amount is invalid.
    pub fn parse(input: Option<&Self>) -> Result<Decimal, DomainError> {
        match input {
            Some(Self::Number(n)) => parse_amount(&n.to_string()),
            Some(Self::Text(s)) => parse_amount(s),
            None => parse_amount(""),
        }
    }
}

/// Treats blank query values as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
