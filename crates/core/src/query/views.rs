//! Name-resolved rows for list views.
//!
//! References to deleted records resolve to `None` rather than failing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use carpool_shared::types::{AdjustmentId, CarId, Money, PersonId, TripId};

use crate::balance::{BalanceEngine, BalanceMatrix};
use crate::model::CarpoolState;

use super::filter::{BalanceFilter, TripFilter};
use super::service::QueryService;

/// Which way money flows for a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The person owes the pool.
    Due,
    /// The pool owes the person.
    Credit,
}

impl Direction {
    /// `Due` for positive amounts, `Credit` otherwise.
    #[must_use]
    pub fn of(amount: Decimal) -> Self {
        if amount > Decimal::ZERO {
            Self::Due
        } else {
            Self::Credit
        }
    }
}

/// A balance with names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRow {
    /// The car.
    pub car_id: CarId,
    /// Car name.
    pub car_name: String,
    /// The person.
    pub person_id: PersonId,
    /// Person name.
    pub person_name: String,
    /// Signed net amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Due or credit.
    pub direction: Direction,
    /// Absolute amount formatted as rupees.
    pub display_amount: String,
}

/// A trip with names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRow {
    /// The trip.
    pub id: TripId,
    /// ISO date.
    pub date: String,
    /// The car.
    pub car_id: CarId,
    /// Car name, `None` if the car is gone.
    pub car_name: Option<String>,
    /// The driver.
    pub driver_id: PersonId,
    /// Driver name, `None` if the person is gone.
    pub driver_name: Option<String>,
    /// Names of passengers that still exist, in trip order.
    pub passenger_names: Vec<String>,
}

impl TripRow {
    /// Car name for display.
    #[must_use]
    pub fn car_label(&self) -> &str {
        self.car_name.as_deref().unwrap_or("Unknown car")
    }

    /// Driver name for display.
    #[must_use]
    pub fn driver_label(&self) -> &str {
        self.driver_name.as_deref().unwrap_or("Unknown")
    }
}

/// An adjustment with names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentRow {
    /// The adjustment.
    pub id: AdjustmentId,
    /// The car.
    pub car_id: CarId,
    /// Car name, `None` if the car is gone.
    pub car_name: Option<String>,
    /// The person.
    pub person_id: PersonId,
    /// Person name, `None` if the person is gone.
    pub person_name: Option<String>,
    /// Signed amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Added due or added credit.
    pub direction: Direction,
    /// Absolute amount formatted as rupees.
    pub display_amount: String,
    /// Note, possibly empty.
    pub note: String,
    /// Insertion time, `None` if missing or unparseable.
    pub created_at: Option<DateTime<Utc>>,
}

impl QueryService {
    /// `list_balances` with car and person names attached.
    #[must_use]
    pub fn balance_rows(state: &CarpoolState, filter: &BalanceFilter) -> Vec<BalanceRow> {
        Self::balance_rows_of(state, &BalanceEngine::compute(state), filter)
    }

    /// `balance_rows` over a matrix already computed from `state`.
    #[must_use]
    pub fn balance_rows_of(
        state: &CarpoolState,
        matrix: &BalanceMatrix,
        filter: &BalanceFilter,
    ) -> Vec<BalanceRow> {
        Self::balances_of(matrix, filter)
            .into_iter()
            .filter_map(|entry| {
                let car = state.car(&entry.car_id)?;
                let person = state.person(&entry.person_id)?;
                Some(BalanceRow {
                    car_name: car.name.clone(),
                    person_name: person.name.clone(),
                    direction: Direction::of(entry.amount),
                    display_amount: Money::new(entry.amount.abs()).to_string(),
                    amount: entry.amount,
                    car_id: entry.car_id,
                    person_id: entry.person_id,
                })
            })
            .collect()
    }

    /// `list_trips` with names attached.
    #[must_use]
    pub fn trip_rows(state: &CarpoolState, filter: &TripFilter) -> Vec<TripRow> {
        Self::list_trips(state, filter)
            .into_iter()
            .map(|trip| TripRow {
                id: trip.id.clone(),
                date: trip.date.clone(),
                car_id: trip.car_id.clone(),
                car_name: state.car(&trip.car_id).map(|c| c.name.clone()),
                driver_id: trip.driver_id.clone(),
                driver_name: state.person(&trip.driver_id).map(|p| p.name.clone()),
                passenger_names: trip
                    .passenger_ids
                    .iter()
                    .filter_map(|id| state.person(id))
                    .map(|p| p.name.clone())
                    .collect(),
            })
            .collect()
    }

    /// `list_adjustments` with names attached.
    #[must_use]
    pub fn adjustment_rows(state: &CarpoolState, limit: usize) -> Vec<AdjustmentRow> {
        Self::list_adjustments(state, limit)
            .iter()
            .map(|adj| AdjustmentRow {
                id: adj.id.clone(),
                car_id: adj.car_id.clone(),
                car_name: state.car(&adj.car_id).map(|c| c.name.clone()),
                person_id: adj.person_id.clone(),
                person_name: state.person(&adj.person_id).map(|p| p.name.clone()),
                amount: adj.amount,
                direction: Direction::of(adj.amount),
                display_amount: Money::new(adj.amount.abs()).to_string(),
                note: adj.note.clone(),
                created_at: DateTime::parse_from_rfc3339(&adj.created_at)
                    .ok()
                    .map(|t| t.with_timezone(&Utc)),
            })
            .collect()
    }
}
