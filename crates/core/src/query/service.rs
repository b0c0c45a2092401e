//! Query service shaping balances, trips and adjustments for display.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::balance::{BalanceEngine, BalanceEntry, BalanceMatrix};
use crate::model::{Adjustment, CarpoolState, Trip};

use super::filter::{BalanceFilter, TripFilter};

/// Balances smaller than this in magnitude are treated as rounding noise.
pub const SUPPRESSION_THRESHOLD: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Read-only views over a state document.
pub struct QueryService;

impl QueryService {
    /// Lists non-negligible balances, largest magnitude first.
    ///
    /// Entries with `|amount| < 0.5` are dropped. Ties keep car-major,
    /// then person, order.
    #[must_use]
    pub fn list_balances(state: &CarpoolState, filter: &BalanceFilter) -> Vec<BalanceEntry> {
        Self::balances_of(&BalanceEngine::compute(state), filter)
    }

    /// `list_balances` over an already computed matrix.
    #[must_use]
    pub fn balances_of(matrix: &BalanceMatrix, filter: &BalanceFilter) -> Vec<BalanceEntry> {
        let mut entries: Vec<BalanceEntry> = matrix
            .entries()
            .filter(|e| filter.matches(&e.person_id))
            .filter(|e| e.amount.abs() >= SUPPRESSION_THRESHOLD)
            .collect();

        entries.sort_by(|a, b| b.amount.abs().cmp(&a.amount.abs()));
        entries
    }

    /// Lists trips, newest date first.
    ///
    /// Trips on the same date appear most recently recorded first.
    #[must_use]
    pub fn list_trips<'a>(state: &'a CarpoolState, filter: &TripFilter) -> Vec<&'a Trip> {
        let mut trips: Vec<&Trip> = state
            .trips
            .iter()
            .rev()
            .filter(|t| filter.matches(&t.car_id))
            .collect();

        trips.sort_by(|a, b| b.date.cmp(&a.date));
        trips
    }

    /// Returns the `limit` most recent adjustments.
    #[must_use]
    pub fn list_adjustments(state: &CarpoolState, limit: usize) -> &[Adjustment] {
        let end = limit.min(state.adjustments.len());
        &state.adjustments[..end]
    }

    /// Counts trips per date. Trips without a date are skipped.
    #[must_use]
    pub fn trips_by_date(state: &CarpoolState) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for trip in state.trips.iter().filter(|t| !t.date.is_empty()) {
            *counts.entry(trip.date.clone()).or_insert(0) += 1;
        }
        counts
    }
}
