//! Filters for list queries.

use serde::{Deserialize, Serialize};

use carpool_shared::types::{CarId, PersonId};

/// Default number of adjustments returned by recency listings.
pub const DEFAULT_ADJUSTMENT_LIMIT: usize = 20;

/// Filter for balance listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceFilter {
    /// Restrict to one person.
    #[serde(default)]
    pub person_id: Option<PersonId>,
}

impl BalanceFilter {
    /// Creates a new empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the filter to one person.
    #[must_use]
    pub fn for_person(mut self, person_id: PersonId) -> Self {
        self.person_id = Some(person_id);
        self
    }

    /// Returns true if `person_id` passes the filter.
    #[must_use]
    pub fn matches(&self, person_id: &PersonId) -> bool {
        self.person_id.as_ref().is_none_or(|p| p == person_id)
    }
}

/// Filter for trip listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripFilter {
    /// Restrict to one car.
    #[serde(default)]
    pub car_id: Option<CarId>,
}

impl TripFilter {
    /// Creates a new empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the filter to one car.
    #[must_use]
    pub fn for_car(mut self, car_id: CarId) -> Self {
        self.car_id = Some(car_id);
        self
    }

    /// Returns true if `car_id` passes the filter.
    #[must_use]
    pub fn matches(&self, car_id: &CarId) -> bool {
        self.car_id.as_ref().is_none_or(|c| c == car_id)
    }
}
