//! Property-based tests for QueryService listings.

use proptest::prelude::*;
use rust_decimal::Decimal;

use carpool_shared::types::{AdjustmentId, CarId, PersonId, TripId};

use super::filter::{BalanceFilter, TripFilter};
use super::service::{QueryService, SUPPRESSION_THRESHOLD};
use crate::model::{Adjustment, Car, CarpoolState, FuelType, Person, Trip};

/// Two cars, three people, balances driven by adjustments only.
fn adjusted_state() -> impl Strategy<Value = CarpoolState> {
    prop::collection::vec((0usize..2, 0usize..3, -50_000i64..50_000i64), 0..20).prop_map(
        |adjustments| {
            let car_id = |i: usize| CarId::new(format!("car-{i}"));
            let person_id = |i: usize| PersonId::new(format!("person-{i}"));
            CarpoolState {
                cars: (0..2)
                    .map(|i| Car {
                        id: car_id(i),
                        name: format!("Car {i}"),
                        fuel_type: FuelType::Diesel,
                    })
                    .collect(),
                people: (0..3)
                    .map(|i| Person {
                        id: person_id(i),
                        name: format!("Person {i}"),
                        rates: Default::default(),
                    })
                    .collect(),
                trips: Vec::new(),
                adjustments: adjustments
                    .into_iter()
                    .enumerate()
                    .map(|(i, (car, person, cents))| Adjustment {
                        id: AdjustmentId::new(format!("adj-{i}")),
                        car_id: car_id(car),
                        person_id: person_id(person),
                        amount: Decimal::new(cents, 2),
                        note: String::new(),
                        created_at: String::new(),
                    })
                    .collect(),
            }
        },
    )
}

/// Trips over a handful of dates.
fn dated_trips() -> impl Strategy<Value = CarpoolState> {
    prop::collection::vec(1u32..6, 0..15).prop_map(|days| CarpoolState {
        trips: days
            .into_iter()
            .enumerate()
            .map(|(i, day)| Trip {
                id: TripId::new(format!("trip-{i}")),
                date: format!("2024-03-0{day}"),
                car_id: CarId::new("car-0"),
                driver_id: PersonId::new("person-0"),
                passenger_ids: Vec::new(),
            })
            .collect(),
        ..CarpoolState::default()
    })
}

proptest! {
    /// *For any* state, listed balances are non-negligible and ordered by magnitude.
    #[test]
    fn prop_balances_filtered_and_sorted(state in adjusted_state()) {
        let entries = QueryService::list_balances(&state, &BalanceFilter::new());
        for entry in &entries {
            prop_assert!(entry.amount.abs() >= SUPPRESSION_THRESHOLD);
        }
        for pair in entries.windows(2) {
            prop_assert!(pair[0].amount.abs() >= pair[1].amount.abs());
        }
    }

    /// *For any* person, the filtered listing is the unfiltered one restricted to them.
    #[test]
    fn prop_person_filter_is_restriction(state in adjusted_state(), person in 0usize..3) {
        let person_id = PersonId::new(format!("person-{person}"));
        let all = QueryService::list_balances(&state, &BalanceFilter::new());
        let filtered =
            QueryService::list_balances(&state, &BalanceFilter::new().for_person(person_id.clone()));
        let expected: Vec<_> = all.into_iter().filter(|e| e.person_id == person_id).collect();
        prop_assert_eq!(filtered, expected);
    }

    /// *For any* trips, listing is date-descending and per-date counts add up.
    #[test]
    fn prop_trips_sorted_and_counted(state in dated_trips()) {
        let trips = QueryService::list_trips(&state, &TripFilter::new());
        prop_assert_eq!(trips.len(), state.trips.len());
        for pair in trips.windows(2) {
            prop_assert!(pair[0].date >= pair[1].date);
        }
        let counted: usize = QueryService::trips_by_date(&state).values().sum();
        prop_assert_eq!(counted, state.trips.len());
    }
}
