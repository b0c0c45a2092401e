//! Property-based tests for BalanceEngine.
//!
//! - Application order of trips and adjustments never changes the result
//! - Every existing (car, person) pair has a cell
//! - The matrix equals a naive per-cell recomputation

use std::collections::BTreeMap;

use proptest::prelude::*;
use rust_decimal::Decimal;

use carpool_shared::types::{AdjustmentId, CarId, PersonId, TripId};

use super::engine::BalanceEngine;
use crate::model::{Adjustment, Car, CarpoolState, FuelType, Person, Trip};

/// Strategy for signed amounts (-1,000.00 to 1,000.00).
fn signed_amount() -> impl Strategy<Value = Decimal> {
    (-100_000i64..100_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for a state with dangling references mixed in.
///
/// Car and person indices run one past the end so some trips and
/// adjustments point at records that do not exist.
fn state_strategy() -> impl Strategy<Value = CarpoolState> {
    (1usize..4, 1usize..5).prop_flat_map(|(n_cars, n_people)| {
        let rates = prop::collection::vec(
            prop::collection::vec(signed_amount(), n_cars),
            n_people,
        );
        let trips = prop::collection::vec(
            (
                0..=n_cars,
                0..=n_people,
                prop::collection::vec(0..=n_people, 0..4),
            ),
            0..12,
        );
        let adjustments =
            prop::collection::vec((0..=n_cars, 0..=n_people, signed_amount()), 0..8);

        (Just(n_cars), rates, trips, adjustments).prop_map(
            |(n_cars, rates, trips, adjustments)| {
                let car_id = |i: usize| CarId::new(format!("car-{i}"));
                let person_id = |i: usize| PersonId::new(format!("person-{i}"));

                let cars = (0..n_cars)
                    .map(|i| Car {
                        id: car_id(i),
                        name: format!("Car {i}"),
                        fuel_type: FuelType::Petrol,
                    })
                    .collect();
                let people = rates
                    .iter()
                    .enumerate()
                    .map(|(i, row)| Person {
                        id: person_id(i),
                        name: format!("Person {i}"),
                        rates: row
                            .iter()
                            .enumerate()
                            .map(|(c, rate)| (car_id(c), *rate))
                            .collect::<BTreeMap<_, _>>(),
                    })
                    .collect();
                let trips = trips
                    .into_iter()
                    .enumerate()
                    .map(|(i, (car, driver, passengers))| Trip {
                        id: TripId::new(format!("trip-{i}")),
                        date: "2024-01-05".to_string(),
                        car_id: car_id(car),
                        driver_id: person_id(driver),
                        passenger_ids: passengers.into_iter().map(person_id).collect(),
                    })
                    .collect();
                let adjustments = adjustments
                    .into_iter()
                    .enumerate()
                    .map(|(i, (car, person, amount))| Adjustment {
                        id: AdjustmentId::new(format!("adj-{i}")),
                        car_id: car_id(car),
                        person_id: person_id(person),
                        amount,
                        note: String::new(),
                        created_at: String::new(),
                    })
                    .collect();

                CarpoolState {
                    cars,
                    people,
                    trips,
                    adjustments,
                }
            },
        )
    })
}

/// State paired with a shuffled copy of itself.
fn shuffled_pair() -> impl Strategy<Value = (CarpoolState, CarpoolState)> {
    state_strategy().prop_flat_map(|state| {
        let trips = Just(state.trips.clone()).prop_shuffle();
        let adjustments = Just(state.adjustments.clone()).prop_shuffle();
        (Just(state), trips, adjustments).prop_map(|(state, trips, adjustments)| {
            let shuffled = CarpoolState {
                trips,
                adjustments,
                ..state.clone()
            };
            (state, shuffled)
        })
    })
}

/// Recomputes one cell by scanning every record.
fn naive_cell(state: &CarpoolState, car: &Car, person: &Person) -> Decimal {
    let from_trips: Decimal = state
        .trips
        .iter()
        .filter(|t| t.car_id == car.id)
        .flat_map(|t| t.passenger_ids.iter())
        .filter(|pid| **pid == person.id)
        .map(|_| person.effective_rate(&car.id))
        .sum();
    let from_adjustments: Decimal = state
        .adjustments
        .iter()
        .filter(|a| a.car_id == car.id && a.person_id == person.id)
        .map(|a| a.amount)
        .sum();
    from_trips + from_adjustments
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* permutation of trips and adjustments, the matrix is identical.
    #[test]
    fn prop_application_order_is_irrelevant((state, shuffled) in shuffled_pair()) {
        prop_assert_eq!(
            BalanceEngine::compute(&state),
            BalanceEngine::compute(&shuffled)
        );
    }

    /// *For any* state, every existing car × person pair has a cell.
    #[test]
    fn prop_matrix_is_dense(state in state_strategy()) {
        let matrix = BalanceEngine::compute(&state);
        prop_assert_eq!(matrix.len(), state.cars.len() * state.people.len());
        for car in &state.cars {
            for person in &state.people {
                prop_assert!(matrix.get(&car.id, &person.id).is_some());
            }
        }
    }

    /// *For any* state, each cell equals a naive recomputation.
    #[test]
    fn prop_cells_match_naive_sum(state in state_strategy()) {
        let matrix = BalanceEngine::compute(&state);
        for car in &state.cars {
            for person in &state.people {
                prop_assert_eq!(
                    matrix.get(&car.id, &person.id),
                    Some(naive_cell(&state, car, person))
                );
            }
        }
    }

    /// *For any* state, a trip's driver never accrues from that trip alone.
    #[test]
    fn prop_driver_excluded_from_own_trip(state in state_strategy()) {
        let mut only_drivers = state.clone();
        only_drivers.adjustments.clear();
        for trip in &mut only_drivers.trips {
            let driver = trip.driver_id.clone();
            trip.passenger_ids.retain(|p| *p != driver);
        }
        let matrix = BalanceEngine::compute(&only_drivers);
        for trip in &only_drivers.trips {
            let charged_elsewhere = only_drivers.trips.iter().any(|t| {
                t.car_id == trip.car_id && t.passenger_ids.contains(&trip.driver_id)
            });
            if !charged_elsewhere {
                if let Some(amount) = matrix.get(&trip.car_id, &trip.driver_id) {
                    prop_assert_eq!(amount, Decimal::ZERO);
                }
            }
        }
    }
}
