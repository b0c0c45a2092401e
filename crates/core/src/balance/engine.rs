//! Per-car, per-person balance computation.
//!
//! Positive amounts are owed to the car's pool, negative amounts are credit.
//! The matrix is dense over existing cars × existing people and is recomputed
//! from scratch on every call.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use carpool_shared::types::{CarId, PersonId};

use crate::model::{CarpoolState, Person};

/// One cell of the balance matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceEntry {
    /// The car.
    pub car_id: CarId,
    /// The person.
    pub person_id: PersonId,
    /// Net amount owed (negative = credit).
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Dense car × person balance matrix.
///
/// Rows follow car order and columns follow person order of the state the
/// matrix was computed from. Duplicate ids keep their first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BalanceMatrix {
    car_ids: Vec<CarId>,
    person_ids: Vec<PersonId>,
    amounts: Vec<Decimal>,
    saturated: bool,
}

impl BalanceMatrix {
    /// Returns true if some cell overflowed and was clamped to the
    /// `Decimal` range. Only possible with out-of-range stored amounts.
    #[must_use]
    pub fn is_saturated(&self) -> bool {
        self.saturated
    }

    /// Balance of `person_id` on `car_id`, if both existed.
    #[must_use]
    pub fn get(&self, car_id: &CarId, person_id: &PersonId) -> Option<Decimal> {
        let ci = self.car_ids.iter().position(|c| c == car_id)?;
        let pi = self.person_ids.iter().position(|p| p == person_id)?;
        self.amounts.get(ci * self.person_ids.len() + pi).copied()
    }

    /// Cars covered, in row order.
    #[must_use]
    pub fn car_ids(&self) -> &[CarId] {
        &self.car_ids
    }

    /// People covered, in column order.
    #[must_use]
    pub fn person_ids(&self) -> &[PersonId] {
        &self.person_ids
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    /// Returns true if there are no cars or no people.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// All cells, car-major.
    pub fn entries(&self) -> impl Iterator<Item = BalanceEntry> + '_ {
        self.car_ids.iter().enumerate().flat_map(move |(ci, car_id)| {
            self.person_ids.iter().enumerate().map(move |(pi, person_id)| BalanceEntry {
                car_id: car_id.clone(),
                person_id: person_id.clone(),
                amount: self.amounts[ci * self.person_ids.len() + pi],
            })
        })
    }

    /// Nested `car → person → amount` view, as sent over the wire.
    #[must_use]
    pub fn to_nested(&self) -> Vec<CarBalances> {
        self.car_ids
            .iter()
            .enumerate()
            .map(|(ci, car_id)| CarBalances {
                car_id: car_id.clone(),
                people: self
                    .person_ids
                    .iter()
                    .enumerate()
                    .map(|(pi, person_id)| PersonBalance {
                        person_id: person_id.clone(),
                        amount: self.amounts[ci * self.person_ids.len() + pi],
                    })
                    .collect(),
            })
            .collect()
    }
}

/// All balances on one car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarBalances {
    /// The car.
    pub car_id: CarId,
    /// One balance per person.
    pub people: Vec<PersonBalance>,
}

/// A person's balance on a given car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonBalance {
    /// The person.
    pub person_id: PersonId,
    /// Net amount owed (negative = credit).
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Pure balance computation over a state document.
pub struct BalanceEngine;

impl BalanceEngine {
    /// Computes the dense balance matrix.
    ///
    /// 1. Every existing (car, person) cell starts at zero
    /// 2. Each passenger on a trip adds their effective rate for the trip's car
    /// 3. Each adjustment adds its signed amount
    ///
    /// Trips and adjustments that reference a missing car or person are skipped.
    #[must_use]
    pub fn compute(state: &CarpoolState) -> BalanceMatrix {
        let mut car_index: HashMap<&CarId, usize> = HashMap::with_capacity(state.cars.len());
        let mut car_ids = Vec::with_capacity(state.cars.len());
        for car in &state.cars {
            if !car_index.contains_key(&car.id) {
                car_index.insert(&car.id, car_ids.len());
                car_ids.push(car.id.clone());
            }
        }

        let mut person_index: HashMap<&PersonId, (usize, &Person)> =
            HashMap::with_capacity(state.people.len());
        let mut person_ids = Vec::with_capacity(state.people.len());
        for person in &state.people {
            if !person_index.contains_key(&person.id) {
                person_index.insert(&person.id, (person_ids.len(), person));
                person_ids.push(person.id.clone());
            }
        }

        let width = person_ids.len();
        let mut amounts = vec![Decimal::ZERO; car_ids.len() * width];
        let mut saturated = false;

        for trip in &state.trips {
            let Some(&ci) = car_index.get(&trip.car_id) else {
                continue;
            };
            for passenger_id in &trip.passenger_ids {
                if let Some(&(pi, passenger)) = person_index.get(passenger_id) {
                    let rate = passenger.effective_rate(&trip.car_id);
                    accumulate(&mut amounts[ci * width + pi], rate, &mut saturated);
                }
            }
        }

        for adjustment in &state.adjustments {
            let (Some(&ci), Some(&(pi, _))) = (
                car_index.get(&adjustment.car_id),
                person_index.get(&adjustment.person_id),
            ) else {
                continue;
            };
            accumulate(&mut amounts[ci * width + pi], adjustment.amount, &mut saturated);
        }

        BalanceMatrix {
            car_ids,
            person_ids,
            amounts,
            saturated,
        }
    }
}

/// Adds `amount` to `cell`, clamping at the `Decimal` bounds on overflow.
fn accumulate(cell: &mut Decimal, amount: Decimal, saturated: &mut bool) {
    match cell.checked_add(amount) {
        Some(sum) => *cell = sum,
        None => {
            *cell = cell.saturating_add(amount);
            *saturated = true;
        }
    }
}
