//! Domain mutations over an explicit state handle.
//!
//! Every operation validates first and only then touches `state`, so a
//! rejected call leaves the document exactly as it was.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;

use carpool_shared::types::{AdjustmentId, CarId, PersonId, TripId};

use super::error::DomainError;
use super::types::{Adjustment, Car, CarpoolState, FuelType, Person, Trip};
use super::validation::{normalize_passengers, require_non_blank, validate_trip_date};

/// Input for recording a trip.
#[derive(Debug, Clone)]
pub struct NewTrip {
    /// ISO calendar date.
    pub date: String,
    /// Car used.
    pub car_id: CarId,
    /// Person driving.
    pub driver_id: PersonId,
    /// Selected passengers; the driver and duplicates are dropped.
    pub passenger_ids: Vec<PersonId>,
}

/// Input for recording a manual adjustment.
#[derive(Debug, Clone)]
pub struct NewAdjustment {
    /// Car whose pool is adjusted.
    pub car_id: CarId,
    /// Person whose balance is adjusted.
    pub person_id: PersonId,
    /// Signed amount; zero is allowed.
    pub amount: Decimal,
    /// Optional note.
    pub note: Option<String>,
}

/// Domain service for cars, people, trips and adjustments.
///
/// Stateless: the caller owns the `CarpoolState` and passes it in.
pub struct LedgerService;

impl LedgerService {
    /// Adds a car and gives every existing person a zero rate for it.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is blank or `fuel_type` is not recognized.
    pub fn add_car(
        state: &mut CarpoolState,
        name: &str,
        fuel_type: &str,
    ) -> Result<Car, DomainError> {
        let name = require_non_blank("name", name)?;
        let fuel_type = FuelType::parse(fuel_type)
            .ok_or_else(|| DomainError::UnknownFuelType(fuel_type.to_string()))?;

        let car = Car {
            id: CarId::generate(),
            name,
            fuel_type,
        };

        for person in &mut state.people {
            person.rates.entry(car.id.clone()).or_insert(Decimal::ZERO);
        }
        state.cars.push(car.clone());

        Ok(car)
    }

    /// Removes a car, every trip on it, and its column of every rate table.
    ///
    /// Adjustments on the car are left in place; read paths skip them.
    /// Returns true if a car was removed.
    pub fn delete_car(state: &mut CarpoolState, car_id: &CarId) -> bool {
        let before = state.cars.len();
        state.cars.retain(|c| &c.id != car_id);
        state.trips.retain(|t| &t.car_id != car_id);
        for person in &mut state.people {
            person.rates.remove(car_id);
        }
        state.cars.len() != before
    }

    /// Adds a person with a zero rate for every existing car.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is blank.
    pub fn add_person(state: &mut CarpoolState, name: &str) -> Result<Person, DomainError> {
        let name = require_non_blank("name", name)?;

        let person = Person {
            id: PersonId::generate(),
            name,
            rates: state
                .cars
                .iter()
                .map(|car| (car.id.clone(), Decimal::ZERO))
                .collect(),
        };
        state.people.push(person.clone());

        Ok(person)
    }

    /// Sets a person's per-trip rate for a car.
    ///
    /// Negative amounts are stored as given; the balance engine treats them as zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the person does not exist.
    pub fn set_rate(
        state: &mut CarpoolState,
        person_id: &PersonId,
        car_id: CarId,
        amount: Decimal,
    ) -> Result<Person, DomainError> {
        let person = state
            .people
            .iter_mut()
            .find(|p| &p.id == person_id)
            .ok_or_else(|| DomainError::PersonNotFound(person_id.clone()))?;

        person.rates.insert(car_id, amount);
        Ok(person.clone())
    }

    /// Records a trip.
    ///
    /// # Errors
    ///
    /// Returns an error if the date, car or driver is missing or invalid, or
    /// if the car or driver does not exist.
    pub fn add_trip(state: &mut CarpoolState, input: NewTrip) -> Result<Trip, DomainError> {
        let date = validate_trip_date(&input.date)?;
        if input.car_id.is_blank() {
            return Err(DomainError::Blank { field: "carId" });
        }
        if input.driver_id.is_blank() {
            return Err(DomainError::Blank { field: "driverId" });
        }
        if state.car(&input.car_id).is_none() {
            return Err(DomainError::UnknownCar(input.car_id));
        }
        if state.person(&input.driver_id).is_none() {
            return Err(DomainError::UnknownDriver(input.driver_id));
        }

        let passenger_ids = normalize_passengers(&input.driver_id, input.passenger_ids);
        let trip = Trip {
            id: TripId::generate(),
            date,
            car_id: input.car_id,
            driver_id: input.driver_id,
            passenger_ids,
        };
        state.trips.push(trip.clone());

        Ok(trip)
    }

    /// Removes a trip. Returns true if one was removed.
    pub fn delete_trip(state: &mut CarpoolState, trip_id: &TripId) -> bool {
        let before = state.trips.len();
        state.trips.retain(|t| &t.id != trip_id);
        state.trips.len() != before
    }

    /// Records an adjustment stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the car or person id is blank.
    pub fn add_adjustment(
        state: &mut CarpoolState,
        input: NewAdjustment,
    ) -> Result<Adjustment, DomainError> {
        Self::add_adjustment_at(state, input, Utc::now())
    }

    /// Records an adjustment stamped with `created_at`, at the head of the list.
    ///
    /// # Errors
    ///
    /// Returns an error if the car or person id is blank.
    pub fn add_adjustment_at(
        state: &mut CarpoolState,
        input: NewAdjustment,
        created_at: DateTime<Utc>,
    ) -> Result<Adjustment, DomainError> {
        if input.car_id.is_blank() {
            return Err(DomainError::Blank { field: "carId" });
        }
        if input.person_id.is_blank() {
            return Err(DomainError::Blank { field: "personId" });
        }

        let adjustment = Adjustment {
            id: AdjustmentId::generate(),
            car_id: input.car_id,
            person_id: input.person_id,
            amount: input.amount,
            note: input.note.map(|n| n.trim().to_string()).unwrap_or_default(),
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        state.adjustments.insert(0, adjustment.clone());

        Ok(adjustment)
    }

    /// Removes an adjustment. Returns true if one was removed.
    pub fn delete_adjustment(state: &mut CarpoolState, adjustment_id: &AdjustmentId) -> bool {
        let before = state.adjustments.len();
        state.adjustments.retain(|a| &a.id != adjustment_id);
        state.adjustments.len() != before
    }

    /// Clears every collection.
    pub fn reset(state: &mut CarpoolState) {
        *state = CarpoolState::default();
    }
}
