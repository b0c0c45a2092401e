//! Carpool domain types.
//!
//! The four record shapes (cars, people, trips, adjustments) and the state
//! document that holds them. Field names are camelCase on the wire so that
//! documents written by earlier clients load unchanged.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use carpool_shared::types::{AdjustmentId, CarId, PersonId, TripId};

/// Fuel a car runs on.
///
/// Unknown values found in a loaded document are kept verbatim in `Other`
/// so that a save never rewrites them; new cars must use a known kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FuelType {
    /// Petrol / gasoline.
    Petrol,
    /// Diesel.
    Diesel,
    /// Compressed natural gas.
    Cng,
    /// Battery electric.
    Electric,
    /// Hybrid drivetrain.
    Hybrid,
    /// Value not recognized by this version.
    Other(String),
}

impl FuelType {
    /// Parses a recognized fuel type, case-insensitively.
    ///
    /// Returns `None` for anything else, including blank input.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "petrol" => Some(Self::Petrol),
            "diesel" => Some(Self::Diesel),
            "cng" => Some(Self::Cng),
            "electric" => Some(Self::Electric),
            "hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }

    /// Returns the wire name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Petrol => "petrol",
            Self::Diesel => "diesel",
            Self::Cng => "cng",
            Self::Electric => "electric",
            Self::Hybrid => "hybrid",
            Self::Other(s) => s,
        }
    }

    /// Returns true if this is one of the known kinds.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for FuelType {
    fn from(s: String) -> Self {
        Self::parse(&s).unwrap_or(Self::Other(s))
    }
}

impl From<FuelType> for String {
    fn from(fuel: FuelType) -> Self {
        fuel.as_str().to_string()
    }
}

impl std::fmt::Display for FuelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shared car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    /// Immutable identity.
    pub id: CarId,
    /// Display name.
    pub name: String,
    /// Fuel kind.
    pub fuel_type: FuelType,
}

/// A member of the pool with their per-car rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Immutable identity.
    pub id: PersonId,
    /// Display name.
    pub name: String,
    /// Charge per trip taken as a passenger, keyed by car.
    #[serde(
        default,
        deserialize_with = "deserialize_rates",
        serialize_with = "serialize_rates"
    )]
    pub rates: BTreeMap<CarId, Decimal>,
}

impl Person {
    /// Rate this person pays per passenger trip on `car_id`.
    ///
    /// Missing and negative rates count as zero.
    #[must_use]
    pub fn effective_rate(&self, car_id: &CarId) -> Decimal {
        self.rates
            .get(car_id)
            .copied()
            .unwrap_or_default()
            .max(Decimal::ZERO)
    }
}

/// A single drive: one driver, any number of passengers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    /// Immutable identity.
    pub id: TripId,
    /// ISO calendar date (`YYYY-MM-DD`).
    #[serde(default)]
    pub date: String,
    /// Car used.
    pub car_id: CarId,
    /// Person driving.
    pub driver_id: PersonId,
    /// People riding along, in selection order.
    #[serde(default)]
    pub passenger_ids: Vec<PersonId>,
}

/// A manual signed correction to a (car, person) balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustment {
    /// Immutable identity.
    pub id: AdjustmentId,
    /// Car whose pool is adjusted.
    pub car_id: CarId,
    /// Person whose balance is adjusted.
    pub person_id: PersonId,
    /// Positive adds to what the person owes, negative is a credit.
    ///
    /// Written as a JSON number. Values from `parse_amount` have at most 14
    /// significant digits and round-trip exactly; anything wider loses
    /// precision past about 15 digits.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Free-form note.
    #[serde(default)]
    pub note: String,
    /// RFC 3339 timestamp of insertion.
    #[serde(default)]
    pub created_at: String,
}

impl Adjustment {
    /// Returns true if the adjustment adds to what is owed.
    #[must_use]
    pub fn is_due(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

/// The whole persisted document.
///
/// Each collection is read leniently: a missing or non-array value loads as
/// an empty collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarpoolState {
    /// All cars.
    #[serde(default, deserialize_with = "array_or_empty")]
    pub cars: Vec<Car>,
    /// All people.
    #[serde(default, deserialize_with = "array_or_empty")]
    pub people: Vec<Person>,
    /// All trips, in insertion order.
    #[serde(default, deserialize_with = "array_or_empty")]
    pub trips: Vec<Trip>,
    /// All adjustments, most recent first.
    #[serde(default, deserialize_with = "array_or_empty")]
    pub adjustments: Vec<Adjustment>,
}

impl CarpoolState {
    /// Looks up a car by id.
    #[must_use]
    pub fn car(&self, id: &CarId) -> Option<&Car> {
        self.cars.iter().find(|c| &c.id == id)
    }

    /// Looks up a person by id.
    #[must_use]
    pub fn person(&self, id: &PersonId) -> Option<&Person> {
        self.people.iter().find(|p| &p.id == id)
    }

    /// Looks up a trip by id.
    #[must_use]
    pub fn trip(&self, id: &TripId) -> Option<&Trip> {
        self.trips.iter().find(|t| &t.id == id)
    }

    /// Returns true if every collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
            && self.people.is_empty()
            && self.trips.is_empty()
            && self.adjustments.is_empty()
    }
}

fn array_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => {
            serde_json::from_value(Value::Array(items)).map_err(serde::de::Error::custom)
        }
        _ => Ok(Vec::new()),
    }
}

/// Reads a rate table, mapping null or non-numeric values to zero.
fn deserialize_rates<'de, D>(deserializer: D) -> Result<BTreeMap<CarId, Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(raw) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };

    Ok(raw
        .into_iter()
        .map(|(car_id, value)| (CarId::from(car_id), lenient_decimal(&value)))
        .collect())
}

fn lenient_decimal(value: &Value) -> Decimal {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Decimal::ZERO,
    };
    crate::model::validation::parse_amount(&text).unwrap_or_default()
}

/// Rates are stored as JSON numbers, with the same precision limits as
/// [`Adjustment::amount`].
#[derive(Serialize)]
struct AsNumber(#[serde(with = "rust_decimal::serde::float")] Decimal);

fn serialize_rates<S>(rates: &BTreeMap<CarId, Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(rates.iter().map(|(car_id, rate)| (car_id, AsNumber(*rate))))
}
