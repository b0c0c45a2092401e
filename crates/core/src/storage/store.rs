//! State document store using Apache OpenDAL.

use opendal::{ErrorKind, Operator, services};

use crate::model::CarpoolState;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Loads and saves the whole state document under one key.
#[derive(Debug, Clone)]
pub struct StateStore {
    operator: Operator,
    config: StorageConfig,
}

impl StateStore {
    /// Create a new store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// In-memory store with the default document key.
    ///
    /// # Errors
    ///
    /// Returns an error if the memory backend cannot be initialized.
    pub fn memory() -> Result<Self, StorageError> {
        Self::from_config(StorageConfig::memory())
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map(|b| b.finish())
                    .map_err(|e| StorageError::configuration(e.to_string()))
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map(|b| b.finish())
                    .map_err(|e| StorageError::configuration(e.to_string()))
            }
            StorageProvider::Memory => Operator::new(services::Memory::default())
                .map(|b| b.finish())
                .map_err(|e| StorageError::configuration(e.to_string())),
        }
    }

    /// Reads and parses the document.
    ///
    /// Returns `Ok(None)` if no document exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or is not valid JSON.
    pub async fn try_load(&self) -> Result<Option<CarpoolState>, StorageError> {
        let bytes = match self.operator.read(&self.config.document_key).await {
            Ok(buffer) => buffer.to_vec(),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let state = serde_json::from_slice(&bytes)?;
        Ok(Some(state))
    }

    /// Loads the document, falling back to an empty state.
    ///
    /// A missing document is created with empty collections. Read and
    /// parse failures are logged and yield an empty state.
    pub async fn load(&self) -> CarpoolState {
        match self.try_load().await {
            Ok(Some(state)) => {
                tracing::info!(
                    key = %self.config.document_key,
                    cars = state.cars.len(),
                    people = state.people.len(),
                    trips = state.trips.len(),
                    adjustments = state.adjustments.len(),
                    "Loaded state document"
                );
                state
            }
            Ok(None) => {
                let state = CarpoolState::default();
                if let Err(e) = self.save(&state).await {
                    tracing::warn!(error = %e, key = %self.config.document_key, "Failed to create state document");
                } else {
                    tracing::info!(key = %self.config.document_key, "Created empty state document");
                }
                state
            }
            Err(e) => {
                tracing::error!(error = %e, key = %self.config.document_key, "Failed to load state document");
                CarpoolState::default()
            }
        }
    }

    /// Writes the full document as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails.
    pub async fn save(&self, state: &CarpoolState) -> Result<(), StorageError> {
        let body = serde_json::to_vec_pretty(state)?;
        self.operator
            .write(&self.config.document_key, body)
            .await
            .map_err(StorageError::from)?;
        tracing::debug!(key = %self.config.document_key, "Saved state document");
        Ok(())
    }

    /// Writes raw bytes under the document key.
    #[cfg(test)]
    pub(crate) async fn save_raw(&self, body: impl Into<Vec<u8>>) -> Result<(), StorageError> {
        self.operator
            .write(&self.config.document_key, body.into())
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::model::{LedgerService, NewAdjustment, parse_amount};

    fn store() -> StateStore {
        StateStore::memory().expect("memory store")
    }

    #[tokio::test]
    async fn test_missing_document_loads_empty_and_is_created() {
        let store = store();
        assert!(store.try_load().await.unwrap().is_none());

        let state = store.load().await;
        assert!(state.is_empty());

        let created = store.try_load().await.unwrap();
        assert_eq!(created, Some(CarpoolState::default()));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = store();
        let mut state = CarpoolState::default();
        let car = LedgerService::add_car(&mut state, "Sedan", "petrol").unwrap();
        let person = LedgerService::add_person(&mut state, "Alice").unwrap();
        LedgerService::set_rate(&mut state, &person.id, car.id.clone(), dec!(120)).unwrap();

        store.save(&state).await.unwrap();
        assert_eq!(store.load().await, state);
    }

    #[tokio::test]
    async fn test_document_has_four_collections() {
        let store = store();
        store.save(&CarpoolState::default()).await.unwrap();

        let bytes = store
            .operator
            .read(&store.config.document_key)
            .await
            .unwrap()
            .to_vec();
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let mut keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["adjustments", "cars", "people", "trips"]);
    }

    #[tokio::test]
    async fn test_corrupt_document_loads_empty() {
        let store = store();
        store.save_raw("{ not json").await.unwrap();

        assert!(matches!(
            store.try_load().await,
            Err(StorageError::Serialization(_))
        ));
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_partial_document_defaults_missing_keys() {
        let store = store();
        store
            .save_raw(r#"{"cars":[{"id":"c1","name":"Sedan","fuelType":"petrol"}],"trips":"oops"}"#)
            .await
            .unwrap();

        let state = store.load().await;
        assert_eq!(state.cars.len(), 1);
        assert!(state.people.is_empty());
        assert!(state.trips.is_empty());
        assert!(state.adjustments.is_empty());
    }

    #[tokio::test]
    async fn test_custom_document_key() {
        let config = StorageConfig::memory().with_document_key("pool.json");
        let store = StateStore::from_config(config).unwrap();
        store.save(&CarpoolState::default()).await.unwrap();

        assert_eq!(store.config().document_key, "pool.json");
        assert_eq!(store.provider_name(), "memory");
        assert!(store.try_load().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_largest_amounts_survive_round_trip_exactly() {
        let store = store();
        let mut state = CarpoolState::default();
        let car = LedgerService::add_car(&mut state, "Sedan", "petrol").unwrap();
        let person = LedgerService::add_person(&mut state, "Alice").unwrap();
        let rate = parse_amount("999999999999.99").unwrap();
        LedgerService::set_rate(&mut state, &person.id, car.id.clone(), rate).unwrap();
        for raw in ["-999999999999.99", "0.01", "123456789.87"] {
            LedgerService::add_adjustment(
                &mut state,
                NewAdjustment {
                    car_id: car.id.clone(),
                    person_id: person.id.clone(),
                    amount: parse_amount(raw).unwrap(),
                    note: None,
                },
            )
            .unwrap();
        }

        store.save(&state).await.unwrap();
        let loaded = store.load().await;
        assert_eq!(loaded, state);
        assert_eq!(loaded.people[0].rates[&car.id], dec!(999999999999.99));
        assert_eq!(loaded.adjustments[2].amount, dec!(-999999999999.99));
    }
}
