//! Storage configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use carpool_shared::StorageSettings;

use super::error::StorageError;

/// Storage provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: Cloudflare R2, AWS S3, MinIO.
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        region: String,
    },
    /// Local filesystem.
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// Process memory. Lost on exit.
    Memory,
}

impl StorageProvider {
    /// Create S3-compatible provider.
    #[must_use]
    pub fn s3(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self::S3 {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }

    /// Create local filesystem provider.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::LocalFs { .. } => "local_fs",
            Self::Memory => "memory",
        }
    }
}

/// Where and under which key the state document is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Key of the state document.
    pub document_key: String,
}

impl StorageConfig {
    /// Default document key.
    pub const DEFAULT_DOCUMENT_KEY: &'static str = "data.json";

    /// Create a new storage config with the default document key.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            document_key: Self::DEFAULT_DOCUMENT_KEY.to_string(),
        }
    }

    /// In-memory storage, for tests.
    #[must_use]
    pub fn memory() -> Self {
        Self::new(StorageProvider::Memory)
    }

    /// Set the document key.
    #[must_use]
    pub fn with_document_key(mut self, key: impl Into<String>) -> Self {
        self.document_key = key.into();
        self
    }

    /// Builds a storage config from application settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is unknown or S3 settings are incomplete.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, StorageError> {
        let provider = match settings.provider.trim().to_ascii_lowercase().as_str() {
            "local_fs" | "fs" | "local" => StorageProvider::local_fs(settings.root.clone()),
            "memory" => StorageProvider::Memory,
            "s3" => {
                let require = |value: &Option<String>, name: &str| {
                    value
                        .clone()
                        .filter(|v| !v.trim().is_empty())
                        .ok_or_else(|| StorageError::configuration(format!("s3 requires {name}")))
                };
                StorageProvider::s3(
                    require(&settings.endpoint, "endpoint")?,
                    require(&settings.bucket, "bucket")?,
                    require(&settings.access_key_id, "access_key_id")?,
                    require(&settings.secret_access_key, "secret_access_key")?,
                    settings.region.clone().unwrap_or_else(|| "auto".to_string()),
                )
            }
            other => {
                return Err(StorageError::configuration(format!(
                    "unknown storage provider '{other}'"
                )));
            }
        };

        let key = settings.document_key.trim();
        if key.is_empty() {
            return Err(StorageError::configuration("document key is empty"));
        }

        Ok(Self::new(provider).with_document_key(key))
    }
}
