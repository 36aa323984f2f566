//! Store configuration shared by every binary.
//!
//! # Environment Variables
//!
//! - `ZEIDAN_STORE` - Backend: `google` (default) or `memory`
//! - `ZEIDAN_SPREADSHEET` - Spreadsheet ID or link (required for `google`)
//! - `ZEIDAN_CREDENTIALS_JSON` - Service-account key JSON (takes precedence)
//! - `ZEIDAN_CREDENTIALS_FILE` - Path to the key file (default: zeidan-parfum.json)

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::info;

use zeidan_core::schema::ALL_TABLES;

use crate::google::{GoogleSheetsStore, ServiceAccountKey, spreadsheet_id_from_link};
use crate::{MemoryStore, StoreError, TableStore};

const DEFAULT_CREDENTIALS_FILE: &str = "zeidan-parfum.json";

/// Store configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which store implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Google,
    /// Process-local; data is lost on restart.
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" | "sheets" => Ok(Self::Google),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend '{other}' (expected google or memory)")),
        }
    }
}

/// Where the service-account key comes from.
#[derive(Clone)]
pub enum Credentials {
    Json(SecretString),
    File(PathBuf),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(_) => f.write_str("Json([REDACTED])"),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

impl Credentials {
    fn load(&self) -> Result<ServiceAccountKey, StoreError> {
        match self {
            Self::Json(json) => ServiceAccountKey::from_json(json.expose_secret()),
            Self::File(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    StoreError::Unauthenticated(format!(
                        "cannot read credentials file {}: {e}",
                        path.display()
                    ))
                })?;
                ServiceAccountKey::from_json(&json)
            }
        }
    }
}

/// Store settings.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub backend: StoreBackend,
    /// Spreadsheet ID; `None` only for the memory backend.
    pub spreadsheet_id: Option<String>,
    pub credentials: Credentials,
}

impl SheetsConfig {
    /// Load from environment variables.
    ///
    /// Does not call `dotenvy`; binaries load `.env` before this.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the backend is unknown or the Google backend
    /// has no spreadsheet configured.
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = std::env::var("ZEIDAN_STORE")
            .ok()
            .map(|s| s.parse::<StoreBackend>())
            .transpose()
            .map_err(|e| ConfigError::InvalidEnvVar("ZEIDAN_STORE".to_string(), e))?
            .unwrap_or(StoreBackend::Google);

        let spreadsheet_id = match std::env::var("ZEIDAN_SPREADSHEET") {
            Ok(link) => Some(spreadsheet_id_from_link(&link).ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "ZEIDAN_SPREADSHEET".to_string(),
                    "no spreadsheet ID in value".to_string(),
                )
            })?),
            Err(_) => None,
        };
        if backend == StoreBackend::Google && spreadsheet_id.is_none() {
            return Err(ConfigError::MissingEnvVar("ZEIDAN_SPREADSHEET".to_string()));
        }

        let credentials = std::env::var("ZEIDAN_CREDENTIALS_JSON").map_or_else(
            |_| {
                Credentials::File(PathBuf::from(
                    std::env::var("ZEIDAN_CREDENTIALS_FILE")
                        .unwrap_or_else(|_| DEFAULT_CREDENTIALS_FILE.to_string()),
                ))
            },
            |json| Credentials::Json(SecretString::from(json)),
        );

        Ok(Self {
            backend,
            spreadsheet_id,
            credentials,
        })
    }

    /// An in-memory configuration with every worksheet created.
    #[must_use]
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            spreadsheet_id: None,
            credentials: Credentials::File(PathBuf::from(DEFAULT_CREDENTIALS_FILE)),
        }
    }

    /// Build the configured store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unauthenticated` if the service-account key cannot
    /// be read or parsed.
    pub fn connect(&self) -> Result<Arc<dyn TableStore>, StoreError> {
        match (self.backend, &self.spreadsheet_id) {
            (StoreBackend::Memory, _) => {
                info!("Using in-memory store");
                Ok(Arc::new(MemoryStore::with_schema(ALL_TABLES)))
            }
            (StoreBackend::Google, Some(id)) => {
                let key = self.credentials.load()?;
                info!(spreadsheet_id = %id, client_email = %key.client_email, "Using Google Sheets store");
                Ok(Arc::new(GoogleSheetsStore::new(key, id.clone())?))
            }
            (StoreBackend::Google, None) => Err(StoreError::NotFound(
                "no spreadsheet configured".to_string(),
            )),
        }
    }
}
