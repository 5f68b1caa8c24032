//! Runtime configuration.
//!
//! Defaults point at the hosted backend. The CLI layers flags and
//! `ISP_PORTAL_*` environment variables (optionally from `.env`) on top.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::api::DEFAULT_TIMEOUT;
use crate::session::bootstrap::SPLASH_DURATION;
use crate::store::{CredentialStore, FileStore};

pub const DEFAULT_API_URL: &str = "https://internetserviceprovider.vercel.app/api";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API URL must start with http:// or https://, got {0:?}")]
    InvalidApiUrl(String),
    #[error("Request timeout must be greater than zero")]
    ZeroTimeout,
    #[error("No data directory available; pass --store-path")]
    NoStorePath,
    #[error("Keychain storage is not available in this build")]
    KeychainUnavailable,
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Where the session credential is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StoreBackend {
    /// JSON file in the platform data directory.
    #[default]
    File,
    /// OS keychain.
    Keychain,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub timeout: Duration,
    pub store: StoreBackend,
    /// Overrides the file store location.
    pub store_path: Option<PathBuf>,
    /// Minimum time the startup check keeps its loading indicator up.
    pub splash: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            store: StoreBackend::default(),
            store_path: None,
            splash: SPLASH_DURATION,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidApiUrl(self.api_url.clone()));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Open the configured credential store.
    pub fn open_store(&self) -> Result<Arc<dyn CredentialStore>, ConfigError> {
        match self.store {
            StoreBackend::File => {
                let path = self
                    .store_path
                    .clone()
                    .or_else(FileStore::default_path)
                    .ok_or(ConfigError::NoStorePath)?;
                log::debug!("Using file credential store at {}", path.display());
                Ok(Arc::new(FileStore::new(path)))
            }
            #[cfg(feature = "keychain")]
            StoreBackend::Keychain => Ok(Arc::new(crate::store::KeychainStore::new())),
            #[cfg(not(feature = "keychain"))]
            StoreBackend::Keychain => Err(ConfigError::KeychainUnavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.splash, Duration::from_secs(3));
        assert_eq!(config.store, StoreBackend::File);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_url_and_zero_timeout() {
        let config = AppConfig {
            api_url: "ftp://example.test".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidApiUrl(_))));

        let config = AppConfig {
            timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn test_file_store_uses_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let config = AppConfig {
            store_path: Some(path.clone()),
            ..Default::default()
        };
        let store = config.open_store().unwrap();
        assert!(store.load().unwrap().is_none());

        let credential = crate::store::SessionCredential::new("tok1").unwrap();
        store.save(&credential).unwrap();
        assert!(path.exists());
    }
}
