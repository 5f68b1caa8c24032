//! OS keychain backend for the session credential.
//!
//! Uses the `keyring` crate (macOS Keychain, Windows Credential Manager,
//! Linux kernel keyutils). The token never touches disk with this backend.

use keyring::Entry;

use super::{CredentialStore, SessionCredential, StoreError, TOKEN_KEY};

/// Keychain service name for this client.
pub const SERVICE_NAME: &str = "com.ispportal.client";

impl From<keyring::Error> for StoreError {
    fn from(err: keyring::Error) -> Self {
        StoreError::Keychain(err.to_string())
    }
}

/// Credential store backed by a single keychain entry.
pub struct KeychainStore {
    service: String,
}

impl KeychainStore {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    pub fn with_service(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    fn entry(&self) -> Result<Entry, StoreError> {
        Ok(Entry::new(&self.service, TOKEN_KEY)?)
    }
}

impl Default for KeychainStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeychainStore {
    /// Returns `None` if no entry exists (never logged in, or logged out).
    fn load(&self) -> Result<Option<SessionCredential>, StoreError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(SessionCredential::new(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StoreError::from(e)),
        }
    }

    fn save(&self, credential: &SessionCredential) -> Result<(), StoreError> {
        self.entry()?.set_password(credential.expose())?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // already gone
            Err(e) => Err(StoreError::from(e)),
        }
    }
}
