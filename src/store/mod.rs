//! Durable key-value storage for the session credential.
//!
//! The session token lives under a single fixed key. Backends implement
//! [`CredentialStore`]; the rest of the crate only ever reaches storage
//! through the [`crate::session::Session`] handle.

pub mod file;
#[cfg(feature = "keychain")]
pub mod keychain;
pub mod memory;

use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub use file::FileStore;
#[cfg(feature = "keychain")]
pub use keychain::KeychainStore;
pub use memory::MemoryStore;

/// Storage key the bearer token is persisted under.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("Keychain operation failed: {0}")]
    Keychain(String),
}

/// An opaque bearer token.
///
/// The inner string is wiped when the value is dropped and never shows up
/// in `Debug` output, so credentials cannot leak through logs.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionCredential(String);

impl SessionCredential {
    /// Wrap a raw token exactly as issued. Returns `None` for empty or
    /// whitespace-only input, which is never a usable credential.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let mut token = token.into();
        if token.trim().is_empty() {
            token.zeroize();
            return None;
        }
        Some(Self(token))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionCredential(<redacted>)")
    }
}

/// Backend holding at most one session credential.
///
/// `clear` is idempotent: clearing an absent credential succeeds.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<SessionCredential>, StoreError>;
    fn save(&self, credential: &SessionCredential) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}
