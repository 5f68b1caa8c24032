//! In-process credential store. Nothing survives the process.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::{CredentialStore, SessionCredential, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<Option<SessionCredential>>,
    fail_clear: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            slot: Mutex::new(SessionCredential::new(token)),
            fail_clear: AtomicBool::new(false),
        }
    }

    /// Make subsequent `clear` calls fail, to exercise best-effort deletion paths.
    pub fn fail_clears(&self, fail: bool) {
        self.fail_clear.store(fail, Ordering::SeqCst);
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<SessionCredential>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Option<SessionCredential>, StoreError> {
        Ok(self.slot().clone())
    }

    fn save(&self, credential: &SessionCredential) -> Result<(), StoreError> {
        *self.slot() = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        if self.fail_clear.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other("clear refused")));
        }
        *self.slot() = None;
        Ok(())
    }
}
