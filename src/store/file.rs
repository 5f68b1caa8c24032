//! JSON-file key-value backend.
//!
//! The file holds a flat `{ "key": "value" }` map so other small values can
//! share it later; only [`TOKEN_KEY`] is used today. Writes go to a sibling
//! temp file first and are renamed into place. On Unix the file is readable
//! by its owner only.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{CredentialStore, SessionCredential, StoreError, TOKEN_KEY};

const APP_DIR: &str = "isp-portal";
const FILE_NAME: &str = "storage.json";

type Entries = BTreeMap<String, String>;

/// Credential store persisted as a JSON file on disk.
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Platform data directory location, e.g. `~/.local/share/isp-portal/storage.json`.
    ///
    /// Returns `None` when the platform reports no data directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(APP_DIR).join(FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Entries::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StoreError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let json = serde_json::to_vec_pretty(entries)?;
        // Created 0600 on Unix and removed on drop if never persisted.
        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn with_lock<T>(&self, f: impl FnOnce() -> Result<T, StoreError>) -> Result<T, StoreError> {
        // A poisoned lock only means another thread panicked mid-write; the
        // file itself is still either the old or the new version.
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        f()
    }
}

impl CredentialStore for FileStore {
    fn load(&self) -> Result<Option<SessionCredential>, StoreError> {
        self.with_lock(|| {
            let mut entries = self.read_entries()?;
            Ok(entries.remove(TOKEN_KEY).and_then(SessionCredential::new))
        })
    }

    fn save(&self, credential: &SessionCredential) -> Result<(), StoreError> {
        self.with_lock(|| {
            let mut entries = self.read_entries()?;
            entries.insert(TOKEN_KEY.to_string(), credential.expose().to_string());
            self.write_entries(&entries)
        })
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.with_lock(|| {
            let mut entries = self.read_entries()?;
            if entries.remove(TOKEN_KEY).is_none() {
                return Ok(());
            }
            self.write_entries(&entries)
        })
    }
}
