//! Application state shared by the CLI commands.
//!
//! Holds the API client (which owns the session handle) and the resolved
//! configuration. The session credential itself is never held here; it is
//! read from the store on every request.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::{AppConfig, ConfigError};
use crate::session::{Session, SessionState};

pub struct AppState {
    /// HTTP client for the portal backend.
    pub api: Arc<ApiClient>,
    pub config: AppConfig,
}

impl AppState {
    /// Validate `config`, open its credential store and build the client.
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let session = Session::new(config.open_store()?);
        let api = Arc::new(ApiClient::new(config.api_url.trim(), config.timeout, session)?);
        Ok(Self { api, config })
    }

    pub fn session(&self) -> &Session {
        self.api.session()
    }

    pub fn session_state(&self) -> SessionState {
        self.session().state()
    }
}
