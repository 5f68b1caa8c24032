//! Session state machine and the single owner of the stored credential.
//!
//! States move `Unknown → LoggedOut | LoggedIn` on the bootstrap result and
//! between `LoggedIn` and `LoggedOut` on login, registration, logout and
//! 401 responses. Subscribers receive every transition through a
//! `tokio::sync::watch` channel.

pub mod bootstrap;

use std::sync::Arc;

use tokio::sync::watch;

use crate::store::{CredentialStore, SessionCredential, StoreError};

pub use bootstrap::{bootstrap, BootstrapOutcome};

/// Where the user currently is in the session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Startup check has not finished yet.
    Unknown,
    LoggedOut,
    LoggedIn,
}

impl SessionState {
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Unknown => "Checking session",
            SessionState::LoggedOut => "Logged out",
            SessionState::LoggedIn => "Logged in",
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, SessionState::LoggedIn)
    }
}

/// Something that happened to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Stored credential was accepted by the backend at startup.
    BootstrapValid,
    /// No credential at startup, or the backend rejected it.
    BootstrapInvalid,
    LoginSucceeded,
    RegisterSucceeded,
    LoggedOut,
    /// The backend answered 401 to some request.
    Unauthenticated,
}

/// Next state for `event` arriving in `state`.
///
/// Bootstrap results only count while the state is still `Unknown`; a
/// login that finished first wins.
pub fn transition(state: SessionState, event: SessionEvent) -> SessionState {
    match (state, event) {
        (SessionState::Unknown, SessionEvent::BootstrapValid) => SessionState::LoggedIn,
        (SessionState::Unknown, SessionEvent::BootstrapInvalid) => SessionState::LoggedOut,
        (current, SessionEvent::BootstrapValid | SessionEvent::BootstrapInvalid) => current,
        (_, SessionEvent::LoginSucceeded | SessionEvent::RegisterSucceeded) => {
            SessionState::LoggedIn
        }
        (_, SessionEvent::LoggedOut | SessionEvent::Unauthenticated) => SessionState::LoggedOut,
    }
}

/// Shared handle over the credential store and the session state.
///
/// Cloning is cheap; all clones see the same state.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn CredentialStore>,
    state: Arc<watch::Sender<SessionState>>,
}

impl Session {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let (tx, _rx) = watch::channel(SessionState::Unknown);
        Self {
            store,
            state: Arc::new(tx),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Receiver that observes every subsequent transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Apply `event` and return the resulting state.
    pub fn apply(&self, event: SessionEvent) -> SessionState {
        let mut next = SessionState::Unknown;
        self.state.send_if_modified(|state| {
            let before = *state;
            next = transition(before, event);
            if next == before {
                log::debug!("Session event {:?} ignored in state {:?}", event, before);
                return false;
            }
            log::info!("Session {:?} -> {:?} on {:?}", before, next, event);
            *state = next;
            true
        });
        next
    }

    pub fn credential(&self) -> Result<Option<SessionCredential>, StoreError> {
        self.store.load()
    }

    /// Persist a freshly issued credential, replacing any previous one.
    pub fn persist(&self, credential: &SessionCredential) -> Result<(), StoreError> {
        self.store.save(credential)
    }

    pub fn clear_credential(&self) -> Result<(), StoreError> {
        self.store.clear()
    }

    /// Drop the credential after the backend rejected it.
    ///
    /// Deletion is best effort: a storage failure is logged and the state
    /// still moves to `LoggedOut`.
    pub fn expire(&self) {
        if let Err(e) = self.store.clear() {
            log::error!("Failed to delete rejected credential: {}", e);
        }
        self.apply(SessionEvent::Unauthenticated);
    }
}
