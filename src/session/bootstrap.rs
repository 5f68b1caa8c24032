//! Startup session check.
//!
//! Reads the stored credential and asks the backend for the profile. A
//! successful answer means the session is still good. Any failure clears
//! the credential and lands the user on the login flow.

use std::time::Duration;

use super::SessionEvent;
use crate::api::types::UserProfile;
use crate::api::{users, ApiClient};

/// Minimum time the loading indicator stays up before the result is acted on.
pub const SPLASH_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq)]
pub enum BootstrapOutcome {
    /// Credential accepted; the profile comes along so the caller can greet the user.
    LoggedIn(UserProfile),
    /// Nothing was stored.
    NoCredential,
    /// Credential existed but could not be validated and was cleared.
    Rejected { reason: String },
}

impl BootstrapOutcome {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, BootstrapOutcome::LoggedIn(_))
    }
}

/// Run the startup check and apply the result to the client's session.
///
/// The check runs concurrently with a `min_display` delay; the result is
/// applied only once both are done.
pub async fn bootstrap(client: &ApiClient, min_display: Duration) -> BootstrapOutcome {
    let (outcome, ()) = tokio::join!(check(client), tokio::time::sleep(min_display));

    let session = client.session();
    let event = match outcome {
        BootstrapOutcome::LoggedIn(_) => SessionEvent::BootstrapValid,
        BootstrapOutcome::NoCredential | BootstrapOutcome::Rejected { .. } => {
            SessionEvent::BootstrapInvalid
        }
    };
    session.apply(event);
    outcome
}

async fn check(client: &ApiClient) -> BootstrapOutcome {
    let session = client.session();

    match session.credential() {
        Ok(Some(_)) => {}
        Ok(None) => {
            log::info!("No stored credential, starting logged out");
            return BootstrapOutcome::NoCredential;
        }
        Err(e) => {
            log::warn!("Failed to read stored credential: {}", e);
            return BootstrapOutcome::Rejected {
                reason: e.to_string(),
            };
        }
    }

    match users::profile(client).await {
        Ok(profile) => {
            log::info!("Stored credential is valid");
            BootstrapOutcome::LoggedIn(profile)
        }
        Err(e) => {
            // The client already cleared storage on 401; other failures are
            // treated the same way here.
            log::warn!("Credential validation failed: {}", e);
            if !e.is_unauthenticated() {
                if let Err(clear_err) = session.clear_credential() {
                    log::error!("Failed to clear credential: {}", clear_err);
                }
            }
            BootstrapOutcome::Rejected {
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::DEFAULT_TIMEOUT;
    use crate::session::{Session, SessionState};
    use crate::store::{CredentialStore, MemoryStore};

    fn client_for(uri: &str, store: Arc<MemoryStore>) -> ApiClient {
        ApiClient::new(uri, DEFAULT_TIMEOUT, Session::new(store)).unwrap()
    }

    #[tokio::test]
    async fn test_no_credential_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), Arc::new(MemoryStore::new()));
        let outcome = bootstrap(&client, Duration::ZERO).await;
        assert_eq!(outcome, BootstrapOutcome::NoCredential);
        assert_eq!(client.session().state(), SessionState::LoggedOut);
    }

    #[tokio::test]
    async fn test_valid_credential_logs_in() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/profile"))
            .and(header("authorization", "Bearer tok1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "A" })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::with_token("tok1"));
        let client = client_for(&server.uri(), Arc::clone(&store));
        let outcome = bootstrap(&client, Duration::ZERO).await;

        assert!(outcome.is_logged_in());
        assert_eq!(client.session().state(), SessionState::LoggedIn);
        assert!(store.load().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_rejected_credential_is_cleared() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/profile"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::with_token("tok1"));
        let client = client_for(&server.uri(), Arc::clone(&store));
        let outcome = bootstrap(&client, Duration::ZERO).await;

        assert!(matches!(outcome, BootstrapOutcome::Rejected { .. }));
        assert!(store.load().unwrap().is_none());
        assert_eq!(client.session().state(), SessionState::LoggedOut);
    }

    #[tokio::test]
    async fn test_server_failure_also_clears() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::with_token("tok1"));
        let client = client_for(&server.uri(), Arc::clone(&store));
        bootstrap(&client, Duration::ZERO).await;

        assert!(store.load().unwrap().is_none());
        assert_eq!(client.session().state(), SessionState::LoggedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_min_display() {
        let client = client_for("http://127.0.0.1:9", Arc::new(MemoryStore::new()));
        let started = tokio::time::Instant::now();
        bootstrap(&client, SPLASH_DURATION).await;
        assert!(started.elapsed() >= SPLASH_DURATION);
    }
}
