//! CLI command handlers.
//!
//! Each handler maps one portal screen onto a command: it runs the flow or
//! request, and returns the text to print. Errors come back as the
//! user-facing message; `main` prints them to stderr.

use crate::api::{users, ApiError};
use crate::display;
use crate::flows::{self, LoginFlow, RegisterFlow, RegisterOutcome};
use crate::forms::{LoginForm, RegistrationForm};
use crate::session::{bootstrap, BootstrapOutcome};
use crate::state::AppState;

const NOT_LOGGED_IN: &str = "You are not logged in. Run `isp-portal login` first.";

/// Run the startup session check and report the resulting state.
pub async fn status(state: &AppState) -> Result<String, String> {
    log::info!("Checking stored session");
    let outcome = bootstrap(&state.api, state.config.splash).await;
    let label = state.session_state().label();
    let text = match outcome {
        BootstrapOutcome::LoggedIn(profile) => match profile.name {
            Some(name) if !name.trim().is_empty() => format!("{} as {}", label, name.trim()),
            _ => label.to_string(),
        },
        BootstrapOutcome::NoCredential => label.to_string(),
        BootstrapOutcome::Rejected { .. } => {
            format!("{} (stored session was invalid and has been cleared)", label)
        }
    };
    Ok(text)
}

pub async fn login(state: &AppState, phone: String, password: String) -> Result<String, String> {
    let form = LoginForm { phone, password };
    let mut flow = LoginFlow::new();
    match flow.submit(&state.api, &form).await {
        Ok(_) => Ok("Login successful!".to_string()),
        Err(e) => {
            log::error!("Login failed: {}", e);
            Err(format!("Login failed: {}", e.user_message()))
        }
    }
}

pub async fn register(state: &AppState, form: RegistrationForm) -> Result<String, String> {
    let mut flow = RegisterFlow::new();
    match flow.submit(&state.api, &form).await {
        Ok(RegisterOutcome::LoggedIn { .. }) => Ok("Registration successful!".to_string()),
        Ok(RegisterOutcome::LoginRequired) => {
            Ok("Registration successful! Please log in.".to_string())
        }
        Err(e) => {
            log::error!("Registration failed: {}", e);
            Err(format!("Registration failed: {}", e.user_message()))
        }
    }
}

pub async fn dashboard(state: &AppState) -> Result<String, String> {
    ensure_credential(state)?;
    match users::dashboard(&state.api).await {
        Ok(dashboard) => Ok(display::render_dashboard(&dashboard)),
        Err(e) => Err(screen_error("Unable to fetch dashboard data.", &e)),
    }
}

pub async fn profile(state: &AppState) -> Result<String, String> {
    ensure_credential(state)?;
    match users::profile(&state.api).await {
        Ok(profile) => Ok(display::render_profile(&profile)),
        Err(e) => Err(screen_error("Unable to load profile information.", &e)),
    }
}

pub fn logout(state: &AppState) -> Result<String, String> {
    flows::logout(state.session());
    Ok("Logged out.".to_string())
}

/// Authenticated screens bounce to login when nothing is stored.
fn ensure_credential(state: &AppState) -> Result<(), String> {
    match state.session().credential() {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(NOT_LOGGED_IN.to_string()),
        Err(e) => Err(ApiError::from(e).user_message()),
    }
}

fn screen_error(fallback: &str, err: &ApiError) -> String {
    log::error!("{} {}", fallback, err);
    if err.is_unauthenticated() {
        return "Session expired. Please log in again.".to_string();
    }
    match err.backend_message() {
        Some(message) => message.to_string(),
        None => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::AppConfig;

    fn state_for(server: &MockServer, dir: &tempfile::TempDir) -> AppState {
        AppState::new(AppConfig {
            api_url: server.uri(),
            store_path: Some(dir.path().join("storage.json")),
            splash: Duration::ZERO,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_dashboard_requires_login() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(&server, &dir);

        let err = dashboard(&state).await.unwrap_err();
        assert_eq!(err, NOT_LOGGED_IN);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_login_then_profile() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok1" })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/profile"))
            .and(header("authorization", "Bearer tok1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "name": "Ali", "packageName": "Fiber 50" })),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let state = state_for(&server, &dir);
        let text = login(&state, "03001234567".into(), "abc123".into())
            .await
            .unwrap();
        assert_eq!(text, "Login successful!");
        assert!(state.session_state().is_logged_in());

        let text = profile(&state).await.unwrap();
        assert!(text.contains("Name: Ali"));
        assert!(text.contains("Package: Fiber 50"));
    }

    #[tokio::test]
    async fn test_expired_session_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let state = state_for(&server, &dir);
        let credential = crate::store::SessionCredential::new("tok1").unwrap();
        state.session().persist(&credential).unwrap();

        let err = dashboard(&state).await.unwrap_err();
        assert_eq!(err, "Session expired. Please log in again.");
        assert!(state.session().credential().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_status_reports_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Ali" })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let state = state_for(&server, &dir);
        assert_eq!(status(&state).await.unwrap(), "Logged out");

        let credential = crate::store::SessionCredential::new("tok1").unwrap();
        state.session().persist(&credential).unwrap();
        let fresh = state_for(&server, &dir);
        assert_eq!(status(&fresh).await.unwrap(), "Logged in as Ali");
        assert!(fresh.session_state().is_logged_in());
    }
}
