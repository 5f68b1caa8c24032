use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
    dir.path().join("storage.json")
}

fn stored_token(dir: &tempfile::TempDir) -> Option<String> {
    let raw = std::fs::read_to_string(token_file(dir)).ok()?;
    let value: serde_json::Value = serde_json::from_str(&raw).ok()?;
    value.get("token")?.as_str().map(str::to_string)
}

#[tokio::test]
async fn test_login_persists_token_and_dashboard_uses_it() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/login"))
        .and(body_json(json!({ "phone": "03001234567", "password": "abc123" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "token": "tok1", "user": { "name": "A" } })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/dashboard"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "profile": { "name": "A", "packageName": "Fiber 20" },
            "notifications": [{ "message": "Bill generated" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("isp-portal")
        .env("ISP_PORTAL_API_URL", mock_server.uri())
        .env("ISP_PORTAL_STORE_PATH", token_file(&dir))
        .args(["login", "--phone", "03001234567", "--password", "abc123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Login successful!"));

    assert_eq!(stored_token(&dir).as_deref(), Some("tok1"));

    cargo_bin_cmd!("isp-portal")
        .env("ISP_PORTAL_API_URL", mock_server.uri())
        .env("ISP_PORTAL_STORE_PATH", token_file(&dir))
        .args(["dashboard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome, A!"))
        .stdout(predicate::str::contains("- Bill generated"));
}

#[tokio::test]
async fn test_profile_401_clears_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "jwt expired" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(token_file(&dir), r#"{ "token": "tok1" }"#).unwrap();

    cargo_bin_cmd!("isp-portal")
        .env("ISP_PORTAL_API_URL", mock_server.uri())
        .env("ISP_PORTAL_STORE_PATH", token_file(&dir))
        .args(["profile"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Session expired. Please log in again."));

    assert_eq!(stored_token(&dir), None);
}

#[tokio::test]
async fn test_register_short_password_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("isp-portal")
        .env("ISP_PORTAL_API_URL", mock_server.uri())
        .env("ISP_PORTAL_STORE_PATH", token_file(&dir))
        .args([
            "register",
            "--name",
            "Ali",
            "--phone",
            "03001234567",
            "--password",
            "short",
            "--address",
            "House 1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Password must be exactly 6 characters long.",
        ));
}

#[tokio::test]
async fn test_status_without_token_is_logged_out() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("isp-portal")
        .env("ISP_PORTAL_API_URL", mock_server.uri())
        .env("ISP_PORTAL_STORE_PATH", token_file(&dir))
        .env("ISP_PORTAL_SPLASH_MS", "0")
        .args(["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));
}

#[test]
fn test_logout_removes_token() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(token_file(&dir), r#"{ "token": "tok1" }"#).unwrap();

    cargo_bin_cmd!("isp-portal")
        .env("ISP_PORTAL_STORE_PATH", token_file(&dir))
        .args(["logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));

    assert_eq!(stored_token(&dir), None);
}
