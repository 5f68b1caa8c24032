//! Request and response types for the portal backend.
//!
//! The backend speaks camelCase JSON. Profile fields are all optional on
//! the wire; screens show `N/A` for anything missing.

use serde::{Deserialize, Serialize};

/// Body for POST /users/login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// Response from POST /users/login.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

/// Body for POST /users/register.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
    pub password: String,
    pub address: String,
}

/// Response from POST /users/register. The token is only sometimes present.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

/// Account snapshot from GET /users/profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub package_name: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    /// ISO-8601 date or timestamp, as sent by the backend.
    #[serde(default)]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Notification {
    pub message: String,
}

/// Response from GET /users/dashboard.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub profile: Option<UserProfile>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
}
