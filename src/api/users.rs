//! Account endpoints under `/users`.

use super::client::ApiClient;
use super::error::ApiError;
use super::types::{
    Dashboard, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserProfile,
};

pub const LOGIN_PATH: &str = "/users/login";
pub const REGISTER_PATH: &str = "/users/register";
pub const PROFILE_PATH: &str = "/users/profile";
pub const DASHBOARD_PATH: &str = "/users/dashboard";

/// POST /users/login.
pub async fn login(client: &ApiClient, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
    client.post(LOGIN_PATH, request).await
}

/// POST /users/register. Sent without a credential unless one is stored.
///
/// An empty or `null` success body means the account was created without a
/// session.
pub async fn register(
    client: &ApiClient,
    request: &RegisterRequest,
) -> Result<RegisterResponse, ApiError> {
    let response: Option<RegisterResponse> = client.post(REGISTER_PATH, request).await?;
    Ok(response.unwrap_or_default())
}

/// GET /users/profile. Requires a stored credential.
pub async fn profile(client: &ApiClient) -> Result<UserProfile, ApiError> {
    client.get(PROFILE_PATH).await
}

/// GET /users/dashboard. Requires a stored credential.
pub async fn dashboard(client: &ApiClient) -> Result<Dashboard, ApiError> {
    client.get(DASHBOARD_PATH).await
}
