//! HTTP client with bearer-token injection and central error mapping.
//!
//! Every request reads the stored credential first and attaches it as
//! `Authorization: Bearer <token>` when one exists. Responses are mapped
//! onto [`ApiError`]; a 401 also expires the session so callers only have
//! to route the user back to login.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::ApiError;
use crate::session::Session;

/// Bound on a single request, connect through body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-call extras.
///
/// `Authorization` entries are ignored: the stored credential is the only
/// source of that header.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP client for the portal backend.
///
/// Holds the base origin and a [`Session`] handle used to read the
/// credential before each call and to expire it on 401.
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Create a client for `base_url` with the given request timeout.
    ///
    /// Fails only when the TLS backend cannot be initialised.
    pub fn new(base_url: &str, timeout: Duration, session: Session) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request and parse the 2xx body as `T`.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let credential = self.session.credential()?;

        let mut builder = self.client.request(method.clone(), self.url(path));
        for (name, value) in &options.headers {
            let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
                log::warn!("Dropping invalid header name {:?}", name);
                continue;
            };
            if name == AUTHORIZATION {
                log::warn!("Ignoring caller-supplied Authorization header for {}", path);
                continue;
            }
            match HeaderValue::from_str(value) {
                Ok(value) => builder = builder.header(name, value),
                Err(_) => log::warn!("Dropping invalid value for header {}", name),
            }
        }
        if let Some(ref credential) = credential {
            builder = builder.header(AUTHORIZATION, credential.bearer());
        } else {
            log::debug!("No stored credential, sending {} unauthenticated", path);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        log::debug!("API request: [{}] {}", method, path);
        let resp = builder.send().await.map_err(|e| {
            let err = ApiError::from_transport(&e);
            log::error!("API [{}] {} failed before a response: {}", method, path, err);
            err
        })?;

        let status = resp.status();

        if !status.is_success() {
            // The status alone decides the outcome; a broken error body is
            // treated as empty.
            let text = resp.text().await.unwrap_or_default();
            let err = ApiError::from_status(status.as_u16(), &text);
            match status {
                StatusCode::UNAUTHORIZED => {
                    log::warn!("API [{}] {}: unauthorized, expiring session", method, path);
                    self.session.expire();
                }
                StatusCode::INTERNAL_SERVER_ERROR => {
                    log::error!("API [{}] {}: internal server error", method, path);
                }
                _ => log::warn!("API [{}] {}: {}", method, path, err),
            }
            return Err(err);
        }

        log::debug!("API response: [{}] {} -> {}", method, path, status.as_u16());
        let text = resp.text().await.map_err(|e| ApiError::from_transport(&e))?;
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| {
            log::error!("API [{}] {}: unparseable body: {}", method, path, e);
            ApiError::InvalidResponse(e.to_string())
        })
    }

    /// GET a relative path.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, None, &RequestOptions::default())
            .await
    }

    /// POST a JSON body to a relative path.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body), &RequestOptions::default())
            .await
    }
}
