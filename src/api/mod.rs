//! API client module for the portal backend.
//!
//! Provides the HTTP client with auth header injection, the error taxonomy,
//! and request/response types matching the backend's JSON.

pub mod client;
pub mod error;
pub mod types;
pub mod users;

pub use client::{ApiClient, RequestOptions, DEFAULT_TIMEOUT};
pub use error::ApiError;
