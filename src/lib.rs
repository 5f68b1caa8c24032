//! Client for the ISP account portal.
//!
//! An authenticated API client over the portal backend, with durable
//! session-credential storage, a startup session check, and the login,
//! registration and logout flows the portal screens are built on.

pub mod api;
pub mod commands;
pub mod config;
pub mod display;
pub mod flows;
pub mod forms;
pub mod session;
pub mod state;
pub mod store;
