//! Local validation for the login and registration forms.
//!
//! Runs before any network call so bad input never reaches the backend.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::api::types::{LoginRequest, RegisterRequest};

/// Registration passwords are exactly this many characters.
pub const PASSWORD_LEN: usize = 6;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10,15}$").expect("static phone pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your phone number and password.")]
    MissingCredentials,
    #[error("Please fill in all fields.")]
    MissingFields,
    #[error("Password must be exactly 6 characters long.")]
    PasswordLength,
    #[error("Phone number must be between 10 to 15 digits.")]
    InvalidPhone,
}

/// Raw login form input.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub phone: String,
    pub password: String,
}

impl LoginForm {
    /// Both fields must be non-empty. Existing accounts are not held to the
    /// registration phone/password rules.
    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        let phone = self.phone.trim();
        if phone.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingCredentials);
        }
        Ok(LoginRequest {
            phone: phone.to_string(),
            password: self.password.clone(),
        })
    }
}

/// Raw registration form input.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub phone: String,
    pub password: String,
    pub address: String,
}

impl RegistrationForm {
    /// Checks, in order: all fields present, password length, phone format.
    pub fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        let name = self.name.trim();
        let phone = self.phone.trim();
        let address = self.address.trim();
        if name.is_empty() || phone.is_empty() || self.password.is_empty() || address.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if self.password.chars().count() != PASSWORD_LEN {
            return Err(ValidationError::PasswordLength);
        }
        if !is_valid_phone(phone) {
            return Err(ValidationError::InvalidPhone);
        }
        Ok(RegisterRequest {
            name: name.to_string(),
            phone: phone.to_string(),
            password: self.password.clone(),
            address: address.to_string(),
        })
    }
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}
