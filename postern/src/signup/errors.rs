use std::fmt;

use credentials::PasswordError;
use thiserror::Error;

use crate::errors::StoreError;

/// A single field-level validation failure on a changeset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Error for signup and password-reset operations
#[derive(Debug, Error)]
pub enum SignupError {
    #[error("Password must be between {min} and {max} characters")]
    PasswordLength { min: usize, max: usize },

    #[error("Password hashing failed: {0}")]
    Password(#[from] PasswordError),

    #[error("Random token generation failed: {0}")]
    Rng(String),

    #[error("Changeset has validation errors: {0}")]
    InvalidChangeset(String),

    #[error("Unknown staged field: {0}")]
    UnknownField(String),

    #[error("Staged value for {field} has the wrong type")]
    InvalidValue { field: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}
