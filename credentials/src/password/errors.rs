use thiserror::Error;

/// Errors produced when hashing or verifying passwords.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),
    #[error("Failed to verify password: {0}")]
    VerificationFailed(String),
}
