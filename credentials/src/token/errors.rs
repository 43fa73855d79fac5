use thiserror::Error;

/// Errors produced when signing or verifying access tokens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,
    #[error("Token is not yet valid")]
    NotYetValid,
    #[error("Token signature is invalid")]
    InvalidSignature,
    #[error("Token is malformed: {0}")]
    Malformed(String),
    #[error("Failed to sign token: {0}")]
    Signing(String),
}
