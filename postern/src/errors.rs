use credentials::TokenError;
use thiserror::Error;

/// Error for user and revocation store operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Unsupported lookup field: {0}")]
    UnsupportedField(String),

    #[error("Storage error: {0}")]
    Backend(String),
}

/// Error for token issuance and verification
#[derive(Debug, Error)]
pub enum AuthorityError {
    #[error("Token rejected: {0}")]
    Token(#[from] TokenError),

    #[error("Token has been invalidated")]
    Revoked,

    #[error("Invalidation store error: {0}")]
    Store(#[from] StoreError),
}
