use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PhcError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as PhcPasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;
use pbkdf2::Pbkdf2;
use serde::Deserialize;
use serde::Serialize;

use crate::password::errors::PasswordError;

/// Hashing scheme applied to stored passwords.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashScheme {
    #[default]
    Argon2,
    Pbkdf2,
}

impl HashScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Argon2 => "argon2",
            Self::Pbkdf2 => "pbkdf2",
        }
    }

    /// PHC algorithm identifiers this scheme can verify.
    fn idents(&self) -> &'static [&'static str] {
        match self {
            Self::Argon2 => &["argon2id", "argon2i", "argon2d"],
            Self::Pbkdf2 => &["pbkdf2-sha256", "pbkdf2-sha512", "pbkdf2"],
        }
    }
}

impl fmt::Display for HashScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hashes and verifies passwords with a configurable scheme.
///
/// Hashes are emitted in PHC string format, which records the scheme and
/// its parameters alongside the salt and digest.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher {
    scheme: HashScheme,
}

impl PasswordHasher {
    pub fn new(scheme: HashScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> HashScheme {
        self.scheme
    }

    /// Hashes a plaintext password with a freshly generated salt.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordError::HashingFailed`] if the underlying scheme
    /// rejects the input.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = match self.scheme {
            HashScheme::Argon2 => Argon2::default().hash_password(password.as_bytes(), &salt),
            HashScheme::Pbkdf2 => Pbkdf2.hash_password(password.as_bytes(), &salt),
        };

        hash.map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Checks a plaintext password against a stored PHC-format hash.
    ///
    /// A hash produced by a different scheme never matches; it yields
    /// `Ok(false)` rather than an error so callers can treat it exactly
    /// like a wrong password.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordError::VerificationFailed`] if the stored hash
    /// cannot be parsed.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| PasswordError::VerificationFailed(e.to_string()))?;

        // The backends reject a foreign algorithm's parameter names with
        // an error, so the non-match is decided on the algorithm id first.
        if !self.scheme.idents().contains(&parsed.algorithm.as_str()) {
            return Ok(false);
        }

        let result = match self.scheme {
            HashScheme::Argon2 => Argon2::default().verify_password(password.as_bytes(), &parsed),
            HashScheme::Pbkdf2 => Pbkdf2.verify_password(password.as_bytes(), &parsed),
        };

        match result {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }
}
