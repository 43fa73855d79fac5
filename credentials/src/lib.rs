//! Credential primitives shared by services that authenticate users.
//!
//! This crate bundles the two low-level concerns every authenticating
//! service needs and nothing else: hashing and verifying passwords, and
//! signing and verifying access tokens. It deliberately knows nothing
//! about HTTP, storage, or session semantics.
//!
//! ## Password hashing
//!
//! [`PasswordHasher`] produces and checks PHC-format hashes. The scheme
//! is chosen at construction time so a service can be switched between
//! Argon2 and PBKDF2 through configuration alone:
//!
//! ```
//! use credentials::HashScheme;
//! use credentials::PasswordHasher;
//!
//! let hasher = PasswordHasher::new(HashScheme::Argon2);
//! let hash = hasher.hash("correct horse battery staple").unwrap();
//!
//! assert!(hasher.verify("correct horse battery staple", &hash).unwrap());
//! assert!(!hasher.verify("tr0ub4dor", &hash).unwrap());
//! ```
//!
//! ## Access tokens
//!
//! [`Keyring`] signs [`Claims`] into compact JWTs and verifies them back,
//! enforcing expiry and not-before windows:
//!
//! ```
//! use credentials::Claims;
//! use credentials::Keyring;
//!
//! let keyring = Keyring::new(b"0123456789abcdef0123456789abcdef");
//! let claims = Claims::for_user("42", "alice", 24);
//!
//! let token = keyring.sign(&claims).unwrap();
//! let verified = keyring.verify(&token).unwrap();
//!
//! assert_eq!(verified.username, "alice");
//! ```

pub mod password;
pub mod token;

pub use password::HashScheme;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::Keyring;
pub use token::TokenAlgorithm;
pub use token::TokenError;
