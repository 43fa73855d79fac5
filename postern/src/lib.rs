//! Authentication middleware for axum request pipelines.
//!
//! `postern` guards a router with three composable layers and the signup
//! helpers that feed them:
//!
//! - [`middleware::authenticate`] resolves the caller's [`Identity`] from a
//!   cookie or bearer token on every request,
//! - [`middleware::loginout_check`] watches the last path segment and hands
//!   `login`/`logout` requests to the dedicated flows,
//! - [`signup::Signup`] stages password hashes and confirmation/reset
//!   tokens for account management outside the request pipeline.
//!
//! Cryptographic primitives live in the `credentials` crate; storage is
//! reached through the [`ports`] traits so any backend can be plugged in.
//! [`memory`] ships in-process implementations.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use axum::middleware::from_fn_with_state;
//! use axum::routing::get;
//! use axum::Router;
//! use credentials::Keyring;
//! use postern::authority::KeyringAuthority;
//! use postern::memory::MemoryRevocationStore;
//! use postern::memory::MemoryUserStore;
//! use postern::middleware::authenticate;
//! use postern::middleware::loginout_check;
//! use postern::AuthConfig;
//! use postern::AuthState;
//!
//! # fn build() -> Router {
//! let config = Arc::new(AuthConfig::default());
//! let keyring = Keyring::new(b"0123456789abcdef0123456789abcdef");
//! let revoked = Arc::new(MemoryRevocationStore::new());
//! let authority = Arc::new(KeyringAuthority::new(keyring, revoked));
//! let users = Arc::new(MemoryUserStore::new());
//! let state = AuthState::new(config, authority, users, 24);
//!
//! Router::new()
//!     .route("/", get(|| async { "hello" }))
//!     .layer(from_fn_with_state(state.clone(), authenticate))
//!     .layer(from_fn_with_state(state, loginout_check))
//! # }
//! ```

pub mod authority;
pub mod config;
pub mod errors;
pub mod identity;
pub mod memory;
pub mod middleware;
pub mod models;
pub mod ports;
pub mod responses;
pub mod signup;
pub mod state;
pub mod tools;

pub use config::AuthConfig;
pub use config::TokenTransport;
pub use identity::Identity;
pub use identity::SkipAuthenticate;
pub use state::AuthState;
