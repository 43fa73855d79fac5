use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use credentials::PasswordHasher;
use rand::rngs::OsRng;
use rand::RngCore;
use serde_json::Map;
use serde_json::Value;

use crate::config::AuthConfig;
use crate::models::UserRecord;
use crate::models::UserUpdate;
use crate::ports::UserStore;
use crate::signup::changeset::Changeset;
use crate::signup::errors::SignupError;

pub mod changeset;
pub mod errors;

/// Byte length of confirmation and reset tokens before encoding.
const TOKEN_BYTES: usize = 24;

/// Which identifying attribute a token link embeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdKind {
    #[default]
    Email,
    Username,
}

impl IdKind {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Username => "username",
        }
    }
}

/// Generates a confirmation/reset token and the query string for its link.
///
/// The token is 24 bytes from the operating system's random source,
/// URL-safe base64 encoded. The query string carries the identifier under
/// the `kind` name and the token under `key`, with the identifier
/// percent-escaped.
///
/// # Errors
///
/// Returns [`SignupError::Rng`] if the random source fails.
pub fn gen_token_link(identifier: &str, kind: IdKind) -> Result<(String, String), SignupError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| SignupError::Rng(e.to_string()))?;

    let token = URL_SAFE_NO_PAD.encode(bytes);
    let query = format!(
        "{}={}&key={}",
        kind.as_str(),
        urlencoding::encode(identifier),
        token,
    );

    Ok((token, query))
}

/// Signup and password-reset flows.
///
/// Runs outside the per-request pipeline: it stages password hashes and
/// confirmation/reset tokens onto changesets for the caller to commit,
/// and applies password resets through the user store's transaction.
pub struct Signup<U>
where
    U: UserStore,
{
    config: Arc<AuthConfig>,
    users: Arc<U>,
    hasher: PasswordHasher,
}

impl<U> Signup<U>
where
    U: UserStore,
{
    pub fn new(config: Arc<AuthConfig>, users: Arc<U>) -> Self {
        let hasher = PasswordHasher::new(config.hash_scheme);

        Self {
            config,
            users,
            hasher,
        }
    }

    /// Stages and validates a new user's password, hashing it when valid.
    ///
    /// Without a `password` in `params` the changeset comes back
    /// untouched, so an existing hash is never overwritten. A password
    /// outside the configured length bounds leaves field errors on the
    /// changeset and stages no hash. A valid one is hashed under the
    /// configured hash field and the plaintext dropped from the staged
    /// changes. Hashing only runs on an otherwise valid changeset.
    pub fn create_user(
        &self,
        mut changeset: Changeset<UserRecord>,
        params: &Map<String, Value>,
    ) -> Changeset<UserRecord> {
        let Some(value) = params.get("password") else {
            return changeset;
        };

        let Some(password) = value.as_str() else {
            changeset.add_error("password", "must be a string");
            return changeset;
        };

        changeset.stage("password", Value::String(password.to_string()));

        let length = password.chars().count();
        if length < self.config.password_min_len {
            changeset.add_error(
                "password",
                format!(
                    "should be at least {} character(s)",
                    self.config.password_min_len,
                ),
            );
        } else if length > self.config.password_max_len {
            changeset.add_error(
                "password",
                format!(
                    "should be at most {} character(s)",
                    self.config.password_max_len,
                ),
            );
        }

        if !changeset.is_valid() {
            return changeset;
        }

        match self.hasher.hash(password) {
            Ok(hash) => {
                changeset.stage(self.config.hash_field.clone(), Value::String(hash));
                changeset.unstage("password");
            }
            Err(e) => changeset.add_error("password", e.to_string()),
        }

        changeset
    }

    /// Stages a confirmation token and the current timestamp.
    pub fn add_confirm_token(
        &self,
        mut changeset: Changeset<UserRecord>,
        token: impl Into<String>,
    ) -> Changeset<UserRecord> {
        changeset.stage("confirmation_token", Value::String(token.into()));
        changeset.stage("confirmation_sent_at", timestamp_value());
        changeset
    }

    /// Stages a reset token and the current timestamp.
    pub fn add_reset_token(
        &self,
        mut changeset: Changeset<UserRecord>,
        token: impl Into<String>,
    ) -> Changeset<UserRecord> {
        changeset.stage("reset_token", Value::String(token.into()));
        changeset.stage("reset_sent_at", timestamp_value());
        changeset
    }

    /// Hashes a new password and commits it while clearing the reset
    /// token and its timestamp, all inside one store transaction.
    ///
    /// # Errors
    ///
    /// * [`SignupError::PasswordLength`] - The new password is outside
    ///   the configured bounds; nothing is written.
    /// * [`SignupError::Password`] - Hashing failed; nothing is written.
    /// * [`SignupError::Store`] - The transaction failed; the store rolls
    ///   back both steps.
    pub async fn reset_password(
        &self,
        user_id: &str,
        new_password: &str,
    ) -> Result<UserRecord, SignupError> {
        let length = new_password.chars().count();
        if length < self.config.password_min_len || length > self.config.password_max_len {
            return Err(SignupError::PasswordLength {
                min: self.config.password_min_len,
                max: self.config.password_max_len,
            });
        }

        let hash = self.hasher.hash(new_password)?;
        let updates = [
            UserUpdate::SetPasswordHash(hash),
            UserUpdate::ClearResetToken,
        ];

        Ok(self.users.update_within_txn(user_id, &updates).await?)
    }
}

fn timestamp_value() -> Value {
    Value::String(Utc::now().to_rfc3339())
}
