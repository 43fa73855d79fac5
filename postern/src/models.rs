use chrono::DateTime;
use chrono::Utc;

/// Stored user record as the authentication layer sees it.
///
/// Only the fields this layer reads or writes are modelled; a backing
/// store is free to carry more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Stable identifier. Left empty on new records until the store
    /// assigns one.
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub role: Option<String>,
    /// PHC-format password hash; empty until signup stages one.
    pub password_hash: String,
    pub confirmation_token: Option<String>,
    pub confirmation_sent_at: Option<DateTime<Utc>>,
    pub reset_token: Option<String>,
    pub reset_sent_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Creates an empty record for the given username.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            username: username.into(),
            email: None,
            role: None,
            password_hash: String::new(),
            confirmation_token: None,
            confirmation_sent_at: None,
            reset_token: None,
            reset_sent_at: None,
        }
    }
}

/// Field mutations applied to a stored user within one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserUpdate {
    SetPasswordHash(String),
    SetConfirmationToken {
        token: String,
        sent_at: DateTime<Utc>,
    },
    SetResetToken {
        token: String,
        sent_at: DateTime<Utc>,
    },
    ClearResetToken,
}
