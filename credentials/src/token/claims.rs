use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by an access token.
///
/// `sub` holds the user identifier and `username` the human-readable
/// account name; both are always present. `role` is optional and omitted
/// from the encoded token when unset, as is `nbf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the identifier of the authenticated user.
    pub sub: String,
    /// Account name the token was issued to.
    pub username: String,
    /// Optional role granted to the subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Expiration time as a Unix timestamp.
    pub exp: i64,
    /// Issued-at time as a Unix timestamp.
    pub iat: i64,
    /// Optional not-before time as a Unix timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
}

impl Claims {
    /// Creates claims for a user with a validity window starting now.
    ///
    /// # Arguments
    ///
    /// * `user_id` - Identifier of the user, stored in `sub`.
    /// * `username` - Account name of the user.
    /// * `validity_hours` - Number of hours until the token expires.
    pub fn for_user(
        user_id: impl ToString,
        username: impl Into<String>,
        validity_hours: i64,
    ) -> Self {
        let now = Utc::now();
        let expires_at = now + Duration::hours(validity_hours);

        Self {
            sub: user_id.to_string(),
            username: username.into(),
            role: None,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            nbf: None,
        }
    }

    /// Attaches a role to the claims.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Sets the not-before timestamp, making the token invalid until then.
    #[must_use]
    pub fn with_not_before(mut self, nbf: i64) -> Self {
        self.nbf = Some(nbf);
        self
    }

    /// Overrides the expiration timestamp.
    #[must_use]
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    /// Returns `true` if the expiration time lies in the past.
    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp()
    }

    /// Returns `true` if a not-before time is set and lies in the future.
    pub fn not_yet_valid(&self) -> bool {
        match self.nbf {
            Some(nbf) => nbf > Utc::now().timestamp(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_user_sets_validity_window() {
        let claims = Claims::for_user(42, "alice", 24);

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert!(claims.role.is_none());
        assert!(claims.nbf.is_none());
    }

    #[test]
    fn test_fresh_claims_are_valid() {
        let claims = Claims::for_user("42", "alice", 1);

        assert!(!claims.is_expired());
        assert!(!claims.not_yet_valid());
    }

    #[test]
    fn test_past_expiration_is_expired() {
        let claims =
            Claims::for_user("42", "alice", 1).with_expiration(Utc::now().timestamp() - 10);

        assert!(claims.is_expired());
    }

    #[test]
    fn test_future_not_before_is_not_yet_valid() {
        let claims =
            Claims::for_user("42", "alice", 1).with_not_before(Utc::now().timestamp() + 3600);

        assert!(claims.not_yet_valid());
    }

    #[test]
    fn test_with_role_attaches_role() {
        let claims = Claims::for_user("42", "alice", 1).with_role("admin");

        assert_eq!(claims.role.as_deref(), Some("admin"));
    }

    #[test]
    fn test_optional_fields_are_omitted_when_unset() {
        let claims = Claims::for_user("42", "alice", 1);
        let value = serde_json::to_value(&claims).unwrap();
        let object = value.as_object().unwrap();

        assert!(!object.contains_key("role"));
        assert!(!object.contains_key("nbf"));
    }
}
