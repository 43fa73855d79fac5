use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use credentials::HashScheme;
use serde::Deserialize;

/// Where clients keep their access token between requests.
///
/// Exactly one transport governs a deployment; the login and authenticate
/// layers read the same value so tokens are issued where they will later
/// be looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenTransport {
    /// Token travels in an HTTP-only session cookie.
    Cookie,
    /// Token is returned in the login response body and sent back by the
    /// client in the `Authorization` header.
    Bearer,
}

/// Process-wide authentication settings, immutable after startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Password hashing scheme applied at signup and login.
    pub hash_scheme: HashScheme,
    /// Path of the login page, used by redirects.
    pub login_path: String,
    /// Staged-field name under which password hashes are kept.
    pub hash_field: String,
    /// Minimum accepted password length, in characters.
    pub password_min_len: usize,
    /// Maximum accepted password length, in characters.
    pub password_max_len: usize,
    /// Where clients keep their token.
    pub transport: TokenTransport,
    /// Name of the session cookie when the transport is `cookie`.
    pub cookie_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            hash_scheme: HashScheme::Argon2,
            login_path: "/login".to_string(),
            hash_field: "password_hash".to_string(),
            password_min_len: 8,
            password_max_len: 80,
            transport: TokenTransport::Cookie,
            cookie_name: "access_token".to_string(),
        }
    }
}

impl AuthConfig {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (POSTERN__LOGIN_PATH, POSTERN__TRANSPORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(Environment::with_prefix("POSTERN").separator("__"))
            .build()?;

        let config: AuthConfig = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.password_min_len == 0 {
            return Err(ConfigError::Message(
                "password_min_len must be at least 1".to_string(),
            ));
        }

        if self.password_min_len > self.password_max_len {
            return Err(ConfigError::Message(format!(
                "password_min_len ({}) exceeds password_max_len ({})",
                self.password_min_len, self.password_max_len,
            )));
        }

        if !self.login_path.starts_with('/') {
            return Err(ConfigError::Message(format!(
                "login_path must start with '/', got {:?}",
                self.login_path,
            )));
        }

        if self.cookie_name.is_empty()
            || self
                .cookie_name
                .contains(|c: char| c == ';' || c == '=' || c.is_whitespace())
        {
            return Err(ConfigError::Message(format!(
                "cookie_name {:?} is not a valid cookie name",
                self.cookie_name,
            )));
        }

        // The signup flow stages the plaintext under "password" and drops
        // it once hashed; the hash must live under a different name.
        if self.hash_field.is_empty() || self.hash_field == "password" {
            return Err(ConfigError::Message(format!(
                "hash_field {:?} is not usable as a hash column name",
                self.hash_field,
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = AuthConfig::default();

        assert_eq!(config.hash_scheme, HashScheme::Argon2);
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.hash_field, "password_hash");
        assert_eq!(config.password_min_len, 8);
        assert_eq!(config.password_max_len, 80);
        assert_eq!(config.transport, TokenTransport::Cookie);
        assert_eq!(config.cookie_name, "access_token");
    }

    #[test]
    fn test_defaults_pass_validation() {
        assert!(AuthConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_min_length_is_rejected() {
        let config = AuthConfig {
            password_min_len: 0,
            ..AuthConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_length_bounds_are_rejected() {
        let config = AuthConfig {
            password_min_len: 100,
            password_max_len: 80,
            ..AuthConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_relative_login_path_is_rejected() {
        let config = AuthConfig {
            login_path: "login".to_string(),
            ..AuthConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cookie_name_with_separator_characters_is_rejected() {
        let config = AuthConfig {
            cookie_name: "access token".to_string(),
            ..AuthConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_password_as_hash_field_is_rejected() {
        let config = AuthConfig {
            hash_field: "password".to_string(),
            ..AuthConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_transport_deserializes_from_lowercase_names() {
        let cookie: TokenTransport = serde_json::from_str("\"cookie\"").unwrap();
        let bearer: TokenTransport = serde_json::from_str("\"bearer\"").unwrap();

        assert_eq!(cookie, TokenTransport::Cookie);
        assert_eq!(bearer, TokenTransport::Bearer);
    }

    #[test]
    fn test_partial_sources_fall_back_to_defaults() {
        let config: AuthConfig =
            serde_json::from_str(r#"{"transport": "bearer", "password_min_len": 10}"#).unwrap();

        assert_eq!(config.transport, TokenTransport::Bearer);
        assert_eq!(config.password_min_len, 10);
        assert_eq!(config.cookie_name, "access_token");
        assert_eq!(config.login_path, "/login");
    }
}
