use std::sync::Arc;

use crate::config::AuthConfig;
use crate::ports::TokenAuthority;
use crate::ports::UserStore;

/// Shared state handed to every authentication middleware layer.
#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<AuthConfig>,
    pub authority: Arc<dyn TokenAuthority>,
    pub users: Arc<dyn UserStore>,
    /// Validity window of freshly issued tokens, in hours.
    pub token_ttl_hours: i64,
}

impl AuthState {
    pub fn new(
        config: Arc<AuthConfig>,
        authority: Arc<dyn TokenAuthority>,
        users: Arc<dyn UserStore>,
        token_ttl_hours: i64,
    ) -> Self {
        Self {
            config,
            authority,
            users,
            token_ttl_hours,
        }
    }
}
