use std::sync::Arc;

use async_trait::async_trait;
use credentials::Claims;
use credentials::Keyring;

use crate::errors::AuthorityError;
use crate::ports::RevocationStore;
use crate::ports::TokenAuthority;

/// Token authority backed by a signing keyring and a revocation store.
///
/// Issued tokens are self-contained; the only server-side state is the
/// denylist consulted on every verification.
pub struct KeyringAuthority<R>
where
    R: RevocationStore,
{
    keyring: Keyring,
    revoked: Arc<R>,
}

impl<R> KeyringAuthority<R>
where
    R: RevocationStore,
{
    pub fn new(keyring: Keyring, revoked: Arc<R>) -> Self {
        Self { keyring, revoked }
    }
}

#[async_trait]
impl<R> TokenAuthority for KeyringAuthority<R>
where
    R: RevocationStore,
{
    async fn issue(&self, claims: &Claims) -> Result<String, AuthorityError> {
        Ok(self.keyring.sign(claims)?)
    }

    async fn verify(&self, token: &str) -> Result<Claims, AuthorityError> {
        let claims = self.keyring.verify(token)?;

        if self.revoked.contains(token).await? {
            return Err(AuthorityError::Revoked);
        }

        Ok(claims)
    }

    async fn invalidate(&self, token: &str) -> Result<(), AuthorityError> {
        Ok(self.revoked.insert(token).await?)
    }
}
