use async_trait::async_trait;
use credentials::Claims;

use crate::errors::AuthorityError;
use crate::errors::StoreError;
use crate::models::UserRecord;
use crate::models::UserUpdate;

/// Port for issuing, verifying, and invalidating access tokens.
///
/// The middleware never touches a cryptographic library directly; every
/// token operation goes through an implementation of this trait.
#[async_trait]
pub trait TokenAuthority: Send + Sync + 'static {
    /// Issue a signed token carrying the given claims.
    ///
    /// # Arguments
    /// * `claims` - Claims to encode into the token
    ///
    /// # Returns
    /// Compact token string
    ///
    /// # Errors
    /// * `Token` - Signing failed
    async fn issue(&self, claims: &Claims) -> Result<String, AuthorityError>;

    /// Verify a token and return its claims.
    ///
    /// A token passes only if its signature checks out, it is neither
    /// expired nor used before its not-before time, and it has not been
    /// invalidated.
    ///
    /// # Arguments
    /// * `token` - Compact token string to verify
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `Token` - Expired, not yet valid, bad signature, or malformed
    /// * `Revoked` - Token was invalidated after issuance
    /// * `Store` - Invalidation store lookup failed
    async fn verify(&self, token: &str) -> Result<Claims, AuthorityError>;

    /// Invalidate a token so later verifications reject it.
    ///
    /// # Arguments
    /// * `token` - Compact token string to invalidate
    ///
    /// # Errors
    /// * `Store` - Invalidation store write failed
    async fn invalidate(&self, token: &str) -> Result<(), AuthorityError>;
}

/// Denylist of tokens that must be rejected even when otherwise valid.
#[async_trait]
pub trait RevocationStore: Send + Sync + 'static {
    /// Record a token as invalidated.
    ///
    /// # Errors
    /// * `Backend` - Store write failed
    async fn insert(&self, token: &str) -> Result<(), StoreError>;

    /// Check whether a token has been invalidated.
    ///
    /// # Errors
    /// * `Backend` - Store lookup failed
    async fn contains(&self, token: &str) -> Result<bool, StoreError>;
}

/// Persistence boundary for user credentials.
///
/// Two operations are enough for the authentication layer: a lookup by
/// identifying field for the login flow, and an update-or-fail that runs
/// several field changes in one transaction for password resets.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Find a user by an identifying field.
    ///
    /// # Arguments
    /// * `field` - Identifying field name ("id", "username", or "email")
    /// * `value` - Value to match
    ///
    /// # Returns
    /// Matching record, or `None` when no user matches
    ///
    /// # Errors
    /// * `UnsupportedField` - The store cannot look users up by `field`
    /// * `Backend` - Store lookup failed
    async fn find_credentials(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Option<UserRecord>, StoreError>;

    /// Apply field updates to a user inside a single transaction.
    ///
    /// Either every update is committed or none is; a failure part-way
    /// through must leave the record as it was.
    ///
    /// # Arguments
    /// * `id` - Identifier of the user to update
    /// * `updates` - Ordered field mutations to apply
    ///
    /// # Returns
    /// The record after all updates
    ///
    /// # Errors
    /// * `NotFound` - No user with this id
    /// * `Backend` - Store write failed; nothing was committed
    async fn update_within_txn(
        &self,
        id: &str,
        updates: &[UserUpdate],
    ) -> Result<UserRecord, StoreError>;
}
