use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::UserRecord;
use crate::models::UserUpdate;
use crate::ports::RevocationStore;
use crate::ports::UserStore;

/// In-process revocation denylist.
#[derive(Debug, Clone, Default)]
pub struct MemoryRevocationStore {
    revoked: Arc<RwLock<HashSet<String>>>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn insert(&self, token: &str) -> Result<(), StoreError> {
        self.revoked.write().await.insert(token.to_string());
        Ok(())
    }

    async fn contains(&self, token: &str) -> Result<bool, StoreError> {
        Ok(self.revoked.read().await.contains(token))
    }
}

/// In-process user store keyed by user id.
///
/// Backs tests and single-process setups; real deployments plug a
/// database-backed [`UserStore`] into the same port.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
    fail_update_at: Arc<RwLock<Option<usize>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, enforcing username and email uniqueness.
    ///
    /// Records arriving with an empty id are assigned a fresh one.
    pub async fn insert(&self, mut record: UserRecord) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write().await;

        if users.values().any(|user| user.username == record.username) {
            return Err(StoreError::UsernameAlreadyExists(record.username));
        }

        if let Some(email) = &record.email {
            if users
                .values()
                .any(|user| user.email.as_deref() == Some(email))
            {
                return Err(StoreError::EmailAlreadyExists(email.clone()));
            }
        }

        if record.id.is_empty() {
            record.id = Uuid::new_v4().to_string();
        }

        users.insert(record.id.clone(), record.clone());

        Ok(record)
    }

    /// Arrange for the next transactional update to fail before the change
    /// at `index` is applied, leaving the record untouched. One-shot;
    /// intended for tests exercising rollback behavior.
    pub async fn fail_next_update_at(&self, index: usize) {
        *self.fail_update_at.write().await = Some(index);
    }

    fn apply(record: &mut UserRecord, update: &UserUpdate) {
        match update {
            UserUpdate::SetPasswordHash(hash) => record.password_hash = hash.clone(),
            UserUpdate::SetConfirmationToken { token, sent_at } => {
                record.confirmation_token = Some(token.clone());
                record.confirmation_sent_at = Some(*sent_at);
            }
            UserUpdate::SetResetToken { token, sent_at } => {
                record.reset_token = Some(token.clone());
                record.reset_sent_at = Some(*sent_at);
            }
            UserUpdate::ClearResetToken => {
                record.reset_token = None;
                record.reset_sent_at = None;
            }
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_credentials(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;

        let record = match field {
            "id" => users.get(value).cloned(),
            "username" => users.values().find(|user| user.username == value).cloned(),
            "email" => users
                .values()
                .find(|user| user.email.as_deref() == Some(value))
                .cloned(),
            other => return Err(StoreError::UnsupportedField(other.to_string())),
        };

        Ok(record)
    }

    async fn update_within_txn(
        &self,
        id: &str,
        updates: &[UserUpdate],
    ) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write().await;
        let record = users
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        // Stage on a copy; the map only sees the result when every update
        // applied, so a failure part-way through commits nothing.
        let mut staged = record.clone();
        let mut fail_at = self.fail_update_at.write().await;

        for (index, update) in updates.iter().enumerate() {
            if *fail_at == Some(index) {
                *fail_at = None;
                return Err(StoreError::Backend("injected update failure".to_string()));
            }

            Self::apply(&mut staged, update);
        }

        users.insert(id.to_string(), staged.clone());

        Ok(staged)
    }
}
