use async_trait::async_trait;

use crate::domain::{errors::RepositoryResult, models::DirectoryEntry, value_objects::UserId};

/// Lookup of users and their push delivery addresses
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Every known user, with or without a registered address
    async fn list_users(&self) -> RepositoryResult<Vec<DirectoryEntry>>;

    async fn find_user(&self, user_id: &UserId) -> RepositoryResult<Option<DirectoryEntry>>;

    /// Register (or with an empty token, clear) the device token for a user
    async fn register_push_token(&self, user_id: &UserId, token: &str) -> RepositoryResult<()>;
}
