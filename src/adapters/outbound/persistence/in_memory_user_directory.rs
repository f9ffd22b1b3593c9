use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    domain::{errors::RepositoryResult, models::DirectoryEntry, value_objects::UserId},
    ports::repositories::UserDirectory,
};

/// In-memory user directory for testing and development
#[derive(Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<BTreeMap<UserId, Option<String>>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a user known without registering a delivery address
    pub async fn add_user(&self, user_id: UserId) {
        self.users.write().await.entry(user_id).or_insert(None);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn list_users(&self) -> RepositoryResult<Vec<DirectoryEntry>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .map(|(user_id, push_token)| DirectoryEntry {
                user_id: user_id.clone(),
                push_token: push_token.clone(),
            })
            .collect())
    }

    async fn find_user(&self, user_id: &UserId) -> RepositoryResult<Option<DirectoryEntry>> {
        let users = self.users.read().await;
        Ok(users.get(user_id).map(|push_token| DirectoryEntry {
            user_id: user_id.clone(),
            push_token: push_token.clone(),
        }))
    }

    async fn register_push_token(&self, user_id: &UserId, token: &str) -> RepositoryResult<()> {
        let token = token.trim();
        let value = (!token.is_empty()).then(|| token.to_string());
        self.users.write().await.insert(user_id.clone(), value);
        Ok(())
    }
}
