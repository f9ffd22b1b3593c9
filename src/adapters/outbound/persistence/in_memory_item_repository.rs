use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::feed::{active_feed, FeedPublisher};
use crate::{
    domain::{
        errors::{RepositoryError, RepositoryResult},
        models::{LostAndFoundLog, NewLogEntry, NewPosting, Posting, PostingKind},
        value_objects::{ItemId, LogId},
    },
    ports::repositories::{FeedStream, ItemRepository},
};

/// In-memory implementation of ItemRepository for testing and development
#[derive(Clone)]
pub struct InMemoryItemRepository {
    data: Arc<RwLock<RepositoryData>>,
    feeds: Arc<FeedPublisher>,
}

#[derive(Default)]
struct RepositoryData {
    lost: HashMap<ItemId, StoredPosting>,
    found: HashMap<ItemId, StoredPosting>,
    logs: Vec<LostAndFoundLog>,
    // Insertion counter, used to order postings created in the same instant
    next_sequence: u64,
}

struct StoredPosting {
    posting: Posting,
    sequence: u64,
}

impl RepositoryData {
    fn collection(&self, kind: PostingKind) -> &HashMap<ItemId, StoredPosting> {
        match kind {
            PostingKind::Lost => &self.lost,
            PostingKind::Found => &self.found,
        }
    }

    fn collection_mut(&mut self, kind: PostingKind) -> &mut HashMap<ItemId, StoredPosting> {
        match kind {
            PostingKind::Lost => &mut self.lost,
            PostingKind::Found => &mut self.found,
        }
    }

    fn active(&self, kind: PostingKind) -> Vec<Posting> {
        active_feed(
            self.collection(kind)
                .values()
                .map(|stored| (&stored.posting, stored.sequence)),
        )
    }
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(RepositoryData::default())),
            feeds: Arc::new(FeedPublisher::new()),
        }
    }

    /// Number of open feed subscriptions for a kind
    pub fn subscriber_count(&self, kind: PostingKind) -> usize {
        self.feeds.subscriber_count(kind)
    }
}

impl Default for InMemoryItemRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn create_posting(&self, record: NewPosting) -> RepositoryResult<ItemId> {
        let mut data = self.data.write().await;
        let kind = record.kind;
        let id = ItemId::generate();

        if data.collection(kind).contains_key(&id) {
            return Err(RepositoryError::Conflict { id });
        }

        let sequence = data.next_sequence;
        data.next_sequence += 1;
        data.collection_mut(kind).insert(
            id.clone(),
            StoredPosting {
                posting: record.into_posting(id.clone()),
                sequence,
            },
        );

        // Publish under the lock so snapshots go out in write order
        self.feeds.publish(kind, data.active(kind));
        Ok(id)
    }

    async fn delete_posting(&self, kind: PostingKind, id: &ItemId) -> RepositoryResult<()> {
        let mut data = self.data.write().await;

        if data.collection_mut(kind).remove(id).is_some() {
            self.feeds.publish(kind, data.active(kind));
        }

        Ok(())
    }

    async fn posting_exists(&self, kind: PostingKind, id: &ItemId) -> RepositoryResult<bool> {
        let data = self.data.read().await;
        Ok(data.collection(kind).contains_key(id))
    }

    async fn find_posting(
        &self,
        kind: PostingKind,
        id: &ItemId,
    ) -> RepositoryResult<Option<Posting>> {
        let data = self.data.read().await;
        Ok(data.collection(kind).get(id).map(|stored| stored.posting.clone()))
    }

    async fn active_postings(&self, kind: PostingKind) -> RepositoryResult<Vec<Posting>> {
        let data = self.data.read().await;
        Ok(data.active(kind))
    }

    async fn subscribe(&self, kind: PostingKind) -> RepositoryResult<FeedStream> {
        // Every write publishes, so the channel already holds the current snapshot
        Ok(self.feeds.subscribe(kind))
    }

    async fn append_log(&self, entry: NewLogEntry) -> RepositoryResult<LogId> {
        let mut data = self.data.write().await;
        let id = LogId::generate();
        data.logs.push(entry.into_log(id.clone()));
        Ok(id)
    }

    async fn list_logs(&self) -> RepositoryResult<Vec<LostAndFoundLog>> {
        let data = self.data.read().await;
        // Reverse first so entries resolved in the same instant stay newest-appended first
        let mut logs: Vec<LostAndFoundLog> = data.logs.iter().rev().cloned().collect();
        logs.sort_by(|a, b| b.resolved_at.cmp(&a.resolved_at));
        Ok(logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        models::{StoredImage, UserIdentity},
        value_objects::{DeletionHandle, UserId},
    };
    use chrono::{Duration, NaiveDate, Utc};
    use futures::StreamExt;

    fn record(kind: PostingKind, name: &str, age_minutes: i64) -> NewPosting {
        NewPosting {
            kind,
            poster: UserIdentity::new(UserId::new("alice").unwrap(), "alice@campus.edu", None)
                .unwrap(),
            item_name: name.to_string(),
            description: "desc".to_string(),
            location: "Library".to_string(),
            image: StoredImage {
                url: format!("memory://{}", name),
                deletion_handle: DeletionHandle::new(name).unwrap(),
            },
            occurred_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            occurred_time_label: "noon".to_string(),
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[tokio::test]
    async fn test_feed_is_newest_first_and_per_kind() {
        let repo = InMemoryItemRepository::new();
        repo.create_posting(record(PostingKind::Found, "older", 10))
            .await
            .unwrap();
        repo.create_posting(record(PostingKind::Found, "newer", 1))
            .await
            .unwrap();
        repo.create_posting(record(PostingKind::Lost, "lost-one", 5))
            .await
            .unwrap();

        let found = repo.active_postings(PostingKind::Found).await.unwrap();
        let names: Vec<&str> = found.iter().map(|p| p.item_name()).collect();
        assert_eq!(names, vec!["newer", "older"]);

        let lost = repo.active_postings(PostingKind::Lost).await.unwrap();
        assert_eq!(lost.len(), 1);
    }

    #[tokio::test]
    async fn test_same_instant_orders_by_insertion() {
        let repo = InMemoryItemRepository::new();
        let mut first = record(PostingKind::Lost, "first", 0);
        let now = first.created_at;
        let mut second = record(PostingKind::Lost, "second", 0);
        first.created_at = now;
        second.created_at = now;

        repo.create_posting(first).await.unwrap();
        repo.create_posting(second).await.unwrap();

        let feed = repo.active_postings(PostingKind::Lost).await.unwrap();
        assert_eq!(feed[0].item_name(), "second");
        assert_eq!(feed[1].item_name(), "first");
    }

    #[tokio::test]
    async fn test_delete_absent_is_noop() {
        let repo = InMemoryItemRepository::new();
        let id = ItemId::new("missing".to_string()).unwrap();

        assert!(repo.delete_posting(PostingKind::Found, &id).await.is_ok());
        assert!(!repo.posting_exists(PostingKind::Found, &id).await.unwrap());
    }

    fn log_entry(name: &str, resolved_minutes_ago: i64) -> NewLogEntry {
        let posting = record(PostingKind::Found, name, 30).into_posting(ItemId::generate());
        let claimer =
            UserIdentity::new(UserId::new("bob").unwrap(), "bob@campus.edu", None).unwrap();
        NewLogEntry::from_claim(
            &posting,
            claimer,
            Utc::now() - Duration::minutes(resolved_minutes_ago),
        )
    }

    #[tokio::test]
    async fn test_logs_order_by_resolution_time_not_append_order() {
        let repo = InMemoryItemRepository::new();
        repo.append_log(log_entry("middle", 5)).await.unwrap();
        repo.append_log(log_entry("oldest", 20)).await.unwrap();
        repo.append_log(log_entry("newest", 1)).await.unwrap();

        let logs = repo.list_logs().await.unwrap();
        let names: Vec<&str> = logs.iter().map(|log| log.item_name.as_str()).collect();
        assert_eq!(names, vec!["newest", "middle", "oldest"]);
    }

    #[tokio::test]
    async fn test_find_posting_returns_stored_copy() {
        let repo = InMemoryItemRepository::new();
        let id = repo
            .create_posting(record(PostingKind::Lost, "wallet", 0))
            .await
            .unwrap();

        let posting = repo.find_posting(PostingKind::Lost, &id).await.unwrap().unwrap();
        assert_eq!(posting.item_name(), "wallet");
        assert!(repo
            .find_posting(PostingKind::Found, &id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_subscription_emits_on_change() {
        let repo = InMemoryItemRepository::new();
        let mut feed = repo.subscribe(PostingKind::Found).await.unwrap();

        assert!(feed.next().await.unwrap().is_empty());

        let id = repo
            .create_posting(record(PostingKind::Found, "umbrella", 0))
            .await
            .unwrap();
        let snapshot = feed.next().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id(), &id);

        repo.delete_posting(PostingKind::Found, &id).await.unwrap();
        assert!(feed.next().await.unwrap().is_empty());
    }
}
