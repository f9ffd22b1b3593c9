use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::domain::{
    errors::RepositoryResult,
    models::{LostAndFoundLog, NewLogEntry, NewPosting, Posting, PostingKind},
    value_objects::{ItemId, LogId},
};

/// Live view of one collection's active postings.
///
/// Yields the current set on subscription, then a full fresh set after every
/// change. Each set holds only `active` postings, newest `created_at` first.
pub type FeedStream = BoxStream<'static, Vec<Posting>>;

/// Durable storage for lost/found postings and the claim audit trail
#[async_trait]
pub trait ItemRepository: Send + Sync + 'static {
    /// Store a new posting in its kind's collection and return the assigned id
    async fn create_posting(&self, record: NewPosting) -> RepositoryResult<ItemId>;

    /// Delete a posting. Deleting an id that is not present succeeds.
    async fn delete_posting(&self, kind: PostingKind, id: &ItemId) -> RepositoryResult<()>;

    /// Check whether a posting is still present in its collection
    async fn posting_exists(&self, kind: PostingKind, id: &ItemId) -> RepositoryResult<bool>;

    /// Look up a single posting in its kind's collection
    async fn find_posting(
        &self,
        kind: PostingKind,
        id: &ItemId,
    ) -> RepositoryResult<Option<Posting>>;

    /// One-shot read of the active feed
    async fn active_postings(&self, kind: PostingKind) -> RepositoryResult<Vec<Posting>>;

    /// Standing subscription to the active feed
    async fn subscribe(&self, kind: PostingKind) -> RepositoryResult<FeedStream>;

    /// Append an audit entry. Entries are never updated or deleted.
    async fn append_log(&self, entry: NewLogEntry) -> RepositoryResult<LogId>;

    /// All audit entries, most recently resolved first
    async fn list_logs(&self) -> RepositoryResult<Vec<LostAndFoundLog>>;
}
