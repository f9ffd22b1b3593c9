use async_trait::async_trait;

use crate::domain::{
    errors::LifecycleResult,
    models::{Posting, PostingDraft, PostingKind, UserIdentity},
    value_objects::{DeletionHandle, ItemId, LogId},
};

/// Port for the posting lifecycle: create, claim and self-removal.
///
/// Identity is always passed in explicitly. None of the operations are
/// cancellable once started and none retry on their own.
#[async_trait]
pub trait LifecycleService: Send + Sync + 'static {
    /// Upload the image, store an `active` posting and broadcast it to everyone but the poster
    async fn create(
        &self,
        kind: PostingKind,
        draft: PostingDraft,
        poster: UserIdentity,
    ) -> LifecycleResult<ItemId>;

    /// Resolve a posting on behalf of a second user.
    ///
    /// The snapshot is trusted as-is; it is not re-read from the repository.
    async fn claim(
        &self,
        item_id: &ItemId,
        claimer: UserIdentity,
        snapshot: Posting,
    ) -> LifecycleResult<LogId>;

    /// Withdraw a posting without a claim. Idempotent.
    async fn remove(
        &self,
        kind: PostingKind,
        item_id: &ItemId,
        deletion_handle: &DeletionHandle,
    ) -> LifecycleResult<()>;
}
