use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    domain::{
        errors::{LifecycleError, LifecycleResult, ValidationError},
        models::{ItemStatus, NewLogEntry, NewPosting, Posting, PostingDraft, PostingKind, UserIdentity},
        value_objects::{DeletionHandle, ItemId, LogId},
    },
    ports::{
        notifications::NotificationGateway, repositories::ItemRepository,
        services::LifecycleService, storage::ImageStore,
    },
    services::NotificationPolicy,
};

/// Implementation of the LifecycleService.
///
/// Steps run strictly in order and nothing is compensated: a failed
/// repository write after an upload leaves the image orphaned, and a failed
/// delete after a claim leaves the posting visible next to its log entry.
#[derive(Clone)]
pub struct LifecycleServiceImpl {
    repository: Arc<dyn ItemRepository>,
    images: Arc<dyn ImageStore>,
    notifications: NotificationPolicy,
}

impl LifecycleServiceImpl {
    pub fn new(
        repository: Arc<dyn ItemRepository>,
        images: Arc<dyn ImageStore>,
        gateway: Arc<dyn NotificationGateway>,
    ) -> Self {
        Self {
            repository,
            images,
            notifications: NotificationPolicy::new(gateway),
        }
    }

    /// Repository backing this engine, for read-side consumers such as feeds
    pub fn repository(&self) -> Arc<dyn ItemRepository> {
        self.repository.clone()
    }
}

#[async_trait]
impl LifecycleService for LifecycleServiceImpl {
    #[tracing::instrument(skip(self, draft, poster), fields(poster = %poster.user_id))]
    async fn create(
        &self,
        kind: PostingKind,
        draft: PostingDraft,
        poster: UserIdentity,
    ) -> LifecycleResult<ItemId> {
        // Nothing touches the store or the repository until the draft is complete
        draft.validate()?;
        let occurred_date = draft
            .occurred_date
            .ok_or(ValidationError::MissingOccurredDate)?;

        let image = self.images.upload(kind, &draft.image).await?;

        let record = NewPosting {
            kind,
            poster,
            item_name: draft.item_name.trim().to_string(),
            description: draft.description.trim().to_string(),
            location: draft.location.trim().to_string(),
            image,
            occurred_date,
            occurred_time_label: draft.occurred_time_label.trim().to_string(),
            created_at: Utc::now(),
        };

        let id = match self.repository.create_posting(record.clone()).await {
            Ok(id) => id,
            Err(e) => {
                warn!(
                    handle = %record.image.deletion_handle,
                    error = %e,
                    "posting write failed; uploaded image left orphaned"
                );
                return Err(e.into());
            }
        };

        let posting = record.into_posting(id.clone());
        let report = self.notifications.announce_new_posting(&posting).await;

        info!(
            item_id = %id,
            delivered = report.delivered,
            "posting created"
        );
        Ok(id)
    }

    #[tracing::instrument(skip(self, claimer, snapshot), fields(claimer = %claimer.user_id))]
    async fn claim(
        &self,
        item_id: &ItemId,
        claimer: UserIdentity,
        snapshot: Posting,
    ) -> LifecycleResult<LogId> {
        if claimer.user_id == snapshot.poster().user_id {
            return Err(LifecycleError::SelfClaim {
                item_id: item_id.clone(),
                user_id: claimer.user_id,
            });
        }

        if snapshot.id() != item_id {
            return Err(ValidationError::InvalidField {
                field: "item_id".to_string(),
                value: item_id.to_string(),
                expected: format!("the snapshot's id '{}'", snapshot.id()),
            }
            .into());
        }

        let kind = snapshot.kind();
        let mut resolved = snapshot;
        resolved.transition(ItemStatus::Resolved)?;

        // Guards against replaying a finished claim; concurrent claims can still both pass
        if !self.repository.posting_exists(kind, item_id).await? {
            return Err(LifecycleError::AlreadyResolved {
                item_id: item_id.clone(),
            });
        }

        let entry = NewLogEntry::from_claim(&resolved, claimer.clone(), Utc::now());
        let log_id = self.repository.append_log(entry).await?;

        self.notifications
            .notify_poster_of_claim(&resolved, &claimer)
            .await;

        if let Err(e) = self.repository.delete_posting(kind, item_id).await {
            warn!(
                item_id = %item_id,
                log_id = %log_id,
                error = %e,
                "claim logged but posting could not be deleted"
            );
            return Err(e.into());
        }

        info!(item_id = %item_id, log_id = %log_id, "posting claimed");
        Ok(log_id)
    }

    #[tracing::instrument(skip(self, deletion_handle))]
    async fn remove(
        &self,
        kind: PostingKind,
        item_id: &ItemId,
        deletion_handle: &DeletionHandle,
    ) -> LifecycleResult<()> {
        if let Err(e) = self.images.delete(deletion_handle).await {
            warn!(
                handle = %deletion_handle,
                error = %e,
                "failed to delete posting image; continuing"
            );
        }

        self.repository.delete_posting(kind, item_id).await?;

        info!(item_id = %item_id, "posting removed by poster");
        Ok(())
    }
}
