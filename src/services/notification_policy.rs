use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    domain::models::{DispatchReport, Notification, Posting, PostingKind, UserIdentity},
    ports::notifications::NotificationGateway,
};

/// Decides who hears about lifecycle events and what they are told.
///
/// Every dispatch is awaited but never fails the caller: gateway errors are
/// logged and reported as an empty [`DispatchReport`].
#[derive(Clone)]
pub struct NotificationPolicy {
    gateway: Arc<dyn NotificationGateway>,
}

impl NotificationPolicy {
    pub fn new(gateway: Arc<dyn NotificationGateway>) -> Self {
        Self { gateway }
    }

    /// Message broadcast to everyone except the poster when a posting goes live
    pub fn posting_created_message(posting: &Posting) -> Notification {
        let (title, body) = match posting.kind() {
            PostingKind::Lost => (
                "Lost item reported".to_string(),
                format!(
                    "{} was lost near {}. Seen it? Open the app to help.",
                    posting.item_name(),
                    posting.location()
                ),
            ),
            PostingKind::Found => (
                "Item found".to_string(),
                format!(
                    "{} was found at {}. Is it yours?",
                    posting.item_name(),
                    posting.location()
                ),
            ),
        };

        Notification {
            title,
            body,
            payload: json!({
                "event": "posting_created",
                "kind": posting.kind().as_str(),
                "itemId": posting.id().as_str(),
            }),
        }
    }

    /// Message sent to the poster only, carrying the claimer's contact details
    pub fn posting_claimed_message(snapshot: &Posting, claimer: &UserIdentity) -> Notification {
        let item = snapshot.item_name();
        let contact = claimer.contact_line();
        let (title, body) = match snapshot.kind() {
            PostingKind::Lost => (
                format!("Someone found your {}!", item),
                format!(
                    "{} says they found your {}. Reach out to arrange the return.",
                    contact, item
                ),
            ),
            PostingKind::Found => (
                format!("Someone claimed the {} you found", item),
                format!(
                    "{} says the {} is theirs. Reach out to arrange the hand-off.",
                    contact, item
                ),
            ),
        };

        Notification {
            title,
            body,
            payload: json!({
                "event": "posting_claimed",
                "kind": snapshot.kind().as_str(),
                "itemId": snapshot.id().as_str(),
                "claimerEmail": claimer.email,
                "claimerPhone": claimer.phone,
            }),
        }
    }

    /// Broadcast a new posting to all users except its poster
    pub async fn announce_new_posting(&self, posting: &Posting) -> DispatchReport {
        let message = Self::posting_created_message(posting);
        let poster = &posting.poster().user_id;

        match self.gateway.send_to_all_except(poster, &message).await {
            Ok(report) => {
                debug!(item_id = %posting.id(), ?report, "new posting broadcast");
                report
            }
            Err(e) => {
                warn!(item_id = %posting.id(), error = %e, "failed to broadcast new posting");
                DispatchReport::default()
            }
        }
    }

    /// Tell the poster who claimed their posting and how to reach them
    pub async fn notify_poster_of_claim(
        &self,
        snapshot: &Posting,
        claimer: &UserIdentity,
    ) -> DispatchReport {
        let message = Self::posting_claimed_message(snapshot, claimer);
        let poster = &snapshot.poster().user_id;

        match self.gateway.send_to_user(poster, &message).await {
            Ok(report) => {
                debug!(item_id = %snapshot.id(), ?report, "claim notification sent");
                report
            }
            Err(e) => {
                warn!(item_id = %snapshot.id(), error = %e, "failed to notify poster of claim");
                DispatchReport::default()
            }
        }
    }
}
