use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    domain::{
        errors::NotificationResult,
        models::{DirectoryEntry, DispatchReport, Notification, PushMessage},
        value_objects::UserId,
    },
    ports::{
        notifications::{NotificationGateway, PushTransport},
        repositories::UserDirectory,
    },
};

/// Notification gateway that resolves addresses through a user directory
/// and hands each message to a push transport.
///
/// Users without a registered address are skipped. Delivery failures are
/// counted in the report; only a failed directory lookup is an error.
#[derive(Clone)]
pub struct DirectoryNotificationGateway {
    directory: Arc<dyn UserDirectory>,
    transport: Arc<dyn PushTransport>,
}

impl DirectoryNotificationGateway {
    pub fn new(directory: Arc<dyn UserDirectory>, transport: Arc<dyn PushTransport>) -> Self {
        Self {
            directory,
            transport,
        }
    }

    async fn dispatch(&self, recipients: Vec<DirectoryEntry>, notification: &Notification) -> DispatchReport {
        let mut report = DispatchReport::default();
        let mut messages = Vec::with_capacity(recipients.len());

        for recipient in &recipients {
            match recipient.address() {
                Some(address) => messages.push((&recipient.user_id, PushMessage::new(address, notification))),
                None => report.skipped += 1,
            }
        }

        let outcomes = join_all(
            messages
                .iter()
                .map(|(_, message)| self.transport.deliver(message)),
        )
        .await;

        for ((user_id, _), outcome) in messages.iter().zip(outcomes) {
            match outcome {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(user_id = %user_id, error = %e, "push delivery failed");
                    report.failed += 1;
                }
            }
        }

        report
    }
}

#[async_trait]
impl NotificationGateway for DirectoryNotificationGateway {
    async fn send_to_all_except(
        &self,
        excluded: &UserId,
        notification: &Notification,
    ) -> NotificationResult<DispatchReport> {
        let recipients: Vec<DirectoryEntry> = self
            .directory
            .list_users()
            .await?
            .into_iter()
            .filter(|entry| &entry.user_id != excluded)
            .collect();

        let report = self.dispatch(recipients, notification).await;
        debug!(excluded = %excluded, ?report, "broadcast dispatched");
        Ok(report)
    }

    async fn send_to_user(
        &self,
        user_id: &UserId,
        notification: &Notification,
    ) -> NotificationResult<DispatchReport> {
        let recipients = match self.directory.find_user(user_id).await? {
            Some(entry) => vec![entry],
            None => {
                debug!(user_id = %user_id, "targeted notification to unknown user dropped");
                return Ok(DispatchReport {
                    skipped: 1,
                    ..Default::default()
                });
            }
        };

        Ok(self.dispatch(recipients, notification).await)
    }
}
