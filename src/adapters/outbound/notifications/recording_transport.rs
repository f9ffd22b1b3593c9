use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::{
    domain::{
        errors::{NotificationError, NotificationResult},
        models::PushMessage,
    },
    ports::notifications::PushTransport,
};

#[derive(Debug, Default)]
struct Recorded {
    messages: Vec<PushMessage>,
    rejected: HashSet<String>,
}

/// Push transport that keeps every message in memory instead of sending it.
///
/// Used for development and tests; addresses can be marked as rejecting to
/// simulate provider failures.
#[derive(Debug, Clone, Default)]
pub struct RecordingPushTransport {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingPushTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make future deliveries to `address` fail
    pub async fn reject_address(&self, address: impl Into<String>) {
        self.inner.lock().await.rejected.insert(address.into());
    }

    /// Messages delivered so far, in delivery order
    pub async fn messages(&self) -> Vec<PushMessage> {
        self.inner.lock().await.messages.clone()
    }

    pub async fn addresses(&self) -> Vec<String> {
        self.inner
            .lock()
            .await
            .messages
            .iter()
            .map(|m| m.to.clone())
            .collect()
    }

    pub async fn clear(&self) {
        self.inner.lock().await.messages.clear();
    }
}

#[async_trait]
impl PushTransport for RecordingPushTransport {
    async fn deliver(&self, message: &PushMessage) -> NotificationResult<()> {
        let mut inner = self.inner.lock().await;

        if inner.rejected.contains(&message.to) {
            return Err(NotificationError::Rejected {
                address: message.to.clone(),
                reason: "DeviceNotRegistered".to_string(),
            });
        }

        info!(to = %message.to, title = %message.title, "push notification recorded");
        inner.messages.push(message.clone());
        Ok(())
    }
}
