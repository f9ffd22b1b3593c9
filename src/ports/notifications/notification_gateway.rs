use async_trait::async_trait;

use crate::domain::{
    errors::NotificationResult,
    models::{DispatchReport, Notification, PushMessage},
    value_objects::UserId,
};

/// Best-effort push delivery with its own address resolution
#[async_trait]
pub trait NotificationGateway: Send + Sync + 'static {
    /// Send to every known user except `excluded`
    async fn send_to_all_except(
        &self,
        excluded: &UserId,
        notification: &Notification,
    ) -> NotificationResult<DispatchReport>;

    /// Send to exactly one user. A user without an address is a silent no-op.
    async fn send_to_user(
        &self,
        user_id: &UserId,
        notification: &Notification,
    ) -> NotificationResult<DispatchReport>;
}

/// Delivers one already-addressed message to a push provider
#[async_trait]
pub trait PushTransport: Send + Sync + 'static {
    async fn deliver(&self, message: &PushMessage) -> NotificationResult<()>;
}
