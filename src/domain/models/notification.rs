use serde::{Deserialize, Serialize};

use crate::domain::value_objects::UserId;

/// A push notification before addressing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// Opaque data handed to the client app
    pub payload: serde_json::Value,
}

/// One addressed message, as handed to a push transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    pub to: String,
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
}

impl PushMessage {
    pub fn new(address: impl Into<String>, notification: &Notification) -> Self {
        Self {
            to: address.into(),
            title: notification.title.clone(),
            body: notification.body.clone(),
            data: notification.payload.clone(),
        }
    }
}

/// A user as known to the delivery side: who they are and where to reach them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub user_id: UserId,
    pub push_token: Option<String>,
}

impl DirectoryEntry {
    /// Registered delivery address, if any. Blank tokens count as unregistered.
    pub fn address(&self) -> Option<&str> {
        self.push_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Outcome counts of a best-effort dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DispatchReport {
    pub delivered: usize,
    /// Recipients with no registered address
    pub skipped: usize,
    pub failed: usize,
}

impl DispatchReport {
    pub fn merge(self, other: DispatchReport) -> Self {
        Self {
            delivered: self.delivered + other.delivered,
            skipped: self.skipped + other.skipped,
            failed: self.failed + other.failed,
        }
    }
}
