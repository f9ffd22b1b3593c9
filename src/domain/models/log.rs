use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Posting, PostingKind, UserIdentity};
use crate::domain::value_objects::{ItemId, LogId};

/// Immutable audit record written once per successful claim.
///
/// Posting fields are copied so the entry stays readable after the posting
/// itself is deleted. `item_id` is kept for traceability and never dereferenced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LostAndFoundLog {
    pub id: LogId,
    #[serde(rename = "type")]
    pub kind: PostingKind,
    pub item_id: ItemId,
    pub item_name: String,
    pub description: String,
    pub location: String,
    pub image_url: String,
    pub poster: UserIdentity,
    pub claimer: UserIdentity,
    pub occurred_date: NaiveDate,
    pub occurred_time_label: String,
    pub resolved_at: DateTime<Utc>,
}

/// A log entry awaiting an identifier from the repository
#[derive(Debug, Clone, PartialEq)]
pub struct NewLogEntry {
    pub kind: PostingKind,
    pub item_id: ItemId,
    pub item_name: String,
    pub description: String,
    pub location: String,
    pub image_url: String,
    pub poster: UserIdentity,
    pub claimer: UserIdentity,
    pub occurred_date: NaiveDate,
    pub occurred_time_label: String,
    pub resolved_at: DateTime<Utc>,
}

impl NewLogEntry {
    /// Snapshot the claimed posting together with the claimer
    pub fn from_claim(posting: &Posting, claimer: UserIdentity, resolved_at: DateTime<Utc>) -> Self {
        Self {
            kind: posting.kind(),
            item_id: posting.id().clone(),
            item_name: posting.item_name().to_string(),
            description: posting.description().to_string(),
            location: posting.location().to_string(),
            image_url: posting.image().url.clone(),
            poster: posting.poster().clone(),
            claimer,
            occurred_date: posting.occurred_date(),
            occurred_time_label: posting.occurred_time_label().to_string(),
            resolved_at,
        }
    }

    pub fn into_log(self, id: LogId) -> LostAndFoundLog {
        LostAndFoundLog {
            id,
            kind: self.kind,
            item_id: self.item_id,
            item_name: self.item_name,
            description: self.description,
            location: self.location,
            image_url: self.image_url,
            poster: self.poster,
            claimer: self.claimer,
            occurred_date: self.occurred_date,
            occurred_time_label: self.occurred_time_label,
            resolved_at: self.resolved_at,
        }
    }
}
