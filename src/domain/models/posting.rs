use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Collection, StoredImage, UserIdentity};
use crate::domain::{errors::ValidationError, value_objects::ItemId};

/// Which feed a posting belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostingKind {
    Lost,
    Found,
}

impl PostingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostingKind::Lost => "lost",
            PostingKind::Found => "found",
        }
    }

    pub fn collection(&self) -> Collection {
        Collection::for_kind(*self)
    }
}

impl std::fmt::Display for PostingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PostingKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lost" => Ok(PostingKind::Lost),
            "found" => Ok(PostingKind::Found),
            _ => Err(ValidationError::UnknownPostingKind(s.to_string())),
        }
    }
}

/// Lifecycle status of a posting. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Active,
    /// Claimed by a second user
    Resolved,
    /// Withdrawn by the poster without a claim
    Removed,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Resolved => "resolved",
            ItemStatus::Removed => "removed",
        }
    }

    /// Resolved and removed postings never change again
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ItemStatus::Active)
    }

    /// Validate a status change. Only `active -> resolved` and `active -> removed` are legal.
    pub fn transition_to(self, next: ItemStatus) -> Result<ItemStatus, ValidationError> {
        match (self, next) {
            (ItemStatus::Active, ItemStatus::Resolved) | (ItemStatus::Active, ItemStatus::Removed) => {
                Ok(next)
            }
            (from, to) => Err(ValidationError::InvalidStatusTransition { from, to }),
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ItemStatus::Active),
            "resolved" => Ok(ItemStatus::Resolved),
            "removed" => Ok(ItemStatus::Removed),
            other => Err(ValidationError::InvalidField {
                field: "status".to_string(),
                value: other.to_string(),
                expected: "active, resolved or removed".to_string(),
            }),
        }
    }
}

/// An item someone has lost and is looking for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LostItem {
    pub id: ItemId,
    pub poster: UserIdentity,
    pub item_name: String,
    pub description: String,
    pub last_known_location: String,
    pub image: StoredImage,
    pub date_lost: NaiveDate,
    pub time_lost: String,
    pub created_at: DateTime<Utc>,
    pub status: ItemStatus,
}

/// An item someone has found and wants to hand back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundItem {
    pub id: ItemId,
    pub poster: UserIdentity,
    pub item_name: String,
    pub description: String,
    pub found_location: String,
    pub image: StoredImage,
    pub date_found: NaiveDate,
    pub time_found: String,
    pub created_at: DateTime<Utc>,
    pub status: ItemStatus,
}

/// A lost or found posting as stored in its collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Posting {
    Lost(LostItem),
    Found(FoundItem),
}

impl Posting {
    pub fn kind(&self) -> PostingKind {
        match self {
            Posting::Lost(_) => PostingKind::Lost,
            Posting::Found(_) => PostingKind::Found,
        }
    }

    pub fn id(&self) -> &ItemId {
        match self {
            Posting::Lost(item) => &item.id,
            Posting::Found(item) => &item.id,
        }
    }

    pub fn poster(&self) -> &UserIdentity {
        match self {
            Posting::Lost(item) => &item.poster,
            Posting::Found(item) => &item.poster,
        }
    }

    pub fn item_name(&self) -> &str {
        match self {
            Posting::Lost(item) => &item.item_name,
            Posting::Found(item) => &item.item_name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Posting::Lost(item) => &item.description,
            Posting::Found(item) => &item.description,
        }
    }

    /// Last known location for lost items, found location for found items
    pub fn location(&self) -> &str {
        match self {
            Posting::Lost(item) => &item.last_known_location,
            Posting::Found(item) => &item.found_location,
        }
    }

    pub fn image(&self) -> &StoredImage {
        match self {
            Posting::Lost(item) => &item.image,
            Posting::Found(item) => &item.image,
        }
    }

    pub fn occurred_date(&self) -> NaiveDate {
        match self {
            Posting::Lost(item) => item.date_lost,
            Posting::Found(item) => item.date_found,
        }
    }

    pub fn occurred_time_label(&self) -> &str {
        match self {
            Posting::Lost(item) => &item.time_lost,
            Posting::Found(item) => &item.time_found,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Posting::Lost(item) => item.created_at,
            Posting::Found(item) => item.created_at,
        }
    }

    pub fn status(&self) -> ItemStatus {
        match self {
            Posting::Lost(item) => item.status,
            Posting::Found(item) => item.status,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status() == ItemStatus::Active
    }

    /// Apply a status change, rejecting any change to a terminal posting
    pub fn transition(&mut self, next: ItemStatus) -> Result<(), ValidationError> {
        let status = match self {
            Posting::Lost(item) => &mut item.status,
            Posting::Found(item) => &mut item.status,
        };
        *status = status.transition_to(next)?;
        Ok(())
    }
}

/// A validated posting awaiting an identifier from the repository
#[derive(Debug, Clone, PartialEq)]
pub struct NewPosting {
    pub kind: PostingKind,
    pub poster: UserIdentity,
    pub item_name: String,
    pub description: String,
    pub location: String,
    pub image: StoredImage,
    pub occurred_date: NaiveDate,
    pub occurred_time_label: String,
    pub created_at: DateTime<Utc>,
}

impl NewPosting {
    /// Materialise the stored record. New postings always start `active`.
    pub fn into_posting(self, id: ItemId) -> Posting {
        match self.kind {
            PostingKind::Lost => Posting::Lost(LostItem {
                id,
                poster: self.poster,
                item_name: self.item_name,
                description: self.description,
                last_known_location: self.location,
                image: self.image,
                date_lost: self.occurred_date,
                time_lost: self.occurred_time_label,
                created_at: self.created_at,
                status: ItemStatus::Active,
            }),
            PostingKind::Found => Posting::Found(FoundItem {
                id,
                poster: self.poster,
                item_name: self.item_name,
                description: self.description,
                found_location: self.location,
                image: self.image,
                date_found: self.occurred_date,
                time_found: self.occurred_time_label,
                created_at: self.created_at,
                status: ItemStatus::Active,
            }),
        }
    }
}
