use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    errors::ValidationError,
    value_objects::{DeletionHandle, UserId},
};

/// Identity of a user acting on a posting, captured at call time.
///
/// Postings and logs keep their own copy, so later profile edits never
/// rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawUserIdentity")]
pub struct UserIdentity {
    pub user_id: UserId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Wire form of an identity, checked by `UserIdentity::new` before use
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUserIdentity {
    user_id: UserId,
    email: String,
    #[serde(default)]
    phone: Option<String>,
}

impl TryFrom<RawUserIdentity> for UserIdentity {
    type Error = ValidationError;

    fn try_from(raw: RawUserIdentity) -> Result<Self, Self::Error> {
        Self::new(raw.user_id, raw.email, raw.phone)
    }
}

impl UserIdentity {
    /// Email is required, a blank phone number is treated as absent
    pub fn new(
        user_id: UserId,
        email: impl Into<String>,
        phone: Option<String>,
    ) -> Result<Self, ValidationError> {
        let email = email.into().trim().to_string();
        if email.is_empty() {
            return Err(ValidationError::EmptyField { field: "email" });
        }

        let phone = phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        Ok(Self {
            user_id,
            email,
            phone,
        })
    }

    /// Human-readable contact details used in notification bodies
    pub fn contact_line(&self) -> String {
        match &self.phone {
            Some(phone) => format!("{} ({})", self.email, phone),
            None => self.email.clone(),
        }
    }
}

/// Image picked on the device, not yet uploaded
#[derive(Debug, Clone, PartialEq)]
pub struct LocalImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl LocalImage {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, data: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// File extension for the stored object, from the file name or else the content type
    pub fn extension(&self) -> &str {
        let from_name = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()));

        if let Some(ext) = from_name {
            return ext;
        }

        match self.content_type.as_deref() {
            Some("image/jpeg") | Some("image/jpg") => "jpg",
            Some("image/png") => "png",
            Some("image/webp") => "webp",
            Some("image/gif") => "gif",
            Some("image/heic") => "heic",
            _ => "bin",
        }
    }
}

/// An uploaded image: where to show it and how to delete it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    pub url: String,
    pub deletion_handle: DeletionHandle,
}

/// Form data for a new lost or found posting
#[derive(Debug, Clone, bon::Builder)]
#[builder(on(String, into))]
pub struct PostingDraft {
    pub item_name: String,
    pub description: String,
    pub location: String,
    pub image: LocalImage,
    pub occurred_date: Option<NaiveDate>,
    pub occurred_time_label: String,
}

impl PostingDraft {
    /// Every field is required. Checked before any upload or write happens.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let text_fields = [
            ("item_name", &self.item_name),
            ("description", &self.description),
            ("location", &self.location),
            ("occurred_time_label", &self.occurred_time_label),
        ];

        for (field, value) in text_fields {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField { field });
            }
        }

        if self.image.is_empty() {
            return Err(ValidationError::MissingImage);
        }

        if self.occurred_date.is_none() {
            return Err(ValidationError::MissingOccurredDate);
        }

        Ok(())
    }
}
