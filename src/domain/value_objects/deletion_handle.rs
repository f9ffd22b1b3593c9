use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;

/// Opaque handle returned by the image store, used to delete an uploaded image later
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeletionHandle(String);

impl DeletionHandle {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyIdentifier {
                kind: "deletion handle",
            });
        }

        if value.contains('\0') {
            return Err(ValidationError::InvalidIdentifierCharacter {
                kind: "deletion handle",
                character: '\0',
            });
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DeletionHandle {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeletionHandle> for String {
    fn from(handle: DeletionHandle) -> Self {
        handle.0
    }
}

impl std::fmt::Display for DeletionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
