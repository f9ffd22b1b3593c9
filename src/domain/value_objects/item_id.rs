use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;

/// Maximum length accepted for repository-assigned identifiers
const MAX_ID_LENGTH: usize = 128;

fn check_identifier(kind: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyIdentifier { kind });
    }

    if value.len() > MAX_ID_LENGTH {
        return Err(ValidationError::IdentifierTooLong {
            kind,
            actual: value.len(),
            max: MAX_ID_LENGTH,
        });
    }

    if let Some(c) = value.chars().find(|c| c.is_control() || *c == '/') {
        return Err(ValidationError::InvalidIdentifierCharacter { kind, character: c });
    }

    Ok(())
}

/// Identifier of a lost or found posting, assigned by the item repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        check_identifier("item id", &value)?;
        Ok(Self(value))
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ItemId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an audit log entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogId(String);

impl LogId {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        check_identifier("log id", &value)?;
        Ok(Self(value))
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LogId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LogId> for String {
    fn from(id: LogId) -> Self {
        id.0
    }
}

impl std::fmt::Display for LogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
