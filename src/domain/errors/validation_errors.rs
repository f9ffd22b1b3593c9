use crate::domain::models::ItemStatus;

/// Validation errors for postings, identities and identifiers.
///
/// These are always the caller's fault and are never retried automatically.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required text field was missing or blank
    EmptyField { field: &'static str },

    /// The posting draft carried no image bytes
    MissingImage,

    /// The posting draft carried no occurrence date
    MissingOccurredDate,

    /// A status change out of a terminal state, or to the same state
    InvalidStatusTransition { from: ItemStatus, to: ItemStatus },

    // Identifier validation errors
    EmptyIdentifier {
        kind: &'static str,
    },
    IdentifierTooLong {
        kind: &'static str,
        actual: usize,
        max: usize,
    },
    InvalidIdentifierCharacter {
        kind: &'static str,
        character: char,
    },

    /// Collection selector was neither `lost` nor `found`
    UnknownPostingKind(String),

    InvalidField {
        field: String,
        value: String,
        expected: String,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyField { field } => {
                write!(f, "Required field '{}' cannot be empty", field)
            }
            ValidationError::MissingImage => write!(f, "An image of the item is required"),
            ValidationError::MissingOccurredDate => {
                write!(f, "The date the item was lost or found is required")
            }
            ValidationError::InvalidStatusTransition { from, to } => {
                write!(f, "Cannot move a posting from '{}' to '{}'", from, to)
            }
            ValidationError::EmptyIdentifier { kind } => write!(f, "The {} cannot be empty", kind),
            ValidationError::IdentifierTooLong { kind, actual, max } => {
                write!(f, "The {} is too long: {} bytes (max: {})", kind, actual, max)
            }
            ValidationError::InvalidIdentifierCharacter { kind, character } => {
                write!(f, "Invalid character in {}: {:?}", kind, character)
            }
            ValidationError::UnknownPostingKind(kind) => {
                write!(f, "Unknown posting kind '{}' (expected 'lost' or 'found')", kind)
            }
            ValidationError::InvalidField {
                field,
                value,
                expected,
            } => {
                write!(
                    f,
                    "Invalid value for field '{}': '{}' (expected: {})",
                    field, value, expected
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}
