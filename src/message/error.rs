//! Domain error types for message validation and persistence.
//!
//! Uses `thiserror` for ergonomic error handling with typed variants
//! that can be inspected by callers.

use super::domain::{ConversationKey, ConversationKeyError, MessageId, SequenceNumber};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during message validation.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// The message ID is missing or invalid.
    #[error("message ID is required")]
    MissingMessageId,

    /// Sender and recipient are the same user.
    #[error("sender and recipient must be different users")]
    SelfConversation,

    /// A participant identifier is nil.
    #[error("participant identifiers are required")]
    MissingParticipant,

    /// A text body is empty or whitespace-only.
    #[error("message text cannot be empty")]
    EmptyText,

    /// A text body exceeds the configured length limit.
    #[error("message text of {actual} characters exceeds limit of {limit}")]
    TextTooLong {
        /// The actual length in characters.
        actual: usize,
        /// The maximum allowed length.
        limit: usize,
    },

    /// An image body carries a non-image MIME type.
    #[error("unsupported image MIME type '{0}'")]
    UnsupportedImageType(String),

    /// An image reference is malformed.
    #[error("invalid image reference: {0}")]
    InvalidImageRef(String),

    /// The declared message type does not match the supplied content.
    #[error("message content does not match declared type '{declared}'")]
    ContentMismatch {
        /// The type the request declared.
        declared: String,
    },

    /// Multiple validation errors occurred.
    #[error("multiple validation errors: {}", format_errors(.0))]
    Multiple(Vec<Self>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Combines multiple validation errors into a single error.
    ///
    /// If only one error is provided, returns it directly rather than
    /// wrapping.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if called with an empty vector, as this
    /// indicates a logic error in the caller. In release builds, returns
    /// an internal error variant.
    #[must_use]
    pub fn multiple(errors: Vec<Self>) -> Self {
        match errors.len() {
            0 => {
                debug_assert!(false, "multiple() called with empty errors vector");
                Self::MissingMessageId
            }
            1 => {
                // errors holds exactly one element in this arm.
                errors
                    .into_iter()
                    .next()
                    .unwrap_or(Self::MissingMessageId)
            }
            _ => Self::Multiple(errors),
        }
    }

    /// Returns `true` if this error represents multiple validation failures.
    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple(_))
    }

    /// Returns the individual errors if this is a `Multiple` variant.
    #[must_use]
    pub fn errors(&self) -> Option<&[Self]> {
        match self {
            Self::Multiple(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ConversationKeyError> for ValidationError {
    fn from(err: ConversationKeyError) -> Self {
        match err {
            ConversationKeyError::SelfConversation => Self::SelfConversation,
        }
    }
}

/// Errors that can occur during message persistence.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The message was not found.
    #[error("message not found: {0}")]
    NotFound(MessageId),

    /// A message with this ID already exists.
    #[error("duplicate message: {0}")]
    DuplicateMessage(MessageId),

    /// A message with this sequence number already exists in the
    /// conversation.
    #[error("duplicate sequence number {sequence} in conversation {conversation}")]
    DuplicateSequence {
        /// The conversation containing the conflict.
        conversation: ConversationKey,
        /// The conflicting sequence number.
        sequence: SequenceNumber,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(Arc<dyn std::error::Error + Send + Sync>),

    /// A serialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A connection error occurred.
    #[error("connection error: {0}")]
    Connection(String),
}

impl RepositoryError {
    /// Creates a database error from any error type.
    #[must_use]
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Database(Arc::new(err))
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Returns `true` if the error is a unique-constraint violation.
    ///
    /// Used by the `PostgreSQL` adapter to decide whether a failed append
    /// should be retried with a fresh sequence number.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::DuplicateSequence { .. } | Self::DuplicateMessage(_) => true,
            Self::Database(err) => err
                .downcast_ref::<diesel::result::Error>()
                .is_some_and(|e| {
                    matches!(
                        e,
                        diesel::result::Error::DatabaseError(
                            diesel::result::DatabaseErrorKind::UniqueViolation,
                            _,
                        )
                    )
                }),
            _ => false,
        }
    }
}

impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        // All Diesel errors are converted to database errors. Unique
        // constraint violations keep their identity and are recognised by
        // is_unique_violation for the append retry loop.
        Self::database(err)
    }
}
