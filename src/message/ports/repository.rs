//! Repository port for message persistence.
//!
//! Defines the abstract interface for appending and retrieving messages,
//! allowing different persistence implementations (`PostgreSQL`, in-memory,
//! etc.).

use crate::message::{
    domain::{ConversationKey, Message, MessageDraft, MessageId},
    error::RepositoryError,
};
use async_trait::async_trait;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Port for message persistence operations.
///
/// Implementations provide the actual storage mechanism (`PostgreSQL`,
/// in-memory for testing) while the domain logic remains storage-agnostic.
///
/// # Implementation Notes
///
/// Implementations must ensure:
/// - Message IDs are unique across the entire store
/// - Sequence numbers are assigned atomically within [`append`] and are
///   unique and dense within a conversation; two concurrent appends to the
///   same conversation must both succeed with distinct sequence numbers
/// - Timestamps are non-decreasing along a conversation's sequence order
///   (clamped against the latest stored timestamp)
/// - Messages are immutable after storage (no update operations)
///
/// [`append`]: MessageRepository::append
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Appends a draft, assigning its sequence number atomically.
    ///
    /// Returns the stored message. A failed append leaves the store
    /// unchanged; there are no partial records.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if:
    /// - A message with the same ID already exists
    /// - The database connection fails
    /// - Serialisation fails
    async fn append(&self, draft: MessageDraft) -> RepositoryResult<Message>;

    /// Retrieves a message by its ID.
    ///
    /// Returns `None` if the message does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn find_by_id(&self, id: MessageId) -> RepositoryResult<Option<Message>>;

    /// Retrieves all messages for a conversation, ordered by sequence
    /// number ascending.
    ///
    /// Returns an empty vector if no messages exist for the conversation;
    /// an unknown participant pair is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn list_conversation(
        &self,
        conversation: ConversationKey,
    ) -> RepositoryResult<Vec<Message>>;
}
