//! In-memory implementation of the `MessageRepository` port.
//!
//! Provides a simple, thread-safe repository for unit testing and for
//! running the server without a database. Contents are lost on restart.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::message::{
    domain::{ConversationKey, Message, MessageDraft, MessageId, SequenceNumber},
    error::RepositoryError,
    ports::repository::{MessageRepository, RepositoryResult},
};

/// Error indicating a duplicate message ID was detected.
///
/// Used by the in-memory adapter to report uniqueness violations
/// in a backend-agnostic way via [`RepositoryError::database`].
#[derive(Debug)]
struct DuplicateIdError {
    id: MessageId,
}

impl fmt::Display for DuplicateIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "message with id {} already exists", self.id)
    }
}

impl std::error::Error for DuplicateIdError {}

/// In-memory implementation of [`MessageRepository`].
///
/// Thread-safe via internal [`RwLock`]. Sequence assignment and insertion
/// happen under a single write lock, so concurrent appends to the same
/// conversation serialise and each receives a distinct sequence number.
///
/// # Example
///
/// ```
/// use parley::message::adapters::memory::InMemoryMessageRepository;
/// use parley::message::ports::repository::MessageRepository;
///
/// let repo = InMemoryMessageRepository::new();
/// // Use repo in tests or as the no-database backend...
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryMessageRepository {
    messages: Arc<RwLock<HashMap<MessageId, Message>>>,
}

impl InMemoryMessageRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored messages.
    ///
    /// Returns `0` if the internal lock is poisoned, matching the fallback
    /// behaviour of an empty repository. For error-propagating access, use
    /// the repository trait methods instead.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns `true` if no messages are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(&self, draft: MessageDraft) -> RepositoryResult<Message> {
        let mut guard = self
            .messages
            .write()
            .map_err(|e| RepositoryError::connection(format!("lock poisoned: {e}")))?;

        if guard.contains_key(&draft.id()) {
            return Err(RepositoryError::database(DuplicateIdError {
                id: draft.id(),
            }));
        }

        let conversation = draft.conversation();
        let mut max_seq = 0;
        let mut latest_created_at = draft.created_at();
        for existing in guard.values().filter(|m| m.conversation() == conversation) {
            max_seq = max_seq.max(existing.sequence_number().value());
            latest_created_at = latest_created_at.max(existing.created_at());
        }

        // Clamp keeps timestamps non-decreasing along the sequence order.
        let message = Message::from_draft(
            draft,
            SequenceNumber::new(max_seq.saturating_add(1)),
            latest_created_at,
        );

        guard.insert(message.id(), message.clone());
        Ok(message)
    }

    async fn find_by_id(&self, id: MessageId) -> RepositoryResult<Option<Message>> {
        let guard = self
            .messages
            .read()
            .map_err(|e| RepositoryError::connection(format!("lock poisoned: {e}")))?;

        Ok(guard.get(&id).cloned())
    }

    async fn list_conversation(
        &self,
        conversation: ConversationKey,
    ) -> RepositoryResult<Vec<Message>> {
        let guard = self
            .messages
            .read()
            .map_err(|e| RepositoryError::connection(format!("lock poisoned: {e}")))?;

        let mut messages: Vec<Message> = guard
            .values()
            .filter(|m| m.conversation() == conversation)
            .cloned()
            .collect();

        // Sort by sequence number for consistent ordering
        messages.sort_by_key(|m| m.sequence_number().value());

        Ok(messages)
    }
}
