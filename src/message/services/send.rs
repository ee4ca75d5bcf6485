//! Send service orchestrating validation, blob storage, and append.
//!
//! The `MessageService` is the single write path into the store: every
//! send is validated, image bytes are persisted to the media store first,
//! and only then is the draft appended. A validation failure therefore
//! leaves the store unchanged.

use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;

use crate::media::{
    error::MediaStoreError,
    store::MediaStore,
};
use crate::message::{
    domain::{ImageRef, Message, MessageBody, MessageDraft, UserId},
    error::{RepositoryError, ValidationError},
    ports::{repository::MessageRepository, validator::MessageValidator},
};

/// Errors surfaced by the send service.
///
/// The three variants mirror the contract's error taxonomy: validation
/// failures must not be retried unmodified; repository and media failures
/// may be transient and retryable.
#[derive(Debug, Error)]
pub enum SendError {
    /// The request was malformed or incomplete.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The message store rejected or failed the append.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The media store could not persist or produce image content.
    #[error(transparent)]
    Media(#[from] MediaStoreError),
}

impl From<crate::message::domain::ConversationKeyError> for SendError {
    fn from(err: crate::message::domain::ConversationKeyError) -> Self {
        Self::Validation(ValidationError::from(err))
    }
}

/// Result type for send service operations.
pub type SendResult<T> = Result<T, SendError>;

/// Service coordinating the message write and read paths.
///
/// Generic over its ports so tests can substitute in-memory adapters or
/// mocks, and over the clock for deterministic timestamps.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use mockable::DefaultClock;
/// use parley::media::memory::InMemoryMediaStore;
/// use parley::message::adapters::memory::InMemoryMessageRepository;
/// use parley::message::services::send::MessageService;
/// use parley::message::validation::service::DefaultMessageValidator;
///
/// let service = MessageService::new(
///     Arc::new(InMemoryMessageRepository::new()),
///     Arc::new(InMemoryMediaStore::new()),
///     DefaultMessageValidator::new(),
///     Arc::new(DefaultClock),
/// );
/// ```
pub struct MessageService<R, M, V, K>
where
    R: MessageRepository,
    M: MediaStore,
    V: MessageValidator,
    K: Clock + Send + Sync,
{
    repository: Arc<R>,
    media: Arc<M>,
    validator: Arc<V>,
    clock: Arc<K>,
}

impl<R, M, V, K> Clone for MessageService<R, M, V, K>
where
    R: MessageRepository,
    M: MediaStore,
    V: MessageValidator,
    K: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            media: Arc::clone(&self.media),
            validator: Arc::clone(&self.validator),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, M, V, K> MessageService<R, M, V, K>
where
    R: MessageRepository,
    M: MediaStore,
    V: MessageValidator,
    K: Clock + Send + Sync,
{
    /// Creates a new service over the given ports.
    #[must_use]
    pub fn new(repository: Arc<R>, media: Arc<M>, validator: V, clock: Arc<K>) -> Self {
        Self {
            repository,
            media,
            validator: Arc::new(validator),
            clock,
        }
    }

    /// Appends a text message to the sender/recipient conversation.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Validation`] for empty or oversized text and
    /// for degenerate participant pairs; [`SendError::Repository`] if the
    /// append fails.
    pub async fn send_text(
        &self,
        sender_id: UserId,
        recipient_id: UserId,
        text: &str,
    ) -> SendResult<Message> {
        let draft = MessageDraft::new(
            sender_id,
            recipient_id,
            MessageBody::text(text),
            &*self.clock,
        )?;
        self.validator.validate(&draft)?;

        let message = self.repository.append(draft).await?;
        tracing::info!(
            message_id = %message.id(),
            conversation = %message.conversation(),
            "text message appended"
        );
        Ok(message)
    }

    /// Stores image bytes and appends an image message referencing them.
    ///
    /// The blob is persisted before the append so a stored message never
    /// references missing content. If the append subsequently fails the
    /// blob remains; content addressing makes the orphan harmless and a
    /// retried send reuses it.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Media`] if the bytes are empty, oversized, or
    /// cannot be persisted; [`SendError::Validation`] for degenerate
    /// participant pairs or non-image MIME types;
    /// [`SendError::Repository`] if the append fails.
    pub async fn send_image(
        &self,
        sender_id: UserId,
        recipient_id: UserId,
        bytes: Vec<u8>,
        mime_type: &str,
    ) -> SendResult<Message> {
        let image_ref = self.media.save(bytes, mime_type).await?;

        let draft = MessageDraft::new(
            sender_id,
            recipient_id,
            MessageBody::image(image_ref, mime_type),
            &*self.clock,
        )?;
        self.validator.validate(&draft)?;

        let message = self.repository.append(draft).await?;
        tracing::info!(
            message_id = %message.id(),
            conversation = %message.conversation(),
            "image message appended"
        );
        Ok(message)
    }

    /// Returns the full conversation history between two users, ascending
    /// by sequence number.
    ///
    /// The operation is symmetric in its arguments and returns an empty
    /// vector for a pair with no history.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Validation`] if both arguments are the same
    /// user; [`SendError::Repository`] if the query fails.
    pub async fn conversation(
        &self,
        user_a: UserId,
        user_b: UserId,
    ) -> SendResult<Vec<Message>> {
        let key = crate::message::domain::ConversationKey::between(user_a, user_b)?;
        Ok(self.repository.list_conversation(key).await?)
    }

    /// Retrieves the bytes for a stored image reference.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Media`] if the reference is unknown or the
    /// store fails.
    pub async fn open_image(&self, image_ref: &ImageRef) -> SendResult<Vec<u8>> {
        Ok(self.media.load(image_ref).await?)
    }
}
