//! The Message aggregate root and its pre-persistence draft form.
//!
//! Messages are immutable after creation. A [`MessageDraft`] carries
//! everything the sender determines (participants, body, creation time);
//! the repository turns it into a [`Message`] by atomically assigning the
//! per-conversation sequence number at append time.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use super::{
    ConversationKey, ConversationKeyError, MessageBody, MessageId, MessageKind, SequenceNumber,
    UserId,
};

/// A message awaiting append.
///
/// Drafts hold a freshly assigned [`MessageId`] and creation timestamp but
/// no sequence number; sequencing is the repository's job so that two
/// concurrent appends to the same conversation cannot collide.
///
/// # Examples
///
/// ```
/// use parley::message::domain::{MessageBody, MessageDraft, UserId};
/// use mockable::DefaultClock;
///
/// let clock = DefaultClock;
/// let draft = MessageDraft::new(
///     UserId::new(),
///     UserId::new(),
///     MessageBody::text("hello"),
///     &clock,
/// ).expect("distinct participants");
/// assert!(draft.conversation().contains(draft.sender_id()));
/// assert!(draft.conversation().contains(draft.recipient_id()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDraft {
    /// Unique identifier assigned at draft creation.
    id: MessageId,

    /// The user sending the message.
    sender_id: UserId,

    /// The user receiving the message.
    recipient_id: UserId,

    /// The normalised conversation the message belongs to.
    conversation: ConversationKey,

    /// The message content.
    body: MessageBody,

    /// When the draft was created.
    created_at: DateTime<Utc>,
}

impl MessageDraft {
    /// Creates a draft with a fresh identifier and the current timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationKeyError::SelfConversation`] if sender and
    /// recipient are the same user.
    pub fn new(
        sender_id: UserId,
        recipient_id: UserId,
        body: MessageBody,
        clock: &impl Clock,
    ) -> Result<Self, ConversationKeyError> {
        let conversation = ConversationKey::between(sender_id, recipient_id)?;

        Ok(Self {
            id: MessageId::new(),
            sender_id,
            recipient_id,
            conversation,
            body,
            created_at: clock.utc(),
        })
    }

    /// Returns the draft identifier, which becomes the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the sending participant.
    #[must_use]
    pub const fn sender_id(&self) -> UserId {
        self.sender_id
    }

    /// Returns the receiving participant.
    #[must_use]
    pub const fn recipient_id(&self) -> UserId {
        self.recipient_id
    }

    /// Returns the conversation key.
    #[must_use]
    pub const fn conversation(&self) -> ConversationKey {
        self.conversation
    }

    /// Returns the message content.
    #[must_use]
    pub const fn body(&self) -> &MessageBody {
        &self.body
    }

    /// Returns the draft creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A message within a conversation.
///
/// Messages are the atomic unit of conversation history. They are immutable
/// after creation; there are no edit or delete operations in the contract.
///
/// # Invariants
///
/// - `id` is a valid, non-nil UUID, unique across the store
/// - `sender_id` and `recipient_id` are distinct (enforced at construction)
/// - exactly one body variant is populated, matching [`Message::kind`]
/// - `sequence_number` is unique within the conversation and assigned by
///   the repository
/// - `created_at` is non-decreasing along the conversation's sequence order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier for this message.
    id: MessageId,

    /// The user who sent the message.
    sender_id: UserId,

    /// The user the message was sent to.
    recipient_id: UserId,

    /// The normalised conversation the message belongs to.
    conversation: ConversationKey,

    /// The message content.
    body: MessageBody,

    /// When the message was created.
    created_at: DateTime<Utc>,

    /// The sequence number within the conversation.
    sequence_number: SequenceNumber,
}

impl Message {
    /// Seals a draft with its repository-assigned sequence number.
    ///
    /// `created_at` is passed separately so adapters can clamp it to the
    /// conversation's latest timestamp, keeping timestamps non-decreasing
    /// along the sequence order.
    #[must_use]
    pub fn from_draft(
        draft: MessageDraft,
        sequence_number: SequenceNumber,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: draft.id,
            sender_id: draft.sender_id,
            recipient_id: draft.recipient_id,
            conversation: draft.conversation,
            body: draft.body,
            created_at,
            sequence_number,
        }
    }

    /// Reconstructs a message from persisted fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationKeyError::SelfConversation`] if the persisted
    /// participants are the same user, which indicates row corruption.
    pub fn from_persisted(
        id: MessageId,
        sender_id: UserId,
        recipient_id: UserId,
        body: MessageBody,
        created_at: DateTime<Utc>,
        sequence_number: SequenceNumber,
    ) -> Result<Self, ConversationKeyError> {
        let conversation = ConversationKey::between(sender_id, recipient_id)?;

        Ok(Self {
            id,
            sender_id,
            recipient_id,
            conversation,
            body,
            created_at,
            sequence_number,
        })
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the sending participant.
    #[must_use]
    pub const fn sender_id(&self) -> UserId {
        self.sender_id
    }

    /// Returns the receiving participant.
    #[must_use]
    pub const fn recipient_id(&self) -> UserId {
        self.recipient_id
    }

    /// Returns the conversation key.
    #[must_use]
    pub const fn conversation(&self) -> ConversationKey {
        self.conversation
    }

    /// Returns the message content.
    #[must_use]
    pub const fn body(&self) -> &MessageBody {
        &self.body
    }

    /// Returns the kind derived from the body.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        self.body.kind()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the sequence number.
    #[must_use]
    pub const fn sequence_number(&self) -> SequenceNumber {
        self.sequence_number
    }
}
