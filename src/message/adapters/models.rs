//! Diesel model types for message persistence.
//!
//! These types map database rows to Rust structs using Diesel's derive
//! macros. They serve as the boundary between the database and domain
//! layers: the body is stored as JSONB, participants and the normalised
//! conversation key as UUID columns.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use super::schema::messages;
use crate::message::{
    domain::{Message, MessageBody, MessageDraft, MessageId, SequenceNumber, UserId},
    error::RepositoryError,
};

/// Database row representation of a message.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    /// Unique message identifier.
    pub id: Uuid,
    /// The sending participant.
    pub sender_id: Uuid,
    /// The receiving participant.
    pub recipient_id: Uuid,
    /// Lower participant UUID of the normalised conversation key.
    pub conversation_low: Uuid,
    /// Higher participant UUID of the normalised conversation key.
    pub conversation_high: Uuid,
    /// Body variant tag: text or image.
    pub kind: String,
    /// Message body as JSONB.
    pub body: Value,
    /// When the message was created.
    pub created_at: DateTime<Utc>,
    /// Sequence number within the conversation.
    pub sequence_number: i64,
}

/// Data for inserting a new message.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessage {
    /// Unique message identifier.
    pub id: Uuid,
    /// The sending participant.
    pub sender_id: Uuid,
    /// The receiving participant.
    pub recipient_id: Uuid,
    /// Lower participant UUID of the normalised conversation key.
    pub conversation_low: Uuid,
    /// Higher participant UUID of the normalised conversation key.
    pub conversation_high: Uuid,
    /// Body variant tag: text or image.
    pub kind: String,
    /// Message body as JSONB.
    pub body: Value,
    /// When the message was created.
    pub created_at: DateTime<Utc>,
    /// Sequence number within the conversation.
    pub sequence_number: i64,
}

impl NewMessage {
    /// Creates an insertable record from a draft and its assigned
    /// sequence number and (possibly clamped) timestamp.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Serialization` if the body cannot be
    /// serialised to JSON or the sequence number overflows `i64`.
    pub fn from_draft(
        draft: &MessageDraft,
        sequence_number: SequenceNumber,
        created_at: DateTime<Utc>,
    ) -> Result<Self, RepositoryError> {
        let body = serde_json::to_value(draft.body())
            .map_err(|e| RepositoryError::serialization(e.to_string()))?;

        Ok(Self {
            id: draft.id().into_inner(),
            sender_id: draft.sender_id().into_inner(),
            recipient_id: draft.recipient_id().into_inner(),
            conversation_low: draft.conversation().low().into_inner(),
            conversation_high: draft.conversation().high().into_inner(),
            kind: draft.body().kind().as_str().to_owned(),
            body,
            created_at,
            sequence_number: i64::try_from(sequence_number.value())
                .map_err(|e| RepositoryError::serialization(e.to_string()))?,
        })
    }
}

/// Converts a database row to a domain message.
///
/// # Errors
///
/// Returns `RepositoryError::Serialization` if the body JSON does not
/// deserialise, the sequence number is negative, or the participant pair
/// is degenerate.
pub fn row_to_message(row: MessageRow) -> Result<Message, RepositoryError> {
    let body: MessageBody = serde_json::from_value(row.body)
        .map_err(|e| RepositoryError::serialization(e.to_string()))?;

    let sequence_number = u64::try_from(row.sequence_number)
        .map_err(|e| RepositoryError::serialization(e.to_string()))?;

    Message::from_persisted(
        MessageId::from_uuid(row.id),
        UserId::from_uuid(row.sender_id),
        UserId::from_uuid(row.recipient_id),
        body,
        row.created_at,
        SequenceNumber::new(sequence_number),
    )
    .map_err(|e| RepositoryError::serialization(e.to_string()))
}
