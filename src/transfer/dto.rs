//! Wire representations for the transfer endpoint.
//!
//! DTOs use camelCase field names to match the client contract. Text and
//! image content are flattened into optional fields; exactly one of
//! `messageText` and `imageUrl` is present, matching `messageType`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::domain::{Message, MessageBody, MessageId, MessageKind, UserId};

/// A message as sent to and from HTTP clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    /// The message identifier.
    pub id: MessageId,
    /// The sending participant.
    pub sender_id: UserId,
    /// The receiving participant.
    pub recipient_id: UserId,
    /// The content variant tag: `text` or `image`.
    pub message_type: MessageKind,
    /// Text content; present only for text messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_text: Option<String>,
    /// Image reference; present only for image messages. Clients fetch the
    /// bytes from `/files/{imageUrl}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// When the message was created.
    pub timestamp: DateTime<Utc>,
    /// Position within the conversation, ascending from 1.
    pub sequence_number: u64,
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        let (message_text, image_url) = match message.body() {
            MessageBody::Text(text) => (Some(text.text.clone()), None),
            MessageBody::Image(image) => (None, Some(image.image_ref.to_string())),
        };

        Self {
            id: message.id(),
            sender_id: message.sender_id(),
            recipient_id: message.recipient_id(),
            message_type: message.kind(),
            message_text,
            image_url,
            timestamp: message.created_at(),
            sequence_number: message.sequence_number().value(),
        }
    }
}

/// Envelope wrapping a conversation listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationResponse {
    /// The conversation's messages, ascending by sequence number.
    pub data: Vec<MessageDto>,
}

impl ConversationResponse {
    /// Builds the envelope from stored messages.
    #[must_use]
    pub fn from_messages(messages: &[Message]) -> Self {
        Self {
            data: messages.iter().map(MessageDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::domain::{MessageDraft, SequenceNumber};
    use mockable::DefaultClock;

    fn sealed(body: MessageBody) -> Message {
        let draft = MessageDraft::new(UserId::new(), UserId::new(), body, &DefaultClock)
            .expect("distinct participants");
        let created_at = draft.created_at();
        Message::from_draft(draft, SequenceNumber::new(1), created_at)
    }

    #[test]
    fn text_message_serialises_with_camel_case_fields() {
        let dto = MessageDto::from(&sealed(MessageBody::text("hello")));
        let json = serde_json::to_value(&dto).expect("serialises");

        assert_eq!(json["messageType"], "text");
        assert_eq!(json["messageText"], "hello");
        assert!(json.get("imageUrl").is_none());
        assert!(json.get("senderId").is_some());
    }

    #[test]
    fn image_message_carries_reference_not_bytes() {
        let image_ref = "0a1b2c3d.png".parse().expect("valid reference");
        let dto = MessageDto::from(&sealed(MessageBody::image(image_ref, "image/png")));
        let json = serde_json::to_value(&dto).expect("serialises");

        assert_eq!(json["messageType"], "image");
        assert_eq!(json["imageUrl"], "0a1b2c3d.png");
        assert!(json.get("messageText").is_none());
    }

    #[test]
    fn conversation_response_wraps_messages_in_data() {
        let response = ConversationResponse::from_messages(&[sealed(MessageBody::text("one"))]);
        let json = serde_json::to_value(&response).expect("serialises");

        assert_eq!(json["data"].as_array().map(Vec::len), Some(1));
    }
}
