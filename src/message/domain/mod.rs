//! Domain types for the message subsystem.
//!
//! This module contains pure domain types with no infrastructure
//! dependencies. All types are immutable after construction and
//! serialisable via serde.

mod body;
mod conversation;
mod ids;
mod message;

pub use body::{
    ImageBody, ImageRef, MessageBody, MessageKind, ParseImageRefError, ParseMessageKindError,
    TextBody,
};
pub use conversation::{ConversationKey, ConversationKeyError};
pub use ids::{MessageId, ParseUserIdError, SequenceNumber, UserId};
pub use message::{Message, MessageDraft};
