//! Conversation identity as an unordered pair of participants.
//!
//! A conversation has no record of its own in the store; it is identified
//! entirely by the two participants exchanging messages. `ConversationKey`
//! normalises the pair so that `(a, b)` and `(b, a)` address the same
//! history.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::UserId;

/// Error returned when a conversation key cannot be formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConversationKeyError {
    /// Both participants are the same user.
    #[error("sender and recipient must be different users")]
    SelfConversation,
}

/// The unordered pair of participants identifying a conversation.
///
/// The pair is normalised on construction: the participant with the lower
/// UUID is always `low`, so two keys built from the same participants in
/// either order compare equal. Self-conversations are rejected.
///
/// # Examples
///
/// ```
/// use parley::message::domain::{ConversationKey, UserId};
///
/// let a = UserId::new();
/// let b = UserId::new();
/// let ab = ConversationKey::between(a, b).expect("distinct participants");
/// let ba = ConversationKey::between(b, a).expect("distinct participants");
/// assert_eq!(ab, ba);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationKey {
    low: UserId,
    high: UserId,
}

impl ConversationKey {
    /// Creates a normalised key for the conversation between two users.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationKeyError::SelfConversation`] if both
    /// participants are the same user.
    pub fn between(a: UserId, b: UserId) -> Result<Self, ConversationKeyError> {
        if a == b {
            return Err(ConversationKeyError::SelfConversation);
        }

        if a < b {
            Ok(Self { low: a, high: b })
        } else {
            Ok(Self { low: b, high: a })
        }
    }

    /// Returns the participant with the lexically lower UUID.
    #[must_use]
    pub const fn low(&self) -> UserId {
        self.low
    }

    /// Returns the participant with the lexically higher UUID.
    #[must_use]
    pub const fn high(&self) -> UserId {
        self.high
    }

    /// Returns `true` if the given user is one of the two participants.
    #[must_use]
    pub fn contains(&self, user: UserId) -> bool {
        self.low == user || self.high == user
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.low, self.high)
    }
}
