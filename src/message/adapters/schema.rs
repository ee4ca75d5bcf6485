//! Diesel table definitions for message persistence.

diesel::table! {
    /// Append-only log of messages, one row per message.
    messages (id) {
        /// Unique message identifier.
        id -> Uuid,
        /// The sending participant.
        sender_id -> Uuid,
        /// The receiving participant.
        recipient_id -> Uuid,
        /// Normalised conversation key: the lower participant UUID.
        conversation_low -> Uuid,
        /// Normalised conversation key: the higher participant UUID.
        conversation_high -> Uuid,
        /// Body variant tag: text or image.
        kind -> Text,
        /// Message body as JSONB.
        body -> Jsonb,
        /// When the message was created.
        created_at -> Timestamptz,
        /// Sequence number within the conversation; unique per
        /// conversation via the (low, high, sequence_number) index.
        sequence_number -> Int8,
    }
}
