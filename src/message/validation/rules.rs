//! Individual validation rule implementations.
//!
//! Each rule is implemented as a pure function that validates a specific
//! aspect of a message draft. Rules return `Ok(())` on success or a
//! specific `ValidationError` on failure.

use crate::message::{
    domain::{ImageBody, MessageBody, MessageDraft, TextBody},
    error::ValidationError,
    ports::validator::ValidationConfig,
};

/// Validates that the draft has a non-nil ID.
///
/// # Errors
///
/// Returns `ValidationError::MissingMessageId` if the ID is nil.
pub fn validate_message_id(draft: &MessageDraft) -> Result<(), ValidationError> {
    if draft.id().as_ref().is_nil() {
        return Err(ValidationError::MissingMessageId);
    }
    Ok(())
}

/// Validates the participant pair.
///
/// The draft constructor already rejects self-conversations, so this rule
/// guards against drafts reconstructed from external data.
///
/// # Errors
///
/// Returns `ValidationError::MissingParticipant` if either identifier is
/// nil, or `ValidationError::SelfConversation` if both are the same user.
pub fn validate_participants(draft: &MessageDraft) -> Result<(), ValidationError> {
    if draft.sender_id().as_ref().is_nil() || draft.recipient_id().as_ref().is_nil() {
        return Err(ValidationError::MissingParticipant);
    }

    if draft.sender_id() == draft.recipient_id() {
        return Err(ValidationError::SelfConversation);
    }

    Ok(())
}

/// Validates the draft body against its variant rules.
///
/// # Errors
///
/// Returns the variant-specific `ValidationError` on failure.
pub fn validate_body(
    draft: &MessageDraft,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    match draft.body() {
        MessageBody::Text(text) => validate_text_body(text, config),
        MessageBody::Image(image) => validate_image_body(image),
    }
}

fn validate_text_body(text: &TextBody, config: &ValidationConfig) -> Result<(), ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::EmptyText);
    }

    let char_count = text.char_count();
    if char_count > config.max_text_length {
        return Err(ValidationError::TextTooLong {
            actual: char_count,
            limit: config.max_text_length,
        });
    }

    Ok(())
}

fn validate_image_body(image: &ImageBody) -> Result<(), ValidationError> {
    if !image.is_valid() {
        return Err(ValidationError::UnsupportedImageType(
            image.mime_type.clone(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::domain::{ImageRef, UserId};
    use mockable::DefaultClock;
    use rstest::rstest;

    fn draft_with_body(body: MessageBody) -> MessageDraft {
        MessageDraft::new(UserId::new(), UserId::new(), body, &DefaultClock)
            .expect("test draft should be valid")
    }

    fn image_ref() -> ImageRef {
        "0a1b2c3d.jpg".parse().expect("valid reference")
    }

    #[rstest]
    fn validate_message_id_accepts_fresh_draft() {
        let draft = draft_with_body(MessageBody::text("hello"));
        assert!(validate_message_id(&draft).is_ok());
    }

    #[rstest]
    fn validate_participants_accepts_distinct_users() {
        let draft = draft_with_body(MessageBody::text("hello"));
        assert!(validate_participants(&draft).is_ok());
    }

    #[rstest]
    fn validate_body_accepts_plain_text() {
        let draft = draft_with_body(MessageBody::text("hello"));
        assert!(validate_body(&draft, &ValidationConfig::default()).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\n\t")]
    fn validate_body_rejects_blank_text(#[case] text: &str) {
        let draft = draft_with_body(MessageBody::text(text));
        assert!(matches!(
            validate_body(&draft, &ValidationConfig::default()),
            Err(ValidationError::EmptyText)
        ));
    }

    #[rstest]
    fn validate_body_rejects_oversized_text() {
        let config = ValidationConfig::with_max_text_length(8);
        let draft = draft_with_body(MessageBody::text("nine chars"));
        assert!(matches!(
            validate_body(&draft, &config),
            Err(ValidationError::TextTooLong { actual: 10, limit: 8 })
        ));
    }

    #[rstest]
    fn validate_body_counts_characters_not_bytes() {
        let config = ValidationConfig::with_max_text_length(4);
        // Four multi-byte characters fit a four-character limit.
        let draft = draft_with_body(MessageBody::text("éééé"));
        assert!(validate_body(&draft, &config).is_ok());
    }

    #[rstest]
    fn validate_body_accepts_image_mime_types() {
        let draft = draft_with_body(MessageBody::image(image_ref(), "image/jpeg"));
        assert!(validate_body(&draft, &ValidationConfig::default()).is_ok());
    }

    #[rstest]
    #[case("text/plain")]
    #[case("application/octet-stream")]
    #[case("")]
    fn validate_body_rejects_non_image_mime_types(#[case] mime: &str) {
        let draft = draft_with_body(MessageBody::image(image_ref(), mime));
        assert!(matches!(
            validate_body(&draft, &ValidationConfig::default()),
            Err(ValidationError::UnsupportedImageType(_))
        ));
    }
}
