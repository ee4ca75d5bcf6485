//! Multipart form decoding for the send endpoint.
//!
//! `POST /messages` accepts `multipart/form-data` with the fields
//! `senderId`, `recipientId`, `messageType`, and either `messageText` or
//! `imageFile`. Decoding streams the upload chunk by chunk and rejects
//! oversized payloads before buffering them whole.

use actix_multipart::{Field, Multipart};
use futures_util::StreamExt as _;

use super::error::{ApiError, ApiResult};
use crate::message::{
    domain::{MessageKind, UserId},
    error::ValidationError,
};

/// Upper bound for text form fields; image bytes have their own limit.
const TEXT_FIELD_LIMIT: usize = 64 * 1024;

/// Fallback when a file part declares no content type.
const DEFAULT_MIME: &str = "application/octet-stream";

/// A fully decoded send request.
#[derive(Debug)]
pub enum SendCommand {
    /// Send a text message.
    Text {
        /// The sending participant.
        sender_id: UserId,
        /// The receiving participant.
        recipient_id: UserId,
        /// The text content.
        text: String,
    },
    /// Send an image message.
    Image {
        /// The sending participant.
        sender_id: UserId,
        /// The receiving participant.
        recipient_id: UserId,
        /// The uploaded image bytes.
        bytes: Vec<u8>,
        /// The MIME type declared on the upload part.
        mime_type: String,
    },
}

/// An uploaded file part.
#[derive(Debug)]
struct UploadedImage {
    bytes: Vec<u8>,
    mime_type: String,
}

/// Raw form fields as received, before cross-field checks.
#[derive(Debug, Default)]
struct RawForm {
    sender_id: Option<String>,
    recipient_id: Option<String>,
    message_type: Option<String>,
    message_text: Option<String>,
    image: Option<UploadedImage>,
}

impl RawForm {
    fn finish(self) -> ApiResult<SendCommand> {
        let sender_id = parse_user_id(self.sender_id, "senderId")?;
        let recipient_id = parse_user_id(self.recipient_id, "recipientId")?;
        let kind_tag = self.message_type.ok_or_else(|| missing("messageType"))?;
        let kind = MessageKind::try_from(kind_tag.as_str())
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        match kind {
            MessageKind::Text => {
                let text = self
                    .message_text
                    .ok_or_else(|| content_mismatch(MessageKind::Text))?;
                Ok(SendCommand::Text {
                    sender_id,
                    recipient_id,
                    text,
                })
            }
            MessageKind::Image => {
                let image = self
                    .image
                    .ok_or_else(|| content_mismatch(MessageKind::Image))?;
                Ok(SendCommand::Image {
                    sender_id,
                    recipient_id,
                    bytes: image.bytes,
                    mime_type: image.mime_type,
                })
            }
        }
    }
}

/// Decodes the multipart payload of a send request.
///
/// Unknown fields are drained and ignored so clients can evolve ahead of
/// the server.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] for malformed parts or missing fields
/// and [`ApiError::PayloadTooLarge`] when the image part exceeds
/// `max_image_bytes`.
pub async fn parse_send_form(
    mut payload: Multipart,
    max_image_bytes: usize,
) -> ApiResult<SendCommand> {
    let mut form = RawForm::default();

    while let Some(next) = payload.next().await {
        let mut field = next.map_err(malformed)?;
        let Some(name) = field_name(&field) else {
            drain(&mut field).await?;
            continue;
        };

        match name.as_str() {
            "senderId" => form.sender_id = Some(text_value(&mut field).await?),
            "recipientId" => form.recipient_id = Some(text_value(&mut field).await?),
            "messageType" => form.message_type = Some(text_value(&mut field).await?),
            "messageText" => form.message_text = Some(text_value(&mut field).await?),
            "imageFile" => {
                let mime_type = field
                    .content_type()
                    .map_or_else(|| DEFAULT_MIME.to_owned(), ToString::to_string);
                let bytes = field_bytes(&mut field, max_image_bytes).await?;
                form.image = Some(UploadedImage { bytes, mime_type });
            }
            _ => drain(&mut field).await?,
        }
    }

    form.finish()
}

fn field_name(field: &Field) -> Option<String> {
    field
        .content_disposition()
        .and_then(|cd| cd.get_name())
        .map(str::to_owned)
}

async fn field_bytes(field: &mut Field, limit: usize) -> ApiResult<Vec<u8>> {
    let mut bytes = Vec::new();

    while let Some(chunk) = field.next().await {
        let data = chunk.map_err(malformed)?;
        let total = bytes.len().saturating_add(data.len());
        if total > limit {
            return Err(ApiError::PayloadTooLarge {
                actual_bytes: total,
                limit_bytes: limit,
            });
        }
        bytes.extend_from_slice(&data);
    }

    Ok(bytes)
}

async fn text_value(field: &mut Field) -> ApiResult<String> {
    let bytes = field_bytes(field, TEXT_FIELD_LIMIT).await?;
    String::from_utf8(bytes)
        .map_err(|_| ApiError::BadRequest("form field is not valid UTF-8".to_owned()))
}

async fn drain(field: &mut Field) -> ApiResult<()> {
    while let Some(chunk) = field.next().await {
        chunk.map_err(malformed)?;
    }
    Ok(())
}

fn parse_user_id(raw: Option<String>, name: &str) -> ApiResult<UserId> {
    let value = raw.ok_or_else(|| missing(name))?;
    value
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("{name} is not a valid UUID")))
}

fn missing(name: &str) -> ApiError {
    ApiError::BadRequest(format!("missing required field '{name}'"))
}

fn content_mismatch(declared: MessageKind) -> ApiError {
    ApiError::Validation(ValidationError::ContentMismatch {
        declared: declared.as_str().to_owned(),
    })
}

fn malformed(err: actix_multipart::MultipartError) -> ApiError {
    ApiError::BadRequest(format!("malformed multipart payload: {err}"))
}
