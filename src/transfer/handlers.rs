//! HTTP request handlers for the transfer endpoint.
//!
//! Handlers translate between the wire contract and the send service;
//! no domain logic lives here. All handlers are generic over the service's
//! ports so tests can run the full HTTP stack over in-memory adapters.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use mockable::Clock;
use serde_json::json;

use super::dto::{ConversationResponse, MessageDto};
use super::error::{ApiError, ApiResult};
use super::multipart::{SendCommand, parse_send_form};
use crate::config::Config;
use crate::media::store::{MediaStore, mime_for_extension};
use crate::message::{
    domain::{ImageRef, UserId},
    ports::{repository::MessageRepository, validator::MessageValidator},
    services::send::MessageService,
};

/// Registers the transfer routes on an actix application.
pub fn configure<R, M, V, K>(cfg: &mut web::ServiceConfig)
where
    R: MessageRepository + 'static,
    M: MediaStore + 'static,
    V: MessageValidator + 'static,
    K: Clock + Send + Sync + 'static,
{
    cfg.service(
        web::resource("/messages/{user_id}/{recipient_id}")
            .route(web::get().to(list_conversation::<R, M, V, K>)),
    )
    .service(web::resource("/messages").route(web::post().to(send_message::<R, M, V, K>)))
    .service(web::resource("/files/{image_ref}").route(web::get().to(serve_image::<R, M, V, K>)))
    .service(web::resource("/health").route(web::get().to(health)));
}

/// `GET /messages/{userId}/{recipientId}`
///
/// Returns the full conversation between the two participants, ascending
/// by sequence number. An unknown pair yields an empty listing, not 404;
/// a malformed participant id is a 400.
async fn list_conversation<R, M, V, K>(
    service: web::Data<MessageService<R, M, V, K>>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse>
where
    R: MessageRepository + 'static,
    M: MediaStore + 'static,
    V: MessageValidator + 'static,
    K: Clock + Send + Sync + 'static,
{
    let (raw_user, raw_recipient) = path.into_inner();
    let user_id = parse_participant(&raw_user)?;
    let recipient_id = parse_participant(&raw_recipient)?;
    let messages = service
        .into_inner()
        .conversation(user_id, recipient_id)
        .await?;

    Ok(HttpResponse::Ok().json(ConversationResponse::from_messages(&messages)))
}

/// Parses a path segment as a participant id, mapping failure to a 400.
fn parse_participant(raw: &str) -> ApiResult<UserId> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("'{raw}' is not a valid user id")))
}

/// `POST /messages`
///
/// Accepts a multipart send request and returns the stored message,
/// including its repository-assigned sequence number.
async fn send_message<R, M, V, K>(
    service: web::Data<MessageService<R, M, V, K>>,
    config: web::Data<Config>,
    payload: Multipart,
) -> ApiResult<HttpResponse>
where
    R: MessageRepository + 'static,
    M: MediaStore + 'static,
    V: MessageValidator + 'static,
    K: Clock + Send + Sync + 'static,
{
    let max_image_bytes = config.into_inner().max_image_bytes;
    let command = parse_send_form(payload, max_image_bytes).await?;

    let send_service = service.into_inner();
    let message = match command {
        SendCommand::Text {
            sender_id,
            recipient_id,
            text,
        } => send_service.send_text(sender_id, recipient_id, &text).await?,
        SendCommand::Image {
            sender_id,
            recipient_id,
            bytes,
            mime_type,
        } => {
            send_service
                .send_image(sender_id, recipient_id, bytes, &mime_type)
                .await?
        }
    };

    Ok(HttpResponse::Ok().json(MessageDto::from(&message)))
}

/// `GET /files/{imageRef}`
///
/// Serves stored image bytes with a content type derived from the
/// reference's extension. Reference parsing rejects path traversal before
/// the media store is consulted.
async fn serve_image<R, M, V, K>(
    service: web::Data<MessageService<R, M, V, K>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse>
where
    R: MessageRepository + 'static,
    M: MediaStore + 'static,
    V: MessageValidator + 'static,
    K: Clock + Send + Sync + 'static,
{
    let raw = path.into_inner();
    let image_ref: ImageRef = raw
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid image reference '{raw}'")))?;

    let bytes = service.into_inner().open_image(&image_ref).await?;
    let content_type = mime_for_extension(image_ref.extension().unwrap_or_default());

    Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
}

/// `GET /health`
#[expect(clippy::unused_async, reason = "actix-web handlers must be async")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
