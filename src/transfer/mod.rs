//! HTTP transfer endpoint for the message store.
//!
//! Exposes the wire contract over actix-web:
//!
//! - `GET /messages/{userId}/{recipientId}` lists a conversation
//! - `POST /messages` sends a text or image message (multipart)
//! - `GET /files/{imageRef}` serves stored image bytes
//! - `GET /health` liveness probe
//!
//! The module owns DTO shapes, multipart decoding, and the mapping from
//! domain errors to status codes; domain semantics live in
//! [`crate::message`] and [`crate::media`].

pub mod dto;
pub mod error;
pub mod handlers;
pub mod multipart;

pub use handlers::configure;
