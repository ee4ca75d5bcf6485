//! Conversation message store for Parley.
//!
//! This module implements the message domain types, validation rules, and
//! persistence required by the chat backend.
//!
//! # Architecture
//!
//! The module follows hexagonal architecture principles:
//!
//! - **Domain**: Pure domain types ([`domain::Message`], [`domain::MessageBody`], [`domain::ConversationKey`], etc.)
//! - **Ports**: Abstract trait interfaces ([`ports::repository::MessageRepository`], [`ports::validator::MessageValidator`])
//! - **Adapters**: Concrete implementations ([`adapters::memory::InMemoryMessageRepository`], [`adapters::postgres::PostgresMessageRepository`])
//! - **Validation**: Business rule enforcement at ingestion boundaries
//! - **Services**: Orchestration of validation, media storage, and append
//!
//! # Example
//!
//! ```
//! use parley::message::domain::{MessageBody, MessageDraft, UserId};
//! use parley::message::ports::validator::MessageValidator;
//! use parley::message::validation::service::DefaultMessageValidator;
//! use mockable::DefaultClock;
//!
//! let clock = DefaultClock;
//! let draft = MessageDraft::new(
//!     UserId::new(),
//!     UserId::new(),
//!     MessageBody::text("Hello, Parley!"),
//!     &clock,
//! )
//! .expect("distinct participants");
//!
//! let validator = DefaultMessageValidator::new();
//! validator.validate(&draft).expect("validation should pass");
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod validation;

#[cfg(test)]
mod tests;
