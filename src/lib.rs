//! Parley: a conversation message store with an HTTP transfer endpoint.
//!
//! This crate persists one-to-one chat messages, assigns each a
//! per-conversation sequence number, stores image attachments by content
//! hash, and serves both over HTTP.
//!
//! # Architecture
//!
//! Parley follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, filesystem)
//!
//! # Modules
//!
//! - [`message`]: Message domain, validation, and persistence
//! - [`media`]: Image blob storage with content-hash addressing
//! - [`transfer`]: HTTP endpoint exposing the wire contract
//! - [`config`]: Environment-derived server configuration

pub mod config;
pub mod media;
pub mod message;
pub mod transfer;
