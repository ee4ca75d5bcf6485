//! Persistence adapters for the message module.
//!
//! This module provides concrete implementations of the
//! [`MessageRepository`] port, following hexagonal architecture
//! principles. Adapters handle all infrastructure concerns while the
//! domain remains pure.
//!
//! # Available Adapters
//!
//! - [`memory::InMemoryMessageRepository`]: Thread-safe in-memory storage
//!   for unit testing and database-free deployments
//! - [`postgres::PostgresMessageRepository`]: Production-grade
//!   `PostgreSQL` persistence using Diesel ORM
//!
//! [`MessageRepository`]: crate::message::ports::repository::MessageRepository

pub mod memory;
pub mod models;
pub mod postgres;
pub mod schema;
