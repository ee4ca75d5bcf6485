//! Port interfaces for the message subsystem.
//!
//! Ports are abstract trait interfaces that the domain and services depend
//! on; adapters supply the concrete implementations.

pub mod repository;
pub mod validator;
