//! Application services orchestrating the message ports.

pub mod send;

pub use send::{MessageService, SendError, SendResult};
