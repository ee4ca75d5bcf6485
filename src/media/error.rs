//! Error types for media storage.

use crate::message::domain::{ImageRef, ParseImageRefError};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when saving or loading image content.
#[derive(Debug, Clone, Error)]
pub enum MediaStoreError {
    /// The upload contained no bytes.
    #[error("image content is empty")]
    EmptyContent,

    /// The upload exceeds the configured size limit.
    #[error("image of {actual_bytes} bytes exceeds limit of {limit_bytes} bytes")]
    TooLarge {
        /// The actual size in bytes.
        actual_bytes: usize,
        /// The maximum allowed size.
        limit_bytes: usize,
    },

    /// No content exists for the given reference.
    #[error("no stored image for reference '{0}'")]
    NotFound(ImageRef),

    /// The reference is malformed.
    #[error(transparent)]
    InvalidReference(#[from] ParseImageRefError),

    /// The backing store failed to read or write.
    #[error("media store I/O error: {0}")]
    Io(Arc<std::io::Error>),
}

impl MediaStoreError {
    /// Creates an I/O error from any `std::io::Error`.
    #[must_use]
    pub fn io(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}
