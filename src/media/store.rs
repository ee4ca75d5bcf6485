//! The media store port and content-hash addressing helpers.
//!
//! Image bytes are addressed by their SHA-256 digest plus an extension
//! derived from the upload's MIME type, so identical uploads deduplicate
//! and references are stable across restarts.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;

use super::error::MediaStoreError;
use crate::message::domain::ImageRef;

/// Result type for media store operations.
pub type MediaResult<T> = Result<T, MediaStoreError>;

/// Port for image blob persistence.
///
/// Implementations must guarantee that [`load`] returns bytes identical to
/// those passed to the [`save`] that produced the reference, and that
/// saving the same bytes twice yields the same reference without error.
///
/// [`save`]: MediaStore::save
/// [`load`]: MediaStore::load
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persists image bytes and returns their content-hash reference.
    ///
    /// # Errors
    ///
    /// Returns [`MediaStoreError::EmptyContent`] for empty payloads,
    /// [`MediaStoreError::TooLarge`] beyond the configured limit, and
    /// [`MediaStoreError::Io`] if the backing store fails.
    async fn save(&self, bytes: Vec<u8>, mime_type: &str) -> MediaResult<ImageRef>;

    /// Retrieves the bytes for a previously saved reference.
    ///
    /// # Errors
    ///
    /// Returns [`MediaStoreError::NotFound`] for unknown references and
    /// [`MediaStoreError::Io`] if the backing store fails.
    async fn load(&self, image_ref: &ImageRef) -> MediaResult<Vec<u8>>;
}

/// Computes the content-hash reference for image bytes.
///
/// The reference is `<sha256 hex>.<extension>`, with the extension derived
/// from the MIME type via [`extension_for_mime`].
///
/// # Errors
///
/// Returns [`MediaStoreError::EmptyContent`] for an empty payload.
///
/// # Examples
///
/// ```
/// use parley::media::store::image_ref_for;
///
/// let a = image_ref_for(b"bytes", "image/png").expect("reference");
/// let b = image_ref_for(b"bytes", "image/png").expect("reference");
/// assert_eq!(a, b);
/// ```
pub fn image_ref_for(bytes: &[u8], mime_type: &str) -> MediaResult<ImageRef> {
    if bytes.is_empty() {
        return Err(MediaStoreError::EmptyContent);
    }

    let digest = Sha256::digest(bytes);
    let mut name = String::with_capacity(digest.len() * 2 + 8);
    for byte in digest {
        // Writing to a String cannot fail.
        let _ = write!(name, "{byte:02x}");
    }
    name.push('.');
    name.push_str(extension_for_mime(mime_type));

    Ok(name.parse::<ImageRef>()?)
}

/// Maps an upload MIME type to a stored file extension.
///
/// Unrecognised types fall back to a generic extension; the MIME type
/// recorded on the message body remains authoritative for clients.
#[must_use]
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        _ => "img",
    }
}

/// Maps a stored file extension back to a response content type.
#[must_use]
pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "jpg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Checks an upload against the store's size limit.
///
/// # Errors
///
/// Returns [`MediaStoreError::TooLarge`] if `len` exceeds `limit`.
pub const fn check_size(len: usize, limit: usize) -> MediaResult<()> {
    if len > limit {
        return Err(MediaStoreError::TooLarge {
            actual_bytes: len,
            limit_bytes: limit,
        });
    }
    Ok(())
}
