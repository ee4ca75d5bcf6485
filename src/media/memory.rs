//! In-memory implementation of the [`MediaStore`] port.
//!
//! Holds blobs in a map for unit and endpoint tests; not suitable for
//! production use.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::error::MediaStoreError;
use super::store::{MediaResult, MediaStore, check_size, image_ref_for};
use crate::message::domain::ImageRef;

/// In-memory [`MediaStore`] backed by a [`HashMap`].
///
/// Thread-safe via internal [`RwLock`]; uses the same content-hash
/// addressing as the filesystem store so references are interchangeable.
#[derive(Debug, Clone)]
pub struct InMemoryMediaStore {
    blobs: Arc<RwLock<HashMap<ImageRef, Vec<u8>>>>,
    max_image_bytes: usize,
}

impl InMemoryMediaStore {
    /// Default upload limit for test stores.
    const DEFAULT_LIMIT: usize = 5 * 1024 * 1024;

    /// Creates an empty store with the default size limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(Self::DEFAULT_LIMIT)
    }

    /// Creates an empty store with a custom size limit.
    #[must_use]
    pub fn with_limit(max_image_bytes: usize) -> Self {
        Self {
            blobs: Arc::new(RwLock::new(HashMap::new())),
            max_image_bytes,
        }
    }

    /// Returns the number of stored blobs.
    ///
    /// Returns `0` if the internal lock is poisoned, matching the fallback
    /// behaviour of an empty store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns `true` if no blobs are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryMediaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn save(&self, bytes: Vec<u8>, mime_type: &str) -> MediaResult<ImageRef> {
        check_size(bytes.len(), self.max_image_bytes)?;
        let image_ref = image_ref_for(&bytes, mime_type)?;

        let mut guard = self
            .blobs
            .write()
            .map_err(|e| MediaStoreError::io(std::io::Error::other(format!("lock poisoned: {e}"))))?;

        guard.insert(image_ref.clone(), bytes);
        Ok(image_ref)
    }

    async fn load(&self, image_ref: &ImageRef) -> MediaResult<Vec<u8>> {
        let guard = self
            .blobs
            .read()
            .map_err(|e| MediaStoreError::io(std::io::Error::other(format!("lock poisoned: {e}"))))?;

        guard
            .get(image_ref)
            .cloned()
            .ok_or_else(|| MediaStoreError::NotFound(image_ref.clone()))
    }
}
