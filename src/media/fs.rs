//! Filesystem implementation of the [`MediaStore`] port.
//!
//! Stores image blobs as flat files inside a capability-scoped directory;
//! the process holds no filesystem authority beyond that directory.
//! File names are the content-hash references, so writes are idempotent
//! and identical uploads deduplicate naturally.

use std::io::ErrorKind;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::fs_utf8::Dir;

use super::error::MediaStoreError;
use super::store::{MediaResult, MediaStore, check_size, image_ref_for};
use crate::message::domain::ImageRef;

/// Filesystem-backed [`MediaStore`].
///
/// All I/O runs on the blocking thread pool via
/// [`tokio::task::spawn_blocking`]; the directory handle is shared behind
/// an [`Arc`] so each operation can move a clone into its closure.
///
/// # Example
///
/// ```ignore
/// use cap_std::ambient_authority;
/// use cap_std::fs_utf8::Dir;
/// use parley::media::fs::FsMediaStore;
///
/// let dir = Dir::open_ambient_dir("/var/lib/parley/media", ambient_authority())?;
/// let store = FsMediaStore::new(dir, 5 * 1024 * 1024);
/// ```
#[derive(Debug, Clone)]
pub struct FsMediaStore {
    root: Arc<Dir>,
    max_image_bytes: usize,
}

impl FsMediaStore {
    /// Creates a store rooted at the given directory with a size limit.
    #[must_use]
    pub fn new(root: Dir, max_image_bytes: usize) -> Self {
        Self {
            root: Arc::new(root),
            max_image_bytes,
        }
    }

    /// Returns the configured upload size limit in bytes.
    #[must_use]
    pub const fn max_image_bytes(&self) -> usize {
        self.max_image_bytes
    }

    /// Runs a blocking filesystem operation on the blocking thread pool.
    async fn run_blocking<F, T>(f: F) -> MediaResult<T>
    where
        F: FnOnce() -> MediaResult<T> + Send + 'static,
        T: Send + 'static,
    {
        tokio::task::spawn_blocking(f)
            .await
            .map_err(|e| MediaStoreError::io(std::io::Error::other(e.to_string())))?
    }
}

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn save(&self, bytes: Vec<u8>, mime_type: &str) -> MediaResult<ImageRef> {
        check_size(bytes.len(), self.max_image_bytes)?;
        let image_ref = image_ref_for(&bytes, mime_type)?;

        let root = Arc::clone(&self.root);
        let name = image_ref.clone();
        Self::run_blocking(move || {
            // Rewriting an existing file with identical content is
            // harmless; content addressing makes the write idempotent.
            root.write(name.as_str(), &bytes)
                .map_err(MediaStoreError::io)
        })
        .await?;

        tracing::debug!(image_ref = %image_ref, "image stored");
        Ok(image_ref)
    }

    async fn load(&self, image_ref: &ImageRef) -> MediaResult<Vec<u8>> {
        let root = Arc::clone(&self.root);
        let name = image_ref.clone();

        Self::run_blocking(move || match root.read(name.as_str()) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(MediaStoreError::NotFound(name))
            }
            Err(err) => Err(MediaStoreError::io(err)),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cap_std::ambient_authority;
    use uuid::Uuid;

    fn temp_store(limit: usize) -> FsMediaStore {
        let path = format!(
            "{}/parley-media-{}",
            std::env::temp_dir().display(),
            Uuid::new_v4()
        );
        std::fs::create_dir_all(&path).expect("create temp media dir");
        let dir =
            Dir::open_ambient_dir(path.as_str(), ambient_authority()).expect("open temp media dir");
        FsMediaStore::new(dir, limit)
    }

    #[tokio::test]
    async fn save_then_load_round_trips_bytes() {
        let store = temp_store(1024);
        let bytes = b"not really a jpeg".to_vec();

        let image_ref = store
            .save(bytes.clone(), "image/jpeg")
            .await
            .expect("save succeeds");
        let loaded = store.load(&image_ref).await.expect("load succeeds");

        assert_eq!(loaded, bytes);
        assert_eq!(image_ref.extension(), Some("jpg"));
    }

    #[tokio::test]
    async fn identical_uploads_share_a_reference() {
        let store = temp_store(1024);

        let first = store
            .save(b"same bytes".to_vec(), "image/png")
            .await
            .expect("first save");
        let second = store
            .save(b"same bytes".to_vec(), "image/png")
            .await
            .expect("second save");

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn oversize_upload_is_rejected() {
        let store = temp_store(4);

        let result = store.save(vec![0u8; 5], "image/png").await;

        assert!(matches!(
            result,
            Err(MediaStoreError::TooLarge {
                actual_bytes: 5,
                limit_bytes: 4,
            })
        ));
    }

    #[tokio::test]
    async fn empty_upload_is_rejected() {
        let store = temp_store(1024);

        let result = store.save(Vec::new(), "image/png").await;

        assert!(matches!(result, Err(MediaStoreError::EmptyContent)));
    }

    #[tokio::test]
    async fn unknown_reference_is_not_found() {
        let store = temp_store(1024);
        let image_ref: ImageRef = "0a1b2c3d.jpg".parse().expect("valid reference");

        let result = store.load(&image_ref).await;

        assert!(matches!(result, Err(MediaStoreError::NotFound(_))));
    }
}
