use crate::{backend::Backend, errors::UploadError};

use post_model::{LocalFile, MediaKind, MediaSelection};

use tracing::debug;

/// Turns a locally selected file into a durable remote reference.
///
/// One slot request and at most one transfer per call, strictly in that
/// order. Nothing is cached or deduplicated: calling again with the same
/// file requests a fresh slot and stores a fresh object, orphaning the old
/// one. Never talks to the post API.
pub struct UploadCoordinator<T>
where
    T: Backend,
{
    backend: T,
}

impl<T> UploadCoordinator<T>
where
    T: Backend,
{
    pub fn new(backend: T) -> Self {
        Self { backend }
    }

    /// Upload `file` and return the remote reference the post may now carry.
    pub async fn materialize(
        &self,
        kind: MediaKind,
        file: &LocalFile,
    ) -> Result<MediaSelection, UploadError> {
        let slot = self
            .backend
            .request_upload_slot(file.content_type(), file.extension_hint())
            .await
            .map_err(UploadError::SlotRequest)?;

        debug!(public_url = %slot.public_url, "upload slot issued");

        self.backend
            .transfer(&slot.upload_url, file.content_type(), file.bytes.clone())
            .await
            .map_err(UploadError::Transfer)?;

        Ok(MediaSelection::remote_reference(kind, slot.public_url))
    }
}
