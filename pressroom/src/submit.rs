use std::sync::atomic::{AtomicU8, Ordering};

use crate::{backend::Backend, errors::SubmitError, upload::UploadCoordinator};

use post_model::{MediaKind, MediaSelection, PersistedPost, PostDraft, PostId, PostPayload};

use tracing::debug;

/// Where a finished draft goes.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SubmitMode {
    Create,
    Update(PostId),
}

/// Lifecycle of the most recent submission.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[repr(u8)]
pub enum SubmissionStatus {
    Idle = 0,
    InFlight = 1,
    Succeeded = 2,
    Failed = 3,
}

impl SubmissionStatus {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::InFlight,
            2 => Self::Succeeded,
            3 => Self::Failed,
            _ => Self::Idle,
        }
    }
}

/// Orchestrates one draft submission: resolve the final media reference
/// (uploading if needed), serialize the draft and call the persistence
/// endpoint.
///
/// Holds at most one submission in flight; overlapping calls are rejected
/// rather than queued.
pub struct PostDraftSubmitter<T>
where
    T: Backend,
{
    backend: T,
    uploader: UploadCoordinator<T>,
    status: AtomicU8,
}

impl<T> PostDraftSubmitter<T>
where
    T: Backend + Clone,
{
    pub fn new(backend: T) -> Self {
        let uploader = UploadCoordinator::new(backend.clone());

        Self {
            backend,
            uploader,
            status: AtomicU8::new(SubmissionStatus::Idle as u8),
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        SubmissionStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    /// Submit the draft, creating or updating a post.
    ///
    /// Legs run strictly in sequence: upload (when a file is pending), then
    /// persistence, then for updates a re-fetch of the authoritative entity
    /// since the update response body is not guaranteed to echo it. An
    /// upload failure aborts before any persistence call, the post is never
    /// left referencing a file that failed to transfer.
    pub async fn submit(
        &self,
        draft: &PostDraft,
        mode: SubmitMode,
    ) -> Result<PersistedPost, SubmitError> {
        self.begin()?;

        let result = self.run(draft, mode).await;

        self.finish(result.is_ok());

        result
    }

    async fn run(&self, draft: &PostDraft, mode: SubmitMode) -> Result<PersistedPost, SubmitError> {
        let (media_type, media_href) = self.resolve_media(draft.media()).await?;

        let payload = PostPayload {
            title: draft.title().to_owned(),
            blurb: draft.blurb().to_owned(),
            writeup: draft.writeup().to_owned(),
            media_type,
            media_href,
            is_visible: draft.visible(),
        };

        match mode {
            SubmitMode::Create => {
                debug!("submitting new post");

                self.backend
                    .create_post(&payload)
                    .await
                    .map_err(SubmitError::Persistence)
            }
            SubmitMode::Update(id) => {
                debug!(id, "submitting post update");

                self.backend
                    .update_post(id, &payload)
                    .await
                    .map_err(SubmitError::Persistence)?;

                self.backend
                    .fetch_post(id)
                    .await
                    .map_err(SubmitError::Persistence)
            }
        }
    }

    /// Resolve what `media_href` the request body carries. A kind with no
    /// payload submits an explicit null, clearing any stored reference.
    async fn resolve_media(
        &self,
        media: &MediaSelection,
    ) -> Result<(MediaKind, Option<String>), SubmitError> {
        match media {
            MediaSelection::Empty(kind) => Ok((*kind, None)),
            MediaSelection::PendingUpload { kind, file } => {
                let uploaded = self.uploader.materialize(*kind, file).await?;

                Ok((uploaded.kind(), uploaded.url().map(String::from)))
            }
            MediaSelection::RemoteReference { kind, url }
            | MediaSelection::ExternalLink { kind, url } => Ok((*kind, Some(url.clone()))),
        }
    }

    fn begin(&self) -> Result<(), SubmitError> {
        self.status
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current != SubmissionStatus::InFlight as u8)
                    .then_some(SubmissionStatus::InFlight as u8)
            })
            .map_err(|_| SubmitError::ConcurrentSubmission)?;

        Ok(())
    }

    fn finish(&self, succeeded: bool) {
        let status = if succeeded {
            SubmissionStatus::Succeeded
        } else {
            SubmissionStatus::Failed
        };

        self.status.store(status as u8, Ordering::Release);
    }
}
