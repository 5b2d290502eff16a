pub mod backend;
pub mod errors;
pub mod submit;
pub mod upload;
pub mod utils;

#[cfg(test)]
mod tests;

use backend::Backend;

use errors::Error;

use post_model::{About, AboutPayload, PersistedPost, PostDraft, PostId};

use submit::PostDraftSubmitter;

/// High level handle over the admin surface: listing, hydration for edits,
/// deletion and the visibility toggle. Submission goes through
/// [`PostDraftSubmitter`].
#[derive(Clone)]
pub struct Pressroom<T>
where
    T: Backend,
{
    backend: T,
}

impl<T> Pressroom<T>
where
    T: Backend + Clone,
{
    pub fn new(backend: T) -> Self {
        Self { backend }
    }

    /// All posts, hidden ones included; the admin view.
    pub async fn posts(&self) -> Result<Vec<PersistedPost>, Error> {
        Ok(self.backend.list_posts().await?)
    }

    /// Fetch one post and hydrate a draft from it for editing.
    pub async fn load_draft(&self, id: PostId) -> Result<(PersistedPost, PostDraft), Error> {
        let post = self.backend.fetch_post(id).await.map_err(Error::Load)?;
        let draft = PostDraft::from_persisted(&post);

        Ok((post, draft))
    }

    /// Show or hide a post, then re-fetch it for the authoritative shape.
    pub async fn set_visibility(&self, id: PostId, visible: bool) -> Result<PersistedPost, Error> {
        self.backend.update_visibility(id, visible).await?;

        Ok(self.backend.fetch_post(id).await?)
    }

    /// Delete a post; the server cleans up its stored media object.
    pub async fn delete_post(&self, id: PostId) -> Result<(), Error> {
        Ok(self.backend.delete_post(id).await?)
    }

    /// The site's About section.
    pub async fn about(&self) -> Result<About, Error> {
        Ok(self.backend.fetch_about().await?)
    }

    /// Replace the About section, then re-fetch it for the authoritative
    /// record; the update response carries only a message.
    pub async fn update_about(&self, payload: &AboutPayload) -> Result<About, Error> {
        self.backend.update_about(payload).await?;

        Ok(self.backend.fetch_about().await?)
    }

    pub fn submitter(&self) -> PostDraftSubmitter<T> {
        PostDraftSubmitter::new(self.backend.clone())
    }
}
