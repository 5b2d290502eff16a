use admin_api::{errors::Error, responses::UploadSlot, SiteService};

use async_trait::async_trait;

use bytes::Bytes;

use post_model::{About, AboutPayload, PersistedPost, PostId, PostPayload};

/// Network seam over the admin API and object storage.
///
/// The production implementation is [`SiteService`]; tests script their own.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<PersistedPost>, Error>;

    async fn fetch_post(&self, id: PostId) -> Result<PersistedPost, Error>;

    async fn create_post(&self, payload: &PostPayload) -> Result<PersistedPost, Error>;

    async fn update_post(&self, id: PostId, payload: &PostPayload) -> Result<(), Error>;

    async fn update_visibility(&self, id: PostId, visible: bool) -> Result<(), Error>;

    async fn delete_post(&self, id: PostId) -> Result<(), Error>;

    async fn fetch_about(&self) -> Result<About, Error>;

    async fn update_about(&self, payload: &AboutPayload) -> Result<(), Error>;

    async fn request_upload_slot(
        &self,
        content_type: &str,
        file_ext: &str,
    ) -> Result<UploadSlot, Error>;

    async fn transfer(
        &self,
        upload_url: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<(), Error>;
}

#[async_trait]
impl Backend for SiteService {
    async fn list_posts(&self) -> Result<Vec<PersistedPost>, Error> {
        self.posts().await
    }

    async fn fetch_post(&self, id: PostId) -> Result<PersistedPost, Error> {
        self.post(id).await
    }

    async fn create_post(&self, payload: &PostPayload) -> Result<PersistedPost, Error> {
        SiteService::create_post(self, payload).await
    }

    async fn update_post(&self, id: PostId, payload: &PostPayload) -> Result<(), Error> {
        SiteService::update_post(self, id, payload).await
    }

    async fn update_visibility(&self, id: PostId, visible: bool) -> Result<(), Error> {
        SiteService::update_visibility(self, id, visible).await
    }

    async fn delete_post(&self, id: PostId) -> Result<(), Error> {
        SiteService::delete_post(self, id).await
    }

    async fn fetch_about(&self) -> Result<About, Error> {
        self.about().await
    }

    async fn update_about(&self, payload: &AboutPayload) -> Result<(), Error> {
        SiteService::update_about(self, payload).await
    }

    async fn request_upload_slot(
        &self,
        content_type: &str,
        file_ext: &str,
    ) -> Result<UploadSlot, Error> {
        SiteService::request_upload_slot(self, content_type, file_ext).await
    }

    async fn transfer(
        &self,
        upload_url: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<(), Error> {
        SiteService::transfer(self, upload_url, content_type, bytes).await
    }
}
