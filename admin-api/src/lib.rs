pub mod errors;
pub mod responses;

use std::sync::Arc;

use bytes::Bytes;

use errors::{ApiError, Error};

use post_model::{About, AboutPayload, PersistedPost, PostId, PostPayload};

use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE},
    Client, Response, Url,
};

use serde::de::DeserializeOwned;

use serde_json::json;

use tracing::debug;

use crate::responses::UploadSlot;

pub const DEFAULT_URI: &str = "http://127.0.0.1:5000/api/";

type Result<T> = std::result::Result<T, Error>;

/// Client for the post-persistence API, the upload-slot endpoint and the
/// object-storage transfer.
///
/// Ambient credentials travel as a session cookie on every API request; the
/// storage transfer goes out bare, the slot URL itself is the credential.
#[derive(Clone)]
pub struct SiteService {
    api: Client,
    storage: Client,
    base_url: Arc<Url>,
}

impl Default for SiteService {
    fn default() -> Self {
        let base_url = Url::parse(DEFAULT_URI).expect("parsing default URI");

        Self::new(base_url, None).expect("building default client")
    }
}

impl SiteService {
    /// `base_url` must end in a slash for endpoint joins to work, e.g.
    /// `https://example.net/api/`.
    pub fn new(base_url: Url, session: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(session) = session {
            let cookie = format!("session={}", session);
            let value = HeaderValue::from_str(&cookie).map_err(|_| Error::Session)?;

            headers.insert(COOKIE, value);
        }

        let api = Client::builder().default_headers(headers).build()?;
        let storage = Client::new();

        Ok(Self {
            api,
            storage,
            base_url: Arc::new(base_url),
        })
    }

    /// All posts, hidden ones included.
    pub async fn posts(&self) -> Result<Vec<PersistedPost>> {
        let url = self.base_url.join("posts")?;

        let response = self.api.get(url).send().await?;

        expect_json(response).await
    }

    /// One post. The read path uses a singular segment, unlike the write
    /// paths; a server quirk.
    pub async fn post(&self, id: PostId) -> Result<PersistedPost> {
        let url = self.base_url.join(&format!("post/{}", id))?;

        let response = self.api.get(url).send().await?;

        expect_json(response).await
    }

    /// Create a post; the 201 body is the created entity.
    pub async fn create_post(&self, payload: &PostPayload) -> Result<PersistedPost> {
        let url = self.base_url.join("posts")?;

        debug!(%url, "creating post");

        let response = self.api.post(url).json(payload).send().await?;

        expect_json(response).await
    }

    /// Update a post. Only the status is meaningful here, the response body
    /// is not guaranteed to be the updated entity; re-fetch for that.
    pub async fn update_post(&self, id: PostId, payload: &PostPayload) -> Result<()> {
        let url = self.base_url.join(&format!("posts/{}", id))?;

        debug!(%url, "updating post");

        let response = self.api.put(url).json(payload).send().await?;

        expect_success(response).await
    }

    /// Partial update flipping only the visibility flag; the server merges
    /// absent fields from the stored post.
    pub async fn update_visibility(&self, id: PostId, visible: bool) -> Result<()> {
        let url = self.base_url.join(&format!("posts/{}", id))?;

        let body = json!({ "is_visible": u8::from(visible) });

        let response = self.api.put(url).json(&body).send().await?;

        expect_success(response).await
    }

    pub async fn delete_post(&self, id: PostId) -> Result<()> {
        let url = self.base_url.join(&format!("posts/{}", id))?;

        let response = self.api.delete(url).send().await?;

        expect_success(response).await
    }

    pub async fn about(&self) -> Result<About> {
        let url = self.base_url.join("about")?;

        let response = self.api.get(url).send().await?;

        expect_json(response).await
    }

    /// Replace the About section. Both fields are required, the server
    /// rejects a missing or empty one with a 400; the response carries only
    /// a message, re-fetch for the updated record.
    pub async fn update_about(&self, payload: &AboutPayload) -> Result<()> {
        let url = self.base_url.join("about")?;

        debug!(%url, "updating about section");

        let response = self.api.put(url).json(payload).send().await?;

        expect_success(response).await
    }

    /// Ask the presign endpoint for a single-use upload slot.
    pub async fn request_upload_slot(
        &self,
        content_type: &str,
        file_ext: &str,
    ) -> Result<UploadSlot> {
        let url = self.base_url.join("uploads/presign")?;

        debug!(content_type, file_ext, "requesting upload slot");

        let body = json!({
            "content_type": content_type,
            "file_ext": file_ext,
        });

        let response = self.api.post(url).json(&body).send().await?;

        expect_json(response).await
    }

    /// Direct PUT of raw bytes to object storage. No body contract, status
    /// only.
    pub async fn transfer(
        &self,
        upload_url: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<()> {
        let url = Url::parse(upload_url)?;

        debug!(%url, len = bytes.len(), "transferring bytes to storage");

        let response = self
            .storage
            .put(url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        expect_success(response).await
    }
}

async fn expect_success(response: Response) -> Result<()> {
    let status = response.status();

    if status.is_success() {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();

    Err(ApiError::new(status.as_u16(), &body).into())
}

async fn expect_json<T>(response: Response) -> Result<T>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let body = String::from_utf8_lossy(&bytes);

        return Err(ApiError::new(status.as_u16(), &body).into());
    }

    Ok(serde_json::from_slice(&bytes)?)
}
