#![cfg(test)]

use std::sync::{Arc, Mutex};

use admin_api::{
    errors::{ApiError, Error as ServiceError},
    responses::UploadSlot,
};

use async_trait::async_trait;

use bytes::Bytes;

use post_model::{
    About, AboutPayload, LocalFile, MediaKind, MediaSelection, PersistedPost, PostDraft, PostId,
    PostPayload,
};

use serde_json::{json, Value};

use tokio::sync::Notify;

use crate::{
    backend::Backend,
    errors::{Error, SubmitError, UploadError},
    submit::{PostDraftSubmitter, SubmissionStatus, SubmitMode},
    upload::UploadCoordinator,
    Pressroom,
};

const PUBLIC_URL: &str = "https://bucket.s3.amazonaws.com/uploads/obj.png";
const UPLOAD_URL: &str = "https://bucket.s3.amazonaws.com/uploads/obj.png?X-Amz-Signature=sig";

#[derive(Clone, Debug, PartialEq)]
enum Call {
    List,
    Fetch(PostId),
    Create(Value),
    Update(PostId, Value),
    Visibility(PostId, bool),
    Delete(PostId),
    FetchAbout,
    UpdateAbout(Value),
    Presign {
        content_type: String,
        file_ext: String,
    },
    Transfer {
        upload_url: String,
        content_type: String,
        len: usize,
    },
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    about: Option<About>,
    fail_presign: bool,
    fail_transfer: bool,
    fail_fetch: bool,
    gate_create: Option<Arc<Notify>>,
}

#[derive(Clone, Default)]
struct MockBackend {
    state: Arc<Mutex<State>>,
}

impl MockBackend {
    fn failing_presign() -> Self {
        let mock = Self::default();
        mock.state.lock().unwrap().fail_presign = true;
        mock
    }

    fn failing_transfer() -> Self {
        let mock = Self::default();
        mock.state.lock().unwrap().fail_transfer = true;
        mock
    }

    fn failing_fetch() -> Self {
        let mock = Self::default();
        mock.state.lock().unwrap().fail_fetch = true;
        mock
    }

    /// Park every create call until the returned gate is notified.
    fn hold_create(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state.lock().unwrap().gate_create = Some(gate.clone());
        gate
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    fn presigns(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Presign { .. }))
            .count()
    }

    fn transfers(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Transfer { .. }))
            .count()
    }

    fn creates(&self) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Create(body) => Some(body),
                _ => None,
            })
            .collect()
    }

    fn updates(&self) -> Vec<(PostId, Value)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Update(id, body) => Some((id, body)),
                _ => None,
            })
            .collect()
    }
}

fn failure() -> ServiceError {
    ServiceError::Api(ApiError {
        status: 500,
        message: "mock failure".into(),
    })
}

fn sample_post(id: PostId, kind: MediaKind, href: Option<&str>) -> PersistedPost {
    PersistedPost {
        id,
        title: "T".into(),
        blurb: None,
        writeup: None,
        media_type: kind,
        media_href: href.map(String::from),
        timestamp: None,
        is_visible: true,
    }
}

fn wire(payload: &PostPayload) -> Value {
    serde_json::to_value(payload).unwrap()
}

fn sample_about(header: &str, body: &str) -> About {
    About {
        id: Some(1),
        header: header.to_owned(),
        body: body.to_owned(),
        last_updated: None,
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn list_posts(&self) -> Result<Vec<PersistedPost>, ServiceError> {
        self.record(Call::List);

        Ok(vec![sample_post(1, MediaKind::None, None)])
    }

    async fn fetch_post(&self, id: PostId) -> Result<PersistedPost, ServiceError> {
        self.record(Call::Fetch(id));

        if self.state.lock().unwrap().fail_fetch {
            return Err(failure());
        }

        Ok(sample_post(id, MediaKind::Image, Some("https://cdn/u.png")))
    }

    async fn create_post(&self, payload: &PostPayload) -> Result<PersistedPost, ServiceError> {
        let gate = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(Call::Create(wire(payload)));
            state.gate_create.clone()
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }

        Ok(sample_post(1, payload.media_type, payload.media_href.as_deref()))
    }

    async fn update_post(&self, id: PostId, payload: &PostPayload) -> Result<(), ServiceError> {
        self.record(Call::Update(id, wire(payload)));

        Ok(())
    }

    async fn update_visibility(&self, id: PostId, visible: bool) -> Result<(), ServiceError> {
        self.record(Call::Visibility(id, visible));

        Ok(())
    }

    async fn delete_post(&self, id: PostId) -> Result<(), ServiceError> {
        self.record(Call::Delete(id));

        Ok(())
    }

    async fn fetch_about(&self) -> Result<About, ServiceError> {
        self.record(Call::FetchAbout);

        let stored = self.state.lock().unwrap().about.clone();

        Ok(stored.unwrap_or_else(|| sample_about("About me", "Long form")))
    }

    async fn update_about(&self, payload: &AboutPayload) -> Result<(), ServiceError> {
        self.record(Call::UpdateAbout(serde_json::to_value(payload).unwrap()));

        // The real endpoint refuses a partial update.
        if payload.header.is_empty() || payload.body.is_empty() {
            return Err(ServiceError::Api(ApiError {
                status: 400,
                message: "Missing header or body".into(),
            }));
        }

        self.state.lock().unwrap().about = Some(sample_about(&payload.header, &payload.body));

        Ok(())
    }

    async fn request_upload_slot(
        &self,
        content_type: &str,
        file_ext: &str,
    ) -> Result<UploadSlot, ServiceError> {
        self.record(Call::Presign {
            content_type: content_type.to_owned(),
            file_ext: file_ext.to_owned(),
        });

        if self.state.lock().unwrap().fail_presign {
            return Err(failure());
        }

        Ok(UploadSlot {
            upload_url: UPLOAD_URL.to_owned(),
            public_url: PUBLIC_URL.to_owned(),
        })
    }

    async fn transfer(
        &self,
        upload_url: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<(), ServiceError> {
        self.record(Call::Transfer {
            upload_url: upload_url.to_owned(),
            content_type: content_type.to_owned(),
            len: bytes.len(),
        });

        if self.state.lock().unwrap().fail_transfer {
            return Err(failure());
        }

        Ok(())
    }
}

fn cover_file() -> LocalFile {
    LocalFile::new("cover.png", "image/png", vec![7u8, 7, 7])
}

#[tokio::test]
async fn materialize_orders_slot_then_transfer() {
    let backend = MockBackend::default();
    let uploader = UploadCoordinator::new(backend.clone());

    let media = uploader
        .materialize(MediaKind::Image, &cover_file())
        .await
        .unwrap();

    assert_eq!(
        media,
        MediaSelection::remote_reference(MediaKind::Image, PUBLIC_URL)
    );

    assert_eq!(
        backend.calls(),
        vec![
            Call::Presign {
                content_type: "image/png".into(),
                file_ext: "png".into(),
            },
            Call::Transfer {
                upload_url: UPLOAD_URL.into(),
                content_type: "image/png".into(),
                len: 3,
            },
        ]
    );
}

#[tokio::test]
async fn slot_failure_issues_no_transfer() {
    let backend = MockBackend::failing_presign();
    let uploader = UploadCoordinator::new(backend.clone());

    let result = uploader.materialize(MediaKind::Image, &cover_file()).await;

    assert!(matches!(result, Err(UploadError::SlotRequest(_))));
    assert_eq!(backend.presigns(), 1);
    assert_eq!(backend.transfers(), 0);
}

#[tokio::test]
async fn transfer_failure_is_distinguished() {
    let backend = MockBackend::failing_transfer();
    let uploader = UploadCoordinator::new(backend.clone());

    let result = uploader.materialize(MediaKind::Audio, &cover_file()).await;

    assert!(matches!(result, Err(UploadError::Transfer(_))));
    assert_eq!(backend.transfers(), 1);
}

#[tokio::test]
async fn unknown_mime_falls_back_to_octet_stream() {
    let backend = MockBackend::default();
    let uploader = UploadCoordinator::new(backend.clone());

    let file = LocalFile::new("mystery", "", vec![1u8]);
    uploader.materialize(MediaKind::Image, &file).await.unwrap();

    assert_eq!(
        backend.calls()[0],
        Call::Presign {
            content_type: "application/octet-stream".into(),
            file_ext: "bin".into(),
        }
    );
}

#[tokio::test]
async fn create_with_no_media_is_a_single_post() {
    let backend = MockBackend::default();
    let submitter = PostDraftSubmitter::new(backend.clone());

    let mut draft = PostDraft::new();
    draft.set_title("T");

    assert_eq!(submitter.status(), SubmissionStatus::Idle);

    let post = submitter.submit(&draft, SubmitMode::Create).await.unwrap();

    assert_eq!(post.media_type, MediaKind::None);
    assert_eq!(backend.presigns(), 0);
    assert_eq!(
        backend.creates(),
        vec![json!({
            "title": "T",
            "blurb": "",
            "writeup": "",
            "media_type": "none",
            "media_href": null,
            "is_visible": 1,
        })]
    );
    assert_eq!(submitter.status(), SubmissionStatus::Succeeded);
}

#[tokio::test]
async fn create_uploads_pending_file_first() {
    let backend = MockBackend::default();
    let submitter = PostDraftSubmitter::new(backend.clone());

    let mut draft = PostDraft::new();
    draft.set_title("T");
    assert!(draft.change_media_kind(MediaKind::Image).is_none());
    draft.attach_file(cover_file()).unwrap();

    submitter.submit(&draft, SubmitMode::Create).await.unwrap();

    let calls = backend.calls();

    assert!(matches!(calls[0], Call::Presign { .. }));
    assert!(matches!(calls[1], Call::Transfer { .. }));
    assert!(matches!(calls[2], Call::Create(_)));
    assert_eq!(calls.len(), 3);

    let created = &backend.creates()[0];

    assert_eq!(created["media_type"], json!("image"));
    assert_eq!(created["media_href"], json!(PUBLIC_URL));
}

#[tokio::test]
async fn update_with_untouched_remote_skips_upload() {
    let backend = MockBackend::default();
    let submitter = PostDraftSubmitter::new(backend.clone());

    let persisted = sample_post(3, MediaKind::Image, Some("https://cdn/u.png"));
    let draft = PostDraft::from_persisted(&persisted);

    let post = submitter
        .submit(&draft, SubmitMode::Update(3))
        .await
        .unwrap();

    assert_eq!(post.id, 3);
    assert_eq!(backend.presigns(), 0);

    // One update, then the authoritative re-fetch; the PUT body is never
    // trusted as the entity.
    let (id, body) = backend.updates().remove(0);

    assert_eq!(id, 3);
    assert_eq!(body["media_href"], json!("https://cdn/u.png"));
    assert_eq!(backend.calls().last(), Some(&Call::Fetch(3)));
}

#[tokio::test]
async fn upload_failure_aborts_before_persistence() {
    let backend = MockBackend::failing_presign();
    let submitter = PostDraftSubmitter::new(backend.clone());

    let mut draft = PostDraft::new();
    draft.set_title("T");
    assert!(draft.change_media_kind(MediaKind::Image).is_none());
    draft.attach_file(cover_file()).unwrap();

    let result = submitter.submit(&draft, SubmitMode::Create).await;

    assert!(matches!(
        result,
        Err(SubmitError::Upload(UploadError::SlotRequest(_)))
    ));
    assert!(backend.creates().is_empty());
    assert!(backend.updates().is_empty());
    assert_eq!(submitter.status(), SubmissionStatus::Failed);
}

#[tokio::test]
async fn overlapping_submission_is_rejected() {
    let backend = MockBackend::default();
    let gate = backend.hold_create();
    let submitter = Arc::new(PostDraftSubmitter::new(backend.clone()));

    let mut draft = PostDraft::new();
    draft.set_title("T");

    let first = {
        let submitter = submitter.clone();
        let draft = draft.clone();

        tokio::spawn(async move { submitter.submit(&draft, SubmitMode::Create).await })
    };

    // Wait for the first submission to reach the parked persistence leg.
    while backend.creates().is_empty() {
        tokio::task::yield_now().await;
    }

    let second = submitter.submit(&draft, SubmitMode::Create).await;

    assert!(matches!(second, Err(SubmitError::ConcurrentSubmission)));
    assert_eq!(submitter.status(), SubmissionStatus::InFlight);

    gate.notify_one();

    first.await.unwrap().unwrap();

    assert_eq!(submitter.status(), SubmissionStatus::Succeeded);
    assert_eq!(backend.creates().len(), 1);
}

#[tokio::test]
async fn confirmed_kind_change_submits_null_href() {
    let backend = MockBackend::default();
    let submitter = PostDraftSubmitter::new(backend.clone());

    let persisted = sample_post(3, MediaKind::Image, Some("https://cdn/u.png"));
    let mut draft = PostDraft::from_persisted(&persisted);

    let pending = draft.change_media_kind(MediaKind::Video).unwrap();
    draft.apply_media(pending.confirm());

    submitter
        .submit(&draft, SubmitMode::Update(3))
        .await
        .unwrap();

    let (_, body) = backend.updates().remove(0);

    assert_eq!(body["media_type"], json!("video"));
    assert_eq!(body["media_href"], json!(null));
    assert_eq!(backend.presigns(), 0);
}

#[tokio::test]
async fn listing_returns_the_admin_view() {
    let backend = MockBackend::default();
    let pressroom = Pressroom::new(backend.clone());

    let posts = pressroom.posts().await.unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(backend.calls(), vec![Call::List]);
}

#[tokio::test]
async fn load_draft_hydrates_for_editing() {
    let pressroom = Pressroom::new(MockBackend::default());

    let (post, draft) = pressroom.load_draft(5).await.unwrap();

    assert_eq!(post.id, 5);
    assert_eq!(
        draft.media(),
        &MediaSelection::remote_reference(MediaKind::Image, "https://cdn/u.png")
    );
}

#[tokio::test]
async fn load_draft_failure_is_a_load_error() {
    let pressroom = Pressroom::new(MockBackend::failing_fetch());

    let result = pressroom.load_draft(5).await;

    assert!(matches!(result, Err(Error::Load(_))));
}

#[tokio::test]
async fn visibility_toggle_refetches_the_post() {
    let backend = MockBackend::default();
    let pressroom = Pressroom::new(backend.clone());

    let post = pressroom.set_visibility(4, false).await.unwrap();

    assert_eq!(post.id, 4);
    assert_eq!(
        backend.calls(),
        vec![Call::Visibility(4, false), Call::Fetch(4)]
    );
}

#[tokio::test]
async fn about_is_fetched_on_demand() {
    let backend = MockBackend::default();
    let pressroom = Pressroom::new(backend.clone());

    let about = pressroom.about().await.unwrap();

    assert_eq!(about.header, "About me");
    assert_eq!(backend.calls(), vec![Call::FetchAbout]);
}

#[tokio::test]
async fn about_update_refetches_the_record() {
    let backend = MockBackend::default();
    let pressroom = Pressroom::new(backend.clone());

    let payload = AboutPayload {
        header: "New header".into(),
        body: "New body".into(),
    };

    let about = pressroom.update_about(&payload).await.unwrap();

    assert_eq!(about.header, "New header");
    assert_eq!(about.body, "New body");
    assert_eq!(
        backend.calls(),
        vec![
            Call::UpdateAbout(json!({ "header": "New header", "body": "New body" })),
            Call::FetchAbout,
        ]
    );
}

#[tokio::test]
async fn about_update_with_empty_field_is_rejected() {
    let backend = MockBackend::default();
    let pressroom = Pressroom::new(backend.clone());

    let payload = AboutPayload {
        header: "New header".into(),
        body: String::new(),
    };

    match pressroom.update_about(&payload).await {
        Err(Error::Api(ServiceError::Api(api))) => {
            assert_eq!(api.status, 400);
            assert_eq!(api.message, "Missing header or body");
        }
        other => panic!("expected a 400 rejection, got {:?}", other),
    }

    // A rejected update never re-fetches.
    assert_eq!(
        backend.calls(),
        vec![Call::UpdateAbout(json!({ "header": "New header", "body": "" }))]
    );
}

#[tokio::test]
async fn delete_goes_straight_through() {
    let backend = MockBackend::default();
    let pressroom = Pressroom::new(backend.clone());

    pressroom.delete_post(9).await.unwrap();

    assert_eq!(backend.calls(), vec![Call::Delete(9)]);
}
