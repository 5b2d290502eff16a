use thiserror::Error;

/// Failure while materializing a local file into a durable reference.
///
/// Neither leg is retried; both propagate for user-facing reporting.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Upload: slot request failed: {0}")]
    SlotRequest(#[source] admin_api::errors::Error),

    #[error("Upload: transfer failed: {0}")]
    Transfer(#[source] admin_api::errors::Error),
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Submit: {0}")]
    Upload(#[from] UploadError),

    #[error("Submit: persistence failed: {0}")]
    Persistence(#[source] admin_api::errors::Error),

    #[error("Submit: a submission is already in flight")]
    ConcurrentSubmission,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Api: {0}")]
    Api(#[from] admin_api::errors::Error),

    #[error("Load: cannot hydrate draft: {0}")]
    Load(#[source] admin_api::errors::Error),

    #[error("Media: {0}")]
    Media(#[from] post_model::MediaError),

    #[error("Upload: {0}")]
    Upload(#[from] UploadError),

    #[error("Submit: {0}")]
    Submit(#[from] SubmitError),

    #[error("IO: {0}")]
    IO(#[from] std::io::Error),
}
