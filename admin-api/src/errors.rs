use serde::Deserialize;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Reqwest: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Parse: {0}")]
    Parse(#[from] url::ParseError),

    #[error("Serde: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Session: cookie is not a valid header value")]
    Session,

    #[error("Api: {0}")]
    Api(#[from] ApiError),
}

/// Non-success response from the admin API or object storage.
#[derive(Error, PartialEq, Eq, Clone, Debug)]
#[error("status {status}: {message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// Keep the server's own message when the body is its `{"error": ...}`
    /// shape, the raw text otherwise.
    pub fn new(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.error,
            Err(_) => body.trim().to_owned(),
        };

        Self { status, message }
    }
}
