use std::borrow::Cow;

use bytes::Bytes;

use serde::{Deserialize, Serialize};

use strum::{Display, EnumString};

use thiserror::Error;

/// The mutually exclusive category of content attached to a post.
#[derive(
    Serialize, Deserialize, Display, EnumString, PartialEq, Eq, Clone, Copy, Debug, Default, Hash,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    #[default]
    None,
    Image,
    Video,
    Audio,
    Link,
}

impl MediaKind {
    pub const ALL: [MediaKind; 5] = [
        MediaKind::None,
        MediaKind::Image,
        MediaKind::Video,
        MediaKind::Audio,
        MediaKind::Link,
    ];

    /// The payload is a local file transferred to object storage.
    pub fn is_uploadable(self) -> bool {
        matches!(self, MediaKind::Image | MediaKind::Audio)
    }

    /// The payload is a user-typed URL.
    pub fn is_external(self) -> bool {
        matches!(self, MediaKind::Video | MediaKind::Link)
    }
}

#[derive(Error, PartialEq, Eq, Clone, Debug)]
pub enum MediaError {
    #[error("Media: {0} does not take an uploaded file")]
    NotUploadable(MediaKind),

    #[error("Media: {0} does not take a typed URL")]
    NotExternal(MediaKind),
}

/// A file chosen by the operator but not yet transferred to object storage.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct LocalFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl LocalFile {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<Cow<'static, str>>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into().into_owned(),
            bytes: bytes.into(),
        }
    }

    /// Last dot-separated segment of the file name, `bin` when there is none.
    pub fn extension_hint(&self) -> &str {
        match self.file_name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext,
            _ => "bin",
        }
    }

    /// Declared MIME type, falling back to a generic binary type.
    pub fn content_type(&self) -> &str {
        if self.mime_type.is_empty() {
            "application/octet-stream"
        } else {
            &self.mime_type
        }
    }
}

/// The media currently associated with a post draft, independent of any
/// network effect.
///
/// At most one of pending file or URL is meaningful at a time and a `none`
/// kind carries neither.
#[derive(PartialEq, Clone, Debug)]
pub enum MediaSelection {
    /// No payload. The kind may be `none`, or a kind whose payload has not
    /// been provided yet.
    Empty(MediaKind),

    /// A file chosen but not yet transferred.
    PendingUpload { kind: MediaKind, file: LocalFile },

    /// A durable reference already usable by the post, either persisted
    /// previously or newly uploaded.
    RemoteReference { kind: MediaKind, url: String },

    /// A URL typed this session, not uploaded and not yet submitted.
    ExternalLink { kind: MediaKind, url: String },
}

impl Default for MediaSelection {
    fn default() -> Self {
        Self::Empty(MediaKind::None)
    }
}

impl MediaSelection {
    pub fn none() -> Self {
        Self::default()
    }

    /// A chosen local file; only uploadable kinds carry one.
    pub fn pending_upload(kind: MediaKind, file: LocalFile) -> Result<Self, MediaError> {
        if !kind.is_uploadable() {
            return Err(MediaError::NotUploadable(kind));
        }

        Ok(Self::PendingUpload { kind, file })
    }

    /// A durable reference, hydrated from a persisted post or returned by an
    /// upload. Unchecked; callers pick the kind the reference belongs to.
    pub fn remote_reference(kind: MediaKind, url: impl Into<String>) -> Self {
        Self::RemoteReference {
            kind,
            url: url.into(),
        }
    }

    /// A user-typed URL; only external kinds carry one.
    pub fn external_link(kind: MediaKind, url: impl Into<String>) -> Result<Self, MediaError> {
        if !kind.is_external() {
            return Err(MediaError::NotExternal(kind));
        }

        Ok(Self::ExternalLink {
            kind,
            url: url.into(),
        })
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Empty(kind) => *kind,
            Self::PendingUpload { kind, .. } => *kind,
            Self::RemoteReference { kind, .. } => *kind,
            Self::ExternalLink { kind, .. } => *kind,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::RemoteReference { url, .. } | Self::ExternalLink { url, .. } => Some(url),
            _ => None,
        }
    }

    /// The "kind changed, payload cleared" shape.
    ///
    /// Callers apply the transition policy first, this does no gating itself.
    pub fn with_kind(&self, kind: MediaKind) -> MediaSelection {
        MediaSelection::Empty(kind)
    }

    /// True when switching away from this selection would discard a durable
    /// asset reference.
    pub fn has_existing_remote_asset(&self) -> bool {
        match self {
            Self::RemoteReference { url, .. } | Self::ExternalLink { url, .. } => !url.is_empty(),
            _ => false,
        }
    }
}
