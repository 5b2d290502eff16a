use crate::{
    media::{LocalFile, MediaError, MediaKind, MediaSelection},
    post::PersistedPost,
    transition::{propose, PendingChange, Transition},
};

/// The in-memory, not-yet-submitted representation of a post.
///
/// Owned exclusively by the active editor session and mutated only through
/// the field setters and the transition policy.
#[derive(PartialEq, Clone, Debug)]
pub struct PostDraft {
    title: String,
    blurb: String,
    writeup: String,
    visible: bool,
    media: MediaSelection,
}

impl Default for PostDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl PostDraft {
    /// An empty draft for a new post; visible by default.
    pub fn new() -> Self {
        Self {
            title: String::new(),
            blurb: String::new(),
            writeup: String::new(),
            visible: true,
            media: MediaSelection::none(),
        }
    }

    /// Hydrate a draft from a fetched post for editing.
    ///
    /// A persisted URL always hydrates as a remote reference, whatever its
    /// kind; typed-this-session URLs only exist after [`set_media_url`].
    ///
    /// [`set_media_url`]: PostDraft::set_media_url
    pub fn from_persisted(post: &PersistedPost) -> Self {
        let media = match &post.media_href {
            Some(url) if post.media_type != MediaKind::None && !url.is_empty() => {
                MediaSelection::remote_reference(post.media_type, url)
            }
            _ => MediaSelection::Empty(post.media_type),
        };

        Self {
            title: post.title.clone(),
            blurb: post.blurb.clone().unwrap_or_default(),
            writeup: post.writeup.clone().unwrap_or_default(),
            visible: post.is_visible,
            media,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn blurb(&self) -> &str {
        &self.blurb
    }

    pub fn set_blurb(&mut self, blurb: impl Into<String>) {
        self.blurb = blurb.into();
    }

    pub fn writeup(&self) -> &str {
        &self.writeup
    }

    pub fn set_writeup(&mut self, writeup: impl Into<String>) {
        self.writeup = writeup.into();
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn media(&self) -> &MediaSelection {
        &self.media
    }

    /// Ask to change the media kind.
    ///
    /// Silent changes apply in place and return `None`. A destructive change
    /// returns the suspended [`PendingChange`]; resume it with the user's
    /// decision and pass the result to [`apply_media`].
    ///
    /// [`apply_media`]: PostDraft::apply_media
    pub fn change_media_kind(&mut self, requested: MediaKind) -> Option<PendingChange> {
        match propose(&self.media, requested) {
            Transition::Unchanged => None,
            Transition::Applied(next) => {
                self.media = next;
                None
            }
            Transition::NeedsConfirmation(pending) => Some(pending),
        }
    }

    /// Resume a suspended media change with the selection it resolved to.
    pub fn apply_media(&mut self, selection: MediaSelection) {
        self.media = selection;
    }

    /// Choose a local file for the current kind, replacing any payload
    /// immediately. File selection is itself the explicit user action, so no
    /// confirmation gates it.
    pub fn attach_file(&mut self, file: LocalFile) -> Result<(), MediaError> {
        self.media = MediaSelection::pending_upload(self.media.kind(), file)?;

        Ok(())
    }

    /// Type a URL for the current external kind.
    pub fn set_media_url(&mut self, url: impl Into<String>) -> Result<(), MediaError> {
        self.media = MediaSelection::external_link(self.media.kind(), url)?;

        Ok(())
    }
}
