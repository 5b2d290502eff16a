use crate::media::{MediaKind, MediaSelection};

/// Outcome of asking to change a draft's media kind.
///
/// The policy is a total function over `(selection, requested kind)`; the
/// confirmation gate is the only place it suspends for user input.
#[derive(PartialEq, Clone, Debug)]
pub enum Transition {
    /// The requested kind equals the current one.
    Unchanged,

    /// Applied silently, nothing was at risk.
    Applied(MediaSelection),

    /// The change would discard an attached asset; resume with the user's
    /// decision.
    NeedsConfirmation(PendingChange),
}

/// A media-kind change suspended on the destructive-change gate.
#[derive(PartialEq, Clone, Debug)]
pub struct PendingChange {
    previous: MediaSelection,
    requested: MediaKind,
}

impl PendingChange {
    pub fn previous(&self) -> &MediaSelection {
        &self.previous
    }

    pub fn requested(&self) -> MediaKind {
        self.requested
    }

    /// Discard the current payload and switch to the requested kind.
    pub fn confirm(self) -> MediaSelection {
        self.previous.with_kind(self.requested)
    }

    /// Keep the previous selection untouched; the caller's kind selector
    /// reverts to display it.
    pub fn decline(self) -> MediaSelection {
        self.previous
    }
}

/// Decide what changing `previous` to `requested` means.
pub fn propose(previous: &MediaSelection, requested: MediaKind) -> Transition {
    let current = previous.kind();

    if requested == current {
        return Transition::Unchanged;
    }

    // Video and link are both typed-URL inputs; switching between them
    // relabels the selection and carries the URL forward.
    if current.is_external() && requested.is_external() {
        let next = match previous.clone() {
            MediaSelection::Empty(_) => MediaSelection::Empty(requested),
            MediaSelection::RemoteReference { url, .. } => MediaSelection::RemoteReference {
                kind: requested,
                url,
            },
            MediaSelection::ExternalLink { url, .. } => MediaSelection::ExternalLink {
                kind: requested,
                url,
            },
            // External kinds never hold a file.
            MediaSelection::PendingUpload { .. } => MediaSelection::Empty(requested),
        };

        return Transition::Applied(next);
    }

    if current == MediaKind::None {
        return Transition::Applied(MediaSelection::Empty(requested));
    }

    Transition::NeedsConfirmation(PendingChange {
        previous: previous.clone(),
        requested,
    })
}
