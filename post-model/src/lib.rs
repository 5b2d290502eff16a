pub mod about;
pub mod draft;
pub mod media;
pub mod post;
pub mod transition;

pub use about::{About, AboutPayload};
pub use draft::PostDraft;
pub use media::{LocalFile, MediaError, MediaKind, MediaSelection};
pub use post::{PersistedPost, PostId, PostPayload};
pub use transition::{propose, PendingChange, Transition};
