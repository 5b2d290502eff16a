use chrono::{DateTime, FixedOffset};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::media::MediaKind;

pub type PostId = u64;

/// The server's durable record of a post. The client holds at most a cached
/// copy, never a lock.
#[derive(Deserialize, PartialEq, Clone, Debug)]
pub struct PersistedPost {
    pub id: PostId,

    pub title: String,

    #[serde(default)]
    pub blurb: Option<String>,

    #[serde(default)]
    pub writeup: Option<String>,

    pub media_type: MediaKind,

    #[serde(default)]
    pub media_href: Option<String>,

    /// RFC 2822 on the wire; absent from create responses.
    #[serde(default, deserialize_with = "rfc2822_opt")]
    pub timestamp: Option<DateTime<FixedOffset>>,

    /// The server emits both `true`/`false` and `1`/`0` for this field.
    #[serde(deserialize_with = "bool_or_int")]
    pub is_visible: bool,
}

/// Request body for the create and update endpoints.
///
/// `media_href` is always serialized so an explicit `null` clears the stored
/// reference; the server merges absent fields instead.
#[derive(Serialize, PartialEq, Clone, Debug)]
pub struct PostPayload {
    pub title: String,

    pub blurb: String,

    pub writeup: String,

    pub media_type: MediaKind,

    pub media_href: Option<String>,

    #[serde(serialize_with = "bool_as_int")]
    pub is_visible: bool,
}

fn bool_as_int<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(u8::from(*value))
}

fn bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Bool(value) => value,
        Raw::Int(value) => value != 0,
    })
}

pub(crate) fn rfc2822_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => DateTime::parse_from_rfc2822(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
