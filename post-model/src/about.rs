use chrono::{DateTime, FixedOffset};

use serde::{Deserialize, Serialize};

use crate::post::rfc2822_opt;

/// The site's single About section.
///
/// `id` and `last_updated` are null when the row was never seeded; the
/// server still answers with this shape.
#[derive(Deserialize, PartialEq, Clone, Debug)]
pub struct About {
    #[serde(default)]
    pub id: Option<u64>,

    pub header: String,

    pub body: String,

    #[serde(default, deserialize_with = "rfc2822_opt")]
    pub last_updated: Option<DateTime<FixedOffset>>,
}

/// Request body for the About update endpoint.
///
/// The server rejects a missing or empty header or body, there is no
/// partial update here.
#[derive(Serialize, PartialEq, Eq, Clone, Debug)]
pub struct AboutPayload {
    pub header: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn about_decodes_seeded_and_empty_rows() {
        let body = json!({
            "id": 1,
            "header": "About me",
            "body": "Long form",
            "last_updated": "Wed, 21 Oct 2015 07:28:00 GMT"
        });

        let about: About = serde_json::from_value(body).unwrap();

        assert_eq!(about.id, Some(1));
        assert_eq!(about.header, "About me");
        assert!(about.last_updated.is_some());

        let body = json!({
            "id": null,
            "header": "",
            "body": "",
            "last_updated": null
        });

        let about: About = serde_json::from_value(body).unwrap();

        assert_eq!(about.id, None);
        assert_eq!(about.last_updated, None);
    }

    #[test]
    fn about_payload_wire_shape() {
        let payload = AboutPayload {
            header: "About me".into(),
            body: "Long form".into(),
        };

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "header": "About me", "body": "Long form" })
        );
    }
}
