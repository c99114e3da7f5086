use serde::{Deserialize, Serialize};

/// A persisted image link.
///
/// `id` is assigned by the store and increases with every insert; it is the
/// only ordering key. `created_at` is informational.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: i64,
    pub link: String,
    pub created_at: String,
}

/// Body of an ingest request.
#[derive(Clone, Debug, Deserialize)]
pub struct NewLink {
    pub link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_link_field() {
        let record = LinkRecord {
            id: 7,
            link: "http://a/1.png".into(),
            created_at: "2026-01-01T00:00:00Z".into(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["link"], "http://a/1.png");
    }

    #[test]
    fn new_link_ignores_extra_fields() {
        let parsed: NewLink =
            serde_json::from_str(r#"{"link":"http://a/1.png","caption":"x"}"#).unwrap();
        assert_eq!(parsed.link, "http://a/1.png");
    }
}
