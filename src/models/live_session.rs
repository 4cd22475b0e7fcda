use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys owned by the record itself. Clients can never overwrite them.
pub const RESERVED_KEYS: [&str; 3] = ["id", "created_at", "updated_at"];

/// Shared state a presenter screen and its remote controls both watch and edit.
///
/// Everything besides the identifier and the timestamps is free-form, e.g. the
/// currently displayed reference or slide index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveSession {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Removes reserved keys from a client-supplied partial update.
pub fn sanitize_patch(mut patch: Map<String, Value>) -> Map<String, Value> {
    for key in RESERVED_KEYS {
        patch.remove(key);
    }
    patch
}

impl LiveSession {
    /// Shallow-merges `patch` into the fields. Last write wins.
    pub fn apply_patch(&mut self, patch: Map<String, Value>, now: DateTime<Utc>) {
        for (key, value) in sanitize_patch(patch) {
            self.fields.insert(key, value);
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn patch_cannot_touch_identity_or_timestamps() {
        let created = Utc::now();
        let mut session = LiveSession {
            id: "abc".into(),
            fields: object(json!({"reference": "John 3:16"})),
            created_at: created,
            updated_at: created,
        };

        let later = created + chrono::Duration::seconds(3);
        session.apply_patch(
            object(json!({"id": "evil", "created_at": "1970-01-01T00:00:00Z", "slide": 2})),
            later,
        );

        assert_eq!(session.id, "abc");
        assert_eq!(session.created_at, created);
        assert_eq!(session.updated_at, later);
        assert_eq!(session.fields.get("slide"), Some(&json!(2)));
        assert_eq!(session.fields.get("reference"), Some(&json!("John 3:16")));
        assert!(!session.fields.contains_key("id"));
    }

    #[test]
    fn fields_flatten_into_the_record() {
        let raw = json!({
            "id": "s1",
            "reference": "Psalm 23:1",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:05Z"
        });
        let session: LiveSession = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(session.fields.len(), 1);
        assert_eq!(serde_json::to_value(&session).unwrap(), raw);
    }
}
