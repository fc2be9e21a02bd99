//! Workflow records
//!
//! A [`Workflow`] is the server's record as returned by `GET api/workflows`,
//! decorated with two client-only attributes: `shared` and `description`.
//! Those are recomputed on every read and are never serialized, so a record
//! can be handed back to a write without leaking them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Description shown when a workflow has no usable annotation.
pub const NOT_AVAILABLE: &str = "Not available";

/// Keys owned by the client that must never round-trip through `extra`.
const DERIVED_KEYS: [&str; 2] = ["shared", "description"];

/// A workflow as listed by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// Server-assigned id
    pub id: String,
    pub name: String,
    /// Username of the creating account
    #[serde(default)]
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<String>>,
    /// Every other server field, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// True when the workflow belongs to someone other than the session user
    #[serde(skip)]
    pub shared: bool,
    /// First non-blank annotation, or [`NOT_AVAILABLE`]
    #[serde(skip)]
    pub description: String,
}

impl Workflow {
    /// Recompute `shared` and `description` for the given session user.
    pub fn derive_attributes(&mut self, current_user: &str) {
        for key in DERIVED_KEYS {
            self.extra.remove(key);
        }
        self.shared = self.owner != current_user;
        self.description = derive_description(self.annotations.as_deref());
    }

    /// Consume the record, returning it with derived attributes set.
    pub fn with_attributes(mut self, current_user: &str) -> Self {
        self.derive_attributes(current_user);
        self
    }

    /// Build a record from whatever the server returned, never failing.
    ///
    /// Missing or mistyped `id`/`owner` become empty, a missing `name` falls
    /// back to `fallback_name`, and non-string annotations are dropped.
    /// Anything that is not an object yields an otherwise empty record.
    pub fn from_value_lossy(value: Value, fallback_name: &str) -> Self {
        let mut extra = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let id = match extra.remove("id") {
            Some(Value::String(id)) => id,
            Some(Value::Number(id)) => id.to_string(),
            _ => String::new(),
        };
        let name = match extra.remove("name") {
            Some(Value::String(name)) => name,
            _ => fallback_name.to_string(),
        };
        let owner = match extra.remove("owner") {
            Some(Value::String(owner)) => owner,
            _ => String::new(),
        };
        let annotations = match extra.remove("annotations") {
            Some(Value::Array(items)) => Some(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(annotation) => Some(annotation),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => None,
        };

        Self {
            id,
            name,
            owner,
            annotations,
            extra,
            shared: false,
            description: String::new(),
        }
    }
}

/// First non-blank trimmed annotation, else [`NOT_AVAILABLE`].
pub fn derive_description(annotations: Option<&[String]>) -> String {
    annotations
        .unwrap_or_default()
        .iter()
        .map(|annotation| annotation.trim())
        .find(|annotation| !annotation.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}
