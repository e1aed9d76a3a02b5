//! Storable entity contract
//!
//! Every type kept in a container implements [`Entity`]: it serializes to a
//! JSON object with an `id` field and exposes that identifier.
//! [`Document`] is a schemaless entity for callers that do not model their data.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A document that can be stored in a container
///
/// The serialized form must be a JSON object whose `id` property matches
/// [`Entity::id`].
///
/// # Examples
///
/// ```
/// use cosmos_repo::domain::Entity;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Order {
///     id: String,
///     customer: String,
/// }
///
/// impl Entity for Order {
///     fn id(&self) -> &str {
///         &self.id
///     }
///
///     fn set_id(&mut self, id: String) {
///         self.id = id;
///     }
/// }
/// ```
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Document identifier
    fn id(&self) -> &str;

    /// Replaces the document identifier
    fn set_id(&mut self, id: String);

    /// Server-assigned last modification time, when the type captures `_ts`
    fn last_modified(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// Converts a `_ts` value (seconds since the Unix epoch) into a timestamp
pub fn timestamp_to_datetime(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

/// Schemaless document
///
/// Keeps `id` and the server `_ts` as typed fields and every other property
/// as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier
    #[serde(default)]
    pub id: String,

    /// Last modification time in epoch seconds (server-assigned)
    #[serde(rename = "_ts", default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,

    /// All remaining properties
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl Document {
    /// Creates a document with the given identifier and no properties
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ts: None,
            properties: Map::new(),
        }
    }

    /// Sets a property
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Returns a property by name
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

impl Entity for Document {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.ts.and_then(timestamp_to_datetime)
    }
}
