/// Event log data models
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Key that terminates every chain. Never stored as an object.
pub const SENTINEL_KEY: &str =
    "00000000000000000000000000000000000000000000000000000000000000000000";

/// A single record of the event log
///
/// `event_type` and `data` are opaque to this service and passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    /// Key of the chronologically prior event, or [`SENTINEL_KEY`]
    #[serde(deserialize_with = "null_as_empty")]
    pub previous: String,

    #[serde(rename = "type", deserialize_with = "null_as_empty")]
    pub event_type: String,

    #[serde(deserialize_with = "null_as_empty")]
    pub data: String,
}

impl Event {
    /// Decode an event from its stored JSON representation
    ///
    /// Only a JSON object is accepted. Unknown fields are ignored, missing or
    /// `null` fields become empty strings.
    pub fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        // Derived struct impls also take sequences, positionally
        let object: Map<String, Value> = serde_json::from_slice(bytes)?;
        serde_json::from_value(Value::Object(object))
    }
}

/// Events reachable from a head key, most recent first, sentinel excluded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    pub items: Vec<Event>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
