//! Splitting a dispatched action into its type discriminant and payload.

use serde::Serialize;
use serde_json::{Map, Value};

/// Field name of the action discriminant.
pub const TYPE_FIELD: &str = "type";

/// The traced view of an action: its `type` and everything else.
///
/// Actions are opaque to the tracer. Any `Serialize` value works as long as
/// it serializes to a JSON object with a `type` field, which is exactly what
/// an internally tagged enum (`#[serde(tag = "type")]`) or a raw
/// [`serde_json::Value`] produces.
///
/// # Example
///
/// ```rust
/// use dispatch_trace::core::ActionRecord;
/// use serde_json::json;
///
/// let record = ActionRecord::from_action(&json!({"type": "COUNTER_INCREASE", "count": 3}))
///     .expect("action has a type");
///
/// assert_eq!(record.action_type(), "COUNTER_INCREASE");
/// assert_eq!(record.payload_json(), r#"{"count":3}"#);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ActionRecord {
    action_type: String,
    payload: Map<String, Value>,
}

impl ActionRecord {
    /// Extract the type and payload of `action`.
    ///
    /// Returns `None` when the action does not serialize to an object, has
    /// no `type` field, or its `type` is `null`. A non-string `type` is kept
    /// as its JSON text.
    pub fn from_action<A: Serialize + ?Sized>(action: &A) -> Option<Self> {
        let Value::Object(mut fields) = serde_json::to_value(action).ok()? else {
            return None;
        };

        let action_type = match fields.remove(TYPE_FIELD)? {
            Value::Null => return None,
            Value::String(s) => s,
            other => other.to_string(),
        };

        Some(Self {
            action_type,
            payload: fields,
        })
    }

    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    /// Payload fields, i.e. the action minus its `type`.
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// JSON text of the payload object.
    pub fn payload_json(&self) -> String {
        Value::Object(self.payload.clone()).to_string()
    }
}
