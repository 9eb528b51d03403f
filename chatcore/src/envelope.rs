use crate::error::EnvelopeError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single protocol payload: a route string plus a loose field map.
///
/// The same shape carries inbound responses and outbound requests. On the
/// wire the target sits next to the other fields:
/// `{"target": "/chat", "chatType": "wow_message", ...}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Envelope {
    pub target: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Envelope {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            fields: Map::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Returns the string field `key`, failing if it is absent or not a string.
    pub fn require_str(&self, key: &'static str) -> Result<&str, EnvelopeError> {
        required_str(&self.fields, key)
    }

    /// Returns the nested mapping stored under `key`.
    pub fn require_object(&self, key: &'static str) -> Result<&Map<String, Value>, EnvelopeError> {
        match self.fields.get(key) {
            Some(Value::Object(map)) => Ok(map),
            Some(_) => Err(EnvelopeError::WrongType {
                field: key,
                expected: "an object",
            }),
            None => Err(EnvelopeError::MissingField(key)),
        }
    }
}

pub(crate) fn required_str<'a>(
    map: &'a Map<String, Value>,
    key: &'static str,
) -> Result<&'a str, EnvelopeError> {
    match map.get(key) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(EnvelopeError::WrongType {
            field: key,
            expected: "a string",
        }),
        None => Err(EnvelopeError::MissingField(key)),
    }
}

/// Reads an optional string field. A present value of another type is an error.
pub(crate) fn optional_str<'a>(
    map: &'a Map<String, Value>,
    key: &'static str,
) -> Result<Option<&'a str>, EnvelopeError> {
    match map.get(key) {
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(Value::Null) | None => Ok(None),
        Some(_) => Err(EnvelopeError::WrongType {
            field: key,
            expected: "a string",
        }),
    }
}

/// Fluent builder for outbound envelopes.
#[derive(Debug, Clone)]
pub struct EnvelopeBuilder {
    envelope: Envelope,
}

impl EnvelopeBuilder {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            envelope: Envelope::new(target),
        }
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.envelope.insert(key, value);
        self
    }

    /// Adds a nested mapping built from `(key, value)` pairs.
    pub fn object<K, V, I>(self, key: impl Into<String>, entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let map: Map<String, Value> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.field(key, Value::Object(map))
    }

    pub fn build(self) -> Envelope {
        self.envelope
    }
}
