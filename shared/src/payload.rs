use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::interop::{deserialize, serialize};

/// A webhook body: JSON object whose keys keep the order they were inserted or parsed in.
///
/// The signature is computed over [`Payload::to_canonical_bytes`], so two payloads only share a
/// signature when they serialize to the exact same bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn new() -> Self {
        Payload(Map::new())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a value. Replacing an existing key keeps that key's original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Name of the event, if the payload carries a string `event` field.
    pub fn event(&self) -> Option<&str> {
        self.get("event").and_then(Value::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>> {
        serialize(self)
    }

    /// Parses a received body. Anything but a single JSON object is an error.
    pub fn from_slice(raw: &[u8]) -> Result<Payload> {
        deserialize(raw)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn patient_updated() -> Payload {
        Payload::new()
            .with("event", "patient_updated")
            .with("patient_id", "123456")
            .with("updated_fields", json!(["diagnosis", "treatment"]))
            .with("timestamp", "2025-03-14T12:34:56Z")
    }

    #[test]
    fn canonical_bytes_keep_insertion_order() {
        let bytes = patient_updated().to_canonical_bytes().unwrap();

        assert_eq!(
            bytes,
            br#"{"event":"patient_updated","patient_id":"123456","updated_fields":["diagnosis","treatment"],"timestamp":"2025-03-14T12:34:56Z"}"#
        );
    }

    #[test]
    fn parsing_keeps_received_order() {
        let payload = Payload::from_slice(br#"{ "z": 1, "a": 2 }"#).unwrap();

        assert_eq!(payload.keys().collect::<Vec<_>>(), vec!["z", "a"]);
        assert_eq!(payload.to_canonical_bytes().unwrap(), br#"{"z":1,"a":2}"#);
    }

    #[test]
    fn event_accessor() {
        assert_eq!(patient_updated().event(), Some("patient_updated"));
        assert_eq!(Payload::new().with("event", 7).event(), None);
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        assert!(Payload::from_slice(b"[1,2,3]").is_err());
        assert!(Payload::from_slice(b"").is_err());
    }
}
