//! Opaque JSON Schema values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An already-valid JSON Schema document fragment.
///
/// The value is opaque: it supports encoding to and decoding from JSON bytes
/// and nothing else. Producing a structurally valid body is the deriver's
/// responsibility, not this type's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema(Value);

impl Schema {
    /// Decode a schema from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json::Error` when the bytes are not
    /// valid JSON.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes).map(Schema)
    }

    /// Encode the schema to JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.0)
    }

    pub(crate) fn from_value(value: Value) -> Self {
        Schema(value)
    }

    pub(crate) fn value(&self) -> &Value {
        &self.0
    }
}
