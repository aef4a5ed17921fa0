use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Parses JSON from the exact bytes that were received.
#[inline]
pub fn deserialize<'a, T: Deserialize<'a>>(raw: &'a [u8]) -> Result<T> {
    Ok(serde_json::from_slice(raw)?)
}

/// Serializes into compact JSON: no whitespace between tokens, object keys in the order the value yields them.
#[inline]
pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}
