//! JSON payload decoding helpers
//!
//! Typed decoding of reply and event payloads is driven by the serde
//! `Deserialize` derives on the types in [`crate::model`] and
//! [`crate::event`]; those derives are the per-type schema, fixed at compile
//! time. This module holds the shared plumbing around them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::Error;

/// Decode one frame payload into its typed shape
pub(crate) fn from_payload<T: DeserializeOwned>(payload: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(payload).map_err(Error::Decode)
}

/// Deserialize an optional field where the compositor may send the literal
/// string `"none"` (or JSON null) to mean "unset"
///
/// Use together with `#[serde(default)]` so that an absent key also decodes
/// to `None`:
///
/// ```ignore
/// #[serde(default, deserialize_with = "decode::none_literal")]
/// pub border: Option<Border>,
/// ```
pub(crate) fn none_literal<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s == "none" => Ok(None),
        other => serde_json::from_value(other)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
