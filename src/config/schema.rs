//! Unknown-key detection and key canonicalisation
//!
//! serde's derive cannot both match keys case-insensitively and report the
//! offending key, so the raw object is checked against [`FIELDS`] first and
//! its keys rewritten to their declared spelling before structural decoding.

use super::types::{RawConfig, FIELDS};
use crate::error::ConfigError;
use serde_json::{Map, Value};

/// Declared spelling of `key`, compared case-insensitively
pub fn canonical_field(key: &str) -> Option<&'static str> {
    FIELDS
        .iter()
        .copied()
        .find(|field| field.eq_ignore_ascii_case(key))
}

/// Decode `data` as a generic JSON object
pub fn decode_object(data: &[u8]) -> Result<Map<String, Value>, ConfigError> {
    Ok(serde_json::from_slice(data)?)
}

/// Fail on the first key not present in [`FIELDS`]
pub fn check_unknown_fields(object: &Map<String, Value>) -> Result<(), ConfigError> {
    match object.keys().find(|key| canonical_field(key).is_none()) {
        Some(key) => Err(ConfigError::UnknownField(key.clone())),
        None => Ok(()),
    }
}

/// Decode a checked object into [`RawConfig`] on top of its defaults
///
/// Keys that differ only in case collapse onto one field; the last one in
/// object order wins. A `null` value leaves the field at its default.
pub fn decode_config(object: Map<String, Value>) -> Result<RawConfig, ConfigError> {
    let mut canonical = Map::with_capacity(object.len());
    for (key, value) in object {
        let field = canonical_field(&key).ok_or_else(|| ConfigError::UnknownField(key.clone()))?;
        if value.is_null() {
            continue;
        }
        canonical.insert(field.to_string(), value);
    }
    Ok(serde_json::from_value(Value::Object(canonical))?)
}
