//! Bounded JSON parsing for payloads we do not control.
//!
//! Result-service responses, cached results and user config files all pass
//! through here so that a hostile or broken payload fails cleanly instead of
//! exhausting memory or the stack.

use anyhow::{Context, Result};
use serde_json::Value;

/// Result payloads are a few kilobytes; anything near this is not a result.
pub const MAX_PAYLOAD_SIZE: usize = 1024 * 1024;

/// Deepest legitimate nesting is result -> semesters -> exams -> referreds.
pub const MAX_PAYLOAD_DEPTH: usize = 32;

/// Check size and nesting depth of a JSON document.
///
/// # Example
/// ```rust
/// use bteb_results::utils::json_validator;
///
/// json_validator::validate_payload(r#"{"roll": 123456}"#)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn validate_payload(json_str: &str) -> Result<()> {
    parse_bounded(json_str).map(|_| ())
}

/// Parse a JSON document into a [`Value`] after enforcing the limits.
pub fn parse_bounded(json_str: &str) -> Result<Value> {
    if json_str.len() > MAX_PAYLOAD_SIZE {
        anyhow::bail!(
            "JSON payload too large: {} bytes exceeds maximum of {} bytes",
            json_str.len(),
            MAX_PAYLOAD_SIZE
        );
    }

    let value: Value = serde_json::from_str(json_str).context("Invalid JSON syntax")?;

    let depth = json_depth(&value);
    if depth > MAX_PAYLOAD_DEPTH {
        anyhow::bail!(
            "JSON nesting too deep: {} levels exceeds maximum of {}",
            depth,
            MAX_PAYLOAD_DEPTH
        );
    }

    Ok(value)
}

/// Deserialize a bounded JSON document into `T`.
pub fn deserialize_bounded<T>(json_str: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let value = parse_bounded(json_str)?;
    serde_json::from_value(value).context("JSON does not match the expected shape")
}

fn json_depth(value: &Value) -> usize {
    match value {
        Value::Object(map) => 1 + map.values().map(json_depth).max().unwrap_or(0),
        Value::Array(arr) => 1 + arr.iter().map(json_depth).max().unwrap_or(0),
        _ => 1,
    }
}
