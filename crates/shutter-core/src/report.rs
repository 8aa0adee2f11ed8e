//! Stdout contract shared by the validator and screenshotter: the aggregate
//! JSON on one line between fixed marker lines.

use crate::error::Result;
use serde::Serialize;

pub const JSON_OUTPUT_START: &str = "--- JSON OUTPUT START ---";
pub const JSON_OUTPUT_END: &str = "--- JSON OUTPUT END ---";

/// Render `value` as compact JSON wrapped in the marker lines.
pub fn bracketed_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(format!("{JSON_OUTPUT_START}\n{json}\n{JSON_OUTPUT_END}"))
}

/// The JSON text between the first marker pair in `output`, if any.
pub fn extract_bracketed(output: &str) -> Option<&str> {
    let start = output.find(JSON_OUTPUT_START)? + JSON_OUTPUT_START.len();
    let end = start + output[start..].find(JSON_OUTPUT_END)?;
    Some(output[start..end].trim())
}
