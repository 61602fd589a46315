//! JSON serialization for consensus results.

use serde::Serialize;

/// Serialize a result to a compact JSON string.
///
/// Matrices are written as arrays of rows.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for the
/// result types of this crate).
pub fn to_json<T: Serialize>(result: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(result)
}

/// Serialize a result to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for the
/// result types of this crate).
pub fn to_json_pretty<T: Serialize>(result: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}
