//! Output formatting for consensus results.

pub mod json;

pub use json::{to_json, to_json_pretty};
