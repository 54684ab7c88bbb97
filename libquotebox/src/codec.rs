//! JSON import/export of quote collections
//!
//! Export writes a pretty-printed array of `{text, category}` objects.
//! Import accepts any JSON array; elements are read leniently (see
//! [`Quote::from_value_lossy`]) and deduplicated against the store.

use serde_json::Value;

use crate::error::{ExportError, ImportError, Result};
use crate::store::QuoteStore;
use crate::types::Quote;

/// File name used when exporting without an explicit path
pub const DEFAULT_EXPORT_FILE: &str = "quotes.json";

/// Serialize the full collection, 2-space indented
pub fn export(quotes: &[Quote]) -> Result<String> {
    let json = serde_json::to_string_pretty(quotes).map_err(ExportError::Serialize)?;
    Ok(json)
}

/// Parse import text into candidate quotes.
///
/// # Errors
///
/// - `ImportError::Parse` if the text is not valid JSON
/// - `ImportError::Shape` if the JSON is anything other than an array
pub fn parse(text: &str) -> Result<Vec<Quote>> {
    let value: Value = serde_json::from_str(text).map_err(ImportError::Parse)?;

    match value {
        Value::Array(items) => Ok(items.iter().map(Quote::from_value_lossy).collect()),
        other => Err(ImportError::Shape(json_kind(&other).to_string()).into()),
    }
}

/// Parse `text` and append the quotes not already in `store`.
///
/// Returns the number appended; zero is a normal outcome. Nothing is
/// persisted here.
pub fn import_into(store: &mut QuoteStore, text: &str) -> Result<usize> {
    let candidates = parse(text)?;
    Ok(store.extend_new(candidates))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
