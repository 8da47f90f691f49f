//! Response decoding: envelopes, error bodies and binary blobs

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::utils::errors::{ApiError, Result};
use crate::utils::helpers::sanitize_filename;

/// Unwrap the `{ success, message, data }` envelope.
///
/// Takes `data`, then the endpoint-specific key, then the body itself.
/// Only a missing or null value falls through to the next candidate.
pub fn extract_data<'a>(body: &'a Value, named_key: Option<&str>) -> &'a Value {
    if let Some(data) = body.get("data").filter(|v| !v.is_null()) {
        return data;
    }

    if let Some(value) = named_key
        .and_then(|key| body.get(key))
        .filter(|v| !v.is_null())
    {
        return value;
    }

    body
}

/// Decode a list out of an envelope; a non-array payload yields an empty list
pub fn extract_list<T: DeserializeOwned>(body: &Value, named_key: Option<&str>) -> Result<Vec<T>> {
    let data = extract_data(body, named_key);
    if !data.is_array() {
        debug!("Expected a list in API response, got {}", value_kind(data));
        return Ok(Vec::new());
    }

    serde_json::from_value(data.clone())
        .map_err(|e| ApiError::InvalidResponse(format!("unexpected list item shape: {}", e)).into())
}

/// Decode a single record out of an envelope
pub fn extract_one<T: DeserializeOwned>(body: &Value, named_key: Option<&str>) -> Result<T> {
    let data = extract_data(body, named_key);
    serde_json::from_value(data.clone())
        .map_err(|e| ApiError::InvalidResponse(format!("unexpected record shape: {}", e)).into())
}

/// First string found at any of the given dotted paths
pub fn first_string(body: &Value, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| {
        let mut current = body;
        for key in path.split('.') {
            current = current.get(key)?;
        }
        current.as_str().filter(|s| !s.is_empty()).map(str::to_string)
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Message and per-field errors from a failed response body.
///
/// The message comes from `message`, then `error`; field errors from the
/// `errors` map, whose entries may be a list of strings or a single string.
/// Field errors keep the order the server sent them in.
pub fn error_details(body: &[u8]) -> (Option<String>, Vec<(String, Vec<String>)>) {
    let mut field_errors = Vec::new();

    let parsed: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            let message = (!text.is_empty() && !text.starts_with('<') && text.len() <= 200).then_some(text);
            return (message, field_errors);
        }
    };

    let message = first_string(&parsed, &["message", "error", "error.message"]);

    if let Some(errors) = parsed.get("errors").and_then(Value::as_object) {
        for (field, value) in errors {
            let messages: Vec<String> = match value {
                Value::Array(items) => items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
                Value::String(s) => vec![s.clone()],
                _ => Vec::new(),
            };
            if !messages.is_empty() {
                field_errors.push((field.clone(), messages));
            }
        }
    }

    (message, field_errors)
}

/// Binary response body such as a CV file
#[derive(Debug, Clone)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub filename: Option<String>,
}

impl Blob {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Filename from `content-disposition`, or the caller's fallback
    pub fn file_name_or(&self, fallback: &str) -> String {
        self.filename.clone().unwrap_or_else(|| fallback.to_string())
    }

    /// Write the blob into `dir` under its (sanitized) filename
    pub async fn save_in(&self, dir: &Path, fallback: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let target = dir.join(sanitize_filename(&self.file_name_or(fallback)));
        tokio::fs::write(&target, &self.bytes).await?;
        debug!(path = %target.display(), bytes = self.bytes.len(), "Saved blob");
        Ok(target)
    }
}
