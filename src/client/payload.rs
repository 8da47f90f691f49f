//! Outgoing request bodies and the headers they imply
//!
//! The wrapper decides content negotiation from the payload alone: multipart
//! bodies leave `Content-Type` to the transport (it has to add the boundary),
//! everything else is sent and accepted as JSON.

use std::path::Path;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;

use crate::utils::errors::{ApiError, SiormaError, Result};

/// Body of an outgoing request
#[derive(Debug, Clone)]
pub enum Payload {
    Empty,
    Json(serde_json::Value),
    Multipart(FormBody),
}

impl Payload {
    /// Serialize any value into a JSON payload
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Payload::Json(serde_json::to_value(value)?))
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, Payload::Multipart(_))
    }
}

/// A file carried in a multipart body
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_content_type(&file_name).map(str::to_string);
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read a file from disk, keeping its name and guessing its type from the extension
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| SiormaError::InvalidInput(format!("{} is not a file", path.display())))?;

        Ok(Self::new(file_name, bytes))
    }
}

/// Content type for the upload kinds the backend accepts
pub fn guess_content_type(file_name: &str) -> Option<&'static str> {
    let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    let mime = match extension.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => return None,
    };
    Some(mime)
}

/// Multipart form body that can still be inspected before it is sent
#[derive(Debug, Clone, Default)]
pub struct FormBody {
    fields: Vec<(String, String)>,
    files: Vec<(String, Attachment)>,
}

impl FormBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Append a file part
    pub fn file(mut self, name: impl Into<String>, attachment: Attachment) -> Self {
        self.files.push((name.into(), attachment));
        self
    }

    /// Append a file part when one is given
    pub fn maybe_file(self, name: &str, attachment: Option<Attachment>) -> Self {
        match attachment {
            Some(attachment) => self.file(name, attachment),
            None => self,
        }
    }

    /// Tunnel another HTTP verb through a POST, as the backend router expects
    pub fn method_override(self, method: &str) -> Self {
        self.text("_method", method.to_ascii_uppercase())
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Names of every part, files last
    pub fn part_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .map(|(name, _)| name.as_str())
            .chain(self.files.iter().map(|(name, _)| name.as_str()))
            .collect()
    }

    /// Convert into the transport's multipart form
    pub fn into_multipart(self) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();

        for (name, value) in self.fields {
            form = form.text(name, value);
        }

        for (name, attachment) in self.files {
            let mut part = reqwest::multipart::Part::bytes(attachment.bytes)
                .file_name(attachment.file_name);
            if let Some(content_type) = attachment.content_type {
                part = part.mime_str(&content_type).map_err(ApiError::from)?;
            }
            form = form.part(name, part);
        }

        Ok(form)
    }
}

/// Headers the wrapper attaches for a payload and the current token
pub fn prepare_headers(payload: &Payload, token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    if let Some(token) = token.filter(|t| !t.is_empty()) {
        let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            SiormaError::Session("stored token contains characters not allowed in a header".to_string())
        })?;
        headers.insert(AUTHORIZATION, value);
    }

    if payload.is_multipart() {
        headers.remove(CONTENT_TYPE);
    } else {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn photo() -> Attachment {
        Attachment::new("logo.png", vec![0x89, 0x50, 0x4e, 0x47])
    }

    #[test]
    fn test_multipart_headers_have_no_json_content_type() {
        let payload = Payload::Multipart(FormBody::new().text("name", "Motion Laboratorium").file("photo", photo()));
        let headers = prepare_headers(&payload, Some("abc123")).unwrap();

        assert!(headers.get(CONTENT_TYPE).is_none());
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc123");
    }

    #[test]
    fn test_json_headers() {
        let payload = Payload::Json(json!({ "status": "approved" }));
        let headers = prepare_headers(&payload, None).unwrap();

        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_empty_payload_is_treated_as_json() {
        let headers = prepare_headers(&Payload::Empty, Some("tok")).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok");
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let headers = prepare_headers(&Payload::Empty, Some("")).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let result = prepare_headers(&Payload::Empty, Some("abc\ndef"));
        assert!(matches!(result, Err(SiormaError::Session(_))));
    }

    #[test]
    fn test_form_body_fields_and_override() {
        let form = FormBody::new()
            .text("name", "Volley Telkom")
            .maybe_file("photo", None)
            .method_override("put");

        assert_eq!(form.field("name"), Some("Volley Telkom"));
        assert_eq!(form.field("_method"), Some("PUT"));
        assert_eq!(form.part_names(), vec!["name", "_method"]);
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type("cv_budi.PDF"), Some("application/pdf"));
        assert_eq!(guess_content_type("poster.jpeg"), Some("image/jpeg"));
        assert_eq!(guess_content_type("README"), None);
        assert_eq!(photo().content_type.as_deref(), Some("image/png"));
    }
}
