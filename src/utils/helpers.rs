//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the crate.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer};

/// Resolve a backend storage path into an absolute URL.
///
/// Absolute URLs pass through untouched, rooted paths are appended to the
/// origin, and bare relative paths land under `/storage/` with any leading
/// `public/` removed (the backend stores files on its public disk).
pub fn resolve_storage_url(path: &str, origin: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }

    if path.starts_with("http://") || path.starts_with("https://") {
        return Some(path.to_string());
    }

    let origin = origin.trim_end_matches('/');

    if path.starts_with('/') {
        return Some(format!("{}{}", origin, path));
    }

    let cleaned = path.strip_prefix("public/").unwrap_or(path);
    Some(format!("{}/storage/{}", origin, cleaned))
}

fn rfc5987_filename() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)filename\*\s*=\s*UTF-8''([^;]+)"#).expect("valid regex"))
}

fn quoted_filename() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)filename\s*=\s*"([^"]+)""#).expect("valid regex"))
}

fn bare_filename() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)filename\s*=\s*([^";\s]+)"#).expect("valid regex"))
}

/// Extract the filename from a `content-disposition` header value
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    if let Some(caps) = rfc5987_filename().captures(header) {
        let raw = caps[1].trim();
        let decoded = urlencoding::decode(raw)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| raw.to_string());
        if !decoded.is_empty() {
            return Some(decoded);
        }
    }

    quoted_filename()
        .captures(header)
        .or_else(|| bare_filename().captures(header))
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Sanitize filename for safe storage
pub fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() || matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|') {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.').trim();
    if trimmed.is_empty() {
        "download".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Convert bytes to human readable format
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Deserialize a timestamp leniently: RFC 3339 or `YYYY-MM-DD HH:MM:SS`,
/// anything else becomes `None` instead of failing the whole record.
pub fn lenient_datetime<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| parse_timestamp(&s)))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Deserialize an id sent either as a JSON number or a numeric string
pub fn flexible_id<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    let raw: Option<RawId> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawId::Number(n)) => Some(n),
        Some(RawId::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "http://127.0.0.1:8000";

    #[test]
    fn test_storage_url_variants() {
        assert_eq!(resolve_storage_url("", ORIGIN), None);
        assert_eq!(
            resolve_storage_url("https://cdn.example.com/a.png", ORIGIN).as_deref(),
            Some("https://cdn.example.com/a.png")
        );
        assert_eq!(
            resolve_storage_url("/storage/ormawa/a.png", ORIGIN).as_deref(),
            Some("http://127.0.0.1:8000/storage/ormawa/a.png")
        );
        assert_eq!(
            resolve_storage_url("ormawa/a.png", ORIGIN).as_deref(),
            Some("http://127.0.0.1:8000/storage/ormawa/a.png")
        );
        assert_eq!(
            resolve_storage_url("public/posters/b.jpg", "http://127.0.0.1:8000/").as_deref(),
            Some("http://127.0.0.1:8000/storage/posters/b.jpg")
        );
    }

    #[test]
    fn test_content_disposition_quoted() {
        let header = r#"attachment; filename="cv_budi.pdf""#;
        assert_eq!(filename_from_content_disposition(header).as_deref(), Some("cv_budi.pdf"));
    }

    #[test]
    fn test_content_disposition_prefers_encoded_name() {
        let header = r#"attachment; filename="cv.pdf"; filename*=UTF-8''CV%20Siti%20Aminah.pdf"#;
        assert_eq!(
            filename_from_content_disposition(header).as_deref(),
            Some("CV Siti Aminah.pdf")
        );
    }

    #[test]
    fn test_content_disposition_bare_and_missing() {
        assert_eq!(
            filename_from_content_disposition("attachment; filename=cv_andi.pdf").as_deref(),
            Some("cv_andi.pdf")
        );
        assert_eq!(filename_from_content_disposition("inline"), None);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("cv_budi.pdf"), "cv_budi.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_filename("..."), "download");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1048576), "1.0 MB");
        assert_eq!(format_bytes(500), "500 B");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 8), "hello...");
    }

    #[test]
    fn test_parse_timestamp() {
        assert!(parse_timestamp("2025-01-10T08:30:00.000000Z").is_some());
        assert!(parse_timestamp("2025-01-10 08:30:00").is_some());
        assert!(parse_timestamp("kemarin").is_none());
    }
}
