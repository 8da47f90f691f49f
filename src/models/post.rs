//! Recruitment post model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Attachment, FormBody};
use crate::utils::errors::{SiormaError, Result};
use crate::utils::helpers::{flexible_id, lenient_datetime, resolve_storage_url};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl FromStr for PostStatus {
    type Err = SiormaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(SiormaError::InvalidInput(format!("unknown post status: {}", other))),
        }
    }
}

impl From<Option<String>> for PostStatus {
    fn from(value: Option<String>) -> Self {
        value.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl From<PostStatus> for String {
    fn from(value: PostStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, rename = "postID", deserialize_with = "flexible_id", skip_serializing_if = "Option::is_none")]
    pub post_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default, rename = "ormawaID", deserialize_with = "flexible_id")]
    pub ormawa_id: Option<i64>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default, rename = "posterPath", skip_serializing_if = "Option::is_none")]
    pub poster_path_camel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Primary key, whichever name the backend used for it
    pub fn key(&self) -> Option<i64> {
        self.post_id.or(self.id)
    }

    /// Absolute poster URL: the server-built URL first, then any stored path
    pub fn poster_url(&self, origin: &str) -> Option<String> {
        if let Some(url) = self.poster_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Some(url.to_string());
        }

        [
            &self.poster_path_camel,
            &self.poster_path,
            &self.poster,
            &self.image_path,
            &self.image,
        ]
        .into_iter()
        .flatten()
        .find_map(|path| resolve_storage_url(path, origin))
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    pub fn belongs_to(&self, ormawa_id: i64) -> bool {
        self.ormawa_id == Some(ormawa_id)
    }
}

/// Fields sent when creating or editing a post
#[derive(Debug, Clone)]
pub struct PostForm {
    pub title: String,
    pub description: String,
    pub status: PostStatus,
    pub ormawa_id: Option<i64>,
    pub poster: Option<Attachment>,
}

impl Default for PostForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            status: PostStatus::Draft,
            ormawa_id: None,
            poster: None,
        }
    }
}

impl PostForm {
    pub fn from_existing(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            description: post.description.clone().unwrap_or_default(),
            status: post.status,
            ormawa_id: post.ormawa_id,
            poster: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(SiormaError::InvalidInput("post title is required".to_string()));
        }
        if self.ormawa_id.is_none() {
            return Err(SiormaError::InvalidInput("post must belong to an organization".to_string()));
        }
        Ok(())
    }

    pub fn into_form_body(self) -> FormBody {
        let ormawa_id = self.ormawa_id.map(|id| id.to_string()).unwrap_or_default();
        FormBody::new()
            .text("title", self.title.trim())
            .text("description", self.description)
            .text("status", self.status.as_str())
            .text("ormawaID", ormawa_id)
            .maybe_file("poster", self.poster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ORIGIN: &str = "http://127.0.0.1:8000";

    #[test]
    fn test_post_key_and_status() {
        let post: Post = serde_json::from_value(json!({
            "postID": 31,
            "title": "Open Recruitment Asisten Lab",
            "status": "Published",
            "ormawaID": "4"
        }))
        .unwrap();

        assert_eq!(post.key(), Some(31));
        assert!(post.is_published());
        assert!(post.belongs_to(4));
    }

    #[test]
    fn test_poster_url_fallback_order() {
        let mut post = Post {
            poster_path: Some("posters/a.jpg".to_string()),
            image: Some("/img/b.jpg".to_string()),
            ..Post::default()
        };
        assert_eq!(post.poster_url(ORIGIN).as_deref(), Some("http://127.0.0.1:8000/storage/posters/a.jpg"));

        post.poster_url = Some("https://cdn.example.com/p.jpg".to_string());
        assert_eq!(post.poster_url(ORIGIN).as_deref(), Some("https://cdn.example.com/p.jpg"));

        assert_eq!(Post::default().poster_url(ORIGIN), None);
    }

    #[test]
    fn test_form_body() {
        let form = PostForm {
            title: "Oprec Volley".to_string(),
            status: PostStatus::Published,
            ormawa_id: Some(2),
            ..PostForm::default()
        };
        assert!(form.validate().is_ok());

        let body = form.into_form_body();
        assert_eq!(body.field("ormawaID"), Some("2"));
        assert_eq!(body.field("status"), Some("published"));
    }

    #[test]
    fn test_form_requires_organization() {
        let form = PostForm {
            title: "Oprec".to_string(),
            ..PostForm::default()
        };
        assert!(form.validate().is_err());
    }
}
