//! Student organization (ormawa) model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Attachment, FormBody};
use crate::utils::errors::{SiormaError, Result};
use crate::utils::helpers::{flexible_id, lenient_datetime, resolve_storage_url};

/// Whether an organization is currently recruiting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum RecruitmentStatus {
    #[default]
    Open,
    Closed,
}

impl RecruitmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecruitmentStatus::Open => "BUKA",
            RecruitmentStatus::Closed => "TUTUP",
        }
    }
}

impl FromStr for RecruitmentStatus {
    type Err = SiormaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUKA" | "OPEN" => Ok(RecruitmentStatus::Open),
            "TUTUP" | "CLOSED" => Ok(RecruitmentStatus::Closed),
            other => Err(SiormaError::InvalidInput(format!("unknown recruitment status: {}", other))),
        }
    }
}

impl From<Option<String>> for RecruitmentStatus {
    fn from(value: Option<String>) -> Self {
        value.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl From<RecruitmentStatus> for String {
    fn from(value: RecruitmentStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RecruitmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ormawa {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<i64>,
    #[serde(default, rename = "ormawaID", deserialize_with = "flexible_id", skip_serializing_if = "Option::is_none")]
    pub ormawa_id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub type_ormawa: Option<String>,
    #[serde(default)]
    pub category_ormawa: Option<String>,
    #[serde(default)]
    pub status_oprec: RecruitmentStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub photo_path: Option<String>,
    #[serde(default, rename = "photoPath", skip_serializing_if = "Option::is_none")]
    pub photo_path_alt: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Ormawa {
    /// Primary key, whichever name the backend used for it
    pub fn key(&self) -> Option<i64> {
        self.id.or(self.ormawa_id)
    }

    pub fn photo_url(&self, origin: &str) -> Option<String> {
        [&self.photo_path, &self.photo_path_alt]
            .into_iter()
            .flatten()
            .find_map(|path| resolve_storage_url(path, origin))
    }
}

/// Fields sent when creating or editing an organization
#[derive(Debug, Clone)]
pub struct OrmawaForm {
    pub name: String,
    pub type_ormawa: String,
    pub category_ormawa: String,
    pub status_oprec: RecruitmentStatus,
    pub description: String,
    pub photo: Option<Attachment>,
}

impl Default for OrmawaForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            type_ormawa: "Organisasi".to_string(),
            category_ormawa: "Teknologi".to_string(),
            status_oprec: RecruitmentStatus::Open,
            description: String::new(),
            photo: None,
        }
    }
}

impl OrmawaForm {
    /// Pre-fill the form from an existing record, as the edit dialog does
    pub fn from_existing(ormawa: &Ormawa) -> Self {
        let defaults = Self::default();
        Self {
            name: ormawa.name.clone(),
            type_ormawa: ormawa.type_ormawa.clone().unwrap_or(defaults.type_ormawa),
            category_ormawa: ormawa.category_ormawa.clone().unwrap_or(defaults.category_ormawa),
            status_oprec: ormawa.status_oprec,
            description: ormawa.description.clone().unwrap_or_default(),
            photo: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SiormaError::InvalidInput("organization name is required".to_string()));
        }
        Ok(())
    }

    pub fn into_form_body(self) -> FormBody {
        FormBody::new()
            .text("name", self.name.trim())
            .text("type_ormawa", self.type_ormawa)
            .text("category_ormawa", self.category_ormawa)
            .text("status_oprec", self.status_oprec.as_str())
            .text("description", self.description)
            .maybe_file("photo", self.photo)
    }
}
