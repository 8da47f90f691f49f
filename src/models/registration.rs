//! Membership registration model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Attachment, FormBody};
use crate::models::user::User;
use crate::utils::errors::{SiormaError, Result};
use crate::utils::helpers::{flexible_id, lenient_datetime};

/// Minimum length of a non-empty motivation text
pub const MIN_REASON_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum RegistrationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for RegistrationStatus {
    type Err = SiormaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(RegistrationStatus::Pending),
            "approved" => Ok(RegistrationStatus::Approved),
            "rejected" => Ok(RegistrationStatus::Rejected),
            other => Err(SiormaError::InvalidInput(format!("unknown registration status: {}", other))),
        }
    }
}

impl From<Option<String>> for RegistrationStatus {
    fn from(value: Option<String>) -> Self {
        value.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl From<RegistrationStatus> for String {
    fn from(value: RegistrationStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "flexible_id")]
    pub post_id: Option<i64>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub nim: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub status: RegistrationStatus,
    #[serde(default)]
    pub cv_path: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Application submitted for a post
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistrationRequest {
    pub full_name: String,
    pub nim: String,
    pub email: String,
    pub phone: String,
    pub organization: Option<String>,
    pub reason: Option<String>,
    #[serde(skip)]
    pub cv: Option<Attachment>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl RegistrationRequest {
    /// Empty form with name and email taken from the signed-in account
    pub fn prefilled(user: &User) -> Self {
        Self {
            full_name: user.name.clone(),
            email: user.email.clone(),
            ..Self::default()
        }
    }

    /// Trim every field and turn blank optional fields into `None`
    pub fn normalized(self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            nim: self.nim.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            organization: non_empty(self.organization),
            reason: non_empty(self.reason),
            cv: self.cv,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("full_name", &self.full_name),
            ("nim", &self.nim),
            ("email", &self.email),
            ("phone", &self.phone),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(SiormaError::InvalidInput(format!(
                "required fields missing: {}",
                missing.join(", ")
            )));
        }

        if let Some(reason) = &self.reason {
            let length = reason.trim().chars().count();
            if length > 0 && length < MIN_REASON_CHARS {
                return Err(SiormaError::InvalidInput(format!(
                    "reason must be empty or at least {} characters",
                    MIN_REASON_CHARS
                )));
            }
        }

        Ok(())
    }

    /// Multipart variant used when a CV is attached
    pub fn into_form_body(self) -> FormBody {
        let mut form = FormBody::new()
            .text("full_name", self.full_name)
            .text("nim", self.nim)
            .text("email", self.email)
            .text("phone", self.phone);
        if let Some(organization) = self.organization {
            form = form.text("organization", organization);
        }
        if let Some(reason) = self.reason {
            form = form.text("reason", reason);
        }
        form.maybe_file("cv", self.cv)
    }
}

/// Registration counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrationStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl RegistrationStats {
    pub fn from_registrations<'a>(registrations: impl IntoIterator<Item = &'a Registration>) -> Self {
        registrations
            .into_iter()
            .fold(Self::default(), |mut stats, registration| {
                stats.total += 1;
                match registration.status {
                    RegistrationStatus::Pending => stats.pending += 1,
                    RegistrationStatus::Approved => stats.approved += 1,
                    RegistrationStatus::Rejected => stats.rejected += 1,
                }
                stats
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> RegistrationRequest {
        RegistrationRequest {
            full_name: " Budi Santoso ".to_string(),
            nim: "1301210001".to_string(),
            email: "budi@student.telkomuniversity.ac.id".to_string(),
            phone: "081234567890".to_string(),
            organization: Some("  ".to_string()),
            reason: None,
            cv: None,
        }
    }

    #[test]
    fn test_normalized_blank_optionals_become_null() {
        let normalized = request().normalized();
        assert_eq!(normalized.full_name, "Budi Santoso");
        assert_eq!(normalized.organization, None);

        let body = serde_json::to_value(&normalized).unwrap();
        assert_eq!(body["organization"], json!(null));
        assert_eq!(body["reason"], json!(null));
        assert!(body.get("cv").is_none());
    }

    #[test]
    fn test_prefilled_from_account() {
        let user: User = serde_json::from_value(json!({
            "id": "7",
            "fullname": "Budi Santoso",
            "email": "budi@student.telkomuniversity.ac.id",
            "role": "user"
        }))
        .unwrap();

        let form = RegistrationRequest::prefilled(&user);
        assert_eq!(form.full_name, "Budi Santoso");
        assert_eq!(form.email, "budi@student.telkomuniversity.ac.id");
        assert!(form.nim.is_empty());
        assert!(form.cv.is_none());
    }

    #[test]
    fn test_reason_length_rule() {
        let mut req = request();
        req.reason = Some("mau ikut".to_string());
        assert!(req.validate().is_err());

        req.reason = Some("Saya ingin belajar robotika bersama tim.".to_string());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_missing_required_fields_are_named() {
        let mut req = request();
        req.nim = String::new();
        req.phone = " ".to_string();

        let err = req.validate().unwrap_err().to_string();
        assert!(err.contains("nim"));
        assert!(err.contains("phone"));
    }

    #[test]
    fn test_stats() {
        let registrations: Vec<Registration> = ["pending", "approved", "approved", "rejected", "PENDING"]
            .iter()
            .map(|s| serde_json::from_value(json!({ "status": s })).unwrap())
            .collect();

        let stats = RegistrationStats::from_registrations(&registrations);
        assert_eq!(stats, RegistrationStats { total: 5, pending: 2, approved: 2, rejected: 1 });
    }
}
