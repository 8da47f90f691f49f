//! User and authentication models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::errors::{SiormaError, Result};
use crate::utils::helpers::{flexible_id, lenient_datetime};

pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<i64>,
    #[serde(default, alias = "fullname")]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.trim().eq_ignore_ascii_case(ROLE_ADMIN)
    }

    /// Name to greet the user with
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            self.username.as_deref().unwrap_or("Pengguna")
        } else {
            &self.name
        }
    }
}

/// Users plus the roles the backend allows assigning
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    pub users: Vec<User>,
    pub roles: Vec<Value>,
}

impl UserDirectory {
    /// Role names, whether the backend sent plain strings or `{ "name": .. }` objects
    pub fn role_names(&self) -> Vec<String> {
        self.roles
            .iter()
            .filter_map(|role| match role {
                Value::String(name) => Some(name.clone()),
                Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(str::to_string),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Result<Self> {
        let email = email.trim();
        if email.is_empty() || password.trim().is_empty() {
            return Err(SiormaError::InvalidInput(
                "email and password are required".to_string(),
            ));
        }
        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty() {
            return Err(SiormaError::InvalidInput(
                "name, email and password are required".to_string(),
            ));
        }
        if self.password != self.password_confirmation {
            return Err(SiormaError::InvalidInput(
                "password confirmation does not match".to_string(),
            ));
        }
        Ok(())
    }
}

/// Account created from the admin back-office
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: String,
    pub password: String,
    pub password_confirmation: String,
}

impl NewUser {
    pub fn new(name: &str, email: &str, role: &str, password: &str, confirmation: Option<&str>) -> Result<Self> {
        if name.trim().is_empty() || email.trim().is_empty() || role.trim().is_empty() {
            return Err(SiormaError::InvalidInput(
                "name, email and role are required".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(SiormaError::InvalidInput("password is required".to_string()));
        }
        Ok(Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            role: role.trim().to_string(),
            password: password.to_string(),
            password_confirmation: confirmation.unwrap_or(password).to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub role: String,
}
