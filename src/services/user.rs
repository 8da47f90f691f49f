//! User administration service
//!
//! Back-office management of accounts and the roles they can be given.

use serde_json::Value;
use tracing::{debug, info};

use crate::client::{extract_data, ApiClient};
use crate::models::{NewUser, User, UserDirectory, UserUpdate};
use crate::utils::errors::{ApiError, Result};
use crate::utils::logging::log_admin_action;

/// User service for managing accounts
#[derive(Clone, Debug)]
pub struct UserService {
    client: ApiClient,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Users plus assignable roles
    pub async fn list(&self) -> Result<UserDirectory> {
        let body = self.client.get("/api/admin/users").await?;
        let data = extract_data(&body, None);

        let array = |key: &str| -> Vec<Value> {
            data.get(key)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default()
        };

        let users = array("users")
            .into_iter()
            .map(serde_json::from_value::<User>)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ApiError::InvalidResponse(format!("unexpected user shape: {}", e)))?;
        let roles = array("roles");

        debug!(users = users.len(), roles = roles.len(), "Fetched user directory");
        Ok(UserDirectory { users, roles })
    }

    pub async fn create(&self, user: NewUser) -> Result<()> {
        self.client.post_json("/api/admin/users", &user).await?;
        log_admin_action("create_user", &user.email, None);
        info!(email = %user.email, role = %user.role, "User created");
        Ok(())
    }

    pub async fn update(&self, id: i64, update: UserUpdate) -> Result<()> {
        self.client
            .put_json(&format!("/api/admin/users/{}", id), &update)
            .await?;
        log_admin_action("update_user", &update.email, Some(id));
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("/api/admin/users/{}", id)).await?;
        log_admin_action("delete_user", "user", Some(id));
        Ok(())
    }
}
