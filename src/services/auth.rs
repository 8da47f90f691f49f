//! Authentication service implementation
//!
//! This service handles login, registration, logout and the session/role
//! guard that protected commands run before doing anything else.

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::{first_string, ApiClient, Payload};
use crate::models::{LoginRequest, RegisterRequest, User};
use crate::utils::errors::{ApiError, Result, SiormaError};

const TOKEN_PATHS: &[&str] = &["data.token", "token", "access_token", "data.access_token"];

/// Access level a command requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// Any logged-in user
    Authenticated,
    /// Users with the admin role
    Admin,
}

/// Result of running the guard
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    Granted(User),
    RedirectLogin,
    RedirectHome,
}

/// Where a freshly logged-in user goes next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    Dashboard,
    Home,
}

impl Landing {
    pub fn for_user(user: &User) -> Self {
        if user.is_admin() {
            Landing::Dashboard
        } else {
            Landing::Home
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub user: User,
    pub landing: Landing,
}

/// Authentication service for managing the session and access control
#[derive(Clone, Debug)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Log in and store the token in the slot picked by `remember`
    pub async fn login(&self, email: &str, password: &str, remember: bool) -> Result<LoginOutcome> {
        let request = LoginRequest::new(email, password)?;
        debug!(email = %request.email, remember = remember, "Logging in");

        let body = self.client.post_credentials("/api/login", &request).await?;
        let token = first_string(&body, TOKEN_PATHS).ok_or_else(|| {
            ApiError::InvalidResponse("login succeeded but the response carried no token".to_string())
        })?;

        let mut user = user_from(&body, &["/data/user", "/user"])?.unwrap_or_default();
        if user.role.trim().is_empty() {
            if let Some(role) = first_string(&body, &["data.role", "role"]) {
                user.role = role;
            }
        }
        if user.email.is_empty() {
            user.email = request.email.clone();
        }

        let session = self.client.session();
        session.set_token(&token, remember)?;
        session.set_user(&user, remember)?;

        let landing = Landing::for_user(&user);
        info!(user_id = ?user.id, landing = ?landing, "User logged in");
        Ok(LoginOutcome { user, landing })
    }

    /// Create an account; a returned token is stored persistently
    pub async fn register(&self, request: RegisterRequest) -> Result<Option<User>> {
        request.validate()?;
        debug!(email = %request.email, "Registering account");

        let body = self.client.post_json("/api/register", &request).await?;
        let user = user_from(&body, &["/data/user", "/user"])?;

        match first_string(&body, TOKEN_PATHS) {
            Some(token) => {
                let session = self.client.session();
                session.set_token(&token, true)?;
                if let Some(user) = &user {
                    session.set_user(user, true)?;
                }
                info!("Account registered and logged in");
            }
            None => warn!("Registration response carried no token"),
        }

        Ok(user)
    }

    /// Best-effort server logout, then forget the local session
    pub async fn logout(&self) -> Result<()> {
        let session = self.client.session();
        if session.is_authenticated()? {
            if let Err(e) = self.client.send(Method::POST, "/api/logout", Payload::Empty).await {
                warn!(error = %e, "Server-side logout failed, clearing local session anyway");
            }
        }
        session.clear()
    }

    /// Fetch the user behind the current token
    pub async fn me(&self) -> Result<User> {
        let body = self.client.get("/api/me").await?;
        let user = user_from(&body, &["/data/user", "/user", "/data", ""])?;
        user.ok_or_else(|| ApiError::InvalidResponse("/api/me returned no user".to_string()).into())
    }

    /// Check the session and role before a protected action
    pub async fn guard(&self, access: Access) -> Result<GuardOutcome> {
        let session = self.client.session();
        if !session.is_authenticated()? {
            debug!(access = ?access, "No token stored, redirecting to login");
            return Ok(GuardOutcome::RedirectLogin);
        }

        let user = match self.me().await {
            Ok(user) => user,
            Err(SiormaError::Api(ApiError::Unauthorized { .. })) => {
                return Ok(GuardOutcome::RedirectLogin);
            }
            Err(e) => return Err(e),
        };

        if access == Access::Admin && !user.is_admin() {
            warn!(user_id = ?user.id, role = %user.role, "Non-admin tried to reach an admin command");
            return Ok(GuardOutcome::RedirectHome);
        }

        session.remember_user(&user)?;
        Ok(GuardOutcome::Granted(user))
    }
}

/// First non-null object at the given JSON pointers, decoded as a user
fn user_from(body: &Value, pointers: &[&str]) -> Result<Option<User>> {
    let found = pointers
        .iter()
        .filter_map(|pointer| body.pointer(pointer))
        .find(|value| value.is_object());

    match found {
        Some(value) => Ok(Some(serde_json::from_value(value.clone()).map_err(|e| {
            ApiError::InvalidResponse(format!("unexpected user shape: {}", e))
        })?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_landing_by_role() {
        let admin = User { role: "Admin".to_string(), ..User::default() };
        assert_eq!(Landing::for_user(&admin), Landing::Dashboard);
        assert_eq!(Landing::for_user(&User::default()), Landing::Home);
    }

    #[test]
    fn test_user_from_pointer_order() {
        let body = json!({
            "success": true,
            "data": { "user": { "id": 3, "name": "Siti", "role": "admin" } },
            "user": { "id": 9, "name": "Other" }
        });
        let user = user_from(&body, &["/data/user", "/user"]).unwrap().unwrap();
        assert_eq!(user.id, Some(3));

        let bare = json!({ "id": 4, "name": "Andi", "email": "andi@example.com" });
        let user = user_from(&bare, &["/data/user", "/user", "/data", ""]).unwrap().unwrap();
        assert_eq!(user.name, "Andi");

        assert!(user_from(&json!({ "data": null }), &["/data"]).unwrap().is_none());
    }
}
