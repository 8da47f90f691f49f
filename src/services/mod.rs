//! Services module
//!
//! Typed operations over the SIORMA backend. Every service shares one
//! [`ApiClient`], and through it one session.

pub mod auth;
pub mod ormawa;
pub mod posts;
pub mod registrations;
pub mod user;

// Re-export commonly used services
pub use auth::{Access, AuthService, GuardOutcome, Landing, LoginOutcome};
pub use ormawa::OrmawaService;
pub use posts::{HomeFeed, OrmawaProfile, PostService};
pub use registrations::RegistrationService;
pub use user::UserService;

use tracing::debug;

use crate::client::ApiClient;

/// Service factory for creating and managing all services
#[derive(Clone, Debug)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub ormawa_service: OrmawaService,
    pub post_service: PostService,
    pub registration_service: RegistrationService,
    pub user_service: UserService,
    client: ApiClient,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services sharing `client`
    pub fn new(client: ApiClient) -> Self {
        Self {
            auth_service: AuthService::new(client.clone()),
            ormawa_service: OrmawaService::new(client.clone()),
            post_service: PostService::new(client.clone()),
            registration_service: RegistrationService::new(client.clone()),
            user_service: UserService::new(client.clone()),
            client,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Probe the backend with the public organization listing
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let backend_error = match self.ormawa_service.list().await {
            Ok(_) => None,
            Err(e) => {
                debug!(error = %e, "Health probe failed");
                Some(e.to_string())
            }
        };
        let session = self.client.session();

        ServiceHealthStatus {
            base_url: self.client.base_url().to_string(),
            backend_error,
            authenticated: session.is_authenticated().unwrap_or(false),
            session_store: format!("{:?}", session),
        }
    }
}

/// Health status of the backend connection and local session
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub base_url: String,
    pub backend_error: Option<String>,
    pub authenticated: bool,
    pub session_store: String,
}

impl ServiceHealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.backend_error.is_none()
    }

    /// Get list of problems found
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if let Some(error) = &self.backend_error {
            issues.push(format!("Backend unreachable at {}: {}", self.base_url, error));
        }
        if !self.authenticated {
            issues.push("Not logged in".to_string());
        }

        issues
    }
}
