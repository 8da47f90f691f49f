//! SIORMA client
//!
//! A typed client for the SIORMA campus organization platform: browsing
//! organizations and recruitment posts, submitting registrations with a CV,
//! and the admin back-office for users, organizations, posts and approvals.
//! All traffic goes through one request wrapper that owns the session token.

pub mod cli;
pub mod client;
pub mod config;
pub mod i18n;
pub mod models;
pub mod search;
pub mod services;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ApiError, FailureKind, SiormaError, Result};

// Re-export main components for easy access
pub use client::ApiClient;
pub use i18n::I18n;
pub use services::ServiceFactory;
pub use session::{SessionContext, SessionEvent};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
