//! Configuration management module
//!
//! This module handles loading and validation of application configuration
//! from TOML files and environment variables.

pub mod settings;
pub mod validation;

pub use settings::{Settings, ApiConfig, SessionConfig, I18nConfig, LoggingConfig, API_URL_ENV, DEFAULT_API_URL};
