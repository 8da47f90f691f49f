//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{SiormaError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_api_config(&settings.api)?;
    validate_i18n_config(&settings.i18n)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate remote API configuration
fn validate_api_config(config: &super::ApiConfig) -> Result<()> {
    if config.base_url.trim().is_empty() {
        return Err(SiormaError::Config(
            "API base URL is required".to_string()
        ));
    }

    let url = url::Url::parse(&config.base_url).map_err(|e| {
        SiormaError::Config(format!("Invalid API base URL {}: {}", config.base_url, e))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(SiormaError::Config(
            format!("API base URL must use http or https, got {}", url.scheme())
        ));
    }

    Ok(())
}

/// Validate internationalization configuration
fn validate_i18n_config(config: &super::I18nConfig) -> Result<()> {
    if config.default_language.is_empty() {
        return Err(SiormaError::Config(
            "Default language is required".to_string()
        ));
    }

    if config.supported_languages.is_empty() {
        return Err(SiormaError::Config(
            "At least one supported language is required".to_string()
        ));
    }

    if !config.supported_languages.contains(&config.default_language) {
        return Err(SiormaError::Config(
            "Default language must be in supported languages list".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(SiormaError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(SiormaError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(validate_settings(&Settings::default()).is_ok());
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let mut settings = Settings::default();
        settings.api.base_url = "ftp://127.0.0.1".to_string();
        assert_matches!(validate_settings(&settings), Err(SiormaError::Config(_)));

        settings.api.base_url = "not a url".to_string();
        assert_matches!(validate_settings(&settings), Err(SiormaError::Config(_)));
    }

    #[test]
    fn test_rejects_unsupported_default_language() {
        let mut settings = Settings::default();
        settings.i18n.default_language = "ru".to_string();
        assert_matches!(validate_settings(&settings), Err(SiormaError::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        assert_matches!(validate_settings(&settings), Err(SiormaError::Config(_)));
    }
}
