//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable that overrides the API base URL on its own
pub const API_URL_ENV: &str = "SIORMA_API_URL";

/// Base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub i18n: I18nConfig,
    pub logging: LoggingConfig,
}

/// Remote backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub user_agent: String,
}

/// Where the two token slots live on disk
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    pub data_dir: Option<String>,
    pub session_dir: Option<String>,
}

/// Internationalization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct I18nConfig {
    pub default_language: String,
    pub supported_languages: Vec<String>,
    pub translations_dir: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::load(config::File::with_name("siorma").required(false))
    }

    /// Load settings layered over an explicit configuration file
    pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
        Self::load(config::File::with_name(path).required(true))
    }

    fn load(file: config::File<config::FileSourceFile, config::FileFormat>) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("SIORMA")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("i18n.supported_languages")
                    .try_parsing(true),
            )
            .set_override_option("api.base_url", std::env::var(API_URL_ENV).ok())?
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::SiormaError> {
        super::validation::validate_settings(self)
    }
}

impl SessionConfig {
    /// Directory holding the persistent ("remember me") slot
    pub fn data_path(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("siorma"),
        }
    }

    /// Directory holding the session-scoped slot.
    ///
    /// Defaults to the per-user runtime dir, which is cleared at logout.
    /// Without one, a temp dir named after the current user.
    pub fn session_path(&self) -> PathBuf {
        match &self.session_dir {
            Some(dir) => PathBuf::from(dir),
            None => match dirs::runtime_dir() {
                Some(runtime) => runtime.join("siorma"),
                None => std::env::temp_dir().join(format!("siorma-session-{}", current_user_name())),
            },
        }
    }
}

fn current_user_name() -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|name| name.chars().filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')).collect::<String>())
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| "default".to_string())
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                user_agent: format!("siorma-cli/{}", env!("CARGO_PKG_VERSION")),
            },
            session: SessionConfig {
                data_dir: None,
                session_dir: None,
            },
            i18n: I18nConfig {
                default_language: "id".to_string(),
                supported_languages: vec!["id".to_string(), "en".to_string()],
                translations_dir: None,
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
                file_path: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_load_without_file() {
        std::env::remove_var(API_URL_ENV);
        let settings = Settings::new().expect("defaults should load");
        assert_eq!(settings.api.base_url, DEFAULT_API_URL);
        assert_eq!(settings.i18n.default_language, "id");
    }

    #[test]
    #[serial]
    fn test_api_url_env_override() {
        std::env::set_var(API_URL_ENV, "https://siorma.example.ac.id");
        let settings = Settings::new().expect("settings should load");
        std::env::remove_var(API_URL_ENV);

        assert_eq!(settings.api.base_url, "https://siorma.example.ac.id");
    }

    #[test]
    fn test_session_paths() {
        let config = SessionConfig {
            data_dir: Some("/tmp/siorma-data".to_string()),
            session_dir: None,
        };
        assert_eq!(config.data_path(), PathBuf::from("/tmp/siorma-data"));
        assert_ne!(config.session_path(), std::env::temp_dir().join("siorma-session"));
    }

    #[test]
    #[serial]
    fn test_session_fallback_is_per_user() {
        let original = std::env::var("USER").ok();
        std::env::set_var("USER", "budi/../x");
        let name = current_user_name();
        match original {
            Some(user) => std::env::set_var("USER", user),
            None => std::env::remove_var("USER"),
        }

        assert_eq!(name, "budi..x");
        assert!(!name.contains('/'));
    }
}
