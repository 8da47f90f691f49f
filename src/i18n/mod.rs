//! Internationalization module
//!
//! This module renders user-facing messages in Indonesian (default) and
//! English, including the consistent text for each failure kind.

pub mod loader;

// Re-export commonly used i18n components
pub use loader::{params, I18n, LanguageStats, TranslationParams, TranslationStats};
