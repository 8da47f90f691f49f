//! Translation loader and message rendering
//!
//! Catalogs for every built-in language are compiled into the binary. A
//! translations directory, when configured, can override any key per language.

use std::collections::HashMap;
use std::path::Path;

use serde_json::{Map, Value};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::I18nConfig;
use crate::utils::errors::{ApiError, FailureKind, SiormaError, Result};

const BUILTIN_CATALOGS: &[(&str, &str)] = &[
    ("id", include_str!("../../translations/id.json")),
    ("en", include_str!("../../translations/en.json")),
];

/// Main internationalization manager
#[derive(Debug, Clone)]
pub struct I18n {
    /// Loaded translations by language code
    translations: HashMap<String, Map<String, Value>>,
    default_language: String,
    supported_languages: Vec<String>,
}

/// Translation parameters for message formatting
pub type TranslationParams = HashMap<String, String>;

/// Build a parameter map from `(name, value)` pairs
pub fn params<const N: usize>(pairs: [(&str, String); N]) -> TranslationParams {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

impl I18n {
    /// Create an I18n instance with the built-in catalogs loaded
    pub fn new(config: &I18nConfig) -> Result<Self> {
        let mut translations = HashMap::new();
        for (code, raw) in BUILTIN_CATALOGS {
            match serde_json::from_str::<Value>(raw)? {
                Value::Object(map) => {
                    translations.insert(code.to_string(), map);
                }
                _ => {
                    return Err(SiormaError::Config(format!(
                        "Built-in catalog for {} is not a JSON object",
                        code
                    )))
                }
            }
        }

        if !translations.contains_key(&config.default_language) {
            return Err(SiormaError::Config(format!(
                "No catalog for default language {}",
                config.default_language
            )));
        }

        Ok(Self {
            translations,
            default_language: config.default_language.clone(),
            supported_languages: config.supported_languages.clone(),
        })
    }

    /// Create an instance and apply overrides from the configured directory
    pub async fn from_config(config: &I18nConfig) -> Result<Self> {
        let mut i18n = Self::new(config)?;
        if let Some(dir) = &config.translations_dir {
            i18n.load_overrides(Path::new(dir)).await?;
        }
        Ok(i18n)
    }

    /// Merge `<lang>.json` files from `dir` over the built-in catalogs
    pub async fn load_overrides(&mut self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            warn!("Translations directory not found: {}", dir.display());
            return Ok(());
        }

        let supported_languages = self.supported_languages.clone();
        for lang_code in &supported_languages {
            let file_path = dir.join(format!("{}.json", lang_code));
            if !file_path.exists() {
                debug!("No override file for {}", lang_code);
                continue;
            }

            let content = fs::read_to_string(&file_path).await?;
            let overrides = match serde_json::from_str::<Value>(&content)? {
                Value::Object(map) => map,
                _ => {
                    return Err(SiormaError::Config(format!(
                        "Invalid translation file format: {}",
                        file_path.display()
                    )))
                }
            };

            let catalog = self.translations.entry(lang_code.clone()).or_default();
            merge(catalog, overrides);
            info!("Loaded translation overrides for language: {}", lang_code);
        }

        Ok(())
    }

    /// Get a translated message
    pub fn t(&self, key: &str, lang: &str, params: Option<&TranslationParams>) -> String {
        let effective_lang = self.effective_language(lang);

        let value = self
            .lookup(key, effective_lang)
            .or_else(|| self.lookup(key, &self.default_language));

        match value {
            Some(value) => format_message(&extract_text(value), params),
            None => {
                warn!("Translation key '{}' not found in any language", key);
                key.to_string()
            }
        }
    }

    /// Get a translated message with pluralization support
    pub fn tp(&self, key: &str, lang: &str, count: i64, params: Option<&TranslationParams>) -> String {
        let effective_lang = self.effective_language(lang);
        let plural_key = format!("{}.{}", key, plural_form(count, effective_lang));

        let mut final_params = params.cloned().unwrap_or_default();
        final_params.insert("count".to_string(), count.to_string());

        if self.lookup(&plural_key, effective_lang).is_some() {
            self.t(&plural_key, effective_lang, Some(&final_params))
        } else {
            self.t(key, effective_lang, Some(&final_params))
        }
    }

    /// User-facing text for a failed backend call
    pub fn failure_message(&self, error: &ApiError, lang: &str) -> String {
        if let ApiError::Transport(e) = error {
            if e.is_connect() || e.is_timeout() {
                return self.t("errors.unreachable", lang, None);
            }
        }

        let base = match error.kind() {
            FailureKind::SessionExpired => return self.t("errors.session_expired", lang, None),
            FailureKind::InvalidCredentials => return self.t("errors.invalid_credentials", lang, None),
            FailureKind::AccessDenied => return self.t("errors.access_denied", lang, None),
            FailureKind::Validation => "errors.validation",
            FailureKind::NotFound => "errors.not_found",
            FailureKind::Conflict => "errors.conflict",
            FailureKind::Failed => "errors.failed",
        };

        match error.server_message() {
            Some(detail) => self.t(
                &format!("{}_detail", base),
                lang,
                Some(&params([("detail", detail.to_string())])),
            ),
            None => self.t(base, lang, None),
        }
    }

    /// User-facing text for any crate error
    pub fn error_message(&self, error: &SiormaError, lang: &str) -> String {
        let detail = |text: String| params([("detail", text)]);
        match error {
            SiormaError::Api(api) => self.failure_message(api, lang),
            SiormaError::InvalidInput(text) => self.t("errors.invalid_input", lang, Some(&detail(text.clone()))),
            SiormaError::Config(text) => self.t("errors.config", lang, Some(&detail(text.clone()))),
            other => self.t("errors.local", lang, Some(&detail(other.to_string()))),
        }
    }

    pub fn is_language_supported(&self, lang: &str) -> bool {
        self.supported_languages.iter().any(|l| l == lang)
    }

    fn effective_language<'a>(&'a self, lang: &'a str) -> &'a str {
        if self.is_language_supported(lang) && self.translations.contains_key(lang) {
            lang
        } else {
            &self.default_language
        }
    }

    /// Resolve a dotted key such as `errors.not_found`
    fn lookup(&self, key: &str, lang: &str) -> Option<&Value> {
        let mut keys = key.split('.');
        let mut current = self.translations.get(lang)?.get(keys.next()?)?;
        for k in keys {
            current = current.get(k)?;
        }
        Some(current)
    }

    pub fn supported_languages(&self) -> &[String] {
        &self.supported_languages
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Pick a language from a locale string such as `en_US.UTF-8` or `id-ID`
    pub fn detect_language(&self, locale: Option<&str>) -> String {
        if let Some(locale) = locale {
            let lang_code = locale
                .split(['-', '_', '.'])
                .next()
                .unwrap_or(locale)
                .to_ascii_lowercase();

            if self.is_language_supported(&lang_code) {
                return lang_code;
            }
        }

        self.default_language.clone()
    }

    /// Get translation statistics
    pub fn get_stats(&self) -> TranslationStats {
        let mut stats = TranslationStats {
            languages: Vec::new(),
            total_keys: 0,
        };

        for (lang, translations) in &self.translations {
            let key_count = count_keys(translations);
            stats.languages.push(LanguageStats {
                code: lang.clone(),
                key_count,
            });
            if lang == &self.default_language {
                stats.total_keys = key_count;
            }
        }
        stats.languages.sort_by(|a, b| a.code.cmp(&b.code));

        stats
    }
}

/// Plural category for a count. Indonesian does not inflect for number.
fn plural_form(count: i64, lang: &str) -> &'static str {
    match lang {
        "id" => "other",
        _ => {
            if count == 1 {
                "one"
            } else {
                "other"
            }
        }
    }
}

/// Text of a catalog value; plural objects default to their `other` form
fn extract_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(obj) => match obj.get("other").or_else(|| obj.values().next()) {
            Some(inner) => extract_text(inner),
            None => String::new(),
        },
        _ => value.to_string(),
    }
}

/// Replace `{name}` placeholders with parameter values
fn format_message(template: &str, params: Option<&TranslationParams>) -> String {
    match params {
        Some(params) => params.iter().fold(template.to_string(), |text, (key, value)| {
            text.replace(&format!("{{{}}}", key), value)
        }),
        None => template.to_string(),
    }
}

fn merge(target: &mut Map<String, Value>, overrides: Map<String, Value>) {
    for (key, value) in overrides {
        match (target.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(nested)) => merge(existing, nested),
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

fn count_keys(obj: &Map<String, Value>) -> usize {
    obj.values()
        .map(|value| match value {
            Value::Object(nested) => count_keys(nested),
            _ => 1,
        })
        .sum()
}

/// Translation statistics
#[derive(Debug, Clone)]
pub struct TranslationStats {
    pub languages: Vec<LanguageStats>,
    pub total_keys: usize,
}

/// Language-specific statistics
#[derive(Debug, Clone)]
pub struct LanguageStats {
    pub code: String,
    pub key_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn create_test_config() -> I18nConfig {
        I18nConfig {
            default_language: "id".to_string(),
            supported_languages: vec!["id".to_string(), "en".to_string()],
            translations_dir: None,
        }
    }

    fn i18n() -> I18n {
        I18n::new(&create_test_config()).unwrap()
    }

    #[test]
    fn test_plural_forms() {
        assert_eq!(plural_form(1, "en"), "one");
        assert_eq!(plural_form(3, "en"), "other");
        assert_eq!(plural_form(1, "id"), "other");

        let i18n = i18n();
        assert_eq!(i18n.tp("list.count", "en", 1, None), "1 item");
        assert_eq!(i18n.tp("list.count", "en", 4, None), "4 items");
        assert_eq!(i18n.tp("list.count", "id", 1, None), "1 data");
    }

    #[test]
    fn test_language_detection() {
        let i18n = i18n();
        assert_eq!(i18n.detect_language(Some("en_US.UTF-8")), "en");
        assert_eq!(i18n.detect_language(Some("id-ID")), "id");
        assert_eq!(i18n.detect_language(Some("fr")), "id");
        assert_eq!(i18n.detect_language(None), "id");
    }

    #[test]
    fn test_message_formatting() {
        let i18n = i18n();
        let result = i18n.t("auth.login_success", "en", Some(&params([("name", "Budi".to_string())])));
        assert_eq!(result, "Logged in. Welcome, Budi!");
    }

    #[test]
    fn test_missing_key_falls_back_to_key() {
        assert_eq!(i18n().t("nope.missing", "en", None), "nope.missing");
    }

    #[test]
    fn test_failure_messages() {
        let i18n = i18n();

        let expired = ApiError::Unauthorized { message: Some("Unauthenticated.".to_string()) };
        assert_eq!(i18n.failure_message(&expired, "id"), "Sesi login berakhir. Silakan login ulang.");

        let mut fields = BTreeMap::new();
        fields.insert("nim".to_string(), vec!["NIM wajib diisi.".to_string()]);
        let invalid = ApiError::from_status(422, None, fields);
        assert_eq!(i18n.failure_message(&invalid, "id"), "Validasi gagal: NIM wajib diisi.");

        let missing = ApiError::NotFound { message: None };
        assert_eq!(i18n.failure_message(&missing, "en"), "Data not found.");

        let conflict = ApiError::Conflict { message: Some("Anda sudah terdaftar pada event ini.".to_string()) };
        assert_eq!(
            i18n.failure_message(&conflict, "id"),
            "Data sudah ada: Anda sudah terdaftar pada event ini."
        );
    }

    #[test]
    fn test_error_message_for_local_errors() {
        let err = SiormaError::InvalidInput("email and password are required".to_string());
        assert_eq!(
            i18n().error_message(&err, "en"),
            "Invalid input: email and password are required"
        );
    }

    #[tokio::test]
    async fn test_overrides_merge_over_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("id.json"),
            r#"{ "ormawa": { "created": "Ormawa baru tersimpan." } }"#,
        )
        .unwrap();

        let mut i18n = i18n();
        i18n.load_overrides(dir.path()).await.unwrap();

        assert_eq!(i18n.t("ormawa.created", "id", None), "Ormawa baru tersimpan.");
        assert_eq!(i18n.t("ormawa.deleted", "id", None), "Ormawa berhasil dihapus.");
    }

    #[test]
    fn test_stats_count_builtin_keys() {
        let stats = i18n().get_stats();
        assert_eq!(stats.languages.len(), 2);
        assert!(stats.total_keys > 20);
    }
}
