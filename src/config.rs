//! Configuration file parser for ~/.config/newsdeck/config.toml.
//!
//! The config file is optional. A missing file yields `Config::default()`.
//! Unknown keys are ignored by serde, though we log a warning when the file
//! contains potential typos.
//!
//! API keys may also come from the environment (`NEWS_API_KEYS` or
//! `NEWS_API_KEY_1`..`NEWS_API_KEY_9`), which takes precedence over the file.
use crate::api::{ClientSettings, DEFAULT_BASE_URL, DEFAULT_COUNTRY};
use crate::news::Category;
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Comma-separated list of keys.
pub const KEYS_ENV_VAR: &str = "NEWS_API_KEYS";

/// Prefix for numbered keys, `NEWS_API_KEY_1` through `NEWS_API_KEY_9`.
pub const NUMBERED_KEY_PREFIX: &str = "NEWS_API_KEY_";

const MAX_NUMBERED_KEYS: usize = 9;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds the size cap.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// Country code for category headlines.
    pub country: String,

    /// Category loaded at startup.
    pub default_category: Category,

    /// API root. Plain HTTP is only accepted for localhost.
    pub base_url: String,

    /// Per-attempt request timeout.
    pub request_timeout_secs: u64,

    /// API keys, tried in order. Environment variables take precedence.
    pub api_keys: Vec<String>,

    /// Custom keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            default_category: Category::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 20,
            api_keys: Vec::new(),
            keybindings: HashMap::new(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let masked: Vec<&str> = self.api_keys.iter().map(|_| "[REDACTED]").collect();
        f.debug_struct("Config")
            .field("theme", &self.theme)
            .field("country", &self.country)
            .field("default_category", &self.default_category)
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("api_keys", &masked)
            .field("keybindings", &self.keybindings)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 7] = [
        "theme",
        "country",
        "default_category",
        "base_url",
        "request_timeout_secs",
        "api_keys",
        "keybindings",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML or unknown category → `Err(ConfigError::Parse)`
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            theme = %config.theme,
            country = %config.country,
            file_keys = config.api_keys.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Merge API keys from the environment and the config file.
    ///
    /// `NEWS_API_KEYS` wins over numbered variables, and any environment key
    /// wins over `api_keys` in the file. Blank entries are dropped.
    pub fn resolve_api_keys<F>(&self, env: F) -> Vec<SecretString>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_list: Vec<String> = env(KEYS_ENV_VAR)
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if !from_list.is_empty() {
            tracing::debug!(count = from_list.len(), source = KEYS_ENV_VAR, "Using API keys from environment");
            return into_secrets(from_list);
        }

        let numbered: Vec<String> = (1..=MAX_NUMBERED_KEYS)
            .filter_map(|n| env(&format!("{}{}", NUMBERED_KEY_PREFIX, n)))
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        if !numbered.is_empty() {
            tracing::debug!(count = numbered.len(), "Using numbered API keys from environment");
            return into_secrets(numbered);
        }

        into_secrets(
            self.api_keys
                .iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
        )
    }

    /// Client settings derived from this config.
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            country: self.country.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        }
    }
}

fn into_secrets(keys: Vec<String>) -> Vec<SecretString> {
    keys.into_iter().map(SecretString::from).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn write_config(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("newsdeck_config_test_{}", name));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    fn exposed(keys: &[SecretString]) -> Vec<&str> {
        keys.iter().map(|k| k.expose_secret()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.country, "us");
        assert_eq!(config.default_category, Category::General);
        assert_eq!(config.base_url, "https://newsapi.org/v2");
        assert_eq!(config.request_timeout_secs, 20);
        assert!(config.api_keys.is_empty());
        assert!(config.keybindings.is_empty());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/newsdeck_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let path = write_config("whitespace", "   \n  \n  ");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.country, "us");
        cleanup(&path);
    }

    #[test]
    fn test_full_config() {
        let content = r#"
theme = "light"
country = "gb"
default_category = "Technology"
base_url = "http://localhost:8080/v2"
request_timeout_secs = 5
api_keys = ["first", "second"]

[keybindings]
quit = "Ctrl+q"
refresh = "F5"
"#;
        let path = write_config("full", content);
        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "light");
        assert_eq!(config.country, "gb");
        assert_eq!(config.default_category, Category::Technology);
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.api_keys, vec!["first", "second"]);
        assert_eq!(
            config.keybindings.get("refresh").map(String::as_str),
            Some("F5")
        );

        let settings = config.client_settings();
        assert_eq!(settings.base_url, "http://localhost:8080/v2");
        assert_eq!(settings.timeout, Duration::from_secs(5));
        cleanup(&path);
    }

    #[test]
    fn test_unknown_category_is_parse_error() {
        let path = write_config("bad_category", "default_category = \"weather\"\n");
        let result = Config::load(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
        cleanup(&path);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let path = write_config("invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        cleanup(&path);
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let path = write_config("unknown", "theme = \"dark\"\nrefresh_interval = 5\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "dark");
        cleanup(&path);
    }

    #[test]
    fn test_too_large_file_rejected() {
        let path = write_config("too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));
        cleanup(&path);
    }

    #[test]
    fn test_debug_masks_api_keys() {
        let config = Config {
            api_keys: vec!["super-secret-key-12345".to_string()],
            ..Config::default()
        };
        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("super-secret-key-12345"));
        assert!(debug_output.contains("[REDACTED]"));
    }

    #[test]
    fn test_file_keys_used_without_env() {
        let config = Config {
            api_keys: vec!["a".into(), "  ".into(), "b".into()],
            ..Config::default()
        };
        let keys = config.resolve_api_keys(no_env);
        assert_eq!(exposed(&keys), vec!["a", "b"]);
    }

    #[test]
    fn test_env_list_takes_precedence() {
        let config = Config {
            api_keys: vec!["file".into()],
            ..Config::default()
        };
        let keys = config.resolve_api_keys(|name| match name {
            "NEWS_API_KEYS" => Some(" one, two ,,three ".to_string()),
            "NEWS_API_KEY_1" => Some("numbered".to_string()),
            _ => None,
        });
        assert_eq!(exposed(&keys), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_numbered_env_keys_in_order() {
        let config = Config {
            api_keys: vec!["file".into()],
            ..Config::default()
        };
        let keys = config.resolve_api_keys(|name| match name {
            "NEWS_API_KEY_2" => Some("second".to_string()),
            "NEWS_API_KEY_1" => Some("first".to_string()),
            "NEWS_API_KEY_5" => Some("".to_string()),
            _ => None,
        });
        assert_eq!(exposed(&keys), vec!["first", "second"]);
    }

    #[test]
    fn test_no_keys_anywhere() {
        let keys = Config::default().resolve_api_keys(no_env);
        assert!(keys.is_empty());
    }

    #[test]
    fn test_zero_timeout_clamped() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.client_settings().timeout, Duration::from_secs(1));
    }
}
