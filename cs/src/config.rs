//! CampusStyle configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::llm::LlmError;

/// Main CampusStyle configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Generative model configuration
    pub llm: LlmConfig,

    /// Shopping lookup configuration
    pub shopping: ShoppingConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that the API key environment variable is set. Call this before
    /// any command that talks to the model so it fails fast with a clear message.
    pub fn validate(&self) -> Result<()> {
        self.llm.get_api_key()?;
        Ok(())
    }

    /// Load configuration with fallback chain
    ///
    /// An explicit path must load. Otherwise the first readable file among
    /// `.campusstyle.yml` and `~/.config/campusstyle/campusstyle.yml` wins,
    /// falling back to defaults.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        match Self::load_first(&default_config_paths()) {
            Some(config) => Ok(config),
            None => {
                tracing::info!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Read just the log level, before logging is set up
    ///
    /// Errors are swallowed here; the full `load` reports them once logging works.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => default_config_paths(),
        };
        Self::load_first(&candidates).and_then(|config| config.log_level)
    }

    /// First candidate that exists and parses; broken files are skipped with a warning
    fn load_first(candidates: &[PathBuf]) -> Option<Self> {
        candidates
            .iter()
            .filter(|path| path.exists())
            .find_map(|path| match Self::load_from_file(path) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                    None
                }
            })
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Project-local config, then the user config
fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".campusstyle.yml")];
    paths.extend(dirs::config_dir().map(|dir| dir.join("campusstyle").join("campusstyle.yml")));
    paths
}

/// Generative model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds; no timeout when unset
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-3-flash-preview".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_ms: None,
        }
    }
}

impl LlmConfig {
    /// Resolve the API key from the configured environment variable
    ///
    /// An empty value counts as missing.
    pub fn get_api_key(&self) -> Result<String, LlmError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(LlmError::MissingApiKey {
                env: self.api_key_env.clone(),
            }),
        }
    }
}

/// Shopping lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoppingConfig {
    /// Search page used for the fallback and "view more" links
    #[serde(rename = "search-url")]
    pub search_url: String,
}

impl Default for ShoppingConfig {
    fn default() -> Self {
        Self {
            search_url: "https://www.google.com/search".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.log_level.is_none());
        assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.shopping.search_url, "https://www.google.com/search");
    }

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::default();

        assert!(config.model.contains("gemini"));
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
        assert!(config.timeout_ms.is_none());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
log-level: DEBUG

llm:
  model: gemini-2.5-pro
  api-key-env: MY_API_KEY
  base-url: https://proxy.example.com
  timeout-ms: 60000

shopping:
  search-url: https://www.bing.com/shop
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.log_level.as_deref(), Some("DEBUG"));
        assert_eq!(config.llm.model, "gemini-2.5-pro");
        assert_eq!(config.llm.api_key_env, "MY_API_KEY");
        assert_eq!(config.llm.timeout_ms, Some(60000));
        assert_eq!(config.shopping.search_url, "https://www.bing.com/shop");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: gemini-2.5-flash
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.llm.model, "gemini-2.5-flash");

        // Defaults for unspecified
        assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.shopping.search_url, "https://www.google.com/search");
    }

    #[test]
    fn test_load_explicit_path_and_log_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campusstyle.yml");
        fs::write(&path, "log-level: WARN\nllm:\n  model: custom-model\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.llm.model, "custom-model");
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("WARN"));
    }

    #[test]
    fn test_load_explicit_path_missing_is_error() {
        let path = PathBuf::from("/nonexistent/campusstyle.yml");
        assert!(Config::load(Some(&path)).is_err());
        assert!(Config::load_log_level(Some(&path)).is_none());
    }

    #[test]
    fn test_load_first_skips_missing_and_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.yml");
        let broken = dir.path().join("broken.yml");
        let good = dir.path().join("good.yml");
        fs::write(&broken, "log-level: [unclosed\n").unwrap();
        fs::write(&good, "log-level: ERROR\n").unwrap();

        let config = Config::load_first(&[missing.clone(), broken.clone(), good]).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("ERROR"));
        assert!(Config::load_first(&[missing, broken]).is_none());
    }

    #[test]
    fn test_default_config_paths_order() {
        let paths = default_config_paths();
        assert_eq!(paths[0], PathBuf::from(".campusstyle.yml"));
        assert!(paths.iter().skip(1).all(|p| p.ends_with("campusstyle/campusstyle.yml")));
    }

    #[test]
    #[serial]
    fn test_validate_fails_fast_without_key() {
        let mut config = Config::default();
        config.llm.api_key_env = "CAMPUSSTYLE_TEST_VALIDATE_KEY".to_string();

        // SAFETY: serialized with the other env-mutating tests
        unsafe { std::env::remove_var("CAMPUSSTYLE_TEST_VALIDATE_KEY") };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("CAMPUSSTYLE_TEST_VALIDATE_KEY"));

        unsafe { std::env::set_var("CAMPUSSTYLE_TEST_VALIDATE_KEY", "   ") };
        assert!(config.validate().is_err());

        unsafe { std::env::set_var("CAMPUSSTYLE_TEST_VALIDATE_KEY", "key") };
        assert!(config.validate().is_ok());
        assert_eq!(config.llm.get_api_key().unwrap(), "key");

        unsafe { std::env::remove_var("CAMPUSSTYLE_TEST_VALIDATE_KEY") };
    }
}
