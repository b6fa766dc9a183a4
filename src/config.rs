//! Configuration management for the career advisor

use crate::error::{AdvisorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub api_base: String,
    /// Request timeout; the HTTP client default applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Extra attempts after a failed remote call. Zero disables retrying.
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub show_raw_json: bool,
    /// Indent JSON reports; compact single-line output otherwise.
    pub pretty_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: None,
            max_retries: 2,
            retry_backoff_ms: 1000,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
            show_raw_json: false,
            pretty_json: true,
        }
    }
}

impl Config {
    /// Load the config file, writing defaults there on first run.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| AdvisorError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    /// Overwrite the config file with defaults. The old content is never parsed,
    /// so this also recovers from a broken file.
    pub fn reset(config_path: &Path) -> Result<Self> {
        let config = Self::default();
        config.save_to(config_path)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AdvisorError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("career-advisor")
            .join("config.toml")
    }
}

/// The API credential, resolved once at startup and handed to the client.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    /// Read the key from the process environment, after loading a `.env`
    /// file from the working directory if one exists.
    pub fn from_env() -> Result<Self> {
        // A missing .env file is normal; the variable may come from the shell.
        let _ = dotenvy::dotenv();
        Self::from_value(std::env::var(API_KEY_ENV).ok())
    }

    pub fn from_value(value: Option<String>) -> Result<Self> {
        match value.map(|v| v.trim().to_string()) {
            Some(key) if !key.is_empty() => Ok(Self(key)),
            _ => Err(AdvisorError::Configuration(format!(
                "API key not found! Set {var} in the environment or in a .env file \
                 in the current directory, e.g.\n  {var}=\"Your-Key-Here\"",
                var = API_KEY_ENV
            ))),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_writes_defaults_when_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.llm.model, "gemini-1.5-flash");
        assert_eq!(config.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_round_trip_preserves_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.llm.max_retries = 0;
        config.llm.timeout_secs = Some(30);
        config.output.format = OutputFormat::Markdown;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.llm.max_retries, 0);
        assert_eq!(loaded.llm.timeout_secs, Some(30));
        assert_eq!(loaded.output.format, OutputFormat::Markdown);
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "llm = [not valid").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, AdvisorError::Configuration(_)));
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[llm]\nmodel = \"gemini-1.5-pro\"\n\n[output]\nformat = \"Html\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.llm.model, "gemini-1.5-pro");
        assert_eq!(config.llm.max_retries, 2);
        assert_eq!(config.llm.retry_backoff_ms, 1000);
        assert_eq!(config.output.format, OutputFormat::Html);
        assert!(config.output.color_output);
        assert!(config.output.pretty_json);

        std::fs::write(&path, "").unwrap();
        assert_eq!(Config::load_from(&path).unwrap().llm.api_base, Config::default().llm.api_base);
    }

    #[test]
    fn test_reset_recovers_from_broken_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "llm = [").unwrap();

        Config::reset(&path).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.llm.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_missing_api_key_is_configuration_error() {
        let err = ApiKey::from_value(None).unwrap_err();
        assert!(matches!(err, AdvisorError::Configuration(_)));
        assert!(err.to_string().contains(API_KEY_ENV));

        assert!(ApiKey::from_value(Some("   ".to_string())).is_err());
    }

    #[test]
    fn test_api_key_is_not_leaked_by_debug() {
        let key = ApiKey::from_value(Some("secret-value".to_string())).unwrap();
        assert_eq!(key.expose(), "secret-value");
        assert!(!format!("{:?}", key).contains("secret-value"));
    }
}
