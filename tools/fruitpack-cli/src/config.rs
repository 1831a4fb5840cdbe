//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fruitpack_commerce::checkout::DEFAULT_RETURN_URL;
use fruitpack_commerce::Currency;
use fruitpack_observability::LoggingConfig;
use serde::{Deserialize, Serialize};

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["fruitpack.toml", ".fruitpack.toml", "fruitpack.json"];

/// Overrides `api.base_url`.
pub const API_URL_ENV: &str = "FRUITPACK_API_URL";

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub checkout: CheckoutConfig,

    #[serde(default)]
    pub driver: DriverConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Search `start` and its parents for a config file.
    pub fn find(start: &Path) -> Option<PathBuf> {
        start.ancestors().find_map(|dir| {
            CONFIG_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|path| path.is_file())
        })
    }

    /// Apply environment overrides.
    pub fn with_env_overrides(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        self
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "json")
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-attempt timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries for idempotent requests.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_retries() -> u32 {
    2
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Where the access token is kept (default: `~/.fruitpack/token.json`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default)]
    pub currency: Currency,

    /// Return URL handed to the payment sheet.
    #[serde(default = "default_return_url")]
    pub return_url: String,
}

fn default_return_url() -> String {
    DEFAULT_RETURN_URL.to_string()
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            return_url: default_return_url(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Driver id used by `fruitpack driver` commands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Generate a default fruitpack.toml.
pub fn generate_default_config() -> String {
    format!(
        r#"# Fruit-Pack CLI configuration

[api]
base_url = "{base_url}"
timeout_ms = {timeout_ms}
max_retries = {max_retries}

[auth]
# token_path = "~/.fruitpack/token.json"

[checkout]
currency = "ZAR"
return_url = "{return_url}"

[driver]
# id = "4"

[logging]
level = "warn"
format = "human"
"#,
        base_url = default_base_url(),
        timeout_ms = default_timeout_ms(),
        max_retries = default_max_retries(),
        return_url = DEFAULT_RETURN_URL,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fruitpack_observability::{LogFormat, LogLevel};

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config: CliConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://api.fruitpack.test"

            [driver]
            id = "4"

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://api.fruitpack.test");
        assert_eq!(config.api.max_retries, 2);
        assert_eq!(config.driver.id.as_deref(), Some("4"));
        assert_eq!(config.checkout.currency, Currency::ZAR);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_env_override() {
        let config = CliConfig::default().with_env_overrides(Some(" http://10.0.2.2:8000 ".into()));
        assert_eq!(config.api.base_url, "http://10.0.2.2:8000");

        let config = CliConfig::default().with_env_overrides(Some(String::new()));
        assert_eq!(config.api.base_url, default_base_url());
    }

    #[test]
    fn test_find_in_parent_and_save_json() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(CliConfig::find(&nested), None);

        let path = root.path().join("fruitpack.json");
        let mut config = CliConfig::default();
        config.driver.id = Some("9".into());
        config.save(&path).unwrap();

        assert_eq!(CliConfig::find(&nested), Some(path.clone()));
        assert_eq!(CliConfig::load(&path).unwrap(), config);
    }
}
