//! CLI execution context.

use std::path::PathBuf;

use anyhow::{anyhow, Context as _, Result};
use fruitpack_auth::FileTokenStore;
use fruitpack_commerce::{Currency, DriverId};
use fruitpack_data::{FetchClient, FruitPackApi, RetryPolicy, TimeoutConfig};

use crate::config::{CliConfig, API_URL_ENV};
use crate::output::Output;

/// The API client the commands talk to.
pub type Api = FruitPackApi<FileTokenStore>;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(PathBuf::from(path)),
            None => CliConfig::find(&cwd),
        };
        let config = match &config_path {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        }
        .with_env_overrides(std::env::var(API_URL_ENV).ok());

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Build the backend client from the `[api]` and `[auth]` sections.
    pub fn api(&self) -> Result<Api> {
        let api = &self.config.api;
        let client = FetchClient::new(TimeoutConfig::from_millis(api.timeout_ms))
            .context("Failed to create HTTP client")?
            .with_base_url(api.base_url.as_str())
            .with_default_header("Accept", "application/json")
            .with_retry(RetryPolicy::new(api.max_retries));

        self.output.debug(&format!("API: {}", api.base_url));
        Ok(FruitPackApi::new(client, self.token_store()?))
    }

    pub fn token_store(&self) -> Result<FileTokenStore> {
        let path = match &self.config.auth.token_path {
            Some(path) => self.resolve_path(path),
            None => FileTokenStore::default_path()
                .ok_or_else(|| anyhow!("Cannot locate home directory; set auth.token_path"))?,
        };
        Ok(FileTokenStore::new(path))
    }

    /// The configured driver id.
    pub fn driver_id(&self) -> Result<DriverId> {
        self.config
            .driver
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(DriverId::from)
            .ok_or_else(|| anyhow!("No driver id configured; set [driver] id in fruitpack.toml"))
    }

    pub fn currency(&self) -> Currency {
        self.config.checkout.currency
    }

    /// Where the driver's last status is remembered, beside the token.
    pub fn driver_state_path(&self) -> Result<PathBuf> {
        let store = self.token_store()?;
        Ok(store.path().with_file_name("driver.json"))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &std::path::Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}
