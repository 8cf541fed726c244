//! Bot configuration.
//!
//! Sources in order of precedence (later sources override earlier):
//! 1. Built-in defaults
//! 2. Optional `keystock.toml` in the working directory, or the file passed
//!    with `--config`
//! 3. Process environment (`DISCORD_TOKEN`, `ADMIN_ROLE_ID`, ...)

use crate::RoleIds;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use derive_getters::Getters;
use keystock_error::{ConfigError, KeystockError, KeystockResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

fn default_port() -> u16 {
    8000
}

fn default_stock_path() -> PathBuf {
    PathBuf::from("stock.json")
}

fn default_legacy_stock_path() -> Option<PathBuf> {
    Some(PathBuf::from("stock.txt"))
}

fn default_command_prefix() -> String {
    "!".to_string()
}

fn default_delivery_timeout_secs() -> u64 {
    30
}

/// Runtime configuration for the bot process.
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct BotConfig {
    /// Discord bot token.
    discord_token: String,
    /// Role id allowed to upload stock and shut the bot down.
    admin_role_id: u64,
    /// Role id allowed to draw keys.
    client_role_id: u64,
    /// Channel receiving HWID bind requests.
    admin_channel_id: u64,
    /// Port for the liveness endpoint.
    #[serde(default = "default_port")]
    port: u16,
    /// JSON stock file.
    #[serde(default = "default_stock_path")]
    stock_path: PathBuf,
    /// Legacy line-oriented stock file imported when `stock_path` is absent.
    #[serde(default = "default_legacy_stock_path")]
    legacy_stock_path: Option<PathBuf>,
    /// Prefix that marks a message as a command.
    #[serde(default = "default_command_prefix")]
    command_prefix: String,
    /// Seconds `gen` waits on its private message while holding the stock.
    #[serde(default = "default_delivery_timeout_secs")]
    delivery_timeout_secs: u64,
}

impl BotConfig {
    /// Load configuration from an optional TOML file and the environment.
    ///
    /// When `path` is given the file must exist; otherwise `keystock.toml`
    /// is read if present.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a source cannot be read, a required key
    /// is missing, or a value is invalid.
    #[instrument(skip_all, fields(path = ?path))]
    pub fn load(path: Option<&Path>) -> KeystockResult<Self> {
        debug!("Loading configuration");

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("keystock").required(false),
        };

        Self::from_builder(
            Config::builder()
                .add_source(file)
                .add_source(Environment::default().try_parsing(true)),
        )
    }

    /// Parse configuration from TOML text alone.
    pub fn from_toml_str(contents: &str) -> KeystockResult<Self> {
        let file = File::from_str(contents, FileFormat::Toml);
        Self::from_builder(Config::builder().add_source(file))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> KeystockResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                KeystockError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                KeystockError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> KeystockResult<()> {
        if self.discord_token.trim().is_empty() {
            return Err(ConfigError::new("discord_token must not be empty").into());
        }
        for (name, id) in [
            ("admin_role_id", self.admin_role_id),
            ("client_role_id", self.client_role_id),
            ("admin_channel_id", self.admin_channel_id),
        ] {
            if id == 0 {
                return Err(ConfigError::new(format!("{name} must be a non-zero id")).into());
            }
        }
        if self.command_prefix.is_empty() {
            return Err(ConfigError::new("command_prefix must not be empty").into());
        }
        if self.delivery_timeout_secs == 0 {
            return Err(ConfigError::new("delivery_timeout_secs must be positive").into());
        }
        Ok(())
    }

    /// Role ids used for authorization.
    pub fn role_ids(&self) -> RoleIds {
        RoleIds {
            issuer: self.admin_role_id,
            consumer: self.client_role_id,
        }
    }

    /// Upper bound on a `gen` private message.
    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_secs(self.delivery_timeout_secs)
    }

    /// Legacy stock file to import, unless disabled with an empty path.
    pub fn legacy_import_path(&self) -> Option<&Path> {
        self.legacy_stock_path
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }
}
