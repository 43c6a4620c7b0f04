//! Application configuration management.
//!
//! Settings are layered with figment:
//! defaults < TOML config file (`--config`) < `DUPESCAN_*` environment
//! variables < CLI flags.
//!
//! ```toml
//! # dupescan.toml
//! separator = "|"
//! follow_symlinks = false
//! skip_unreadable = true
//! indent = 2
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::inventory::InventoryConfig;
use crate::output::json::DEFAULT_INDENT;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "DUPESCAN_";

/// Errors raised while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// A provider produced invalid values.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Character separating directories in the ROOTS argument.
    pub separator: char,
    /// Follow symbolic links during traversal.
    pub follow_symlinks: bool,
    /// Skip unreadable files instead of aborting.
    pub skip_unreadable: bool,
    /// Report indentation width in spaces.
    pub indent: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            separator: ';',
            follow_symlinks: false,
            skip_unreadable: false,
            indent: DEFAULT_INDENT,
        }
    }
}

impl Config {
    /// Build the layered figment without CLI overrides.
    #[must_use]
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load configuration from defaults, the optional file and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `config_file` is given but
    /// missing, and [`ConfigError::Invalid`] for malformed values.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_file {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            log::debug!("Loading config from {}", path.display());
        }
        Self::figment(config_file)
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// Apply CLI flags on top of loaded settings. Flags only ever enable.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if cli.skip_unreadable {
            self.skip_unreadable = true;
        }
        if cli.follow_symlinks {
            self.follow_symlinks = true;
        }
    }

    /// Inventory settings derived from this configuration.
    #[must_use]
    pub fn inventory_config(&self) -> InventoryConfig {
        InventoryConfig::default()
            .with_skip_unreadable(self.skip_unreadable)
            .with_follow_symlinks(self.follow_symlinks)
    }
}
