//! Configuration loading for Scorebook.
//!
//! Kept separate from the server so tests and tooling can build a config
//! without pulling in the HTTP stack.
//!
//! # Usage
//!
//! ```rust,no_run
//! use scoreconf::ScoreConfig;
//!
//! let config = ScoreConfig::load().expect("Failed to load config");
//! println!("HTTP: {}", config.bind.addr());
//! println!("Database: {}", config.storage.file_path(&config.paths).display());
//! ```
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/scorebook/config.toml` (system)
//! 2. `~/.config/scorebook/config.toml` (user)
//! 3. `./scorebook.toml` (local override, or the `--config` path)
//! 4. Environment variables (`SCOREBOOK_*`, plus `PORT` and `RUST_LOG`)
//!
//! # Example Config
//!
//! ```toml
//! [paths]
//! state_dir = "~/.local/share/scorebook"
//!
//! [bind]
//! host = "0.0.0.0"
//! http_port = 3000
//!
//! [storage]
//! backend = "file"            # or "memory"
//! file = "/var/lib/scorebook/database.json"
//! save_policy = "write-behind" # or "write-through"
//!
//! [auth]
//! hash_cost = 10
//!
//! [telemetry]
//! otlp_endpoint = "127.0.0.1:4317"
//! log_level = "info"
//! ```

pub mod infra;
pub mod loader;

pub use infra::{
    AuthConfig, BindConfig, PathsConfig, SavePolicy, StorageBackend, StorageConfig,
    TelemetryConfig,
};
pub use loader::{discover_config_files_with_override, ConfigSources};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Complete Scorebook configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScoreConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub bind: BindConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl ScoreConfig {
    /// Load configuration from all sources.
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration, letting `config_path` replace `./scorebook.toml`.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration from optional path and return information about sources.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = ScoreConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            loader::load_from_file(&mut config, &path)?;
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources);

        Ok((config, sources))
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> String {
        // Build TOML manually for nicer formatting
        let mut output = String::new();

        output.push_str("# Scorebook Configuration\n\n");

        output.push_str("[paths]\n");
        output.push_str(&format!(
            "state_dir = \"{}\"\n",
            self.paths.state_dir.display()
        ));

        output.push_str("\n[bind]\n");
        output.push_str(&format!("host = \"{}\"\n", self.bind.host));
        output.push_str(&format!("http_port = {}\n", self.bind.http_port));

        output.push_str("\n[storage]\n");
        output.push_str(&format!("backend = \"{}\"\n", self.storage.backend));
        output.push_str(&format!(
            "file = \"{}\"\n",
            self.storage.file_path(&self.paths).display()
        ));
        output.push_str(&format!("save_policy = \"{}\"\n", self.storage.save_policy));

        output.push_str("\n[auth]\n");
        output.push_str(&format!("hash_cost = {}\n", self.auth.hash_cost));

        output.push_str("\n[telemetry]\n");
        if let Some(endpoint) = &self.telemetry.otlp_endpoint {
            output.push_str(&format!("otlp_endpoint = \"{}\"\n", endpoint));
        }
        output.push_str(&format!("log_level = \"{}\"\n", self.telemetry.log_level));

        output
    }
}
