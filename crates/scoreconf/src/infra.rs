//! Process configuration - fixed for the lifetime of the server.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Filesystem paths for Scorebook state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Base directory for runtime state (the JSON database lives here).
    /// Default: ~/.local/share/scorebook
    #[serde(default = "PathsConfig::default_state_dir")]
    pub state_dir: PathBuf,
}

impl PathsConfig {
    fn default_state_dir() -> PathBuf {
        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".local/share/scorebook"))
            .unwrap_or_else(|| PathBuf::from(".local/share/scorebook"))
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_dir: Self::default_state_dir(),
        }
    }
}

/// Network bind address for the HTTP API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindConfig {
    /// Default: 0.0.0.0
    #[serde(default = "BindConfig::default_host")]
    pub host: String,

    /// Default: 3000
    #[serde(default = "BindConfig::default_http_port")]
    pub http_port: u16,
}

impl BindConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_http_port() -> u16 {
        3000
    }

    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            http_port: Self::default_http_port(),
        }
    }
}

/// Which snapshot adapter backs the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Nothing survives a restart.
    Memory,
    /// Pretty-printed JSON file, rewritten on every save.
    File,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "file" | "json" => Ok(Self::File),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::File => f.write_str("file"),
        }
    }
}

/// Whether a mutating request waits for its snapshot to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SavePolicy {
    /// Await the save before responding.
    WriteThrough,
    /// Queue the snapshot for the background writer and respond immediately.
    WriteBehind,
}

impl FromStr for SavePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "write-through" | "sync" => Ok(Self::WriteThrough),
            "write-behind" | "async" => Ok(Self::WriteBehind),
            other => Err(format!("unknown save policy: {other}")),
        }
    }
}

impl fmt::Display for SavePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteThrough => f.write_str("write-through"),
            Self::WriteBehind => f.write_str("write-behind"),
        }
    }
}

/// Snapshot persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "StorageConfig::default_backend")]
    pub backend: StorageBackend,

    /// Database file for the `file` backend.
    /// Default: `<state_dir>/database.json` (resolved by [`StorageConfig::file_path`])
    #[serde(default)]
    pub file: Option<PathBuf>,

    #[serde(default = "StorageConfig::default_save_policy")]
    pub save_policy: SavePolicy,
}

impl StorageConfig {
    fn default_backend() -> StorageBackend {
        StorageBackend::File
    }

    fn default_save_policy() -> SavePolicy {
        SavePolicy::WriteBehind
    }

    /// Resolve the database file, falling back to `database.json` under the state dir.
    pub fn file_path(&self, paths: &PathsConfig) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| paths.state_dir.join("database.json"))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Self::default_backend(),
            file: None,
            save_policy: Self::default_save_policy(),
        }
    }
}

/// Password hashing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// bcrypt cost factor. Default: 10
    #[serde(default = "AuthConfig::default_hash_cost")]
    pub hash_cost: u32,
}

impl AuthConfig {
    /// Cost factors bcrypt accepts.
    pub const HASH_COSTS: std::ops::RangeInclusive<u32> = 4..=31;

    fn default_hash_cost() -> u32 {
        10
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            hash_cost: Self::default_hash_cost(),
        }
    }
}

/// Telemetry and observability configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// OTLP gRPC endpoint. When unset, logs go to stdout only.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,

    /// Log filter directive (trace, debug, info, warn, error, or an EnvFilter string).
    /// Default: info
    #[serde(default = "TelemetryConfig::default_log_level")]
    pub log_level: String,
}

impl TelemetryConfig {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            otlp_endpoint: None,
            log_level: Self::default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse() {
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert_eq!("FILE".parse::<StorageBackend>().unwrap(), StorageBackend::File);
        assert!("mongo".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_save_policy_parse() {
        assert_eq!(
            "write_through".parse::<SavePolicy>().unwrap(),
            SavePolicy::WriteThrough
        );
        assert_eq!(
            "write-behind".parse::<SavePolicy>().unwrap(),
            SavePolicy::WriteBehind
        );
        assert_eq!(SavePolicy::WriteThrough.to_string(), "write-through");
    }

    #[test]
    fn test_file_path_defaults_under_state_dir() {
        let paths = PathsConfig {
            state_dir: PathBuf::from("/data/scorebook"),
        };
        let storage = StorageConfig::default();
        assert_eq!(
            storage.file_path(&paths),
            PathBuf::from("/data/scorebook/database.json")
        );

        let storage = StorageConfig {
            file: Some(PathBuf::from("/elsewhere/db.json")),
            ..StorageConfig::default()
        };
        assert_eq!(storage.file_path(&paths), PathBuf::from("/elsewhere/db.json"));
    }

    #[test]
    fn test_bind_addr() {
        assert_eq!(BindConfig::default().addr(), "0.0.0.0:3000");
    }
}
