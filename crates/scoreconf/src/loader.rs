//! Config file discovery, loading, and environment variable overlay.

use crate::{AuthConfig, ConfigError, ScoreConfig};
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local).
/// Only returns files that exist.
pub fn discover_config_files() -> Vec<PathBuf> {
    discover_config_files_with_override(None)
}

/// Discover config files, optionally with a CLI override path.
///
/// If `cli_path` is provided and exists, it replaces the local override.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/scorebook/config.toml");
    if system.exists() {
        files.push(system);
    }

    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("scorebook/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        if path.exists() {
            files.push(path.to_path_buf());
            return files;
        }
    }

    let local = PathBuf::from("scorebook.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Read a TOML file and layer it on top of `config`.
pub fn load_from_file(config: &mut ScoreConfig, path: &Path) -> Result<(), ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    apply_toml(config, &contents, path)
}

/// Layer a TOML document on top of `config`. Keys absent from the document keep
/// whatever value `config` already holds.
pub fn apply_toml(config: &mut ScoreConfig, contents: &str, path: &Path) -> Result<(), ConfigError> {
    let parse_err = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let table: toml::Table = contents
        .parse()
        .map_err(|e: toml::de::Error| parse_err(e.to_string()))?;

    if let Some(paths) = table.get("paths").and_then(|v| v.as_table()) {
        if let Some(v) = paths.get("state_dir").and_then(|v| v.as_str()) {
            config.paths.state_dir = expand_path(v);
        }
    }

    if let Some(bind) = table.get("bind").and_then(|v| v.as_table()) {
        if let Some(v) = bind.get("host").and_then(|v| v.as_str()) {
            config.bind.host = v.to_string();
        }
        if let Some(v) = bind.get("http_port").and_then(|v| v.as_integer()) {
            config.bind.http_port =
                u16::try_from(v).map_err(|_| parse_err(format!("http_port out of range: {v}")))?;
        }
    }

    if let Some(storage) = table.get("storage").and_then(|v| v.as_table()) {
        if let Some(v) = storage.get("backend").and_then(|v| v.as_str()) {
            config.storage.backend = v.parse().map_err(parse_err)?;
        }
        if let Some(v) = storage.get("file").and_then(|v| v.as_str()) {
            config.storage.file = Some(expand_path(v));
        }
        if let Some(v) = storage.get("save_policy").and_then(|v| v.as_str()) {
            config.storage.save_policy = v.parse().map_err(parse_err)?;
        }
    }

    if let Some(auth) = table.get("auth").and_then(|v| v.as_table()) {
        if let Some(v) = auth.get("hash_cost").and_then(|v| v.as_integer()) {
            config.auth.hash_cost = u32::try_from(v)
                .ok()
                .filter(|cost| AuthConfig::HASH_COSTS.contains(cost))
                .ok_or_else(|| parse_err(format!("hash_cost must be between 4 and 31, got {v}")))?;
        }
    }

    if let Some(telemetry) = table.get("telemetry").and_then(|v| v.as_table()) {
        if let Some(v) = telemetry.get("otlp_endpoint").and_then(|v| v.as_str()) {
            config.telemetry.otlp_endpoint = Some(v.to_string()).filter(|s| !s.is_empty());
        }
        if let Some(v) = telemetry.get("log_level").and_then(|v| v.as_str()) {
            config.telemetry.log_level = v.to_string();
        }
    }

    Ok(())
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides(config: &mut ScoreConfig, sources: &mut ConfigSources) {
    apply_overrides_from(config, sources, |key| env::var(key).ok());
}

/// Same as [`apply_env_overrides`], with an injectable variable lookup.
pub fn apply_overrides_from(
    config: &mut ScoreConfig,
    sources: &mut ConfigSources,
    lookup: impl Fn(&str) -> Option<String>,
) {
    let mut record = |key: &str| sources.env_overrides.push(key.to_string());

    if let Some(v) = lookup("SCOREBOOK_STATE_DIR") {
        config.paths.state_dir = expand_path(&v);
        record("SCOREBOOK_STATE_DIR");
    }

    if let Some(v) = lookup("SCOREBOOK_HOST") {
        config.bind.host = v;
        record("SCOREBOOK_HOST");
    }
    // Hosting platforms commonly hand the port over as PORT
    for key in ["PORT", "SCOREBOOK_HTTP_PORT"] {
        if let Some(port) = lookup(key).and_then(|v| v.parse().ok()) {
            config.bind.http_port = port;
            record(key);
        }
    }

    if let Some(backend) = lookup("SCOREBOOK_STORAGE").and_then(|v| v.parse().ok()) {
        config.storage.backend = backend;
        record("SCOREBOOK_STORAGE");
    }
    if let Some(v) = lookup("SCOREBOOK_DB_FILE") {
        config.storage.file = Some(expand_path(&v));
        record("SCOREBOOK_DB_FILE");
    }
    if let Some(policy) = lookup("SCOREBOOK_SAVE_POLICY").and_then(|v| v.parse().ok()) {
        config.storage.save_policy = policy;
        record("SCOREBOOK_SAVE_POLICY");
    }

    if let Some(cost) = lookup("SCOREBOOK_HASH_COST")
        .and_then(|v| v.parse().ok())
        .filter(|cost| AuthConfig::HASH_COSTS.contains(cost))
    {
        config.auth.hash_cost = cost;
        record("SCOREBOOK_HASH_COST");
    }

    if let Some(v) = lookup("SCOREBOOK_OTLP_ENDPOINT") {
        config.telemetry.otlp_endpoint = Some(v);
        record("SCOREBOOK_OTLP_ENDPOINT");
    }
    // Also support standard OTEL env var
    if let Some(v) = lookup("OTEL_EXPORTER_OTLP_ENDPOINT") {
        config.telemetry.otlp_endpoint = Some(v);
        record("OTEL_EXPORTER_OTLP_ENDPOINT");
    }
    if let Some(v) = lookup("SCOREBOOK_LOG_LEVEL") {
        config.telemetry.log_level = v;
        record("SCOREBOOK_LOG_LEVEL");
    }
    if let Some(v) = lookup("RUST_LOG") {
        config.telemetry.log_level = v;
        record("RUST_LOG");
    }
}

/// Expand ~ and environment variables in a path.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(stripped);
        }
        PathBuf::from(path)
    } else if let Some(stripped) = path.strip_prefix('$') {
        // Handle $VAR/rest/of/path
        match stripped.split_once('/') {
            Some((var_name, rest)) => env::var(var_name)
                .map(|value| PathBuf::from(value).join(rest))
                .unwrap_or_else(|_| PathBuf::from(path)),
            None => env::var(stripped)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(path)),
        }
    } else {
        PathBuf::from(path)
    }
}
