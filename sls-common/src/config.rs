//! Configuration loading and config file resolution
//!
//! Resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. Per-user config file (`<config_dir>/sls/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A file named explicitly (tiers 1 and 2) must load. A missing or unreadable
//! per-user file is not an error: the compiled defaults are used instead.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "SLS_CONFIG";

/// TOML configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Extra identity marker fields: marker field name -> package id
    ///
    /// Added on top of the built-in marker table.
    #[serde(default)]
    pub markers: BTreeMap<String, String>,

    /// Known applications: package id -> display label
    #[serde(default)]
    pub applications: BTreeMap<String, String>,
}

/// Logging section of the TOML config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when RUST_LOG is not set (e.g. "info", "sls_ingest=debug")
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// File named on the command line
    CommandLine(PathBuf),
    /// File named by [`CONFIG_ENV_VAR`]
    Environment(PathBuf),
    /// Per-user config file
    UserFile(PathBuf),
    /// No file; compiled defaults
    Defaults,
}

impl ConfigSource {
    /// Path of the config file, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::CommandLine(p)
            | ConfigSource::Environment(p)
            | ConfigSource::UserFile(p) => Some(p.as_path()),
            ConfigSource::Defaults => None,
        }
    }
}

/// Determine which config file to use
///
/// The per-user file is only selected if it exists.
pub fn resolve_config_source(cli_arg: Option<&Path>) -> ConfigSource {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return ConfigSource::CommandLine(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return ConfigSource::Environment(PathBuf::from(path));
        }
    }

    // Priority 3: Per-user config file
    if let Some(path) = default_config_path() {
        if path.exists() {
            return ConfigSource::UserFile(path);
        }
    }

    // Priority 4: Compiled defaults
    ConfigSource::Defaults
}

/// Per-user config file location for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sls").join("config.toml"))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    parse_toml_config(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Parse TOML config text
pub fn parse_toml_config(content: &str) -> std::result::Result<TomlConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Resolve and load the configuration
///
/// Returns the loaded config together with where it came from.
pub fn load_config(cli_arg: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
    let source = resolve_config_source(cli_arg);

    let config = match &source {
        ConfigSource::CommandLine(path) | ConfigSource::Environment(path) => {
            load_toml_config(path)?
        }
        ConfigSource::UserFile(path) => match load_toml_config(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{} (using compiled defaults)", e);
                return Ok((TomlConfig::default(), ConfigSource::Defaults));
            }
        },
        ConfigSource::Defaults => {
            info!("No config file found, using compiled defaults");
            TomlConfig::default()
        }
    };

    Ok((config, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = parse_toml_config("").unwrap();
        assert_eq!(config, TomlConfig::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parses_all_sections() {
        let config = parse_toml_config(
            r#"
            [logging]
            level = "sls_ingest=debug"

            [markers]
            "com.example.quirk" = "com.example.player"

            [applications]
            "gonemad.gmmp" = "GoneMAD Music Player"
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level, "sls_ingest=debug");
        assert_eq!(
            config.markers.get("com.example.quirk").map(String::as_str),
            Some("com.example.player")
        );
        assert_eq!(
            config.applications.get("gonemad.gmmp").map(String::as_str),
            Some("GoneMAD Music Player")
        );
    }

    #[test]
    fn test_logging_level_defaults_inside_section() {
        let config = parse_toml_config("[logging]\n").unwrap();
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_rejects_wrong_value_type() {
        assert!(parse_toml_config("[markers]\nfoo = 3\n").is_err());
    }

    #[test]
    fn test_cli_argument_wins() {
        let source = resolve_config_source(Some(Path::new("/tmp/explicit.toml")));
        assert_eq!(
            source,
            ConfigSource::CommandLine(PathBuf::from("/tmp/explicit.toml"))
        );
        assert_eq!(source.path(), Some(Path::new("/tmp/explicit.toml")));
    }
}
