//! Configuration system for yangtree.
//!
//! Settings come from `~/.config/yangtree/config.toml` when it exists and
//! fall back to defaults otherwise. Command-line flags override them.
//!
//! # Example
//!
//! ```
//! use yangtree::config::Config;
//! use yangtree::document::DataFormat;
//!
//! let config = Config::default();
//! assert_eq!(config.default_format, DataFormat::Xml);
//! assert_eq!(config.separator, " = ");
//!
//! let custom = Config {
//!     strict: true,
//!     ..Config::default()
//! };
//! assert!(custom.strict);
//! ```

use crate::document::DataFormat;
use crate::log::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the yangtree command.
///
/// # Fields
///
/// * `default_format` - Format used when the file name does not tell (default: xml)
/// * `strict` - Treat unknown elements as errors (default: false)
/// * `show_logs` - Print parser diagnostics to stderr (default: true)
/// * `log_level` - Most verbose level printed: "error", "warning", "verbose" or "debug" (default: "warning")
/// * `separator` - Text between path and value in output lines (default: " = ")
/// * `schema_files` - Module definition files loaded before any `--schema` flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub default_format: DataFormat,

    #[serde(default)]
    pub strict: bool,

    #[serde(default = "default_show_logs")]
    pub show_logs: bool,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_separator")]
    pub separator: String,

    #[serde(default)]
    pub schema_files: Vec<PathBuf>,
}

fn default_show_logs() -> bool {
    true
}

fn default_log_level() -> String {
    "warning".to_string()
}

fn default_separator() -> String {
    " = ".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_format: DataFormat::default(),
            strict: false,
            show_logs: default_show_logs(),
            log_level: default_log_level(),
            separator: default_separator(),
            schema_files: Vec::new(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/yangtree/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("yangtree");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|_| Self::default()),
            Err(_) => Self::default(),
        }
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// The configured log level; an unrecognized name means `Warning`.
    pub fn log_level(&self) -> LogLevel {
        self.log_level.parse().unwrap_or(LogLevel::Warning)
    }
}
