//! Configuration handling for Lintel
//!
//! Configuration is stored in `lintel.toml` (project, working directory) and
//! `~/.config/lintel/config.toml` (global). Project values win over global
//! ones. The file maps directly onto the [`Options`] object handed to
//! plugins:
//!
//! ```toml
//! output_file = "report.txt"
//!
//! [options]
//! max-line-length = 100
//! allow-compound-statements = true
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::options::Options;

/// Project configuration file name, looked up in the working directory
pub const PROJECT_CONFIG: &str = "lintel.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// On-disk configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path the report is written to; stdout when unset
    pub output_file: Option<PathBuf>,

    /// Plugin option values keyed by long option name
    pub options: HashMap<String, Value>,
}

impl Config {
    /// Reads a single configuration file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Loads the effective configuration for a project directory: global
    /// config first, overlaid with the project file when present. Missing
    /// files are treated as empty.
    pub fn load(project_dir: &Path) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(global) = Self::global_path() {
            if global.is_file() {
                debug!(path = %global.display(), "loading global configuration");
                config = config.merge(Self::from_path(&global)?);
            }
        }

        let project = project_dir.join(PROJECT_CONFIG);
        if project.is_file() {
            debug!(path = %project.display(), "loading project configuration");
            config = config.merge(Self::from_path(&project)?);
        }

        Ok(config)
    }

    /// Path of the global configuration file, if a home directory exists
    pub fn global_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "lintel").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Overlays `other` on top of `self`; `other` wins per key
    pub fn merge(mut self, other: Config) -> Self {
        if other.output_file.is_some() {
            self.output_file = other.output_file;
        }
        self.options.extend(other.options);
        self
    }

    /// Converts into the [`Options`] object handed to plugins
    pub fn into_options(self) -> Options {
        Options {
            output_file: self.output_file,
            values: self.options,
        }
    }
}
