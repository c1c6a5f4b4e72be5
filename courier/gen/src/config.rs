//! Generator configuration.
//!
//! Settings come from an optional `courier.toml`; command-line flags and
//! builder calls override individual values.
//!
//! ```toml
//! backend = "reqwest-async"
//! scan_paths = ["src"]
//! output_dir = "src/generated"
//! adapter_suffix = "Impl"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assembler::DEFAULT_ADAPTER_SUFFIX;
use crate::backend::DEFAULT_BACKEND;
use crate::errors::GeneratorError;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "courier.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Backend id, see `BackendRegistry::ids`.
    pub backend: String,
    /// Directories scanned for contracts.
    pub scan_paths: Vec<PathBuf>,
    /// Directory receiving one module per adapter plus `mod.rs`.
    pub output_dir: PathBuf,
    /// Appended to the contract name to name the adapter.
    pub adapter_suffix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
            scan_paths: vec![PathBuf::from("src")],
            output_dir: PathBuf::from("src/generated"),
            adapter_suffix: DEFAULT_ADAPTER_SUFFIX.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Reads a configuration file. Relative paths in the file are resolved
    /// against the file's directory.
    ///
    /// ## Errors
    ///
    /// Returns `ConfigRead` when the file cannot be read, `ConfigParse` when
    /// it is not valid TOML for this schema and `ConfigError` when a value is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, GeneratorError> {
        let text = fs::read_to_string(path).map_err(|source| GeneratorError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&text, path)?;
        let base = path.parent().filter(|parent| !parent.as_os_str().is_empty());
        Ok(match base {
            Some(base) => config.relative_to(base),
            None => config,
        })
    }

    /// Loads `courier.toml` from `dir` when present, otherwise the defaults.
    ///
    /// ## Errors
    ///
    /// See [`GeneratorConfig::load`].
    pub fn discover(dir: &Path) -> Result<Self, GeneratorError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            debug!("Loading configuration from {}", path.display());
            Self::load(&path)
        } else {
            debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, dir.display());
            Ok(Self::default())
        }
    }

    /// Parses configuration text; `origin` names the source in errors.
    ///
    /// ## Errors
    ///
    /// Returns `ConfigParse` or `ConfigError`.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, GeneratorError> {
        let config: Self = toml::from_str(text).map_err(|source| GeneratorError::ConfigParse {
            path: origin.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that serde cannot.
    ///
    /// ## Errors
    ///
    /// Returns `ConfigError` for an empty backend, no scan paths, or a suffix
    /// that cannot extend a type name.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.backend.trim().is_empty() {
            return Err(GeneratorError::ConfigError("backend must not be empty".to_string()));
        }
        if self.scan_paths.is_empty() {
            return Err(GeneratorError::ConfigError(
                "scan_paths must list at least one directory".to_string(),
            ));
        }
        if !self
            .adapter_suffix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(GeneratorError::ConfigError(format!(
                "adapter_suffix '{}' must contain only ASCII letters, digits and '_'",
                self.adapter_suffix
            )));
        }
        Ok(())
    }

    fn relative_to(mut self, base: &Path) -> Self {
        self.scan_paths = self
            .scan_paths
            .into_iter()
            .map(|path| if path.is_relative() { base.join(path) } else { path })
            .collect();
        if self.output_dir.is_relative() {
            self.output_dir = base.join(&self.output_dir);
        }
        self
    }
}
