//! Generator configuration
//!
//! Loads `OttrConfig` from YAML.
//!
//! Path resolution order:
//! 1. Explicit path passed by the caller
//! 2. `OTTR_CONFIG` environment variable
//! 3. `ottr.yaml` in the working directory
//! 4. `config/ottr.yaml` in the working directory
//! 5. Built-in defaults

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ottr_core::PrefixMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const CONFIG_ENV_VAR: &str = "OTTR_CONFIG";

const CANDIDATE_PATHS: [&str; 2] = ["ottr.yaml", "config/ottr.yaml"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OttrConfig {
    /// Prefixes bound on top of the defaults, visible to every loaded text
    pub prefixes: BTreeMap<String, String>,
    /// Load the `o-rdf` / `o-rdfs` templates
    pub standard_library: bool,
    /// Maximum template nesting depth; unbounded when absent
    pub max_depth: Option<usize>,
    /// Expand top-level instances on the rayon pool
    pub parallel: bool,
}

impl Default for OttrConfig {
    fn default() -> Self {
        Self {
            prefixes: BTreeMap::new(),
            standard_library: true,
            max_depth: None,
            parallel: false,
        }
    }
}

impl OttrConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse OTTR configuration")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Resolve and load the configuration
    ///
    /// An explicit path or `OTTR_CONFIG` must exist; the working-directory
    /// candidates are skipped when absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match Self::locate(explicit) {
            Some(path) => Self::from_file(path),
            None => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        CANDIDATE_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.is_file())
    }

    /// Default prefixes plus the configured ones
    pub fn prefix_map(&self) -> PrefixMap {
        let mut prefixes = PrefixMap::with_defaults();
        for (prefix, namespace) in &self.prefixes {
            prefixes.bind(prefix.as_str(), namespace.as_str());
        }
        prefixes
    }
}
