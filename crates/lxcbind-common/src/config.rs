//! Configuration model for the lxcbind engine.
//!
//! Values that liblxc would otherwise take from process-wide state (the
//! default container path, the library to load) are carried here and threaded
//! through constructors explicitly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{LxcError, Result};
use crate::types::Verbosity;

/// Root configuration for an lxcbind engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LxcConfig {
    /// Default container path used when a call gives none.
    ///
    /// `None` lets liblxc fall back to its own `lxc.lxcpath`.
    pub lxcpath: Option<String>,
    /// Explicit liblxc shared object to load instead of the usual sonames.
    pub library: Option<PathBuf>,
    /// Verbosity given to newly created handles.
    pub verbosity: Verbosity,
    /// liblxc version the binding assumes it was built against.
    pub built_against: String,
}

impl Default for LxcConfig {
    fn default() -> Self {
        Self {
            lxcpath: None,
            library: None,
            verbosity: Verbosity::Quiet,
            built_against: constants::BINDING_LXC_VERSION.to_string(),
        }
    }
}

impl LxcConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| LxcError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Applies overrides from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    ///
    /// Empty values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(lxcpath) = lookup(constants::ENV_LXCPATH) {
            self.lxcpath = Some(lxcpath);
        }
        if let Some(library) = lookup(constants::ENV_LIBRARY) {
            self.library = Some(PathBuf::from(library));
        }
        if let Some(verbose) = lookup(constants::ENV_VERBOSE) {
            self.verbosity = if matches!(verbose.as_str(), "0" | "false" | "no") {
                Verbosity::Quiet
            } else {
                Verbosity::Verbose
            };
        }
        self
    }

    /// Resolves the path scope for a call: the explicit path if given,
    /// otherwise the configured default.
    #[must_use]
    pub fn resolve_path<'a>(&'a self, path: Option<&'a str>) -> Option<&'a str> {
        path.or(self.lxcpath.as_deref())
    }
}
