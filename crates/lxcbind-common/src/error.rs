//! Unified error types for the lxcbind workspace.
//!
//! Handle acquisition and release are also exposed as boolean operations;
//! those collapse the corresponding variants here into `false`.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum LxcError {
    /// The runtime refused to produce a container object.
    #[error("failed to create container {name:?}{}", scope_suffix(.path))]
    CreationFailed {
        /// Requested container name.
        name: String,
        /// Path scope the container was looked up in, if any.
        path: Option<String>,
    },

    /// The runtime refused to add a reference to a container object.
    #[error("failed to acquire a reference to container {name:?}")]
    AcquireFailed {
        /// Name of the container.
        name: String,
    },

    /// The runtime reported an error while dropping a reference.
    #[error("failed to release a reference to container {name:?}")]
    ReleaseFailed {
        /// Name of the container.
        name: String,
    },

    /// The handle's last reference was already released.
    #[error("container {name:?} has already been released")]
    AlreadyReleased {
        /// Name of the container.
        name: String,
    },

    /// A version string has no parseable leading component.
    #[error("unparseable version string: {version:?}")]
    UnparseableVersion {
        /// The offending version string.
        version: String,
    },

    /// liblxc could not be loaded or is missing a required symbol.
    #[error("liblxc is unavailable: {message}")]
    BackendUnavailable {
        /// Loader diagnostic.
        message: String,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, LxcError>;

fn scope_suffix(path: &Option<String>) -> String {
    path.as_ref().map_or_else(String::new, |p| format!(" in {p}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_failed_mentions_path_when_scoped() {
        let err = LxcError::CreationFailed {
            name: "web".into(),
            path: Some("/srv/lxc".into()),
        };
        assert_eq!(err.to_string(), "failed to create container \"web\" in /srv/lxc");
    }

    #[test]
    fn creation_failed_without_path() {
        let err = LxcError::CreationFailed {
            name: "web".into(),
            path: None,
        };
        assert_eq!(err.to_string(), "failed to create container \"web\"");
    }

    #[test]
    fn serde_errors_convert() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: LxcError = source.into();
        assert!(matches!(err, LxcError::Serialization { .. }));
    }
}
