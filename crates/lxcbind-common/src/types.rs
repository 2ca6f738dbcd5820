//! Domain primitive types used across the lxcbind workspace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LxcError;

/// Which subset of containers a discovery call enumerates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryMode {
    /// Defined and active containers.
    #[default]
    All,
    /// Containers with a configuration on disk.
    Defined,
    /// Containers that are currently running.
    Active,
}

impl DiscoveryMode {
    /// All modes, in listing order.
    pub const ALL: [Self; 3] = [Self::All, Self::Defined, Self::Active];
}

impl fmt::Display for DiscoveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Defined => write!(f, "defined"),
            Self::Active => write!(f, "active"),
        }
    }
}

impl FromStr for DiscoveryMode {
    type Err = LxcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "defined" => Ok(Self::Defined),
            "active" => Ok(Self::Active),
            other => Err(LxcError::Config {
                message: format!("unknown discovery mode: {other}"),
            }),
        }
    }
}

/// How loudly a container handle reports its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Lifecycle events are logged at debug level.
    #[default]
    Quiet,
    /// Lifecycle events are logged at info level.
    Verbose,
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiet => write!(f, "quiet"),
            Self::Verbose => write!(f, "verbose"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_mode_display_round_trips_through_from_str() {
        for mode in DiscoveryMode::ALL {
            assert_eq!(mode.to_string().parse::<DiscoveryMode>().unwrap(), mode);
        }
    }

    #[test]
    fn unknown_discovery_mode_is_a_config_error() {
        let err = "running".parse::<DiscoveryMode>().unwrap_err();
        assert!(matches!(err, LxcError::Config { .. }));
    }

    #[test]
    fn verbosity_defaults_to_quiet() {
        assert_eq!(Verbosity::default(), Verbosity::Quiet);
    }

    #[test]
    fn modes_serialize_lowercase() {
        let json = serde_json::to_string(&DiscoveryMode::Defined).unwrap();
        assert_eq!(json, "\"defined\"");
    }
}
