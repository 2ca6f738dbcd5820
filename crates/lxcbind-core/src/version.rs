//! liblxc version parsing and comparison.
//!
//! liblxc reports versions such as `4.0.12`, `5.0.0-devel`, or packager
//! variants like `2.1~ubuntu1`. The display form of a development build is
//! `5.0.0 (devel)`; both spellings parse to the same ordinal.
//!
//! Comparison is fail-closed: an ordinal whose leading component could not be
//! parsed never satisfies a minimum-version check. Trailing components that
//! are missing or unparseable are merely unset and order below any number.

use std::fmt;

use lxcbind_common::constants::{BUILD_METADATA_SEPARATOR, DEVEL_DISPLAY_SUFFIX, DEVEL_SUFFIX};
use lxcbind_common::error::{LxcError, Result};

/// Parsed `(major, minor, micro)` triple plus a development flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionOrdinal {
    major: Option<u32>,
    minor: Option<u32>,
    micro: Option<u32>,
    devel: bool,
}

impl VersionOrdinal {
    /// Builds a released version.
    #[must_use]
    pub const fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major: Some(major),
            minor: Some(minor),
            micro: Some(micro),
            devel: false,
        }
    }

    /// Parses a liblxc version string.
    ///
    /// Never fails; an unusable string yields an ordinal for which
    /// [`is_parseable`](Self::is_parseable) is false.
    #[must_use]
    pub fn parse(version: &str) -> Self {
        let core = version
            .split(BUILD_METADATA_SEPARATOR)
            .next()
            .unwrap_or_default()
            .replacen(DEVEL_DISPLAY_SUFFIX, DEVEL_SUFFIX, 1);

        let parts: Vec<&str> = core.split('.').collect();
        let devel = parts
            .last()
            .is_some_and(|last| matches!(last.split('-').collect::<Vec<_>>()[..], [_, "devel"]));

        let mut fields = parts.iter().copied().take(3).map(|part| {
            let part = if devel {
                part.strip_suffix(DEVEL_SUFFIX).unwrap_or(part)
            } else {
                part
            };
            part.parse::<u32>().ok()
        });
        let major = fields.next().flatten();
        let minor = fields.next().flatten();
        let micro = fields.next().flatten();

        Self {
            major,
            minor,
            micro,
            devel,
        }
    }

    /// Parses a version string, rejecting one without a numeric leading
    /// component.
    ///
    /// Development builds are accepted whatever their numeric core looks like.
    ///
    /// # Errors
    ///
    /// Returns [`LxcError::UnparseableVersion`] when the ordinal would be
    /// fail-closed.
    pub fn try_parse(version: &str) -> Result<Self> {
        let ordinal = Self::parse(version);
        if ordinal.is_parseable() {
            Ok(ordinal)
        } else {
            Err(LxcError::UnparseableVersion {
                version: version.to_string(),
            })
        }
    }

    /// Whether the version was built from unreleased source.
    #[must_use]
    pub const fn is_devel(&self) -> bool {
        self.devel
    }

    /// Whether comparisons against this ordinal can ever succeed.
    #[must_use]
    pub const fn is_parseable(&self) -> bool {
        self.devel || self.major.is_some()
    }

    /// Major component, if parsed.
    #[must_use]
    pub const fn major(&self) -> Option<u32> {
        self.major
    }

    /// Minor component, if parsed.
    #[must_use]
    pub const fn minor(&self) -> Option<u32> {
        self.minor
    }

    /// Micro component, if parsed.
    #[must_use]
    pub const fn micro(&self) -> Option<u32> {
        self.micro
    }

    /// Returns true when this version is at least `major.minor.micro`.
    ///
    /// Development builds satisfy every requirement; unparseable versions
    /// satisfy none. Equal versions count as "at least".
    #[must_use]
    pub fn at_least(&self, major: u32, minor: u32, micro: u32) -> bool {
        if self.devel {
            return true;
        }
        if self.major.is_none() {
            return false;
        }

        let requested = [Some(major), Some(minor), Some(micro)];
        let actual = [self.major, self.minor, self.micro];
        for (have, want) in actual.into_iter().zip(requested) {
            // None orders below every Some, matching an unset field.
            if have > want {
                return true;
            }
            if have < want {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for VersionOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [self.major, self.minor, self.micro]
            .into_iter()
            .map_while(|part| part.map(|n| n.to_string()))
            .collect();
        if parts.is_empty() {
            write!(f, "unknown")?;
        } else {
            write!(f, "{}", parts.join("."))?;
        }
        if self.devel {
            write!(f, "{DEVEL_DISPLAY_SUFFIX}")?;
        }
        Ok(())
    }
}

/// Rewrites liblxc's `-devel` version suffix into its display form.
#[must_use]
pub fn display_version(raw: &str) -> String {
    raw.strip_suffix(DEVEL_SUFFIX)
        .map_or_else(|| raw.to_string(), |core| format!("{core}{DEVEL_DISPLAY_SUFFIX}"))
}

/// Returns true when the liblxc the binding was built against is at least
/// `major.minor.micro`.
///
/// `built_against` is the binding's baseline; a development baseline
/// satisfies everything.
#[must_use]
pub fn compile_time_at_least(
    built_against: &VersionOrdinal,
    major: u32,
    minor: u32,
    micro: u32,
) -> bool {
    built_against.at_least(major, minor, micro)
}
