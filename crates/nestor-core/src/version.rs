//! Build tool version parsing.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use semver::Version;
use thiserror::Error;

/// The version string could not be read as `major[.minor[.patch]][-suffix]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid tool version '{0}'")]
pub struct InvalidToolVersion(pub String);

/// A build tool version, parsed leniently into semver.
///
/// Tool versions are rarely valid semver (`6.7`, `7.0-rc-1`), so missing
/// components are zero-filled and any `-` suffix is kept only in the original
/// text: `7.0-rc-1` compares equal to `7.0`.
#[derive(Debug, Clone)]
pub struct ToolVersion {
    original: String,
    version: Version,
}

impl ToolVersion {
    pub fn semver(&self) -> &Version {
        &self.version
    }

    /// `true` for milestones, release candidates and nightlies.
    pub fn is_pre_release(&self) -> bool {
        self.original.contains('-')
    }
}

impl PartialEq for ToolVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ToolVersion {}

impl Ord for ToolVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version.cmp(&other.version)
    }
}

impl PartialOrd for ToolVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl FromStr for ToolVersion {
    type Err = InvalidToolVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let numeric = trimmed.split(['-', '+', ' ']).next().unwrap_or_default();
        let parts: Vec<&str> = numeric.split('.').collect();
        if parts.len() > 3 {
            return Err(InvalidToolVersion(s.to_string()));
        }
        let mut components = [0u64; 3];
        for (slot, part) in components.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| InvalidToolVersion(s.to_string()))?;
        }
        Ok(Self {
            original: trimmed.to_string(),
            version: Version::new(components[0], components[1], components[2]),
        })
    }
}
