//! Tool-version gated topology rules.
//!
//! All version comparisons live in the `RULES` table; discovery and dependency
//! resolution only ever look at the resulting [`PolicyFlags`].

use std::str::FromStr;

use nestor_core::build::BuildKind;
use nestor_core::version::ToolVersion;
use nestor_util::errors::NestorError;
use semver::VersionReq;
use serde::Serialize;

/// Feature toggles derived from the build tool version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolicyFlags {
    /// `buildSrc` may not be used as a project name; an explicit inclusion of
    /// the conventional directory is the same entity as the implicit build.
    pub build_src_is_reserved_name: bool,
    /// Builds included by the owning build are visible to its `buildSrc`.
    pub included_builds_visible_to_build_src: bool,
    /// An included build's own `includeBuild` entries join the import (one level).
    pub transitive_included_builds: bool,
}

impl PolicyFlags {
    /// Whether a dependency declared in a `from` build may target a different `to` build.
    pub fn can_see(&self, from: BuildKind, to: BuildKind) -> bool {
        match (from, to) {
            (_, BuildKind::BuildSrc) => false,
            (BuildKind::BuildSrc, BuildKind::Included) => self.included_builds_visible_to_build_src,
            (BuildKind::BuildSrc, BuildKind::Root) => false,
            _ => true,
        }
    }
}

struct PolicyRule {
    range: &'static str,
    flags: PolicyFlags,
}

impl PolicyRule {
    fn matches(&self, version: &ToolVersion) -> bool {
        VersionReq::parse(self.range).is_ok_and(|req| req.matches(version.semver()))
    }
}

const LEGACY: PolicyRule = PolicyRule {
    range: ">=3.0, <6.0",
    flags: PolicyFlags {
        build_src_is_reserved_name: false,
        included_builds_visible_to_build_src: false,
        transitive_included_builds: false,
    },
};

const RESERVED_BUILD_SRC: PolicyRule = PolicyRule {
    range: ">=6.0, <6.7",
    flags: PolicyFlags {
        build_src_is_reserved_name: true,
        included_builds_visible_to_build_src: false,
        transitive_included_builds: true,
    },
};

const VISIBLE_INCLUDED_BUILDS: PolicyRule = PolicyRule {
    range: ">=6.7, <9.0",
    flags: PolicyFlags {
        build_src_is_reserved_name: true,
        included_builds_visible_to_build_src: true,
        transitive_included_builds: true,
    },
};

/// Ordered oldest to newest. The last entry is the fallback.
static RULES: [PolicyRule; 3] = [LEGACY, RESERVED_BUILD_SRC, VISIBLE_INCLUDED_BUILDS];
const NEWEST: PolicyRule = VISIBLE_INCLUDED_BUILDS;

/// Result of looking a tool version up in the rule table.
#[derive(Debug, Clone)]
pub struct PolicyResolution {
    pub tool_version: String,
    pub flags: PolicyFlags,
    /// Version range of the rule that was applied.
    pub range: &'static str,
    /// `true` when no rule matched and the newest one was used.
    pub fallback: bool,
}

impl PolicyResolution {
    /// The non-fatal error to report when the newest rule had to be assumed.
    pub fn incompatibility(&self) -> Option<NestorError> {
        self.fallback.then(|| NestorError::VersionIncompatibility {
            version: self.tool_version.clone(),
            fallback: self.range.to_string(),
        })
    }
}

/// Pure lookup from tool version to policy flags.
pub struct VersionPolicy;

impl VersionPolicy {
    pub fn resolve(tool_version: &str) -> PolicyResolution {
        let matched = ToolVersion::from_str(tool_version)
            .ok()
            .and_then(|v| RULES.iter().find(|rule| rule.matches(&v)));
        match matched {
            Some(rule) => {
                tracing::debug!("Tool version {tool_version} uses the {} rules", rule.range);
                PolicyResolution {
                    tool_version: tool_version.to_string(),
                    flags: rule.flags,
                    range: rule.range,
                    fallback: false,
                }
            }
            None => {
                tracing::warn!(
                    "Tool version '{tool_version}' is not recognized, assuming the {} rules",
                    NEWEST.range
                );
                PolicyResolution {
                    tool_version: tool_version.to_string(),
                    flags: NEWEST.flags,
                    range: NEWEST.range,
                    fallback: true,
                }
            }
        }
    }

    pub fn flags(tool_version: &str) -> PolicyFlags {
        Self::resolve(tool_version).flags
    }
}
