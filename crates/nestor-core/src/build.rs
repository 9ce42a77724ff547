use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Conventional directory name of an implicit build-logic build.
pub const BUILD_SRC_DIR: &str = "buildSrc";

/// How a build participates in an import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildKind {
    Root,
    Included,
    BuildSrc,
}

impl fmt::Display for BuildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Root => "root",
            Self::Included => "included",
            Self::BuildSrc => "buildSrc",
        };
        f.write_str(s)
    }
}

/// Pre-parsed settings of one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Subproject paths (`include 'a:b'`).
    #[serde(default)]
    pub include: Vec<String>,
    /// Directories of included builds, relative to this build's root (`includeBuild '../x'`).
    #[serde(default, rename = "include-builds")]
    pub include_builds: Vec<PathBuf>,
}

impl Settings {
    pub fn with_include(mut self, path: &str) -> Self {
        self.include.push(path.to_string());
        self
    }

    pub fn with_include_build(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_builds.push(dir.into());
        self
    }
}

/// A participating build, fixed once discovery is done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Build {
    pub name: String,
    pub kind: BuildKind,
    /// Absolute root directory.
    pub root_dir: PathBuf,
    /// Directory relative to the import root, the key into the project model.
    pub model_key: PathBuf,
    /// Name of the build owning a `BuildSrc` build.
    pub owner: Option<String>,
    pub settings: Settings,
}

impl Build {
    pub fn is_build_src(&self) -> bool {
        self.kind == BuildKind::BuildSrc
    }

    /// Human-readable origin used in error messages.
    pub fn describe(&self) -> String {
        format!("{} build '{}'", self.kind, self.name)
    }
}
