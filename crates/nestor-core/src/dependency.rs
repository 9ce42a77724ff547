use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::project::ProjectPath;

/// Scope a dependency is declared with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    #[default]
    Compile,
    Runtime,
    Provided,
    Test,
}

impl DependencyScope {
    /// Source set of the declaring project that receives the edge.
    pub fn declaring_source_set(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Compile | Self::Runtime | Self::Provided => "main",
        }
    }

    /// Source set of a target project that the edge points at.
    pub fn target_source_set(self) -> &'static str {
        "main"
    }
}

impl fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Compile => "compile",
            Self::Runtime => "runtime",
            Self::Provided => "provided",
            Self::Test => "test",
        };
        f.write_str(s)
    }
}

/// What a dependency declaration points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// Another project, in the same build unless `build` is set.
    Project,
    /// External `group:artifact:version` coordinates.
    Coordinates,
    /// A local file, relative to the declaring project's directory.
    File,
}

/// A dependency as declared by a project, before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDecl {
    pub kind: DependencyKind,
    #[serde(default)]
    pub scope: DependencyScope,
    pub target: String,
    /// Name of the build that owns a `Project` target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,
}

impl DependencyDecl {
    pub fn project(path: &str, scope: DependencyScope) -> Self {
        Self {
            kind: DependencyKind::Project,
            scope,
            target: path.to_string(),
            build: None,
        }
    }

    pub fn coordinates(notation: &str, scope: DependencyScope) -> Self {
        Self {
            kind: DependencyKind::Coordinates,
            scope,
            target: notation.to_string(),
            build: None,
        }
    }

    pub fn file(path: impl Into<PathBuf>, scope: DependencyScope) -> Self {
        Self {
            kind: DependencyKind::File,
            scope,
            target: path.into().to_string_lossy().into_owned(),
            build: None,
        }
    }

    /// Point a project reference into another build (builder pattern).
    pub fn in_build(mut self, build: impl Into<String>) -> Self {
        self.build = Some(build.into());
        self
    }

    /// The target as a project path. Only meaningful for `Project` declarations.
    pub fn project_path(&self) -> ProjectPath {
        ProjectPath::parse(&self.target)
    }
}

impl fmt::Display for DependencyDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, &self.build) {
            (DependencyKind::Project, Some(build)) => {
                write!(f, "{} project('{}' in build '{}')", self.scope, self.target, build)
            }
            (DependencyKind::Project, None) => write!(f, "{} project('{}')", self.scope, self.target),
            (DependencyKind::Coordinates, _) => write!(f, "{} '{}'", self.scope, self.target),
            (DependencyKind::File, _) => write!(f, "{} files('{}')", self.scope, self.target),
        }
    }
}

/// Maven coordinates parsed from a `group:artifact:version` string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MavenCoordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl MavenCoordinate {
    /// Parse `"group:artifact:version"` into coordinates.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        match parts.as_slice() {
            [group, artifact, version]
                if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
            {
                Some(Self {
                    group_id: group.to_string(),
                    artifact_id: artifact.to_string(),
                    version: version.to_string(),
                })
            }
            _ => None,
        }
    }

    /// `group:artifact` identifier (without version).
    pub fn key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

impl fmt::Display for MavenCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}
