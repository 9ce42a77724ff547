use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Slash-delimited path of a project relative to its build's root (`""` = root project).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectPath(String);

impl ProjectPath {
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Parse either `:`-delimited (`":app:core"`) or `/`-delimited (`"app/core"`) notation.
    pub fn parse(s: &str) -> Self {
        let segments: Vec<&str> = s
            .split([':', '/'])
            .map(str::trim)
            .filter(|seg| !seg.is_empty())
            .collect();
        Self(segments.join("/"))
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Last path segment, `None` for the root project.
    pub fn name(&self) -> Option<&str> {
        self.segments().last()
    }

    pub fn parent(&self) -> Option<ProjectPath> {
        if self.is_root() {
            return None;
        }
        match self.0.rsplit_once('/') {
            Some((parent, _)) => Some(Self(parent.to_string())),
            None => Some(Self::root()),
        }
    }

    /// Non-root ancestors from the outermost down, excluding `self`.
    ///
    /// `"a/b/c"` yields `["a", "a/b"]`.
    pub fn ancestors(&self) -> Vec<ProjectPath> {
        let mut out = Vec::new();
        let mut current = self.parent();
        while let Some(p) = current {
            if p.is_root() {
                break;
            }
            current = p.parent();
            out.push(p);
        }
        out.reverse();
        out
    }

    /// The path with `/` replaced by `.`, as used in module ids.
    pub fn dotted(&self) -> String {
        self.0.replace('/', ".")
    }

    /// Conventional project directory under a build root.
    pub fn dir_under(&self, build_root: &Path) -> PathBuf {
        self.segments().fold(build_root.to_path_buf(), |dir, seg| dir.join(seg))
    }
}

impl fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}
