use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A JVM language whose plugin contributes a source directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
    Groovy,
    Kotlin,
    Scala,
}

impl Language {
    /// Directory name below `src/<source set>/`.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Groovy => "groovy",
            Self::Kotlin => "kotlin",
            Self::Scala => "scala",
        }
    }
}

/// What a source set's output is used for on the classpath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClasspathRole {
    Production,
    Test,
    TestFixtures,
}

impl ClasspathRole {
    pub fn for_name(name: &str) -> Self {
        match name {
            "test" => Self::Test,
            "testFixtures" => Self::TestFixtures,
            _ => Self::Production,
        }
    }
}

/// A named compilation unit within a project (e.g. `main`, `test`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSet {
    pub name: String,
    pub role: ClasspathRole,
    pub languages: BTreeSet<Language>,
    /// Source sets whose classpath this one inherits (`test` extends `main`).
    pub extends: BTreeSet<String>,
    pub source_roots: Vec<PathBuf>,
}

impl SourceSet {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            role: ClasspathRole::for_name(&name),
            name,
            languages: BTreeSet::new(),
            extends: BTreeSet::new(),
            source_roots: Vec::new(),
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.languages.insert(language);
        self
    }

    /// Add a source set this one extends (builder pattern).
    pub fn with_extends(mut self, parent: impl Into<String>) -> Self {
        self.extends.insert(parent.into());
        self
    }

    /// Merge another contribution for the same source set name.
    pub fn merge(&mut self, other: SourceSet) {
        self.languages.extend(other.languages);
        self.extends.extend(other.extends);
    }

    /// Compute conventional roots under `project_dir`: `src/<name>/resources`
    /// plus `src/<name>/<lang>` per language, sorted and deduplicated.
    pub fn rooted_at(mut self, project_dir: &Path) -> Self {
        let base = project_dir.join("src").join(&self.name);
        let mut roots: Vec<PathBuf> = self
            .languages
            .iter()
            .map(|lang| nestor_util::fs::normalize(&base.join(lang.dir_name())))
            .collect();
        roots.push(nestor_util::fs::normalize(&base.join("resources")));
        roots.sort();
        roots.dedup();
        self.source_roots = roots;
        self
    }
}
