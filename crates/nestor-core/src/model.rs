//! The evaluated project model handed over by the build tool.
//!
//! Every participating build directory the tool looked at is described here,
//! keyed by its path relative to the import root (`""` for the root build).
//! Discovery decides which of them actually take part in an import.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use nestor_util::errors::NestorError;
use nestor_util::fs;
use serde::{Deserialize, Serialize};

use crate::build::Settings;
use crate::dependency::DependencyDecl;
use crate::project::ProjectPath;

/// The whole input of one import run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectModel {
    #[serde(rename = "tool-version")]
    pub tool_version: String,
    #[serde(rename = "root-dir")]
    pub root_dir: PathBuf,
    #[serde(default)]
    pub builds: BTreeMap<String, BuildDescription>,
}

/// One build directory as evaluated by the build tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildDescription {
    /// Declared root project name; defaults to the directory name.
    #[serde(default)]
    pub name: Option<String>,
    /// `None` when the build has no settings file.
    #[serde(default)]
    pub settings: Option<Settings>,
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectDescription>,
    /// Convention plugins this build publishes, by plugin id.
    #[serde(default)]
    pub plugins: BTreeMap<String, ConventionPlugin>,
}

/// One evaluated project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectDescription {
    #[serde(default, rename = "build-script")]
    pub build_script: Option<PathBuf>,
    /// Source files found under the project, relative to its directory.
    #[serde(default)]
    pub sources: Vec<PathBuf>,
    /// Requested plugin ids, in application order.
    #[serde(default)]
    pub plugins: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<DependencyDecl>,
    /// Publication group; lets an included build substitute `group:<name>` coordinates.
    #[serde(default)]
    pub group: Option<String>,
}

/// A plugin published by a build, described by what applying it does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConventionPlugin {
    #[serde(default)]
    pub applies: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<DependencyDecl>,
}

impl ProjectModel {
    pub fn new(tool_version: impl Into<String>, root_dir: impl Into<PathBuf>) -> Self {
        Self {
            tool_version: tool_version.into(),
            root_dir: root_dir.into(),
            builds: BTreeMap::new(),
        }
    }

    /// Add a build description at `dir` relative to the root (builder pattern).
    pub fn with_build(mut self, dir: &str, build: BuildDescription) -> Self {
        self.builds.insert(dir.to_string(), build);
        self
    }

    /// Load a model from a `.json` file, or TOML for any other extension.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| NestorError::Model {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        let mut model = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        // A relative root is anchored at the model file's directory.
        if model.root_dir.is_relative() {
            if let Some(parent) = path.parent() {
                model.root_dir = fs::resolve(parent, &model.root_dir);
            }
        }
        tracing::debug!(
            "Loaded project model from {} ({} build directories)",
            path.display(),
            model.builds.len()
        );
        Ok(model)
    }

    pub fn from_json_str(content: &str) -> miette::Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            NestorError::Model {
                message: format!("Invalid JSON project model: {e}"),
            }
            .into()
        })
    }

    pub fn from_toml_str(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            NestorError::Model {
                message: format!("Invalid TOML project model: {e}"),
            }
            .into()
        })
    }

    /// Look up the build described at `dir` (relative to the root), comparing normalised paths.
    pub fn build_at(&self, dir: &Path) -> Option<(PathBuf, &BuildDescription)> {
        let wanted = fs::normalize(dir);
        self.builds.iter().find_map(|(key, build)| {
            let key = fs::normalize(Path::new(key));
            (key == wanted).then_some((key, build))
        })
    }

    /// Absolute directory of a build given its model key.
    pub fn absolute_dir(&self, key: &Path) -> PathBuf {
        fs::resolve(&self.root_dir, key)
    }
}

impl BuildDescription {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_project(mut self, path: &str, project: ProjectDescription) -> Self {
        self.projects.insert(path.to_string(), project);
        self
    }

    pub fn with_plugin(mut self, id: &str, plugin: ConventionPlugin) -> Self {
        self.plugins.insert(id.to_string(), plugin);
        self
    }

    /// The description of a project, comparing normalised paths.
    pub fn project(&self, path: &ProjectPath) -> Option<&ProjectDescription> {
        self.projects
            .iter()
            .find_map(|(key, project)| (ProjectPath::parse(key) == *path).then_some(project))
    }

    /// A settings file, a root build script, or any root source counts as content.
    pub fn has_recognizable_content(&self) -> bool {
        self.settings.is_some()
            || self.project(&ProjectPath::root()).is_some_and(|root| {
                root.build_script.is_some() || !root.sources.is_empty()
            })
    }
}

impl ProjectDescription {
    pub fn with_build_script(mut self, script: impl Into<PathBuf>) -> Self {
        self.build_script = Some(script.into());
        self
    }

    pub fn with_source(mut self, file: impl Into<PathBuf>) -> Self {
        self.sources.push(file.into());
        self
    }

    pub fn with_plugin(mut self, id: &str) -> Self {
        self.plugins.push(id.to_string());
        self
    }

    pub fn with_dependency(mut self, dep: DependencyDecl) -> Self {
        self.dependencies.push(dep);
        self
    }

    pub fn with_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }
}

impl ConventionPlugin {
    pub fn applying(ids: &[&str]) -> Self {
        Self {
            applies: ids.iter().map(|id| id.to_string()).collect(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, dep: DependencyDecl) -> Self {
        self.dependencies.push(dep);
        self
    }
}
