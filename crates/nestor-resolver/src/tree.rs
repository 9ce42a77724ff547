//! Per-build project trees with effective plugins and source sets.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::PathBuf;

use nestor_core::build::Build;
use nestor_core::dependency::DependencyDecl;
use nestor_core::model::{BuildDescription, ProjectModel};
use nestor_core::project::ProjectPath;
use nestor_core::source_set::SourceSet;

use crate::plugins::{PluginCatalog, PluginLookup};

/// Plugin every `buildSrc` root project gets without asking.
const BUILD_SRC_IMPLICIT_PLUGIN: &str = "groovy";

/// A plugin the project requested that only an invisible build publishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenPlugin {
    pub id: String,
    pub provider: String,
}

#[derive(Debug, Clone)]
pub struct ProjectNode {
    pub path: ProjectPath,
    pub dir: PathBuf,
    /// Effective plugin ids after expanding `applies`.
    pub applied_plugins: BTreeSet<String>,
    /// Own declarations followed by those contributed by convention plugins.
    pub declared_dependencies: Vec<DependencyDecl>,
    /// Sorted by name, roots anchored at `dir`.
    pub source_sets: Vec<SourceSet>,
    pub group: Option<String>,
    pub hidden_plugins: Vec<HiddenPlugin>,
}

impl ProjectNode {
    pub fn source_set(&self, name: &str) -> Option<&SourceSet> {
        self.source_sets.iter().find(|s| s.name == name)
    }

    /// Names of the source sets that inherit from `name`, directly or not.
    pub fn extenders_of(&self, name: &str) -> Vec<&str> {
        let mut found: BTreeSet<&str> = BTreeSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([name]);
        while let Some(parent) = queue.pop_front() {
            for set in &self.source_sets {
                if set.extends.contains(parent) && found.insert(set.name.as_str()) {
                    queue.push_back(set.name.as_str());
                }
            }
        }
        found.remove(name);
        found.into_iter().collect()
    }

    pub fn is_degraded(&self) -> bool {
        !self.hidden_plugins.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct BuildTree {
    pub build: Build,
    pub projects: BTreeMap<ProjectPath, ProjectNode>,
}

impl BuildTree {
    pub fn project(&self, path: &ProjectPath) -> Option<&ProjectNode> {
        self.projects.get(path)
    }
}

/// Resolve the project tree of one build.
///
/// The project set is the root project plus every `include`d path and its
/// implicit ancestors.
pub fn resolve(build: &Build, model: &ProjectModel, catalog: &PluginCatalog<'_>) -> BuildTree {
    let empty = BuildDescription::default();
    let desc = model
        .build_at(&build.model_key)
        .map(|(_, desc)| desc)
        .unwrap_or(&empty);

    let mut paths: BTreeSet<ProjectPath> = BTreeSet::new();
    paths.insert(ProjectPath::root());
    for include in &build.settings.include {
        let path = ProjectPath::parse(include);
        paths.extend(path.ancestors());
        paths.insert(path);
    }
    for declared in desc.projects.keys() {
        let path = ProjectPath::parse(declared);
        if !paths.contains(&path) {
            tracing::debug!(
                "Project '{path}' of {} is not included by its settings, ignoring",
                build.describe()
            );
        }
    }

    let projects = paths
        .into_iter()
        .map(|path| {
            let node = resolve_project(build, desc, path.clone(), catalog);
            (path, node)
        })
        .collect();
    BuildTree {
        build: build.clone(),
        projects,
    }
}

fn resolve_project(
    build: &Build,
    desc: &BuildDescription,
    path: ProjectPath,
    catalog: &PluginCatalog<'_>,
) -> ProjectNode {
    let dir = path.dir_under(&build.root_dir);
    let project = desc.project(&path).cloned().unwrap_or_default();

    let mut queue: VecDeque<String> = VecDeque::new();
    if build.is_build_src() && path.is_root() {
        queue.push_back(BUILD_SRC_IMPLICIT_PLUGIN.to_string());
    }
    queue.extend(project.plugins.iter().cloned());

    let mut applied: BTreeSet<String> = BTreeSet::new();
    let mut sets: BTreeMap<String, SourceSet> = BTreeMap::new();
    let mut dependencies = project.dependencies;
    let mut hidden_plugins = Vec::new();

    // `applied` doubles as the visited set, so cyclic `applies` chains terminate.
    while let Some(id) = queue.pop_front() {
        if !applied.insert(id.clone()) {
            continue;
        }
        match catalog.lookup(&id) {
            PluginLookup::Builtin(contribution) => {
                for set in contribution.source_sets() {
                    match sets.get_mut(&set.name) {
                        Some(existing) => existing.merge(set),
                        None => {
                            sets.insert(set.name.clone(), set);
                        }
                    }
                }
                queue.extend(contribution.applies().iter().map(|s| s.to_string()));
            }
            PluginLookup::Convention { provider, plugin } => {
                tracing::debug!("Project '{path}' of {} applies '{id}' from build '{provider}'", build.describe());
                queue.extend(plugin.applies.iter().cloned());
                dependencies.extend(plugin.dependencies.iter().cloned());
            }
            PluginLookup::Hidden { provider } => {
                tracing::warn!(
                    "Plugin '{id}' of build '{provider}' is not visible to {}",
                    build.describe()
                );
                applied.remove(&id);
                hidden_plugins.push(HiddenPlugin {
                    id,
                    provider: provider.to_string(),
                });
            }
            PluginLookup::Unknown => {
                tracing::debug!("Plugin '{id}' contributes no source sets");
            }
        }
    }

    let names: BTreeSet<String> = sets.keys().cloned().collect();
    let source_sets = sets
        .into_values()
        .map(|mut set| {
            set.extends.retain(|parent| names.contains(parent));
            set.rooted_at(&dir)
        })
        .collect();

    ProjectNode {
        path,
        dir,
        applied_plugins: applied,
        declared_dependencies: dependencies,
        source_sets,
        group: project.group,
        hidden_plugins,
    }
}
