//! Module synthesis: one module per project and per source set.

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use nestor_core::build::Build;
use nestor_core::dependency::DependencyScope;
use nestor_core::project::ProjectPath;
use nestor_util::errors::{NestorError, NestorResult};
use serde::Serialize;

use crate::library::LibraryId;
use crate::tree::{BuildTree, ProjectNode};

/// Unique module name: `<build>[.<project path, dotted>][.<source set>]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Borrow<str> for ModuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStatus {
    Resolved,
    /// Some dependency or plugin of the module could not be resolved.
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ModuleDependency {
    pub target: ModuleId,
    pub scope: DependencyScope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LibraryDependency {
    pub library: LibraryId,
    pub scope: DependencyScope,
}

/// An IDE module.
#[derive(Debug, Clone, Serialize)]
pub struct Module {
    pub id: ModuleId,
    pub build: String,
    pub project: ProjectPath,
    /// `None` for the project-level module.
    pub source_set: Option<String>,
    pub content_root: PathBuf,
    pub source_roots: Vec<PathBuf>,
    pub module_dependencies: BTreeSet<ModuleDependency>,
    pub library_dependencies: BTreeSet<LibraryDependency>,
    pub status: ModuleStatus,
}

impl Module {
    pub fn is_degraded(&self) -> bool {
        self.status == ModuleStatus::Degraded
    }

    pub fn degrade(&mut self) {
        self.status = ModuleStatus::Degraded;
    }

    pub fn depends_on(&self, target: &str) -> bool {
        self.module_dependencies
            .iter()
            .any(|d| d.target.as_str() == target)
    }
}

pub type ModuleTable = BTreeMap<ModuleId, Module>;

/// Id of the project-level module.
pub fn project_module_id(build: &Build, path: &ProjectPath) -> ModuleId {
    if path.is_root() {
        ModuleId(build.name.clone())
    } else {
        ModuleId(format!("{}.{}", build.name, path.dotted()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModuleSynthesizer {
    merge_single_source_set: bool,
}

impl ModuleSynthesizer {
    pub fn new(merge_single_source_set: bool) -> Self {
        Self {
            merge_single_source_set,
        }
    }

    /// Whether `project`'s only source set is folded into its project module.
    pub fn merges(&self, project: &ProjectNode) -> bool {
        self.merge_single_source_set && project.source_sets.len() == 1
    }

    /// Module that represents `source_set` of `project`. Falls back to the
    /// project module when the set does not exist or is merged.
    pub fn module_for(&self, build: &Build, project: &ProjectNode, source_set: &str) -> ModuleId {
        let project_id = project_module_id(build, &project.path);
        if self.merges(project) || project.source_set(source_set).is_none() {
            return project_id;
        }
        ModuleId(format!("{project_id}.{source_set}"))
    }

    /// Build the module table for all trees, failing if two origins claim the same id.
    pub fn synthesize(&self, trees: &[BuildTree]) -> NestorResult<ModuleTable> {
        let mut modules = ModuleTable::new();
        let mut origins: BTreeMap<ModuleId, String> = BTreeMap::new();
        for tree in trees {
            for project in tree.projects.values() {
                for (module, origin) in self.project_modules(&tree.build, project) {
                    if let Some(first) = origins.get(&module.id) {
                        return Err(NestorError::ResolutionConflict {
                            id: module.id.to_string(),
                            first: first.clone(),
                            second: origin,
                        }
                        .into());
                    }
                    origins.insert(module.id.clone(), origin);
                    modules.insert(module.id.clone(), module);
                }
            }
        }
        tracing::debug!("Synthesized {} modules", modules.len());
        Ok(modules)
    }

    fn project_modules(&self, build: &Build, project: &ProjectNode) -> Vec<(Module, String)> {
        let status = if project.is_degraded() {
            ModuleStatus::Degraded
        } else {
            ModuleStatus::Resolved
        };
        let origin = format!("project '{}' of {}", project.path, build.describe());
        let module = |id: ModuleId, source_set: Option<String>, source_roots: Vec<PathBuf>| Module {
            id,
            build: build.name.clone(),
            project: project.path.clone(),
            source_set,
            content_root: project.dir.clone(),
            source_roots,
            module_dependencies: BTreeSet::new(),
            library_dependencies: BTreeSet::new(),
            status,
        };

        let project_id = project_module_id(build, &project.path);
        if self.merges(project) {
            let roots = project
                .source_sets
                .iter()
                .flat_map(|s| s.source_roots.iter().cloned())
                .collect();
            return vec![(module(project_id, None, roots), origin)];
        }

        let mut out = vec![(module(project_id, None, Vec::new()), origin.clone())];
        for set in &project.source_sets {
            let id = self.module_for(build, project, &set.name);
            out.push((
                module(id, Some(set.name.clone()), set.source_roots.clone()),
                format!("source set '{}' of {origin}", set.name),
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nestor_core::build::{BuildKind, Settings};
    use nestor_core::source_set::{Language, SourceSet};

    fn build(name: &str) -> Build {
        Build {
            name: name.into(),
            kind: BuildKind::Root,
            root_dir: PathBuf::from("/w"),
            model_key: PathBuf::new(),
            owner: None,
            settings: Settings::default(),
        }
    }

    fn node(path: &str, sets: &[&str]) -> ProjectNode {
        let path = ProjectPath::parse(path);
        let dir = path.dir_under(&PathBuf::from("/w"));
        ProjectNode {
            source_sets: sets
                .iter()
                .map(|s| SourceSet::new(*s).with_language(Language::Java).rooted_at(&dir))
                .collect(),
            path,
            dir,
            applied_plugins: BTreeSet::new(),
            declared_dependencies: Vec::new(),
            group: None,
            hidden_plugins: Vec::new(),
        }
    }

    fn tree(name: &str, nodes: Vec<ProjectNode>) -> BuildTree {
        BuildTree {
            build: build(name),
            projects: nodes.into_iter().map(|n| (n.path.clone(), n)).collect(),
        }
    }

    #[test]
    fn ids_follow_the_naming_rule() {
        let b = build("project");
        assert_eq!(project_module_id(&b, &ProjectPath::root()).as_str(), "project");
        assert_eq!(
            project_module_id(&b, &ProjectPath::parse(":libs:core")).as_str(),
            "project.libs.core"
        );
        let synth = ModuleSynthesizer::default();
        let n = node("libs:core", &["main", "test"]);
        assert_eq!(synth.module_for(&b, &n, "test").as_str(), "project.libs.core.test");
        assert_eq!(synth.module_for(&b, &n, "integration").as_str(), "project.libs.core");
    }

    #[test]
    fn one_module_per_project_and_source_set() {
        let modules = ModuleSynthesizer::default()
            .synthesize(&[tree("app", vec![node("", &["main", "test"]), node("util", &[])])])
            .unwrap();
        let ids: Vec<&str> = modules.keys().map(ModuleId::as_str).collect();
        assert_eq!(ids, vec!["app", "app.main", "app.test", "app.util"]);
        let main = &modules["app.main"];
        assert_eq!(main.source_set.as_deref(), Some("main"));
        assert_eq!(main.content_root, PathBuf::from("/w"));
        assert!(main.source_roots.contains(&PathBuf::from("/w/src/main/java")));
    }

    #[test]
    fn single_source_set_merges_when_enabled() {
        let trees = [tree("app", vec![node("", &["main"])])];
        let merged = ModuleSynthesizer::new(true).synthesize(&trees).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged["app"].source_roots.len(), 2);

        let separate = ModuleSynthesizer::new(false).synthesize(&trees).unwrap();
        assert_eq!(separate.len(), 2);
    }

    #[test]
    fn colliding_ids_are_a_conflict() {
        // root project's `main` source set and a subproject called `main`
        let trees = [tree("app", vec![node("", &["main"]), node("main", &[])])];
        let err = ModuleSynthesizer::default().synthesize(&trees).unwrap_err();
        assert!(err.to_string().contains("'app.main'"));
    }

    #[test]
    fn degraded_projects_produce_degraded_modules() {
        let mut n = node("", &["main"]);
        n.hidden_plugins.push(crate::tree::HiddenPlugin {
            id: "x".into(),
            provider: "y".into(),
        });
        let modules = ModuleSynthesizer::default()
            .synthesize(&[tree("app", vec![n])])
            .unwrap();
        assert!(modules.values().all(Module::is_degraded));
    }
}
