//! Turns declared dependencies into module and library edges.

use std::collections::BTreeMap;
use std::path::Path;

use nestor_core::build::BuildKind;
use nestor_core::dependency::{DependencyDecl, DependencyKind, DependencyScope, MavenCoordinate};
use nestor_core::project::ProjectPath;
use nestor_util::errors::NestorError;
use nestor_util::fs;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::library::{ArtifactInspector, LibraryKey, LibraryTable};
use crate::policy::PolicyFlags;
use crate::synth::{LibraryDependency, ModuleDependency, ModuleId, ModuleSynthesizer, ModuleTable};
use crate::tree::{BuildTree, ProjectNode};

/// Where a declaration points once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Module(ModuleId),
    Library(LibraryKey),
}

#[derive(Debug)]
struct Unresolved {
    kind: DiagnosticKind,
    message: String,
}

impl Unresolved {
    fn new(kind: DiagnosticKind, message: String) -> Self {
        Self { kind, message }
    }
}

pub struct DependencyResolver<'a> {
    trees: &'a [BuildTree],
    policy: PolicyFlags,
    synthesizer: &'a ModuleSynthesizer,
    inspector: &'a dyn ArtifactInspector,
    module_level_files: bool,
    /// `group:name` published by a project of an included build → (tree index, project).
    publications: BTreeMap<String, (usize, ProjectPath)>,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(
        trees: &'a [BuildTree],
        policy: PolicyFlags,
        synthesizer: &'a ModuleSynthesizer,
        inspector: &'a dyn ArtifactInspector,
    ) -> Self {
        let mut publications = BTreeMap::new();
        for (index, tree) in trees.iter().enumerate() {
            if tree.build.kind != BuildKind::Included {
                continue;
            }
            for project in tree.projects.values() {
                let Some(group) = &project.group else {
                    continue;
                };
                let name = project.path.name().unwrap_or(tree.build.name.as_str());
                publications
                    .entry(format!("{group}:{name}"))
                    .or_insert_with(|| (index, project.path.clone()));
            }
        }
        Self {
            trees,
            policy,
            synthesizer,
            inspector,
            module_level_files: false,
            publications,
        }
    }

    /// Register file libraries per declaring module instead of project-wide.
    pub fn with_module_level_files(mut self, enabled: bool) -> Self {
        self.module_level_files = enabled;
        self
    }

    /// Add all edges to `modules`. Unresolvable declarations degrade the
    /// declaring modules and are reported; nothing here is fatal.
    pub fn resolve(&self, modules: &mut ModuleTable, libraries: &mut LibraryTable, diagnostics: &mut Diagnostics) {
        for (index, tree) in self.trees.iter().enumerate() {
            for project in tree.projects.values() {
                self.add_inheritance_edges(tree, project, modules);
                self.report_hidden_plugins(tree, project, diagnostics);
                for decl in &project.declared_dependencies {
                    self.add_declared(index, project, decl, modules, libraries, diagnostics);
                }
            }
        }
    }

    /// Each source set depends on the sets it extends.
    fn add_inheritance_edges(&self, tree: &BuildTree, project: &ProjectNode, modules: &mut ModuleTable) {
        for set in &project.source_sets {
            let from = self.synthesizer.module_for(&tree.build, project, &set.name);
            for parent in &set.extends {
                let to = self.synthesizer.module_for(&tree.build, project, parent);
                add_module_edge(modules, &from, to, DependencyScope::Compile);
            }
        }
    }

    fn report_hidden_plugins(&self, tree: &BuildTree, project: &ProjectNode, diagnostics: &mut Diagnostics) {
        let module = crate::synth::project_module_id(&tree.build, &project.path);
        for hidden in &project.hidden_plugins {
            let err = NestorError::DependencyResolution {
                module: module.to_string(),
                message: format!(
                    "plugin '{}' is published by build '{}', which is not visible from {}",
                    hidden.id,
                    hidden.provider,
                    tree.build.describe()
                ),
            };
            diagnostics.push(Diagnostic::from_error(
                Some(module.clone()),
                DiagnosticKind::UnresolvedPlugin,
                &err,
            ));
        }
    }

    fn add_declared(
        &self,
        index: usize,
        project: &ProjectNode,
        decl: &DependencyDecl,
        modules: &mut ModuleTable,
        libraries: &mut LibraryTable,
        diagnostics: &mut Diagnostics,
    ) {
        let tree = &self.trees[index];
        let declaring = self.declaring_modules(tree, project, decl.scope);
        match self.resolve_target(index, project, decl) {
            Ok(Target::Module(target)) => {
                for from in &declaring {
                    if *from == target {
                        tracing::debug!("Skipping self dependency of {from}");
                        continue;
                    }
                    add_module_edge(modules, from, target.clone(), decl.scope);
                }
            }
            Ok(Target::Library(key)) => {
                let shared = match (&key, self.module_level_files) {
                    (LibraryKey::File(_), true) => None,
                    _ => Some(libraries.intern(key.clone(), self.inspector)),
                };
                for from in &declaring {
                    let library = match shared {
                        Some(id) => id,
                        None => libraries.add_module_level(key.clone(), self.inspector),
                    };
                    if let Some(module) = modules.get_mut(from) {
                        module
                            .library_dependencies
                            .insert(LibraryDependency { library, scope: decl.scope });
                    }
                }
            }
            Err(unresolved) => {
                for id in &declaring {
                    if let Some(module) = modules.get_mut(id) {
                        module.degrade();
                    }
                }
                let Some(primary) = declaring.first() else {
                    return;
                };
                let err = NestorError::DependencyResolution {
                    module: primary.to_string(),
                    message: format!("{decl}: {}", unresolved.message),
                };
                diagnostics.push(Diagnostic::from_error(Some(primary.clone()), unresolved.kind, &err));
            }
        }
    }

    /// The module declaring a dependency of `scope`, then every module whose
    /// source set inherits from it.
    fn declaring_modules(&self, tree: &BuildTree, project: &ProjectNode, scope: DependencyScope) -> Vec<ModuleId> {
        let name = scope.declaring_source_set();
        let primary = self.synthesizer.module_for(&tree.build, project, name);
        let mut out = vec![primary];
        if project.source_set(name).is_some() {
            for extender in project.extenders_of(name) {
                let id = self.synthesizer.module_for(&tree.build, project, extender);
                if !out.contains(&id) {
                    out.push(id);
                }
            }
        }
        out
    }

    fn resolve_target(&self, index: usize, project: &ProjectNode, decl: &DependencyDecl) -> Result<Target, Unresolved> {
        let from = &self.trees[index];
        match decl.kind {
            DependencyKind::Project => {
                let target_index = match &decl.build {
                    None => index,
                    Some(name) => self
                        .trees
                        .iter()
                        .position(|t| t.build.name == *name)
                        .ok_or_else(|| {
                            Unresolved::new(
                                DiagnosticKind::UnresolvedBuild,
                                format!("build '{name}' is not part of this import"),
                            )
                        })?,
                };
                let to = self.visible_tree(index, target_index)?;
                let path = decl.project_path();
                let node = to.project(&path).ok_or_else(|| {
                    Unresolved::new(
                        DiagnosticKind::UnresolvedProject,
                        format!("project ':{path}' does not exist in {}", to.build.describe()),
                    )
                })?;
                Ok(Target::Module(self.synthesizer.module_for(
                    &to.build,
                    node,
                    decl.scope.target_source_set(),
                )))
            }
            DependencyKind::Coordinates => {
                let coord = MavenCoordinate::parse(&decl.target).ok_or_else(|| {
                    Unresolved::new(
                        DiagnosticKind::MalformedNotation,
                        "expected 'group:artifact:version'".to_string(),
                    )
                })?;
                if let Some((target_index, path)) = self.publications.get(&coord.key()) {
                    if *target_index != index {
                        let to = self.visible_tree(index, *target_index)?;
                        if let Some(node) = to.project(path) {
                            tracing::debug!(
                                "'{coord}' in {} is substituted by project ':{path}' of {}",
                                from.build.describe(),
                                to.build.describe()
                            );
                            return Ok(Target::Module(self.synthesizer.module_for(
                                &to.build,
                                node,
                                decl.scope.target_source_set(),
                            )));
                        }
                    }
                }
                Ok(Target::Library(LibraryKey::Coordinates(coord)))
            }
            DependencyKind::File => Ok(Target::Library(LibraryKey::File(fs::resolve(
                &project.dir,
                Path::new(&decl.target),
            )))),
        }
    }

    fn visible_tree(&self, from: usize, to: usize) -> Result<&'a BuildTree, Unresolved> {
        let trees = self.trees;
        let source = &trees[from];
        let target = &trees[to];
        if from != to && !self.policy.can_see(source.build.kind, target.build.kind) {
            return Err(Unresolved::new(
                DiagnosticKind::HiddenBuild,
                format!(
                    "{} is not visible from {}",
                    target.build.describe(),
                    source.build.describe()
                ),
            ));
        }
        Ok(target)
    }
}

fn add_module_edge(modules: &mut ModuleTable, from: &ModuleId, target: ModuleId, scope: DependencyScope) {
    if *from == target {
        return;
    }
    if let Some(module) = modules.get_mut(from) {
        module.module_dependencies.insert(ModuleDependency { target, scope });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::NoInspection;
    use crate::policy::VersionPolicy;
    use nestor_core::build::{Build, Settings};
    use nestor_core::source_set::{Language, SourceSet};
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn build(name: &str, kind: BuildKind) -> Build {
        Build {
            name: name.into(),
            kind,
            root_dir: PathBuf::from("/w").join(name),
            model_key: PathBuf::from(name),
            owner: None,
            settings: Settings::default(),
        }
    }

    fn java(build: &Build, path: &str, deps: Vec<DependencyDecl>) -> ProjectNode {
        let path = ProjectPath::parse(path);
        let dir = path.dir_under(&build.root_dir);
        ProjectNode {
            source_sets: vec![
                SourceSet::new("main").with_language(Language::Java).rooted_at(&dir),
                SourceSet::new("test")
                    .with_language(Language::Java)
                    .with_extends("main")
                    .rooted_at(&dir),
            ],
            path,
            dir,
            applied_plugins: BTreeSet::from(["java".to_string()]),
            declared_dependencies: deps,
            group: None,
            hidden_plugins: Vec::new(),
        }
    }

    fn tree(build: Build, nodes: Vec<ProjectNode>) -> BuildTree {
        BuildTree {
            build,
            projects: nodes.into_iter().map(|n| (n.path.clone(), n)).collect(),
        }
    }

    fn run(trees: &[BuildTree], version: &str) -> (ModuleTable, LibraryTable, Diagnostics) {
        let synth = ModuleSynthesizer::default();
        let mut modules = synth.synthesize(trees).unwrap();
        let mut libraries = LibraryTable::new();
        let mut diagnostics = Diagnostics::new();
        DependencyResolver::new(trees, VersionPolicy::flags(version), &synth, &NoInspection).resolve(
            &mut modules,
            &mut libraries,
            &mut diagnostics,
        );
        (modules, libraries, diagnostics)
    }

    #[test]
    fn test_depends_on_main() {
        let app = build("app", BuildKind::Root);
        let node = java(&app, "", vec![]);
        let (modules, _, _) = run(&[tree(app, vec![node])], "7.0");
        assert!(modules["app.test"].depends_on("app.main"));
        assert!(modules["app.main"].module_dependencies.is_empty());
    }

    #[test]
    fn project_dependency_targets_main() {
        let app = build("app", BuildKind::Root);
        let core = java(&app, "core", vec![]);
        let web = java(&app, "web", vec![DependencyDecl::project(":core", DependencyScope::Compile)]);
        let (modules, _, diagnostics) = run(&[tree(app, vec![core, web])], "7.0");
        assert!(modules["app.web.main"].depends_on("app.core.main"));
        // inherited by the test source set
        assert!(modules["app.web.test"].depends_on("app.core.main"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_scope_lands_on_test_only() {
        let app = build("app", BuildKind::Root);
        let node = java(
            &app,
            "",
            vec![DependencyDecl::coordinates("junit:junit:4.12", DependencyScope::Test)],
        );
        let (modules, libraries, _) = run(&[tree(app, vec![node])], "7.0");
        assert_eq!(modules["app.test"].library_dependencies.len(), 1);
        assert!(modules["app.main"].library_dependencies.is_empty());
        assert_eq!(libraries.len(), 1);
    }

    #[test]
    fn missing_project_degrades_and_reports() {
        let app = build("app", BuildKind::Root);
        let node = java(&app, "", vec![DependencyDecl::project(":nope", DependencyScope::Compile)]);
        let (modules, _, diagnostics) = run(&[tree(app, vec![node])], "7.0");
        assert!(modules["app.main"].is_degraded());
        assert!(modules["app.test"].is_degraded());
        assert!(!modules["app"].is_degraded());
        let d = diagnostics.iter().next().unwrap();
        assert_eq!(d.kind, DiagnosticKind::UnresolvedProject);
        assert_eq!(d.module.as_ref().unwrap().as_str(), "app.main");
    }

    #[test]
    fn malformed_coordinates_are_reported() {
        let app = build("app", BuildKind::Root);
        let node = java(&app, "", vec![DependencyDecl::coordinates("junit", DependencyScope::Compile)]);
        let (_, libraries, diagnostics) = run(&[tree(app, vec![node])], "7.0");
        assert!(libraries.is_empty());
        assert_eq!(diagnostics.of_kind(DiagnosticKind::MalformedNotation).count(), 1);
    }

    #[test]
    fn unknown_build_is_reported() {
        let app = build("app", BuildKind::Root);
        let node = java(
            &app,
            "",
            vec![DependencyDecl::project(":", DependencyScope::Compile).in_build("ghost")],
        );
        let (_, _, diagnostics) = run(&[tree(app, vec![node])], "7.0");
        assert_eq!(diagnostics.of_kind(DiagnosticKind::UnresolvedBuild).count(), 1);
    }

    #[test]
    fn included_build_visibility_follows_policy() {
        let mut src = build("app.buildSrc", BuildKind::BuildSrc);
        src.owner = Some("app".into());
        let plugins = build("plugins", BuildKind::Included);
        let src_node = java(
            &src,
            "",
            vec![DependencyDecl::project(":", DependencyScope::Compile).in_build("plugins")],
        );
        let plugins_node = java(&plugins, "", vec![]);
        let trees = [tree(src, vec![src_node]), tree(plugins, vec![plugins_node])];

        let (modules, _, diagnostics) = run(&trees, "6.5");
        assert!(!modules["app.buildSrc.main"].depends_on("plugins.main"));
        assert!(modules["app.buildSrc.main"].is_degraded());
        assert_eq!(diagnostics.of_kind(DiagnosticKind::HiddenBuild).count(), 1);

        let (modules, _, diagnostics) = run(&trees, "6.7");
        assert!(modules["app.buildSrc.main"].depends_on("plugins.main"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn coordinates_published_by_included_build_become_module_edges() {
        let app = build("app", BuildKind::Root);
        let lib = build("lib", BuildKind::Included);
        let mut published = java(&lib, "core", vec![]);
        published.group = Some("org.acme".into());
        let lib_root = java(&lib, "", vec![]);
        let consumer = java(
            &app,
            "",
            vec![
                DependencyDecl::coordinates("org.acme:core:1.0", DependencyScope::Compile),
                DependencyDecl::coordinates("org.acme:other:1.0", DependencyScope::Compile),
            ],
        );
        let trees = [tree(app, vec![consumer]), tree(lib, vec![lib_root, published])];
        let (modules, libraries, _) = run(&trees, "7.0");
        assert!(modules["app.main"].depends_on("lib.core.main"));
        assert_eq!(libraries.len(), 1);
        assert_eq!(libraries.iter().next().unwrap().presentable_name, "org.acme:other:1.0");
    }

    #[test]
    fn shared_file_library_and_module_level_variant() {
        let app = build("app", BuildKind::Root);
        let a = java(&app, "a", vec![DependencyDecl::file("../libs/x.jar", DependencyScope::Compile)]);
        let b = java(&app, "b", vec![DependencyDecl::file("../libs/x.jar", DependencyScope::Compile)]);
        let trees = [tree(app, vec![a, b])];

        let (modules, libraries, _) = run(&trees, "7.0");
        assert_eq!(libraries.len(), 1);
        let lib = libraries.iter().next().unwrap();
        assert_eq!(lib.file_path(), Some(Path::new("/w/app/libs/x.jar")));
        assert_eq!(modules["app.a.main"].library_dependencies, modules["app.b.main"].library_dependencies);

        let synth = ModuleSynthesizer::default();
        let mut modules = synth.synthesize(&trees).unwrap();
        let mut libraries = LibraryTable::new();
        DependencyResolver::new(&trees, VersionPolicy::flags("7.0"), &synth, &NoInspection)
            .with_module_level_files(true)
            .resolve(&mut modules, &mut libraries, &mut Diagnostics::new());
        // one per declaring module: a.main, a.test, b.main, b.test
        assert_eq!(libraries.len(), 4);
    }
}
