//! One import run, end to end.

use std::path::Path;

use nestor_core::build::Build;
use nestor_core::config::ImportConfig;
use nestor_core::dependency::DependencyScope;
use nestor_core::model::ProjectModel;
use nestor_util::errors::NestorResult;
use nestor_util::hash::sha256_lines;
use serde::Serialize;

use crate::deps::DependencyResolver;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::discovery;
use crate::library::{ArtifactInspector, JarInspector, Library, LibraryTable, NoInspection};
use crate::plugins::PluginCatalog;
use crate::policy::{PolicyFlags, VersionPolicy};
use crate::synth::{Module, ModuleSynthesizer, ModuleTable};
use crate::tree::{self, BuildTree};

/// Progress of an import run. Phases only move forward; any fatal error
/// moves the run to `Failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportPhase {
    #[default]
    Idle,
    Discovering,
    TreeResolving,
    Synthesizing,
    DependencyResolving,
    Resolved,
    Failed,
}

#[derive(Debug, Default)]
pub struct ImportRun {
    phase: ImportPhase,
}

impl ImportRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ImportPhase {
        self.phase
    }

    fn enter(&mut self, next: ImportPhase) {
        tracing::debug!("Import phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }
}

/// The output of a successful run.
#[derive(Debug, Serialize)]
pub struct ResolvedImport {
    pub tool_version: String,
    pub policy: PolicyFlags,
    pub builds: Vec<Build>,
    pub modules: ModuleTable,
    pub libraries: LibraryTable,
    pub diagnostics: Diagnostics,
}

impl ResolvedImport {
    pub fn module(&self, id: &str) -> Option<&Module> {
        self.modules.get(id)
    }

    pub fn module_ids(&self) -> Vec<&str> {
        self.modules.keys().map(|id| id.as_str()).collect()
    }

    pub fn build(&self, name: &str) -> Option<&Build> {
        self.builds.iter().find(|b| b.name == name)
    }

    /// Libraries attached to `module`, with the scope of each edge.
    pub fn libraries_of(&self, module: &str) -> Vec<(&Library, DependencyScope)> {
        let Some(module) = self.module(module) else {
            return Vec::new();
        };
        module
            .library_dependencies
            .iter()
            .filter_map(|dep| Some((self.libraries.get(dep.library)?, dep.scope)))
            .collect()
    }

    pub fn is_degraded(&self) -> bool {
        self.modules.values().any(Module::is_degraded)
    }

    /// Hash over the canonical rendering of builds, modules, edges and
    /// diagnostics. Identical inputs give identical fingerprints.
    pub fn fingerprint(&self) -> String {
        let mut lines = Vec::new();
        for build in &self.builds {
            lines.push(format!("build {} {} {}", build.name, build.kind, build.root_dir.display()));
        }
        for module in self.modules.values() {
            lines.push(format!(
                "module {} {:?} {}",
                module.id,
                module.status,
                module.content_root.display()
            ));
            for root in &module.source_roots {
                lines.push(format!("  root {}", root.display()));
            }
            for dep in &module.module_dependencies {
                lines.push(format!("  module {} {}", dep.target, dep.scope));
            }
            for dep in &module.library_dependencies {
                if let Some(library) = self.libraries.get(dep.library) {
                    lines.push(format!(
                        "  library {} {:?} {}",
                        library.key, library.level, dep.scope
                    ));
                }
            }
        }
        for diagnostic in self.diagnostics.iter() {
            lines.push(format!("diagnostic {diagnostic}"));
        }
        sha256_lines(lines)
    }
}

/// Drives discovery, tree resolution, synthesis and dependency resolution.
pub struct Importer {
    config: ImportConfig,
    inspector: Box<dyn ArtifactInspector>,
}

impl Importer {
    pub fn new(config: ImportConfig) -> Self {
        let inspector: Box<dyn ArtifactInspector> = if config.inspect_file_metadata {
            Box::new(JarInspector)
        } else {
            Box::new(NoInspection)
        };
        Self { config, inspector }
    }

    pub fn with_inspector(mut self, inspector: Box<dyn ArtifactInspector>) -> Self {
        self.inspector = inspector;
        self
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn import(&self, model: &ProjectModel) -> NestorResult<ResolvedImport> {
        self.run(model, &mut ImportRun::new())
    }

    /// Like [`Importer::import`], recording progress in `run`.
    pub fn run(&self, model: &ProjectModel, run: &mut ImportRun) -> NestorResult<ResolvedImport> {
        match self.run_phases(model, run) {
            Ok(resolved) => {
                run.enter(ImportPhase::Resolved);
                tracing::info!(
                    "Imported {} builds into {} modules and {} libraries",
                    resolved.builds.len(),
                    resolved.modules.len(),
                    resolved.libraries.len()
                );
                Ok(resolved)
            }
            Err(err) => {
                run.enter(ImportPhase::Failed);
                Err(err)
            }
        }
    }

    fn run_phases(&self, model: &ProjectModel, run: &mut ImportRun) -> NestorResult<ResolvedImport> {
        let tool_version = self
            .config
            .tool_version
            .clone()
            .unwrap_or_else(|| model.tool_version.clone());
        let policy = VersionPolicy::resolve(&tool_version);
        let mut diagnostics = Diagnostics::new();
        if let Some(err) = policy.incompatibility() {
            diagnostics.push(Diagnostic::from_error(
                None,
                DiagnosticKind::VersionIncompatibility,
                &err,
            ));
        }

        run.enter(ImportPhase::Discovering);
        let builds = discovery::discover(model, &policy.flags)?;

        run.enter(ImportPhase::TreeResolving);
        let trees: Vec<BuildTree> = builds
            .iter()
            .map(|build| {
                let catalog = PluginCatalog::for_build(build, &builds, model, &policy.flags);
                tree::resolve(build, model, &catalog)
            })
            .collect();

        run.enter(ImportPhase::Synthesizing);
        let synthesizer = ModuleSynthesizer::new(self.config.merge_single_source_set);
        let mut modules = synthesizer.synthesize(&trees)?;

        run.enter(ImportPhase::DependencyResolving);
        let mut libraries = LibraryTable::new();
        DependencyResolver::new(&trees, policy.flags, &synthesizer, self.inspector.as_ref())
            .with_module_level_files(self.config.module_level_file_libraries)
            .resolve(&mut modules, &mut libraries, &mut diagnostics);

        Ok(ResolvedImport {
            tool_version,
            policy: policy.flags,
            builds,
            modules,
            libraries,
            diagnostics,
        })
    }
}

/// Import `model` with the default configuration.
pub fn import(model: &ProjectModel) -> NestorResult<ResolvedImport> {
    Importer::new(ImportConfig::default()).import(model)
}

/// Load a model file and import it with `config`.
pub fn import_path(path: &Path, config: ImportConfig) -> NestorResult<ResolvedImport> {
    let model = ProjectModel::from_path(path)?;
    Importer::new(config).import(&model)
}
