//! What applying a plugin contributes to a project.
//!
//! Built-in plugin ids map to a fixed [`Contribution`]. Convention plugins
//! published by other builds of the import are looked up through a
//! [`PluginCatalog`], which knows which builds the requesting build may see.

use std::collections::BTreeMap;

use nestor_core::build::{Build, BuildKind};
use nestor_core::model::{ConventionPlugin, ProjectModel};
use nestor_core::source_set::{Language, SourceSet};

use crate::policy::PolicyFlags;

const JVM: &[Language] = &[Language::Java];
const GROOVY: &[Language] = &[Language::Java, Language::Groovy];
const KOTLIN: &[Language] = &[Language::Java, Language::Kotlin];
const SCALA: &[Language] = &[Language::Java, Language::Scala];

/// Effect of a built-in plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contribution {
    /// `main` and `test`, with `test` extending `main`.
    Languages(&'static [Language]),
    /// Only a `main` source set.
    MainOnly(&'static [Language]),
    /// A `testFixtures` source set between `main` and `test`.
    TestFixtures,
    /// Applies other plugins.
    Applies(&'static [&'static str]),
    Nothing,
}

/// Look up a built-in plugin id.
pub fn builtin(id: &str) -> Option<Contribution> {
    let contribution = match id {
        "java" | "java-library" | "application" | "war" => Contribution::Languages(JVM),
        "groovy" => Contribution::Languages(GROOVY),
        "org.jetbrains.kotlin.jvm" | "kotlin" => Contribution::Languages(KOTLIN),
        "scala" => Contribution::Languages(SCALA),
        "java-gradle-plugin" => Contribution::Applies(&["java-library"]),
        "groovy-gradle-plugin" => Contribution::Applies(&["java-gradle-plugin", "groovy"]),
        "kotlin-dsl" => Contribution::Applies(&["java-gradle-plugin", "org.jetbrains.kotlin.jvm"]),
        "com.gradle.plugin-publish" => Contribution::MainOnly(JVM),
        "java-test-fixtures" => Contribution::TestFixtures,
        "base" | "java-platform" | "java-base" | "maven-publish" | "idea" | "eclipse" => {
            Contribution::Nothing
        }
        _ => return None,
    };
    Some(contribution)
}

impl Contribution {
    pub fn source_sets(self) -> Vec<SourceSet> {
        match self {
            Self::Languages(langs) => vec![
                with_languages(SourceSet::new("main"), langs),
                with_languages(SourceSet::new("test"), langs).with_extends("main"),
            ],
            Self::MainOnly(langs) => vec![with_languages(SourceSet::new("main"), langs)],
            Self::TestFixtures => vec![
                SourceSet::new("testFixtures")
                    .with_language(Language::Java)
                    .with_extends("main"),
                SourceSet::new("test").with_extends("testFixtures"),
            ],
            Self::Applies(_) | Self::Nothing => Vec::new(),
        }
    }

    pub fn applies(self) -> &'static [&'static str] {
        match self {
            Self::Applies(ids) => ids,
            _ => &[],
        }
    }
}

fn with_languages(set: SourceSet, langs: &[Language]) -> SourceSet {
    langs.iter().fold(set, |set, lang| set.with_language(*lang))
}

/// Outcome of looking a plugin id up for one requesting build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PluginLookup<'a> {
    Builtin(Contribution),
    Convention {
        provider: &'a str,
        plugin: &'a ConventionPlugin,
    },
    /// Published only by a build the requester may not see.
    Hidden { provider: &'a str },
    Unknown,
}

struct Provider<'a> {
    build: &'a str,
    visible: bool,
    plugins: &'a BTreeMap<String, ConventionPlugin>,
}

/// Convention plugins of the other builds, as seen from one build.
pub struct PluginCatalog<'a> {
    providers: Vec<Provider<'a>>,
}

impl<'a> PluginCatalog<'a> {
    /// A build sees the plugins of its own `buildSrc` and of every included
    /// build. A `buildSrc` build sees included builds only when the policy
    /// makes them visible to it.
    pub fn for_build(
        requester: &Build,
        builds: &'a [Build],
        model: &'a ProjectModel,
        policy: &PolicyFlags,
    ) -> Self {
        let providers = builds
            .iter()
            .filter(|b| b.name != requester.name)
            .filter_map(|b| {
                let (_, desc) = model.build_at(&b.model_key)?;
                if desc.plugins.is_empty() {
                    return None;
                }
                let visible = match b.kind {
                    BuildKind::BuildSrc => b.owner.as_deref() == Some(requester.name.as_str()),
                    BuildKind::Root => false,
                    BuildKind::Included => policy.can_see(requester.kind, BuildKind::Included),
                };
                Some(Provider {
                    build: b.name.as_str(),
                    visible,
                    plugins: &desc.plugins,
                })
            })
            .collect();
        Self { providers }
    }

    pub fn lookup(&self, id: &str) -> PluginLookup<'a> {
        if let Some(contribution) = builtin(id) {
            return PluginLookup::Builtin(contribution);
        }
        let mut hidden = None;
        for provider in &self.providers {
            if let Some(plugin) = provider.plugins.get(id) {
                if provider.visible {
                    return PluginLookup::Convention {
                        provider: provider.build,
                        plugin,
                    };
                }
                hidden.get_or_insert(provider.build);
            }
        }
        match hidden {
            Some(provider) => PluginLookup::Hidden { provider },
            None => PluginLookup::Unknown,
        }
    }
}
