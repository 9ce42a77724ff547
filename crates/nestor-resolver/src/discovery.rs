//! Enumerates the builds that take part in an import.

use std::collections::{BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

use nestor_core::build::{Build, BuildKind, Settings, BUILD_SRC_DIR};
use nestor_core::model::{BuildDescription, ProjectModel};
use nestor_core::project::ProjectPath;
use nestor_util::errors::{NestorError, NestorResult};
use nestor_util::fs;

use crate::policy::PolicyFlags;

/// Discover all participating builds.
///
/// The result is ordered: the root build, its `buildSrc`, then each included
/// build in declaration order followed by its own `buildSrc`. No directory
/// appears twice.
pub fn discover(model: &ProjectModel, policy: &PolicyFlags) -> NestorResult<Vec<Build>> {
    let (root_key, root_desc) =
        model
            .build_at(Path::new(""))
            .ok_or_else(|| NestorError::Configuration {
                message: format!(
                    "the project model has no build at its root {}",
                    model.root_dir.display()
                ),
            })?;
    let mut root = describe_build(model, root_key, root_desc, BuildKind::Root, None);

    let included = collect_included(model, &root, policy)?;

    let mut seen: BTreeSet<PathBuf> = BTreeSet::new();
    seen.insert(root.model_key.clone());
    seen.extend(included.iter().map(|b| b.model_key.clone()));

    let mut names: BTreeSet<String> = BTreeSet::new();
    names.insert(root.name.clone());
    names.extend(included.iter().map(|b| b.name.clone()));

    let mut builds = Vec::with_capacity(2 + included.len() * 2);
    let root_build_src = build_src_for(model, &mut root, policy, &seen, &mut names)?;
    builds.push(root);
    builds.extend(root_build_src);
    for mut build in included {
        let build_src = build_src_for(model, &mut build, policy, &seen, &mut names)?;
        builds.push(build);
        builds.extend(build_src);
    }

    tracing::debug!(
        "Discovered {} builds: {}",
        builds.len(),
        builds
            .iter()
            .map(|b| b.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(builds)
}

fn describe_build(
    model: &ProjectModel,
    key: PathBuf,
    desc: &BuildDescription,
    kind: BuildKind,
    owner: Option<&Build>,
) -> Build {
    let root_dir = model.absolute_dir(&key);
    let name = match (kind, owner) {
        (BuildKind::BuildSrc, Some(owner)) => format!("{}.{BUILD_SRC_DIR}", owner.name),
        _ => desc
            .name
            .clone()
            .or_else(|| fs::dir_name(&root_dir))
            .unwrap_or_else(|| "root".to_string()),
    };
    Build {
        name,
        kind,
        root_dir,
        model_key: key,
        owner: owner.map(|o| o.name.clone()),
        settings: desc.settings.clone().unwrap_or_default(),
    }
}

/// Breadth-first walk over `includeBuild` entries. Nested includes are only
/// followed one level deep, and only when the policy allows it.
fn collect_included(
    model: &ProjectModel,
    root: &Build,
    policy: &PolicyFlags,
) -> NestorResult<Vec<Build>> {
    let max_level = if policy.transitive_included_builds { 2 } else { 1 };

    let mut seen: BTreeSet<PathBuf> = BTreeSet::new();
    seen.insert(root.model_key.clone());
    let mut included: Vec<Build> = Vec::new();

    let mut pending: VecDeque<(String, PathBuf, Settings, usize)> = VecDeque::new();
    pending.push_back((
        root.name.clone(),
        root.model_key.clone(),
        root.settings.clone(),
        0,
    ));

    while let Some((owner, owner_key, settings, level)) = pending.pop_front() {
        for dir in &settings.include_builds {
            let wanted = fs::resolve(&owner_key, dir);
            let Some((key, desc)) = model.build_at(&wanted) else {
                return Err(NestorError::Configuration {
                    message: format!(
                        "build '{owner}' includes build '{}', but nothing was found at {}",
                        dir.display(),
                        model.absolute_dir(&wanted).display()
                    ),
                }
                .into());
            };
            if !seen.insert(key.clone()) {
                tracing::debug!(
                    "Build at '{}' is already part of the import, skipping",
                    key.display()
                );
                continue;
            }

            let build = describe_build(model, key, desc, BuildKind::Included, None);
            if build.name == root.name || included.iter().any(|b| b.name == build.name) {
                return Err(NestorError::Configuration {
                    message: format!(
                        "included build at '{}' has the name '{}', which is already taken",
                        dir.display(),
                        build.name
                    ),
                }
                .into());
            }
            tracing::debug!("Build '{owner}' includes build '{}'", build.name);

            if level + 1 < max_level {
                pending.push_back((
                    build.name.clone(),
                    build.model_key.clone(),
                    build.settings.clone(),
                    level + 1,
                ));
            } else if !build.settings.include_builds.is_empty() {
                tracing::debug!(
                    "Ignoring builds included by '{}' (nested inclusion is not followed)",
                    build.name
                );
            }
            included.push(build);
        }
    }
    Ok(included)
}

/// The `buildSrc` build of `owner`, if it has one.
///
/// Usually an implicit `BuildSrc` build. When the name is reserved and the
/// owner's settings also `include` it as a project, the directory becomes a
/// single included build instead and the project inclusion is dropped from
/// `owner`. The promoted build's name must not clash with `names`.
fn build_src_for(
    model: &ProjectModel,
    owner: &mut Build,
    policy: &PolicyFlags,
    taken: &BTreeSet<PathBuf>,
    names: &mut BTreeSet<String>,
) -> NestorResult<Option<Build>> {
    let key = fs::normalize(&owner.model_key.join(BUILD_SRC_DIR));
    let as_subproject = owner
        .settings
        .include
        .iter()
        .position(|p| ProjectPath::parse(p) == ProjectPath::parse(BUILD_SRC_DIR));

    if let (Some(pos), true) = (as_subproject, policy.build_src_is_reserved_name) {
        owner.settings.include.remove(pos);
        if taken.contains(&key) {
            return Ok(None);
        }
        let Some((key, desc)) = model.build_at(&key) else {
            tracing::debug!("'{BUILD_SRC_DIR}' included by '{}' does not exist", owner.name);
            return Ok(None);
        };
        let build = describe_build(model, key, desc, BuildKind::Included, None);
        if !names.insert(build.name.clone()) {
            return Err(NestorError::Configuration {
                message: format!(
                    "'{BUILD_SRC_DIR}' of '{}' becomes an included build named '{}', which is already taken",
                    owner.name, build.name
                ),
            }
            .into());
        }
        tracing::warn!(
            "'{BUILD_SRC_DIR}' is a reserved project name, importing it as an included build of '{}'",
            owner.name
        );
        return Ok(Some(build));
    }

    if taken.contains(&key) {
        tracing::debug!(
            "buildSrc of '{}' is an included build, not creating a second one",
            owner.name
        );
        return Ok(None);
    }
    if as_subproject.is_some() {
        tracing::debug!("buildSrc of '{}' is included as a regular project", owner.name);
        return Ok(None);
    }

    let Some((key, desc)) = model.build_at(&key) else {
        return Ok(None);
    };
    if !desc.has_recognizable_content() {
        tracing::debug!(
            "Directory {} has no build content, skipping",
            model.absolute_dir(&key).display()
        );
        return Ok(None);
    }
    let build = describe_build(model, key, desc, BuildKind::BuildSrc, Some(&*owner));
    if !build.settings.include_builds.is_empty() {
        tracing::debug!(
            "Ignoring builds included by '{}' (buildSrc cannot include builds)",
            build.name
        );
    }
    Ok(Some(build))
}
