//! Library arena with deduplication by identity.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use nestor_core::dependency::MavenCoordinate;
use serde::Serialize;

/// Index into a [`LibraryTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LibraryId(usize);

impl LibraryId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Identity of a library: its coordinates or its normalised absolute path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryKey {
    Coordinates(MavenCoordinate),
    File(PathBuf),
}

impl fmt::Display for LibraryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinates(coord) => write!(f, "{coord}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryLevel {
    /// Shared by every module that references it.
    Project,
    /// Private to a single module.
    Module,
}

#[derive(Debug, Clone, Serialize)]
pub struct Library {
    pub id: LibraryId,
    pub key: LibraryKey,
    pub level: LibraryLevel,
    pub presentable_name: String,
}

impl Library {
    pub fn coordinates(&self) -> Option<&MavenCoordinate> {
        match &self.key {
            LibraryKey::Coordinates(coord) => Some(coord),
            LibraryKey::File(_) => None,
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        match &self.key {
            LibraryKey::File(path) => Some(path),
            LibraryKey::Coordinates(_) => None,
        }
    }
}

/// Reads identity metadata embedded in binary artifacts.
pub trait ArtifactInspector {
    /// `group:artifact:version` recorded inside the artifact, if any.
    fn embedded_identity(&self, path: &Path) -> Option<String>;
}

/// Looks for `META-INF/maven/**/pom.properties` inside a jar.
#[derive(Debug, Clone, Copy, Default)]
pub struct JarInspector;

impl ArtifactInspector for JarInspector {
    fn embedded_identity(&self, path: &Path) -> Option<String> {
        let file = std::fs::File::open(path).ok()?;
        let mut archive = zip::ZipArchive::new(file).ok()?;
        let name = archive
            .file_names()
            .find(|n| n.starts_with("META-INF/maven/") && n.ends_with("/pom.properties"))
            .map(str::to_string)?;
        let mut entry = archive.by_name(&name).ok()?;
        let mut content = String::new();
        entry.read_to_string(&mut content).ok()?;
        pom_properties_identity(&content)
    }
}

/// Never inspects anything; file libraries are named by path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInspection;

impl ArtifactInspector for NoInspection {
    fn embedded_identity(&self, _path: &Path) -> Option<String> {
        None
    }
}

fn pom_properties_identity(content: &str) -> Option<String> {
    let mut group = None;
    let mut artifact = None;
    let mut version = None;
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "groupId" => group = Some(value),
            "artifactId" => artifact = Some(value),
            "version" => version = Some(value),
            _ => {}
        }
    }
    Some(format!("{}:{}:{}", group?, artifact?, version?))
}

/// Display name for a library key.
pub fn presentable_name(key: &LibraryKey, inspector: &dyn ArtifactInspector) -> String {
    match key {
        LibraryKey::Coordinates(coord) => coord.to_string(),
        LibraryKey::File(path) => inspector
            .embedded_identity(path)
            .unwrap_or_else(|| path.display().to_string()),
    }
}

/// Arena of libraries. Project-level libraries are interned by key so each
/// identity appears once; module-level ones are always fresh entries.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct LibraryTable {
    libraries: Vec<Library>,
    #[serde(skip)]
    index: HashMap<LibraryKey, LibraryId>,
}

impl LibraryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the project-level library for `key`, creating it on first use.
    pub fn intern(&mut self, key: LibraryKey, inspector: &dyn ArtifactInspector) -> LibraryId {
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = self.push(key.clone(), LibraryLevel::Project, inspector);
        self.index.insert(key, id);
        id
    }

    pub fn add_module_level(&mut self, key: LibraryKey, inspector: &dyn ArtifactInspector) -> LibraryId {
        self.push(key, LibraryLevel::Module, inspector)
    }

    fn push(&mut self, key: LibraryKey, level: LibraryLevel, inspector: &dyn ArtifactInspector) -> LibraryId {
        let id = LibraryId(self.libraries.len());
        let presentable_name = presentable_name(&key, inspector);
        tracing::trace!("Registering {level:?} library {presentable_name}");
        self.libraries.push(Library {
            id,
            key,
            level,
            presentable_name,
        });
        id
    }

    pub fn get(&self, id: LibraryId) -> Option<&Library> {
        self.libraries.get(id.0)
    }

    /// Project-level library registered for `key`.
    pub fn find(&self, key: &LibraryKey) -> Option<&Library> {
        self.index.get(key).and_then(|id| self.get(*id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Library> {
        self.libraries.iter()
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}
