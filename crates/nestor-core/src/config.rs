use std::path::{Path, PathBuf};

use nestor_util::errors::NestorError;
use serde::{Deserialize, Serialize};

/// Import options, loaded from `~/.nestor/config.toml` or an explicit file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Fold a project's sole source set into its project module.
    #[serde(default, rename = "merge-single-source-set")]
    pub merge_single_source_set: bool,

    /// Register file libraries per module instead of sharing them project-wide.
    #[serde(default, rename = "module-level-file-libraries")]
    pub module_level_file_libraries: bool,

    #[serde(default = "default_inspect", rename = "inspect-file-metadata")]
    pub inspect_file_metadata: bool,

    /// Overrides the tool version reported by the model.
    #[serde(default, rename = "tool-version")]
    pub tool_version: Option<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            merge_single_source_set: false,
            module_level_file_libraries: false,
            inspect_file_metadata: default_inspect(),
            tool_version: None,
        }
    }
}

fn default_inspect() -> bool {
    true
}

impl ImportConfig {
    /// Load `~/.nestor/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        let path = Self::default_path();
        if path.is_file() {
            Self::from_path(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| NestorError::Generic {
            message: format!("Failed to read import config {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| {
            NestorError::Generic {
                message: format!("Failed to parse import config {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Returns the default path to the config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }
}

/// Returns the path to the nestor data directory (`~/.nestor/`).
pub fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".nestor")
}
