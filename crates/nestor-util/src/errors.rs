use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all nestor operations.
///
/// `Configuration` and `ResolutionConflict` abort an import run.
/// `DependencyResolution` and `VersionIncompatibility` never do: the import
/// pipeline turns them into diagnostics and keeps going.
#[derive(Debug, Error, Diagnostic)]
pub enum NestorError {
    /// The project model handed over by the build tool could not be read.
    #[error("Project model error: {message}")]
    #[diagnostic(help("The model must be JSON (.json) or TOML"))]
    Model { message: String },

    /// Malformed settings reference, such as a missing included build.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check the settings of the build named in the message"))]
    Configuration { message: String },

    /// Two distinct (build, project, source set) triples produced the same module id.
    #[error("Module id '{id}' is produced by both {first} and {second}")]
    ResolutionConflict {
        id: String,
        first: String,
        second: String,
    },

    /// A dependency of one module could not be resolved.
    #[error("Unresolved dependency in '{module}': {message}")]
    DependencyResolution { module: String, message: String },

    /// The tool version is outside every known policy range.
    #[error("Unrecognized tool version '{version}', using the {fallback} rules")]
    VersionIncompatibility { version: String, fallback: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

impl NestorError {
    /// Returns `true` for the kinds that abort a whole import run.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::DependencyResolution { .. } | Self::VersionIncompatibility { .. }
        )
    }
}

/// Convenience alias for `miette::Result<T>`.
pub type NestorResult<T> = miette::Result<T>;
