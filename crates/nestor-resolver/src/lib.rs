//! Nested-build import resolution.
//!
//! Turns an evaluated multi-build project model into a flat, uniquely named
//! module graph. Data flows strictly downward through the modules of this
//! crate: [`policy`] → [`discovery`] → [`tree`] → [`synth`] → [`deps`], with
//! [`import`] driving one run end to end.

pub mod deps;
pub mod diagnostics;
pub mod discovery;
pub mod graph;
pub mod import;
pub mod library;
pub mod plugins;
pub mod policy;
pub mod synth;
pub mod tree;

pub use import::{import, ImportPhase, ImportRun, Importer, ResolvedImport};
