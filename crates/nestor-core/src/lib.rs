//! Core data types for nestor.
//!
//! This crate defines the input project model produced by the external build
//! tool, the build/project/source-set vocabulary the resolver works with,
//! dependency declarations, tool versions, and the import configuration.
//!
//! This crate is intentionally free of resolution logic and network I/O.

pub mod build;
pub mod config;
pub mod dependency;
pub mod model;
pub mod project;
pub mod source_set;
pub mod version;
