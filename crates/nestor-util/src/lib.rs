//! Shared utilities for nestor.
//!
//! This crate provides cross-cutting concerns used by the other nestor crates:
//! the unified error type, lexical path normalisation, hashing, and
//! terminal status output.

pub mod errors;
pub mod fs;
pub mod hash;
pub mod status;
