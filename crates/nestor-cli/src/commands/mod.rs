//! Command dispatch and handler modules.

mod policy;
mod resolve;
mod tree;

use std::path::Path;

use miette::Result;
use nestor_core::config::ImportConfig;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Resolve {
            model,
            config,
            tool_version,
            json,
        } => resolve::exec(&model, config.as_deref(), tool_version, json, cli.verbose),
        Command::Tree {
            model,
            module,
            depth,
            config,
            invert,
        } => tree::exec(&model, &module, depth, config.as_deref(), invert),
        Command::Policy { version } => policy::exec(&version),
    }
}

/// An explicit config file, or the user's default one.
fn load_config(path: Option<&Path>) -> Result<ImportConfig> {
    match path {
        Some(path) => ImportConfig::from_path(path),
        None => ImportConfig::load(),
    }
}
