//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "nestor",
    version,
    about = "Resolve nested builds into a flat IDE module graph",
    long_about = "nestor reads an evaluated multi-build project model (root build, buildSrc, \
                  included builds) and resolves it into uniquely named modules with \
                  module and library dependencies."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a project model and print its modules
    Resolve {
        /// Project model file (.json or .toml)
        model: PathBuf,
        /// Import config file (defaults to ~/.nestor/config.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the tool version reported by the model
        #[arg(long)]
        tool_version: Option<String>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the dependency tree of one module
    Tree {
        /// Project model file (.json or .toml)
        model: PathBuf,
        /// Module id, e.g. `project.buildSrc.main`
        module: String,
        /// Maximum depth to display
        #[arg(short, long)]
        depth: Option<usize>,
        /// Import config file (defaults to ~/.nestor/config.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// List the modules depending on it instead
        #[arg(short, long)]
        invert: bool,
    },

    /// Show the topology rules applied for a tool version
    Policy {
        /// Tool version, e.g. `6.7.1`
        version: String,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
