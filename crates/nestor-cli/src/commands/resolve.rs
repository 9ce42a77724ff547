//! Handler for `nestor resolve`.

use std::path::Path;

use miette::Result;
use nestor_resolver::import::import_path;
use nestor_util::errors::NestorError;
use nestor_util::status::{status, status_warn};

pub fn exec(
    model: &Path,
    config: Option<&Path>,
    tool_version: Option<String>,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let mut config = super::load_config(config)?;
    if tool_version.is_some() {
        config.tool_version = tool_version;
    }

    let resolved = import_path(model, config)?;

    if json {
        let out = serde_json::to_string_pretty(&resolved).map_err(|e| NestorError::Generic {
            message: format!("Failed to serialize import result: {e}"),
        })?;
        println!("{out}");
        return Ok(());
    }

    status(
        "Resolved",
        &format!(
            "{} builds into {} modules and {} libraries (tool version {})",
            resolved.builds.len(),
            resolved.modules.len(),
            resolved.libraries.len(),
            resolved.tool_version
        ),
    );

    for build in &resolved.builds {
        println!("{} [{}] {}", build.name, build.kind, build.root_dir.display());
    }
    println!();
    for module in resolved.modules.values() {
        let marker = if module.is_degraded() { " (degraded)" } else { "" };
        println!("{}{marker}", module.id);
        for dep in &module.module_dependencies {
            println!("  -> {} [{}]", dep.target, dep.scope);
        }
        for (library, scope) in resolved.libraries_of(module.id.as_str()) {
            println!("  => {} [{}]", library.presentable_name, scope);
        }
    }

    if !resolved.diagnostics.is_empty() {
        println!();
        print!("{}", resolved.diagnostics);
        status_warn(
            "Warning",
            &format!("{} problems during import", resolved.diagnostics.len()),
        );
    }

    if verbose {
        println!();
        println!("fingerprint: {}", resolved.fingerprint());
    }
    Ok(())
}
