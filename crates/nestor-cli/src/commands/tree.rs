//! Handler for `nestor tree`.

use std::path::Path;

use miette::Result;
use nestor_resolver::graph::ModuleGraph;
use nestor_resolver::import::Importer;
use nestor_util::errors::NestorError;
use nestor_util::status::status_info;

pub fn exec(
    model: &Path,
    module: &str,
    depth: Option<usize>,
    config: Option<&Path>,
    invert: bool,
) -> Result<()> {
    let config = super::load_config(config)?;
    let model = nestor_core::model::ProjectModel::from_path(model)?;
    let resolved = Importer::new(config).import(&model)?;

    status_info(
        "Imported",
        &format!(
            "{} modules and {} libraries",
            resolved.modules.len(),
            resolved.libraries.len()
        ),
    );

    let graph = ModuleGraph::from_import(&resolved);
    let Some(idx) = graph.find(module) else {
        return Err(NestorError::Generic {
            message: format!("Module '{module}' is not part of the import"),
        }
        .into());
    };

    if invert {
        let dependents = graph.dependents_of(idx);
        if dependents.is_empty() {
            println!("Nothing depends on {module}.");
            return Ok(());
        }
        println!("{module} is used by:");
        for id in dependents {
            println!("  {id}");
        }
        return Ok(());
    }

    print!("{}", graph.print_tree(idx, depth));
    Ok(())
}
