//! Handler for `nestor policy`.

use miette::Result;
use nestor_resolver::policy::VersionPolicy;
use nestor_util::status::status_warn;

pub fn exec(version: &str) -> Result<()> {
    let resolution = VersionPolicy::resolve(version);
    if let Some(err) = resolution.incompatibility() {
        status_warn("Warning", &err.to_string());
    }

    let flags = resolution.flags;
    println!("Tool version {version} ({})", resolution.range);
    println!("  buildSrc-is-reserved-name:            {}", flags.build_src_is_reserved_name);
    println!(
        "  included-builds-visible-to-buildSrc:  {}",
        flags.included_builds_visible_to_build_src
    );
    println!("  transitive-included-builds:           {}", flags.transitive_included_builds);
    Ok(())
}
