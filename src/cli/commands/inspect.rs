//! inspect command - Show package metadata and a path summary

use std::path::Path;

use anyhow::Result;

use crate::cli::Context;
use crate::ui::output;

use super::{parse_package, read_input};

/// Print metadata and event counts without decoding.
pub fn inspect(ctx: &Context, file: Option<&Path>) -> Result<()> {
    let package = parse_package(&read_input(file)?)?;
    let meta = &package.metadata;
    let summary = package.path.summary();

    output::result(format!("version:      {}", package.version));
    output::result(format!("lattice:      {}", meta.lattice_key));
    output::result(format!("dimension:    {}", meta.dimension));
    output::result(format!("content_hash: {}", meta.content_hash));
    output::result(format!("created_at:   {}", meta.created_at));
    output::result(format!(
        "events:       {} ({} move, {} line, {} tick)",
        summary.events(),
        summary.moves,
        summary.lines,
        summary.ticks
    ));
    output::result(format!("path length:  {:.4}", summary.length));

    if !ctx.registry.contains(meta.lattice_key.as_str()) {
        output::warn(
            format!("lattice '{}' is not registered; this package cannot be decoded here", meta.lattice_key),
            ctx.verbosity,
        );
    }
    Ok(())
}
