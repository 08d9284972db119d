//! encode command - Encode text into a JSON package or SVG

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::args::OutputFormat;
use crate::cli::Context;
use crate::codec::Codec;
use crate::core::types::UtcTimestamp;
use crate::package::{schema, svg};
use crate::ui::output;

use super::{read_text, write_output};

/// Encode text and write the package.
pub fn encode(
    ctx: &Context,
    text: Option<String>,
    input: Option<&Path>,
    lattice: Option<&str>,
    format: OutputFormat,
    out: Option<&Path>,
) -> Result<()> {
    let raw = read_text(text, input)?;
    let codec = Codec::new(ctx.registry);

    let canonical = codec
        .canonicalize(&raw, ctx.lattice_key(lattice))
        .context("Failed to encode")?;
    if canonical.as_str() != raw.trim() {
        tracing::debug!(canonical = %canonical, "input text was canonicalized");
    }

    let package = codec
        .package(&canonical, UtcTimestamp::now())
        .context("Failed to encode")?;

    let content = match format {
        OutputFormat::Json => schema::to_json(&package)?,
        OutputFormat::Svg => svg::to_svg(&package, &ctx.config.render_style())?,
    };

    write_output(out, &content)?;

    if let Some(path) = out {
        output::success(
            format!(
                "Wrote {} ({} events on lattice {})",
                path.display(),
                package.path.len(),
                package.metadata.lattice_key
            ),
            ctx.verbosity,
        );
    }

    Ok(())
}
