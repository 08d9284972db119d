//! canonicalize command - Print text as a lattice sees it

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::codec::Codec;
use crate::ui::output;

use super::read_text;

/// Print the canonical form of the text.
pub fn canonicalize(ctx: &Context, text: Option<String>, lattice: Option<&str>) -> Result<()> {
    let raw = read_text(text, None)?;
    let canonical = Codec::new(ctx.registry)
        .canonicalize(&raw, ctx.lattice_key(lattice))
        .context("Failed to canonicalize")?;
    output::result(canonical);
    Ok(())
}
