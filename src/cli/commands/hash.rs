//! hash command - Print the content hash of canonicalized text

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::codec::Codec;
use crate::ui::output;

use super::read_text;

/// Print the SHA-256 digest a package would carry for this text.
pub fn hash(ctx: &Context, text: Option<String>, lattice: Option<&str>) -> Result<()> {
    let raw = read_text(text, None)?;
    let canonical = Codec::new(ctx.registry)
        .canonicalize(&raw, ctx.lattice_key(lattice))
        .context("Failed to hash")?;
    output::result(canonical.content_hash());
    Ok(())
}
