//! lattices command - List the registered lattices

use anyhow::Result;

use crate::cli::Context;
use crate::ui::output;

/// Print one line per lattice; the default is marked with `*`.
pub fn lattices(ctx: &Context) -> Result<()> {
    let default = ctx.lattice_key(None).unwrap_or(ctx.registry.default_key().as_str());

    for lattice in ctx.registry.iter() {
        let marker = if lattice.key().as_str() == default { '*' } else { ' ' };
        output::result(format!(
            "{marker} {:<4} {}  {:<8} {:>3} anchors  {}",
            lattice.key().as_str(),
            lattice.dimension(),
            lattice.casing().as_str(),
            lattice.len(),
            lattice.description()
        ));
    }
    Ok(())
}
