//! config command - Show configuration and where it comes from

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::config::Config;
use crate::ui::output;

/// Print the effective configuration as TOML.
pub fn show(ctx: &Context) -> Result<()> {
    let effective = ctx.config.effective(ctx.registry);
    let rendered = toml::to_string_pretty(&effective).context("Failed to render config")?;
    output::result(rendered.trim_end());

    match ctx.config.loaded_from() {
        Some(path) => output::print(format!("# loaded from {}", path.display()), ctx.verbosity),
        None => output::print("# no config file found, showing defaults", ctx.verbosity),
    }
    Ok(())
}

/// Print the config file in use.
///
/// With no file loaded, prints the canonical location instead.
pub fn path(ctx: &Context) -> Result<()> {
    if let Some(path) = ctx.config.loaded_from() {
        output::result(path.display());
        return Ok(());
    }

    output::result(Config::canonical_path()?.display());
    output::print("(not present)", ctx.verbosity);
    Ok(())
}
