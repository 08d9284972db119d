//! decode command - Decode a JSON package or SVG back into text

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::codec::Decoder;
use crate::ui::output;

use super::{looks_like_svg, read_input};

/// Exit status for `--strict` when the decode is not exact.
const INEXACT_EXIT: u8 = 2;

/// Decode a package and print the text.
pub fn decode(ctx: &Context, file: Option<&Path>, json: bool, strict: bool) -> Result<ExitCode> {
    let input = read_input(file)?;
    let mut decoder = Decoder::new(ctx.registry);

    let decoded = if looks_like_svg(&input) {
        decoder.decode_svg(&input)
    } else {
        decoder.decode_json(&input)
    }
    .context("Failed to decode")?;

    if json {
        output::result(serde_json::to_string_pretty(&decoded)?);
    } else {
        output::result(&decoded.text);
        output::print(
            format!(
                "lattice {}, confidence {}",
                decoded.lattice_key,
                output::format_confidence(decoded.confidence)
            ),
            ctx.verbosity,
        );
        for note in &decoded.notes {
            output::warn(note, ctx.verbosity);
        }
    }

    if strict && !decoded.is_exact() {
        return Ok(ExitCode::from(INEXACT_EXIT));
    }
    Ok(ExitCode::SUCCESS)
}
