//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Reads its input (argument, file, or stdin)
//! 2. Calls the codec with the lattice chosen by flag or config
//! 3. Formats and writes output
//!
//! Handlers own every byte of I/O; the codec never touches the filesystem.

mod canonicalize;
mod completion;
mod config_cmd;
mod decode;
mod encode;
mod hash;
mod inspect;
mod lattices;

// Re-export command functions for testing and direct invocation
pub use canonicalize::canonicalize;
pub use completion::completion;
pub use config_cmd::{path as config_path, show as config_show};
pub use decode::decode;
pub use encode::encode;
pub use hash::hash;
pub use inspect::inspect;
pub use lattices::lattices;

use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context as _, Result};

use crate::cli::args::{Command, ConfigAction};
use crate::cli::Context;
use crate::package::schema::{self, GlyphPackage};
use crate::package::svg;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<ExitCode> {
    match command {
        Command::Encode {
            text,
            input,
            lattice,
            format,
            output,
        } => encode::encode(
            ctx,
            text,
            input.as_deref(),
            lattice.as_deref(),
            format,
            output.as_deref(),
        )
        .map(|()| ExitCode::SUCCESS),
        Command::Decode { file, json, strict } => decode::decode(ctx, file.as_deref(), json, strict),
        Command::Hash { text, lattice } => {
            hash::hash(ctx, text, lattice.as_deref()).map(|()| ExitCode::SUCCESS)
        }
        Command::Canonicalize { text, lattice } => {
            canonicalize::canonicalize(ctx, text, lattice.as_deref()).map(|()| ExitCode::SUCCESS)
        }
        Command::Lattices => lattices::lattices(ctx).map(|()| ExitCode::SUCCESS),
        Command::Inspect { file } => inspect::inspect(ctx, file.as_deref()).map(|()| ExitCode::SUCCESS),
        Command::Config { action } => match action {
            ConfigAction::Show => config_cmd::show(ctx),
            ConfigAction::Path => config_cmd::path(ctx),
        }
        .map(|()| ExitCode::SUCCESS),
        Command::Completion { shell } => completion::completion(shell).map(|()| ExitCode::SUCCESS),
    }
}

/// Read a whole file, or stdin for `None` and `-`.
pub(crate) fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Text from the argument if given, else from `input` or stdin.
pub(crate) fn read_text(text: Option<String>, input: Option<&Path>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => read_input(input),
    }
}

/// Write to a file, or stdout for `None`.
pub(crate) fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Failed to write '{}'", path.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|()| {
                    if content.ends_with('\n') {
                        Ok(())
                    } else {
                        stdout.write_all(b"\n")
                    }
                })
                .context("Failed to write stdout")
        }
    }
}

/// Whether `input` looks like an SVG (or any XML) document rather than JSON.
pub(crate) fn looks_like_svg(input: &str) -> bool {
    input.trim_start_matches('\u{feff}').trim_start().starts_with('<')
}

/// Parse a package from JSON or SVG text.
pub(crate) fn parse_package(input: &str) -> Result<GlyphPackage> {
    let package = if looks_like_svg(input) {
        svg::from_svg(input).context("Failed to extract package from SVG")?
    } else {
        schema::from_json(input).context("Failed to parse package")?
    };
    Ok(package)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_detection() {
        assert!(looks_like_svg("<svg/>"));
        assert!(looks_like_svg("\n  <?xml version=\"1.0\"?><svg/>"));
        assert!(looks_like_svg("\u{feff}<svg/>"));
        assert!(!looks_like_svg("{\"version\": \"1.0\"}"));
        assert!(!looks_like_svg(""));
    }

    #[test]
    fn read_text_prefers_argument() {
        assert_eq!(read_text(Some("hi".into()), None).unwrap(), "hi");
    }

    #[test]
    fn write_then_read_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("out.json");
        write_output(Some(&path), "{}").unwrap();
        assert_eq!(read_input(Some(&path)).unwrap(), "{}");
    }

    #[test]
    fn missing_file_has_context() {
        let err = read_input(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
