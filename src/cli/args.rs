//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// QBC - Geometric lattice text codec
#[derive(Parser, Debug)]
#[command(name = "qbc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use this config file instead of the default locations
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode text into a glyph package
    #[command(
        name = "encode",
        long_about = "Encode text into a glyph package.\n\n\
            The text is canonicalized for the chosen lattice (case folding, \
            accent stripping, unsupported characters mapped to the separator) \
            and drawn as a path of move, line and tick events. The result is \
            written as a JSON package or as an SVG with the package embedded.",
        after_help = "\
EXAMPLES:
    # Encode a phrase on the default lattice
    qbc encode \"Hello, world!\"

    # Write an SVG on the case-preserving lattice
    qbc encode --lattice G2 --format svg -o hello.svg \"Hello\"

    # Encode a file
    qbc encode --input notes.txt > notes.qbc.json"
    )]
    Encode {
        /// Text to encode (reads --input or stdin when omitted)
        text: Option<String>,

        /// Read text from a file ('-' for stdin)
        #[arg(long, short, value_name = "FILE", conflicts_with = "text")]
        input: Option<PathBuf>,

        /// Lattice key (defaults to the configured or built-in default)
        #[arg(long, short)]
        lattice: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Decode a JSON package or SVG back into text
    #[command(
        name = "decode",
        long_about = "Decode a glyph package back into text.\n\n\
            Accepts a JSON package or an SVG with an embedded package (detected \
            automatically). Vertices that match no anchor decode as U+FFFD and \
            lower the confidence; a partial decode is reported, not an error.",
        after_help = "\
EXAMPLES:
    qbc decode hello.svg
    qbc decode --json notes.qbc.json
    cat hello.svg | qbc decode --strict"
    )]
    Decode {
        /// Package file ('-' or omitted for stdin)
        file: Option<PathBuf>,

        /// Print the full decode result as JSON
        #[arg(long)]
        json: bool,

        /// Exit with status 2 unless the decode is exact
        #[arg(long)]
        strict: bool,
    },

    /// Print the content hash of canonicalized text
    Hash {
        /// Text to hash (reads stdin when omitted)
        text: Option<String>,

        /// Lattice key
        #[arg(long, short)]
        lattice: Option<String>,
    },

    /// Print text as canonicalized for a lattice
    Canonicalize {
        /// Text to canonicalize (reads stdin when omitted)
        text: Option<String>,

        /// Lattice key
        #[arg(long, short)]
        lattice: Option<String>,
    },

    /// List the registered lattices
    Lattices,

    /// Show package metadata and a path summary
    Inspect {
        /// Package file ('-' or omitted for stdin)
        file: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file in use, or where one would be read from
    Path,
}

/// Package output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Svg,
}

/// Supported shells for completion
#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_encode() {
        let cli = Cli::try_parse_from(["qbc", "encode", "-l", "G2", "--format", "svg", "hi"]).unwrap();
        match cli.command {
            Command::Encode {
                text,
                lattice,
                format,
                ..
            } => {
                assert_eq!(text.as_deref(), Some("hi"));
                assert_eq!(lattice.as_deref(), Some("G2"));
                assert_eq!(format, OutputFormat::Svg);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn text_and_input_conflict() {
        let result = Cli::try_parse_from(["qbc", "encode", "--input", "a.txt", "hi"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["qbc", "lattices", "-q", "--config", "c.toml"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
    }
}
