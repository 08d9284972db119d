//! cli
//!
//! Command-line interface layer for QBC.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the log subscriber
//! - Load configuration and delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It owns all file and terminal I/O; the codec it
//! calls into is pure.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::process::ExitCode;

use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;
use crate::core::lattice::LatticeRegistry;
use crate::ui::output::Verbosity;

/// State shared by command handlers.
#[derive(Debug)]
pub struct Context {
    pub verbosity: Verbosity,
    pub config: Config,
    pub registry: &'static LatticeRegistry,
}

impl Context {
    /// Lattice to use: the flag, else the configured default, else the
    /// registry default.
    pub fn lattice_key<'a>(&'a self, flag: Option<&'a str>) -> Option<&'a str> {
        flag.or(self.config.default_lattice())
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse_args();
    init_logging(cli.debug, cli.quiet);

    let registry = LatticeRegistry::global();
    let config = Config::load(cli.config.as_deref(), registry).context("Failed to load config")?;

    let ctx = Context {
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
        config,
        registry,
    };

    commands::dispatch(cli.command, &ctx)
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--debug` selects `debug`,
/// `--quiet` selects `error`, and the default is `warn`.
pub fn init_logging(debug: bool, quiet: bool) {
    let fallback = if debug {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A second install (tests driving `run` twice) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
