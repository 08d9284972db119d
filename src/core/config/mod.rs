//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. `--config <FILE>` (must exist)
//! 2. `$QBC_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/qbc/config.toml`
//! 4. `~/.qbc/config.toml` (canonical location)
//!
//! # Example
//!
//! ```no_run
//! use qbc::core::config::Config;
//! use qbc::core::lattice::LatticeRegistry;
//!
//! let registry = LatticeRegistry::builtin();
//! let config = Config::load(None, &registry).unwrap();
//!
//! println!("Default lattice: {:?}", config.default_lattice());
//! println!("Canvas size: {}", config.render_style().size);
//! ```

pub mod schema;

pub use schema::{QbcConfig, SvgConfig};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::lattice::LatticeRegistry;
use crate::package::svg::RenderStyle;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "QBC_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("config file '{0}' does not exist")]
    NotFound(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: QbcConfig,
    /// Path the file was loaded from (if any)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration, validating it against `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path is missing, or if a config file
    /// exists but cannot be read, parsed, or validated. A missing file in
    /// the default locations is not an error (defaults are used).
    pub fn load(explicit: Option<&Path>, registry: &LatticeRegistry) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
        }

        let candidates = Self::search_paths(
            explicit,
            std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            dirs::home_dir(),
        );

        let config = match candidates.into_iter().find(|path| path.exists()) {
            Some(path) => Self::read(&path)?,
            None => {
                tracing::debug!("no config file found, using defaults");
                Config::default()
            }
        };

        config.file.validate(registry)?;
        Ok(config)
    }

    /// Read and parse one config file without validating it.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// Candidate config files, highest precedence first.
    fn search_paths(
        explicit: Option<&Path>,
        env: Option<PathBuf>,
        xdg_home: Option<PathBuf>,
        home: Option<PathBuf>,
    ) -> Vec<PathBuf> {
        if let Some(path) = explicit {
            return vec![path.to_path_buf()];
        }

        let mut paths = Vec::new();
        paths.extend(env);
        paths.extend(xdg_home.map(|dir| dir.join("qbc/config.toml")));
        paths.extend(home.map(|dir| dir.join(".qbc/config.toml")));
        paths
    }

    /// Get the canonical config path.
    ///
    /// Returns `~/.qbc/config.toml`.
    pub fn canonical_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".qbc/config.toml"))
    }

    // =========================================================================
    // Accessor methods
    // =========================================================================

    /// Lattice used when no key is given.
    ///
    /// Returns `None` if not configured (the registry default applies).
    pub fn default_lattice(&self) -> Option<&str> {
        self.file.default_lattice.as_deref()
    }

    /// SVG style with config overrides applied.
    pub fn render_style(&self) -> RenderStyle {
        self.file
            .svg
            .as_ref()
            .map(SvgConfig::render_style)
            .unwrap_or_default()
    }

    /// Every setting with defaults filled in.
    pub fn effective(&self, registry: &LatticeRegistry) -> QbcConfig {
        QbcConfig {
            default_lattice: Some(
                self.default_lattice()
                    .unwrap_or(registry.default_key().as_str())
                    .to_string(),
            ),
            svg: Some(SvgConfig::from_style(&self.render_style())),
        }
    }

    /// Get the path to the loaded config file.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn load_explicit() {
        let temp = TempDir::new().unwrap();
        let path = write(
            &temp,
            "custom.toml",
            r#"
            default_lattice = "G2"

            [svg]
            size = 300
            "#,
        );

        let config = Config::load(Some(&path), &LatticeRegistry::builtin()).unwrap();
        assert_eq!(config.default_lattice(), Some("G2"));
        assert_eq!(config.render_style().size, 300);
        assert_eq!(config.loaded_from(), Some(path.as_path()));
    }

    #[test]
    fn explicit_missing_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.toml");
        let result = Config::load(Some(&path), &LatticeRegistry::builtin());
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn invalid_lattice_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "config.toml", "default_lattice = \"ZZ\"");
        let result = Config::load(Some(&path), &LatticeRegistry::builtin());
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write(
            &temp,
            "config.toml",
            r#"
            default_lattice = "G1"
            unknown_field = true
            "#,
        );
        let result = Config::load(Some(&path), &LatticeRegistry::builtin());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn search_order() {
        let paths = Config::search_paths(
            None,
            Some(PathBuf::from("/env/qbc.toml")),
            Some(PathBuf::from("/xdg")),
            Some(PathBuf::from("/home/u")),
        );
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/env/qbc.toml"),
                PathBuf::from("/xdg/qbc/config.toml"),
                PathBuf::from("/home/u/.qbc/config.toml"),
            ]
        );
    }

    #[test]
    fn explicit_overrides_search() {
        let paths = Config::search_paths(
            Some(Path::new("/mine.toml")),
            Some(PathBuf::from("/env/qbc.toml")),
            None,
            Some(PathBuf::from("/home/u")),
        );
        assert_eq!(paths, vec![PathBuf::from("/mine.toml")]);
    }

    #[test]
    fn defaults_without_file() {
        let config = Config::default();
        assert!(config.default_lattice().is_none());
        assert_eq!(config.render_style(), RenderStyle::default());
        assert!(config.loaded_from().is_none());
    }

    #[test]
    fn effective_fills_defaults() {
        let registry = LatticeRegistry::builtin();
        let effective = Config::default().effective(&registry);
        assert_eq!(effective.default_lattice.as_deref(), Some("G1"));
        assert_eq!(effective.svg.unwrap().size, Some(512));
    }
}
