//! codec
//!
//! Text to glyph package and back.
//!
//! # Modules
//!
//! - [`event`] - Path events and encoded paths
//! - [`encoder`] - Canonical text to events
//! - [`decoder`] - Events to text with a confidence score
//! - [`error`] - Caller-facing error kinds
//!
//! # Entry Points
//!
//! [`Codec`] binds the operations to a registry. The free functions
//! [`encode_to_package`], [`decode_package`] and [`decode_svg`] use the
//! process-wide built-in registry. All of them are pure: no I/O, no shared
//! mutable state, safe to call from any number of threads.
//!
//! # Example
//!
//! ```
//! use qbc::codec::{decode_package, decode_svg, encode_to_package};
//! use qbc::package::svg::{to_svg, RenderStyle};
//!
//! let package = encode_to_package("Hello, world!", None).unwrap();
//! let decoded = decode_package(&package).unwrap();
//! assert_eq!(decoded.text, "HELLO, WORLD!");
//! assert!(decoded.is_exact());
//!
//! let svg = to_svg(&package, &RenderStyle::default()).unwrap();
//! assert_eq!(decode_svg(&svg).unwrap(), decoded);
//! ```

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod event;

pub use decoder::{DecodeResult, DecodeState, DecodeStatus, Decoder};
pub use error::CodecError;
pub use event::{EncodedPath, EventKind, PathEvent, PathSummary};

use crate::core::canonical::{canonicalize, CanonicalText};
use crate::core::lattice::LatticeRegistry;
use crate::core::types::UtcTimestamp;
use crate::package::schema::GlyphPackage;

/// Codec operations over one registry.
#[derive(Debug, Clone, Copy)]
pub struct Codec<'r> {
    registry: &'r LatticeRegistry,
}

impl<'r> Codec<'r> {
    pub fn new(registry: &'r LatticeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r LatticeRegistry {
        self.registry
    }

    /// Canonicalize `text` for the named lattice (default when `None`).
    ///
    /// # Errors
    ///
    /// Returns `CodecError::UnknownLattice` for an unregistered key.
    pub fn canonicalize(
        &self,
        text: &str,
        lattice_key: Option<&str>,
    ) -> Result<CanonicalText, CodecError> {
        let lattice = self.registry.select(lattice_key)?;
        Ok(canonicalize(lattice, text))
    }

    /// Canonicalize, encode and package `text`, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::UnknownLattice` for an unregistered key. An
    /// unknown key is never replaced by the default lattice.
    pub fn encode_to_package(
        &self,
        text: &str,
        lattice_key: Option<&str>,
    ) -> Result<GlyphPackage, CodecError> {
        self.encode_to_package_at(text, lattice_key, UtcTimestamp::now())
    }

    /// As [`Codec::encode_to_package`], with an explicit creation time.
    pub fn encode_to_package_at(
        &self,
        text: &str,
        lattice_key: Option<&str>,
        created_at: UtcTimestamp,
    ) -> Result<GlyphPackage, CodecError> {
        let canonical = self.canonicalize(text, lattice_key)?;
        self.package(&canonical, created_at)
    }

    /// Encode already canonical text into a package.
    pub fn package(
        &self,
        canonical: &CanonicalText,
        created_at: UtcTimestamp,
    ) -> Result<GlyphPackage, CodecError> {
        let lattice = self.registry.get(canonical.lattice_key().as_str())?;
        let path = encoder::encode(lattice, canonical);
        tracing::debug!(
            lattice = %lattice.key(),
            chars = canonical.char_count(),
            events = path.len(),
            "encoded package"
        );
        Ok(GlyphPackage::new(path, canonical.content_hash(), created_at))
    }

    pub fn decode_package(&self, package: &GlyphPackage) -> Result<DecodeResult, CodecError> {
        Decoder::new(self.registry).decode(package)
    }

    pub fn decode_json(&self, json: &str) -> Result<DecodeResult, CodecError> {
        Decoder::new(self.registry).decode_json(json)
    }

    pub fn decode_svg(&self, svg: &str) -> Result<DecodeResult, CodecError> {
        Decoder::new(self.registry).decode_svg(svg)
    }
}

impl Codec<'static> {
    /// Codec over the process-wide built-in registry.
    pub fn global() -> Self {
        Self::new(LatticeRegistry::global())
    }
}

/// Encode `text` on the named built-in lattice (default when `None`).
pub fn encode_to_package(
    text: &str,
    lattice_key: Option<&str>,
) -> Result<GlyphPackage, CodecError> {
    Codec::global().encode_to_package(text, lattice_key)
}

/// Decode a package against the built-in registry.
pub fn decode_package(package: &GlyphPackage) -> Result<DecodeResult, CodecError> {
    Codec::global().decode_package(package)
}

/// Decode the package embedded in an SVG document.
pub fn decode_svg(svg: &str) -> Result<DecodeResult, CodecError> {
    Codec::global().decode_svg(svg)
}
