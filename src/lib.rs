//! QBC - Geometric lattice text codec
//!
//! QBC turns text into a path drawn over a fixed graph of anchor points (a
//! lattice), packages the path as versioned JSON or as an SVG carrying the
//! same JSON, and decodes a package back into text with a confidence score.
//!
//! # Architecture
//!
//! - [`core`] - Domain types, lattices, canonicalization, configuration
//! - [`codec`] - Path encoder, decoder, and the caller-facing error kinds
//! - [`package`] - Versioned package schema and SVG interchange
//! - [`cli`] - Command-line interface layer
//! - [`ui`] - User interaction utilities
//!
//! # Correctness Invariants
//!
//! QBC maintains the following invariants:
//!
//! 1. Decoding an encoded package yields the canonical text with confidence 1.0
//! 2. A run of `k` identical characters encodes as one vertex visit plus `k - 1` ticks
//! 3. Decoding an SVG gives exactly the result of decoding its embedded JSON
//! 4. An unknown lattice or package version is an error, never a guess
//!
//! # Example
//!
//! ```
//! let package = qbc::encode_to_package("Hello", None).unwrap();
//! let decoded = qbc::decode_package(&package).unwrap();
//! assert_eq!(decoded.text, "HELLO");
//! assert!(decoded.is_exact());
//! ```

pub mod cli;
pub mod codec;
pub mod core;
pub mod package;
pub mod ui;

pub use codec::{decode_package, decode_svg, encode_to_package, CodecError, DecodeResult};
pub use package::GlyphPackage;
