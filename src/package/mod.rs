//! package
//!
//! The glyph package: unit of interchange between encoder and decoder.
//!
//! # Modules
//!
//! - [`schema`] - Versioned JSON schema
//! - [`svg`] - SVG documents with the package embedded
//!
//! A package arrives either as raw JSON or inside an SVG; both yield the
//! same [`GlyphPackage`] value.

pub mod schema;
pub mod svg;

pub use schema::{
    from_json, to_json, GlyphPackage, PackageError, PackageMetadata, PACKAGE_VERSION,
};
pub use svg::{from_svg, to_svg, RenderStyle};
