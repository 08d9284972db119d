//! codec::error
//!
//! The caller-facing error taxonomy.
//!
//! Every structural failure of the codec is one of these kinds, so a caller
//! can branch on the variant (for example, retry with another lattice on
//! [`CodecError::UnknownLattice`]). A decode that merely loses confidence
//! is not an error; see [`crate::codec::decoder::DecodeResult`].

use thiserror::Error;

use crate::core::lattice::UnknownLattice;
use crate::package::schema::{PackageError, SUPPORTED_MAJOR_VERSION};

/// Errors from encoding and decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("unknown lattice '{0}'")]
    UnknownLattice(String),

    #[error("malformed package: {0}")]
    MalformedPackage(String),

    #[error("unsupported package version '{0}' (supported major version: {SUPPORTED_MAJOR_VERSION})")]
    UnsupportedVersion(String),

    #[error("SVG has no embedded glyph package")]
    NoEmbeddedMetadata,

    #[error("malformed path: {0}")]
    MalformedPath(String),
}

impl CodecError {
    /// Short, stable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CodecError::UnknownLattice(_) => "unknown_lattice",
            CodecError::MalformedPackage(_) => "malformed_package",
            CodecError::UnsupportedVersion(_) => "unsupported_version",
            CodecError::NoEmbeddedMetadata => "no_embedded_metadata",
            CodecError::MalformedPath(_) => "malformed_path",
        }
    }
}

impl From<PackageError> for CodecError {
    fn from(err: PackageError) -> Self {
        match err {
            PackageError::Malformed(message) => CodecError::MalformedPackage(message),
            PackageError::UnsupportedVersion(version) => CodecError::UnsupportedVersion(version),
            PackageError::NoEmbeddedMetadata => CodecError::NoEmbeddedMetadata,
        }
    }
}

impl From<UnknownLattice> for CodecError {
    fn from(UnknownLattice(key): UnknownLattice) -> Self {
        CodecError::UnknownLattice(key)
    }
}
