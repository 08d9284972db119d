//! package::schema
//!
//! Glyph package schema (v1) and version dispatch.
//!
//! # Schema Design
//!
//! - Self-describing: every package carries `version` (`"MAJOR.MINOR"`)
//! - Version-gated: the major version is checked before the body is parsed,
//!   and an unknown major is refused outright rather than parsed on a
//!   best-effort basis
//! - Strict: unknown fields are rejected at every level
//!
//! # Example
//!
//! ```
//! use qbc::package::schema::{from_json, to_json, PackageError};
//!
//! let json = r#"{
//!     "version": "1.0",
//!     "metadata": {
//!         "lattice_key": "G1",
//!         "dimension": "2D",
//!         "content_hash": "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
//!         "created_at": "2024-01-01T00:00:00Z"
//!     },
//!     "path": { "events": [], "lattice_key": "G1", "dimension": "2D" }
//! }"#;
//!
//! let package = from_json(json).unwrap();
//! assert!(package.path.events.is_empty());
//! assert_eq!(from_json(&to_json(&package).unwrap()).unwrap(), package);
//!
//! let future = json.replace("\"1.0\"", "\"2.0\"");
//! assert!(matches!(from_json(&future), Err(PackageError::UnsupportedVersion(_))));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::event::EncodedPath;
use crate::core::types::{ContentHash, Dimension, LatticeKey, UtcTimestamp};

/// Version written by this crate.
pub const PACKAGE_VERSION: &str = "1.0";

/// The only major version this crate reads.
pub const SUPPORTED_MAJOR_VERSION: u32 = 1;

/// Errors from package (de)serialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PackageError {
    #[error("malformed package: {0}")]
    Malformed(String),

    #[error("unsupported package version '{0}', supported major version: {SUPPORTED_MAJOR_VERSION}")]
    UnsupportedVersion(String),

    #[error("no embedded glyph package found")]
    NoEmbeddedMetadata,
}

/// The package schema currently written and read.
pub type GlyphPackage = GlyphPackageV1;

/// Envelope for version dispatch before full parsing.
///
/// Other fields are ignored here so the version can be read from packages
/// whose body this crate does not understand.
#[derive(Debug, Deserialize)]
struct PackageEnvelope {
    version: String,
}

/// A parsed `MAJOR.MINOR` version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageVersion {
    pub major: u32,
    pub minor: u32,
}

impl PackageVersion {
    /// Parse `"MAJOR.MINOR"`; a bare `"MAJOR"` means minor 0.
    ///
    /// # Errors
    ///
    /// Returns `PackageError::Malformed` for anything else.
    pub fn parse(version: &str) -> Result<Self, PackageError> {
        let garbled = || PackageError::Malformed(format!("invalid version string '{version}'"));
        let number = |part: &str| {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(garbled());
            }
            part.parse::<u32>().map_err(|_| garbled())
        };

        let mut parts = version.split('.');
        let major = number(parts.next().unwrap_or_default())?;
        let minor = match parts.next() {
            Some(part) => number(part)?,
            None => 0,
        };
        if parts.next().is_some() {
            return Err(garbled());
        }
        Ok(Self { major, minor })
    }
}

/// Parse a package with version dispatch.
///
/// # Errors
///
/// - `PackageError::Malformed` if the JSON is invalid, the version string
///   is garbled, the body does not match the schema, or metadata and path
///   disagree
/// - `PackageError::UnsupportedVersion` if the major version is not
///   [`SUPPORTED_MAJOR_VERSION`]
pub fn from_json(json: &str) -> Result<GlyphPackage, PackageError> {
    let envelope: PackageEnvelope =
        serde_json::from_str(json).map_err(|e| PackageError::Malformed(e.to_string()))?;
    let version = PackageVersion::parse(&envelope.version)?;

    match version.major {
        1 => {
            let package: GlyphPackageV1 =
                serde_json::from_str(json).map_err(|e| PackageError::Malformed(e.to_string()))?;
            package.validate()?;
            tracing::trace!(
                version = %package.version,
                lattice = %package.metadata.lattice_key,
                events = package.path.len(),
                "parsed package"
            );
            Ok(package)
        }
        _ => Err(PackageError::UnsupportedVersion(envelope.version)),
    }
}

/// Serialize a package as pretty-printed JSON.
pub fn to_json(package: &GlyphPackage) -> Result<String, PackageError> {
    serde_json::to_string_pretty(package).map_err(|e| PackageError::Malformed(e.to_string()))
}

/// Glyph package (v1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlyphPackageV1 {
    /// Schema version, `"1.x"` for this struct
    pub version: String,

    pub metadata: PackageMetadata,

    pub path: EncodedPath,
}

/// Package-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageMetadata {
    pub lattice_key: LatticeKey,
    pub dimension: Dimension,
    /// SHA-256 of the canonical text
    pub content_hash: ContentHash,
    pub created_at: UtcTimestamp,
}

impl GlyphPackageV1 {
    /// Wrap an encoded path; metadata is taken from the path.
    pub fn new(path: EncodedPath, content_hash: ContentHash, created_at: UtcTimestamp) -> Self {
        Self {
            version: PACKAGE_VERSION.to_string(),
            metadata: PackageMetadata {
                lattice_key: path.lattice_key.clone(),
                dimension: path.dimension,
                content_hash,
                created_at,
            },
            path,
        }
    }

    /// Validate the package structure.
    ///
    /// This checks that:
    /// - `version` has major [`SUPPORTED_MAJOR_VERSION`]
    /// - metadata and path name the same lattice
    /// - metadata and path agree on dimension
    pub fn validate(&self) -> Result<(), PackageError> {
        let version = PackageVersion::parse(&self.version)?;
        if version.major != SUPPORTED_MAJOR_VERSION {
            return Err(PackageError::UnsupportedVersion(self.version.clone()));
        }

        if self.metadata.lattice_key != self.path.lattice_key {
            return Err(PackageError::Malformed(format!(
                "metadata lattice '{}' does not match path lattice '{}'",
                self.metadata.lattice_key, self.path.lattice_key
            )));
        }

        if self.metadata.dimension != self.path.dimension {
            return Err(PackageError::Malformed(format!(
                "metadata dimension {} does not match path dimension {}",
                self.metadata.dimension, self.path.dimension
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::event::PathEvent;
    use crate::core::types::Coord;

    const HASH: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    fn sample() -> GlyphPackage {
        let mut path = EncodedPath::new(LatticeKey::new("G1").unwrap(), Dimension::TwoD);
        path.events.push(PathEvent::move_to(Coord::new2(0.5, 0.35)));
        let created = chrono::DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        GlyphPackage::new(
            path,
            ContentHash::of_str("E"),
            UtcTimestamp::from_datetime(created),
        )
    }

    fn with_version(version: &str) -> String {
        format!(
            r#"{{
                "version": "{version}",
                "metadata": {{
                    "lattice_key": "G1",
                    "dimension": "2D",
                    "content_hash": "{HASH}",
                    "created_at": "2024-01-01T00:00:00Z"
                }},
                "path": {{ "events": [], "lattice_key": "G1", "dimension": "2D" }}
            }}"#
        )
    }

    mod version {
        use super::*;

        #[test]
        fn parses_major_minor() {
            assert_eq!(
                PackageVersion::parse("1.0").unwrap(),
                PackageVersion { major: 1, minor: 0 }
            );
            assert_eq!(PackageVersion::parse("3").unwrap().major, 3);
        }

        #[test]
        fn garbled_rejected() {
            for bad in ["", "1.", ".1", "v1", "1.0.0", "1.x", "-1"] {
                assert!(PackageVersion::parse(bad).is_err(), "{bad:?}");
            }
        }
    }

    mod dispatch {
        use super::*;

        #[test]
        fn v1_accepted() {
            assert!(from_json(&with_version("1.0")).is_ok());
        }

        #[test]
        fn later_minor_accepted() {
            assert!(from_json(&with_version("1.7")).is_ok());
        }

        #[test]
        fn other_majors_rejected() {
            for v in ["0.9", "2.0", "10"] {
                assert_eq!(
                    from_json(&with_version(v)),
                    Err(PackageError::UnsupportedVersion(v.to_string()))
                );
            }
        }

        #[test]
        fn unsupported_version_wins_over_unknown_body() {
            let json = r#"{"version": "2.0", "glyph": {"strokes": []}}"#;
            assert_eq!(
                from_json(json),
                Err(PackageError::UnsupportedVersion("2.0".into()))
            );
        }

        #[test]
        fn missing_version_is_malformed() {
            let json = r#"{"metadata": {}, "path": {}}"#;
            assert!(matches!(from_json(json), Err(PackageError::Malformed(_))));
        }

        #[test]
        fn numeric_version_is_malformed() {
            let json = with_version("1.0").replace("\"1.0\"", "1.0");
            assert!(matches!(from_json(&json), Err(PackageError::Malformed(_))));
        }

        #[test]
        fn not_json_is_malformed() {
            assert!(matches!(from_json("<svg/>"), Err(PackageError::Malformed(_))));
        }
    }

    mod strictness {
        use super::*;

        #[test]
        fn unknown_field_rejected() {
            let json = with_version("1.0").replace(
                "\"lattice_key\": \"G1\",\n                    \"dimension\"",
                "\"lattice_key\": \"G1\", \"owner\": \"x\",\n                    \"dimension\"",
            );
            assert!(json.contains("owner"));
            assert!(matches!(from_json(&json), Err(PackageError::Malformed(_))));
        }

        #[test]
        fn bad_hash_rejected() {
            let json = with_version("1.0").replace(HASH, "abc123");
            assert!(matches!(from_json(&json), Err(PackageError::Malformed(_))));
        }

        #[test]
        fn lattice_mismatch_rejected() {
            let json = with_version("1.0").replace(
                r#""events": [], "lattice_key": "G1""#,
                r#""events": [], "lattice_key": "G2""#,
            );
            let err = from_json(&json).unwrap_err();
            assert!(err.to_string().contains("does not match"));
        }

        #[test]
        fn dimension_mismatch_rejected() {
            let json = with_version("1.0").replace(
                r#""lattice_key": "G1", "dimension": "2D" }"#,
                r#""lattice_key": "G1", "dimension": "3D" }"#,
            );
            assert!(matches!(from_json(&json), Err(PackageError::Malformed(_))));
        }
    }

    #[test]
    fn json_roundtrip() {
        let package = sample();
        let json = to_json(&package).unwrap();
        assert!(json.contains("\"version\": \"1.0\""));
        assert!(json.contains("\"created_at\": \"2024-01-01T00:00:00Z\""));
        assert_eq!(from_json(&json).unwrap(), package);
    }
}
