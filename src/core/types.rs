//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`LatticeKey`] - Validated lattice identifier (e.g. `G1`)
//! - [`Dimension`] - Lattice dimensionality (`2D` / `3D`)
//! - [`Coord`] - Normalized anchor coordinate
//! - [`ContentHash`] - SHA-256 digest of canonical text
//! - [`UtcTimestamp`] - RFC3339 timestamp
//!
//! # Validation
//!
//! These types enforce validity at construction time. A package carrying
//! a garbled key or digest fails to deserialize instead of travelling
//! further into the codec.
//!
//! # Examples
//!
//! ```
//! use qbc::core::types::{ContentHash, Coord, LatticeKey};
//!
//! let key = LatticeKey::new("G1").unwrap();
//! assert_eq!(key.as_str(), "G1");
//!
//! let a = Coord::new2(0.5, 0.15);
//! assert!(a.approx_eq(&Coord::new2(0.5, 0.1500000001), 1e-6));
//!
//! let hash = ContentHash::of_str("HELLO");
//! assert_eq!(hash.as_str().len(), 64);
//!
//! assert!(LatticeKey::new("").is_err());
//! assert!(ContentHash::parse("not-a-digest").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid lattice key: {0}")]
    InvalidLatticeKey(String),

    #[error("invalid content hash: {0}")]
    InvalidContentHash(String),

    #[error("invalid dimension: {0}")]
    InvalidDimension(String),
}

/// Maximum length of a lattice key.
pub const MAX_LATTICE_KEY_LEN: usize = 32;

/// A validated lattice identifier.
///
/// Keys are short ASCII identifiers: letters, digits, `-` and `_`, at most
/// [`MAX_LATTICE_KEY_LEN`] characters. Keys are case-sensitive.
///
/// # Example
///
/// ```
/// use qbc::core::types::LatticeKey;
///
/// assert!(LatticeKey::new("G1").is_ok());
/// assert!(LatticeKey::new("g3-sphere_v2").is_ok());
///
/// assert!(LatticeKey::new("").is_err());
/// assert!(LatticeKey::new("has space").is_err());
/// assert!(LatticeKey::new("<svg>").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LatticeKey(String);

impl LatticeKey {
    /// Create a new validated lattice key.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidLatticeKey` if the key is empty, too long,
    /// or contains characters outside `[A-Za-z0-9_-]`.
    pub fn new(key: impl Into<String>) -> Result<Self, TypeError> {
        let key = key.into();
        Self::validate(&key)?;
        Ok(Self(key))
    }

    /// Wrap a key literal that is known to satisfy the key rules.
    pub(crate) fn from_static(key: &'static str) -> Self {
        Self(key.to_string())
    }

    fn validate(key: &str) -> Result<(), TypeError> {
        if key.is_empty() {
            return Err(TypeError::InvalidLatticeKey(
                "lattice key cannot be empty".into(),
            ));
        }
        if key.len() > MAX_LATTICE_KEY_LEN {
            return Err(TypeError::InvalidLatticeKey(format!(
                "lattice key longer than {MAX_LATTICE_KEY_LEN} characters"
            )));
        }
        if let Some(c) = key
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(TypeError::InvalidLatticeKey(format!(
                "lattice key cannot contain {c:?}"
            )));
        }
        Ok(())
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LatticeKey {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LatticeKey> for String {
    fn from(key: LatticeKey) -> Self {
        key.0
    }
}

impl AsRef<str> for LatticeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LatticeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dimensionality of a lattice and of every coordinate drawn on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "2D")]
    TwoD,
    #[serde(rename = "3D")]
    ThreeD,
}

impl Dimension {
    /// Wire name (`"2D"` / `"3D"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::TwoD => "2D",
            Dimension::ThreeD => "3D",
        }
    }

    /// Whether coordinates in this dimension carry a `z` component.
    pub fn has_z(&self) -> bool {
        matches!(self, Dimension::ThreeD)
    }
}

impl std::str::FromStr for Dimension {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2D" | "2d" => Ok(Dimension::TwoD),
            "3D" | "3d" => Ok(Dimension::ThreeD),
            other => Err(TypeError::InvalidDimension(other.to_string())),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point on a lattice, normalized to the unit square (or cube).
///
/// 2D coordinates leave `z` unset; it is omitted from JSON entirely rather
/// than serialized as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Coord {
    /// A 2D coordinate.
    pub const fn new2(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// A 3D coordinate.
    pub const fn new3(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// The dimension implied by this coordinate's arity.
    pub fn dimension(&self) -> Dimension {
        if self.z.is_some() {
            Dimension::ThreeD
        } else {
            Dimension::TwoD
        }
    }

    /// All components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.map_or(true, f64::is_finite)
    }

    /// All components lie in `[0, 1]`.
    pub fn in_unit_range(&self) -> bool {
        let unit = |v: f64| (0.0..=1.0).contains(&v);
        unit(self.x) && unit(self.y) && self.z.map_or(true, unit)
    }

    /// Euclidean distance. A missing `z` counts as `0`.
    pub fn distance(&self, other: &Coord) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z.unwrap_or(0.0) - other.z.unwrap_or(0.0);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Component-wise equality within `epsilon`. Coordinates of different
    /// arity never compare equal.
    pub fn approx_eq(&self, other: &Coord, epsilon: f64) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() <= epsilon;
        let z_close = match (self.z, other.z) {
            (None, None) => true,
            (Some(a), Some(b)) => close(a, b),
            _ => false,
        };
        close(self.x, other.x) && close(self.y, other.y) && z_close
    }

    /// Round every component to `decimals` places.
    pub fn rounded(&self, decimals: i32) -> Self {
        let round = |v: f64| round_to(v, decimals);
        Self {
            x: round(self.x),
            y: round(self.y),
            z: self.z.map(round),
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.z {
            Some(z) => write!(f, "({}, {}, {})", self.x, self.y, z),
            None => write!(f, "({}, {})", self.x, self.y),
        }
    }
}

/// Round `value` to `decimals` decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    // Normalize -0.0 so it serializes as 0.0.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// SHA-256 digest of canonical text, as 64 lowercase hex characters.
///
/// The digest covers only the canonical text bytes (UTF-8), so the same
/// text hashes identically whatever lattice it is drawn on.
///
/// # Example
///
/// ```
/// use qbc::core::types::ContentHash;
///
/// let a = ContentHash::of_str("HELLO");
/// let b = ContentHash::of_str("HELLO");
/// assert_eq!(a, b);
/// assert_ne!(a, ContentHash::of_str("HELL0"));
///
/// // Known SHA-256 of the empty string
/// assert_eq!(
///     ContentHash::of_str("").as_str(),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash(String);

impl ContentHash {
    /// Hash a string's UTF-8 bytes.
    pub fn of_str(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Parse a hex digest, normalizing to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidContentHash` unless the input is exactly
    /// 64 hex characters.
    pub fn parse(digest: impl AsRef<str>) -> Result<Self, TypeError> {
        let digest = digest.as_ref();
        if digest.len() != 64 {
            return Err(TypeError::InvalidContentHash(format!(
                "expected 64 hex characters, got {}",
                digest.len()
            )));
        }
        if !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidContentHash(
                "digest must be hexadecimal".into(),
            ));
        }
        Ok(Self(digest.to_ascii_lowercase()))
    }

    /// Get the digest as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContentHash {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A UTC timestamp in RFC3339 format.
///
/// # Example
///
/// ```
/// use qbc::core::types::UtcTimestamp;
///
/// let now = UtcTimestamp::now();
/// assert!(now.to_string().contains('T'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtcTimestamp(chrono::DateTime<chrono::Utc>);

impl UtcTimestamp {
    /// Create a timestamp for the current moment, truncated to whole seconds.
    pub fn now() -> Self {
        let now = chrono::Utc::now();
        Self(
            chrono::DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now),
        )
    }

    /// Create a timestamp from a chrono DateTime.
    pub fn from_datetime(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self(dt)
    }

    /// Get the underlying datetime.
    pub fn as_datetime(&self) -> &chrono::DateTime<chrono::Utc> {
        &self.0
    }
}

impl fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
