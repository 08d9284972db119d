//! core::lattice
//!
//! Lattice definitions and the registry that owns them.
//!
//! # Overview
//!
//! A [`Lattice`] maps a finite alphabet to normalized coordinates
//! ("anchors"), plus one separator character drawn at a dedicated vertex.
//! The [`LatticeRegistry`] holds every lattice by key; it is built once at
//! startup (see [`LatticeRegistry::builtin`]) and only read afterwards, so a
//! shared reference can be handed to any number of threads.
//!
//! # Invariants
//!
//! Enforced by [`LatticeBuilder::build`] and [`LatticeRegistry::register`]:
//! - every anchor (separator included) lies in the unit square/cube
//! - every anchor has exactly the lattice's dimension
//! - no two anchors are within `2 * COORD_EPSILON` of each other, so
//!   resolving a coordinate back to a character is unambiguous
//! - anchors are reachable under the lattice casing
//!
//! # Example
//!
//! ```
//! use qbc::core::lattice::LatticeRegistry;
//!
//! let registry = LatticeRegistry::builtin();
//! let g1 = registry.get("G1").unwrap();
//! let h = g1.anchor('H').unwrap();
//! assert_eq!(g1.resolve(&h), Some('H'));
//!
//! assert!(registry.get("ZZ").is_err());
//! ```

mod builtin;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{Coord, Dimension, LatticeKey};

pub use builtin::{DEFAULT_LATTICE_KEY, SEPARATOR};

/// Tolerance for matching a coordinate to an anchor.
///
/// Coordinates travel through JSON text (and SVG metadata), so a decoder
/// compares them within this distance per component instead of exactly.
pub const COORD_EPSILON: f64 = 1e-6;

/// No lattice is registered under the key.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown lattice '{0}'")]
pub struct UnknownLattice(pub String);

/// Errors from lattice construction and registration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("lattice '{0}' is already registered")]
    DuplicateKey(LatticeKey),

    #[error("invalid lattice '{key}': {reason}")]
    InvalidLattice { key: String, reason: String },
}

/// Letter case a lattice's alphabet is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Casing {
    #[default]
    Upper,
    Lower,
    Preserve,
}

impl Casing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Casing::Upper => "upper",
            Casing::Lower => "lower",
            Casing::Preserve => "preserve",
        }
    }

    /// Append `c` to `out` in this casing. Case mappings may expand to more
    /// than one character (`ß` upper-cases to `SS`).
    pub fn push_cased(&self, c: char, out: &mut String) {
        match self {
            Casing::Upper => out.extend(c.to_uppercase()),
            Casing::Lower => out.extend(c.to_lowercase()),
            Casing::Preserve => out.push(c),
        }
    }

    /// Whether `c` is unchanged by this casing.
    fn is_fixed_point(&self, c: char) -> bool {
        let mut cased = String::new();
        self.push_cased(c, &mut cased);
        let mut chars = cased.chars();
        chars.next() == Some(c) && chars.next().is_none()
    }
}

/// An immutable, named mapping from characters to anchor coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    key: LatticeKey,
    description: String,
    dimension: Dimension,
    casing: Casing,
    separator: char,
    separator_anchor: Coord,
    anchors: BTreeMap<char, Coord>,
}

impl Lattice {
    /// Start building a lattice.
    pub fn builder(key: LatticeKey, dimension: Dimension) -> LatticeBuilder {
        LatticeBuilder::new(key, dimension)
    }

    pub fn key(&self) -> &LatticeKey {
        &self.key
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn casing(&self) -> Casing {
        self.casing
    }

    /// The character drawn at the separator vertex (a space for every
    /// built-in lattice).
    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn separator_anchor(&self) -> Coord {
        self.separator_anchor
    }

    /// Anchor for `c`, including the separator.
    pub fn anchor(&self, c: char) -> Option<Coord> {
        if c == self.separator {
            Some(self.separator_anchor)
        } else {
            self.anchors.get(&c).copied()
        }
    }

    /// Whether `c` can appear in canonical text for this lattice.
    pub fn supports(&self, c: char) -> bool {
        c == self.separator || self.anchors.contains_key(&c)
    }

    /// Resolve a coordinate back to its character, within [`COORD_EPSILON`].
    pub fn resolve(&self, coord: &Coord) -> Option<char> {
        if coord.approx_eq(&self.separator_anchor, COORD_EPSILON) {
            return Some(self.separator);
        }
        self.anchors
            .iter()
            .find(|(_, anchor)| anchor.approx_eq(coord, COORD_EPSILON))
            .map(|(c, _)| *c)
    }

    /// Alphabet characters in code point order, separator excluded.
    pub fn alphabet(&self) -> impl Iterator<Item = char> + '_ {
        self.anchors.keys().copied()
    }

    /// Number of anchored characters, separator excluded.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Check every structural invariant listed in the module docs.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidLattice` describing the first violation.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let invalid = |reason: String| RegistryError::InvalidLattice {
            key: self.key.to_string(),
            reason,
        };

        if self.anchors.contains_key(&self.separator) {
            return Err(invalid(format!(
                "separator {:?} also has a regular anchor",
                self.separator
            )));
        }

        let all: Vec<(char, &Coord)> = std::iter::once((self.separator, &self.separator_anchor))
            .chain(self.anchors.iter().map(|(c, a)| (*c, a)))
            .collect();

        for (c, anchor) in &all {
            if !anchor.is_finite() || !anchor.in_unit_range() {
                return Err(invalid(format!(
                    "anchor for {c:?} at {anchor} is outside the unit range"
                )));
            }
            if anchor.dimension() != self.dimension {
                return Err(invalid(format!(
                    "anchor for {c:?} is {} in a {} lattice",
                    anchor.dimension(),
                    self.dimension
                )));
            }
        }

        for (i, (a, anchor_a)) in all.iter().enumerate() {
            for (b, anchor_b) in &all[i + 1..] {
                if anchor_a.distance(anchor_b) <= 2.0 * COORD_EPSILON {
                    return Err(invalid(format!("anchors for {a:?} and {b:?} coincide")));
                }
            }
        }

        if let Some(c) = self.anchors.keys().find(|c| !self.casing.is_fixed_point(**c)) {
            return Err(invalid(format!(
                "{c:?} is unreachable under {:?} casing",
                self.casing
            )));
        }

        Ok(())
    }
}

/// Builder for [`Lattice`].
#[derive(Debug, Clone)]
pub struct LatticeBuilder {
    lattice: Lattice,
}

impl LatticeBuilder {
    fn new(key: LatticeKey, dimension: Dimension) -> Self {
        let centre = match dimension {
            Dimension::TwoD => Coord::new2(0.5, 0.5),
            Dimension::ThreeD => Coord::new3(0.5, 0.5, 0.5),
        };
        Self {
            lattice: Lattice {
                key,
                description: String::new(),
                dimension,
                casing: Casing::default(),
                separator: SEPARATOR,
                separator_anchor: centre,
                anchors: BTreeMap::new(),
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.lattice.description = description.into();
        self
    }

    pub fn casing(mut self, casing: Casing) -> Self {
        self.lattice.casing = casing;
        self
    }

    /// Override the separator vertex (defaults to the centre).
    pub fn separator_anchor(mut self, anchor: Coord) -> Self {
        self.lattice.separator_anchor = anchor;
        self
    }

    pub fn anchor(mut self, c: char, coord: Coord) -> Self {
        self.lattice.anchors.insert(c, coord);
        self
    }

    pub fn anchors(mut self, anchors: impl IntoIterator<Item = (char, Coord)>) -> Self {
        self.lattice.anchors.extend(anchors);
        self
    }

    /// Finish the lattice, checking its invariants.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidLattice` if any invariant is violated.
    pub fn build(self) -> Result<Lattice, RegistryError> {
        self.lattice.validate()?;
        Ok(self.lattice)
    }

    /// Finish without validation. Only for the fixed built-in tables,
    /// which are checked by unit tests instead.
    pub(crate) fn build_trusted(self) -> Lattice {
        self.lattice
    }
}

/// Owner of every lattice known to the process.
///
/// Lookups return `Result` rather than falling back to the default, so an
/// unknown key can never be silently replaced by a guess.
#[derive(Debug, Clone)]
pub struct LatticeRegistry {
    lattices: BTreeMap<LatticeKey, Lattice>,
    default_key: LatticeKey,
}

impl LatticeRegistry {
    /// Create a registry whose default is `default`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidLattice` if `default` fails validation.
    pub fn new(default: Lattice) -> Result<Self, RegistryError> {
        default.validate()?;
        Ok(Self::with_default(default))
    }

    fn with_default(default: Lattice) -> Self {
        let default_key = default.key.clone();
        let mut lattices = BTreeMap::new();
        lattices.insert(default_key.clone(), default);
        Self {
            lattices,
            default_key,
        }
    }

    /// The fixed built-in table: `G1` (default), `G2`, `G3`.
    pub fn builtin() -> Self {
        let mut registry = Self::with_default(builtin::g1());
        for lattice in [builtin::g2(), builtin::g3()] {
            registry.lattices.insert(lattice.key.clone(), lattice);
        }
        registry
    }

    /// Process-wide built-in registry, constructed on first use.
    pub fn global() -> &'static LatticeRegistry {
        static GLOBAL: OnceLock<LatticeRegistry> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            tracing::debug!("initializing built-in lattice registry");
            LatticeRegistry::builtin()
        })
    }

    /// Add a lattice.
    ///
    /// # Errors
    ///
    /// - `RegistryError::DuplicateKey` if the key is taken
    /// - `RegistryError::InvalidLattice` if the lattice fails validation
    pub fn register(&mut self, lattice: Lattice) -> Result<(), RegistryError> {
        if self.lattices.contains_key(&lattice.key) {
            return Err(RegistryError::DuplicateKey(lattice.key));
        }
        lattice.validate()?;
        tracing::debug!(key = %lattice.key, "registered lattice");
        self.lattices.insert(lattice.key.clone(), lattice);
        Ok(())
    }

    /// Look up a lattice by key.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownLattice`] if no lattice has this key.
    pub fn get(&self, key: &str) -> Result<&Lattice, UnknownLattice> {
        self.lattices
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, lattice)| lattice)
            .ok_or_else(|| UnknownLattice(key.to_string()))
    }

    /// The default lattice.
    pub fn get_default(&self) -> &Lattice {
        // The default key is inserted at construction and never removed.
        &self.lattices[&self.default_key]
    }

    pub fn default_key(&self) -> &LatticeKey {
        &self.default_key
    }

    /// Resolve an optional key: `None` selects the default lattice,
    /// `Some` must name a registered one.
    pub fn select(&self, key: Option<&str>) -> Result<&Lattice, UnknownLattice> {
        match key {
            Some(key) => self.get(key),
            None => Ok(self.get_default()),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_ok()
    }

    /// Lattices in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Lattice> {
        self.lattices.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &LatticeKey> {
        self.lattices.keys()
    }

    pub fn len(&self) -> usize {
        self.lattices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lattices.is_empty()
    }
}

impl Default for LatticeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
