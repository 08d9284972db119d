//! codec::decoder
//!
//! Replays path events against a lattice to reconstruct text.
//!
//! # State Machine
//!
//! ```text
//! Idle -> Parsing -> Replaying -> Resolved            (confidence 1.0)
//!                              -> PartiallyResolved   (0 < confidence < 1)
//!         any step             -> Failed              (returned as Err)
//! ```
//!
//! `Parsing` is skipped when decoding an already parsed package. JSON and
//! SVG inputs go through the same replay, so decoding an SVG produces
//! exactly the result of decoding its embedded JSON.
//!
//! # Confidence
//!
//! Starts at 1.0. Each character whose vertex matches no anchor costs
//! [`UNRESOLVED_PENALTY`]; the score never drops below
//! [`CONFIDENCE_FLOOR`]. When every vertex resolves, the text is hashed and
//! compared with the package digest; a mismatch costs
//! [`HASH_MISMATCH_PENALTY`].

use serde::Serialize;

use crate::codec::error::CodecError;
use crate::codec::event::{EncodedPath, PathEvent};
use crate::core::lattice::{Lattice, LatticeRegistry, COORD_EPSILON};
use crate::core::types::{round_to, ContentHash, Coord, LatticeKey};
use crate::package::schema::{self, GlyphPackage};
use crate::package::svg;

/// Confidence lost per unresolved character.
pub const UNRESOLVED_PENALTY: f64 = 0.05;

/// Confidence lost when the replayed text does not match the package digest.
pub const HASH_MISMATCH_PENALTY: f64 = 0.25;

/// Lowest confidence a successful decode reports.
pub const CONFIDENCE_FLOOR: f64 = 0.01;

/// Stand-in for a character whose vertex matched no anchor.
pub const UNRESOLVED_PLACEHOLDER: char = '\u{FFFD}';

const CONFIDENCE_DECIMALS: i32 = 4;

/// Decoder lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeState {
    Idle,
    Parsing,
    Replaying,
    Resolved,
    PartiallyResolved,
    Failed,
}

/// Outcome of a successful decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeStatus {
    /// Every vertex resolved and the digest matched.
    Resolved,
    /// Some vertices did not resolve, or the digest did not match.
    PartiallyResolved,
}

/// Reconstructed text plus how much to trust it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodeResult {
    pub text: String,
    pub confidence: f64,
    pub lattice_key: LatticeKey,
    pub status: DecodeStatus,
    /// Characters that fell back to [`UNRESOLVED_PLACEHOLDER`].
    pub unresolved: usize,
    /// The decoded text hashed to the package's `content_hash`.
    pub hash_verified: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    pub path: EncodedPath,
}

impl DecodeResult {
    /// Exact, unambiguous reconstruction.
    pub fn is_exact(&self) -> bool {
        self.status == DecodeStatus::Resolved
    }
}

/// Text recovered from an event stream, before scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    pub text: String,
    pub unresolved: usize,
}

/// Replay `path` on `lattice`.
///
/// # Errors
///
/// Returns `CodecError::MalformedPath` when the stream is internally
/// inconsistent: dimension disagreeing with the lattice, a coordinate of
/// the wrong arity or non-finite, a `line` or `tick` with no prior vertex,
/// or a `tick` away from the current vertex.
pub fn replay(lattice: &Lattice, path: &EncodedPath) -> Result<Replay, CodecError> {
    if path.dimension != lattice.dimension() {
        return Err(CodecError::MalformedPath(format!(
            "path is {} but lattice '{}' is {}",
            path.dimension,
            lattice.key(),
            lattice.dimension()
        )));
    }

    let mut text = String::with_capacity(path.events.len());
    let mut unresolved = 0usize;
    // Current vertex and the character drawn there (None if unresolved).
    let mut current: Option<(Coord, Option<char>)> = None;

    for (index, event) in path.events.iter().enumerate() {
        let at = event.coord();
        if !at.is_finite() {
            return Err(malformed(index, "coordinate is not finite"));
        }
        if at.dimension() != lattice.dimension() {
            return Err(malformed(
                index,
                &format!("{} coordinate on a {} lattice", at.dimension(), lattice.dimension()),
            ));
        }

        let drawn = match event {
            PathEvent::Move { .. } => lattice.resolve(&at),
            PathEvent::Line { .. } => {
                if current.is_none() {
                    return Err(malformed(index, "line with no starting vertex"));
                }
                lattice.resolve(&at)
            }
            PathEvent::Tick { axis, .. } => {
                if !axis.is_finite() {
                    return Err(malformed(index, "tick axis is not finite"));
                }
                let Some((vertex, drawn)) = current else {
                    return Err(malformed(index, "tick with no prior vertex"));
                };
                if !vertex.approx_eq(&at, COORD_EPSILON) {
                    return Err(malformed(index, "tick away from the current vertex"));
                }
                drawn
            }
        };

        match drawn {
            Some(c) => text.push(c),
            None => {
                tracing::debug!(index, coord = %at, "vertex matches no anchor");
                text.push(UNRESOLVED_PLACEHOLDER);
                unresolved += 1;
            }
        }

        current = Some(match event {
            PathEvent::Tick { .. } => (current.map_or(at, |(v, _)| v), drawn),
            _ => (at, drawn),
        });
    }

    Ok(Replay { text, unresolved })
}

fn malformed(index: usize, reason: &str) -> CodecError {
    CodecError::MalformedPath(format!("event {index}: {reason}"))
}

/// Stateful decoder over a registry.
///
/// A decoder can be reused; every decode starts again from `Idle`.
///
/// # Example
///
/// ```
/// use qbc::codec::decoder::{DecodeState, Decoder};
/// use qbc::codec::Codec;
/// use qbc::core::lattice::LatticeRegistry;
///
/// let registry = LatticeRegistry::builtin();
/// let package = Codec::new(&registry).encode_to_package("hello", None).unwrap();
///
/// let mut decoder = Decoder::new(&registry);
/// assert_eq!(decoder.state(), DecodeState::Idle);
///
/// let result = decoder.decode(&package).unwrap();
/// assert_eq!(result.text, "HELLO");
/// assert_eq!(result.confidence, 1.0);
/// assert_eq!(decoder.state(), DecodeState::Resolved);
/// ```
#[derive(Debug)]
pub struct Decoder<'r> {
    registry: &'r LatticeRegistry,
    state: DecodeState,
}

impl<'r> Decoder<'r> {
    pub fn new(registry: &'r LatticeRegistry) -> Self {
        Self {
            registry,
            state: DecodeState::Idle,
        }
    }

    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// Decode a parsed package.
    pub fn decode(&mut self, package: &GlyphPackage) -> Result<DecodeResult, CodecError> {
        self.transition(DecodeState::Idle);
        let result = self.replay_package(package);
        self.settle(result)
    }

    /// Parse a JSON package and decode it.
    pub fn decode_json(&mut self, json: &str) -> Result<DecodeResult, CodecError> {
        self.transition(DecodeState::Idle);
        self.transition(DecodeState::Parsing);
        let result = schema::from_json(json)
            .map_err(CodecError::from)
            .and_then(|package| self.replay_package(&package));
        self.settle(result)
    }

    /// Extract the package embedded in an SVG document and decode it.
    pub fn decode_svg(&mut self, svg_text: &str) -> Result<DecodeResult, CodecError> {
        self.transition(DecodeState::Idle);
        self.transition(DecodeState::Parsing);
        let result = svg::from_svg(svg_text)
            .map_err(CodecError::from)
            .and_then(|package| self.replay_package(&package));
        self.settle(result)
    }

    fn replay_package(&mut self, package: &GlyphPackage) -> Result<DecodeResult, CodecError> {
        // Packages built in memory never passed through the parser's gate.
        package.validate()?;
        self.transition(DecodeState::Replaying);

        let key = &package.metadata.lattice_key;
        let lattice = self.registry.get(key.as_str())?;
        let Replay { text, unresolved } = replay(lattice, &package.path)?;

        let mut notes = Vec::new();
        let mut confidence =
            (1.0 - UNRESOLVED_PENALTY * unresolved as f64).max(CONFIDENCE_FLOOR);

        let hash_verified = if unresolved == 0 {
            let verified = ContentHash::of_str(&text) == package.metadata.content_hash;
            if !verified {
                notes.push("decoded text does not match the package content hash".to_string());
                confidence = (confidence - HASH_MISMATCH_PENALTY).max(CONFIDENCE_FLOOR);
            }
            verified
        } else {
            notes.push(format!(
                "{unresolved} character(s) matched no anchor on lattice '{key}'"
            ));
            notes.push("content hash not checked for a partial decode".to_string());
            false
        };

        let confidence = round_to(confidence, CONFIDENCE_DECIMALS);
        let status = if confidence >= 1.0 {
            DecodeStatus::Resolved
        } else {
            DecodeStatus::PartiallyResolved
        };

        Ok(DecodeResult {
            text,
            confidence,
            lattice_key: key.clone(),
            status,
            unresolved,
            hash_verified,
            notes,
            path: package.path.clone(),
        })
    }

    fn settle(
        &mut self,
        result: Result<DecodeResult, CodecError>,
    ) -> Result<DecodeResult, CodecError> {
        match &result {
            Ok(decoded) => self.transition(match decoded.status {
                DecodeStatus::Resolved => DecodeState::Resolved,
                DecodeStatus::PartiallyResolved => DecodeState::PartiallyResolved,
            }),
            Err(err) => {
                tracing::debug!(kind = err.kind(), error = %err, "decode failed");
                self.transition(DecodeState::Failed);
            }
        }
        result
    }

    fn transition(&mut self, next: DecodeState) {
        tracing::trace!(from = ?self.state, to = ?next, "decoder state");
        self.state = next;
    }
}
