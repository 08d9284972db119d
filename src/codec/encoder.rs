//! codec::encoder
//!
//! Canonical text to path events.
//!
//! # Algorithm
//!
//! - the first character emits `move` to its vertex
//! - an immediate repeat emits one `tick` at the current vertex, oriented
//!   perpendicular to the direction of travel into that vertex
//! - any other character emits `line` to its vertex
//!
//! A run of `k` identical characters therefore costs one `move`/`line`
//! plus exactly `k - 1` ticks. Ticks are never batched; the decoder relies
//! on one tick per repetition.

use crate::codec::event::{EncodedPath, PathEvent};
use crate::core::canonical::{canonicalize, CanonicalText};
use crate::core::lattice::{Lattice, COORD_EPSILON};
use crate::core::types::{round_to, Coord};

/// Axis used when a repeat has no direction of travel to be
/// perpendicular to (the text starts with a repeat, or travel is purely
/// along `z`).
pub const DEFAULT_TICK_AXIS: f64 = 0.0;

/// Decimal places kept on tick axes.
pub const AXIS_DECIMALS: i32 = 4;

/// Encode canonical text on `lattice`.
///
/// Text canonicalized for a different lattice is re-canonicalized first,
/// so every character is guaranteed an anchor.
///
/// # Example
///
/// ```
/// use qbc::codec::encoder::encode;
/// use qbc::codec::event::EventKind;
/// use qbc::core::canonical::canonicalize;
/// use qbc::core::lattice::LatticeRegistry;
///
/// let registry = LatticeRegistry::builtin();
/// let g1 = registry.get("G1").unwrap();
/// let path = encode(g1, &canonicalize(g1, "AAAA"));
///
/// let kinds: Vec<_> = path.events.iter().map(|e| e.kind()).collect();
/// assert_eq!(kinds, [EventKind::Move, EventKind::Tick, EventKind::Tick, EventKind::Tick]);
/// ```
pub fn encode(lattice: &Lattice, text: &CanonicalText) -> EncodedPath {
    if text.lattice_key() != lattice.key() {
        tracing::debug!(
            from = %text.lattice_key(),
            to = %lattice.key(),
            "re-canonicalizing text for target lattice"
        );
        let recanonicalized = canonicalize(lattice, text.as_str());
        return encode(lattice, &recanonicalized);
    }

    let mut path = EncodedPath::new(lattice.key().clone(), lattice.dimension());
    path.events.reserve(text.char_count());

    let mut last_char: Option<char> = None;
    let mut last_vertex: Option<Coord> = None;
    // The distinct vertex visited before `last_vertex`.
    let mut previous_vertex: Option<Coord> = None;

    for c in text.as_str().chars() {
        let vertex = lattice.anchor(c).unwrap_or_else(|| {
            tracing::warn!(lattice = %lattice.key(), ch = ?c, "no anchor; drawing at separator");
            lattice.separator_anchor()
        });

        let event = match (last_char, last_vertex) {
            (Some(prev), Some(at)) if prev == c => PathEvent::tick_at(at, tick_axis(previous_vertex, at)),
            (Some(_), Some(at)) => {
                previous_vertex = Some(at);
                PathEvent::line_to(vertex)
            }
            _ => PathEvent::move_to(vertex),
        };

        path.events.push(event);
        last_char = Some(c);
        last_vertex = Some(vertex);
    }

    tracing::trace!(
        lattice = %lattice.key(),
        chars = text.char_count(),
        events = path.len(),
        "encoded path"
    );
    path
}

/// Orientation of a tick at `at`, perpendicular to travel from `from`,
/// in degrees normalized to `[0, 180)`.
pub fn tick_axis(from: Option<Coord>, at: Coord) -> f64 {
    let Some(from) = from else {
        return DEFAULT_TICK_AXIS;
    };

    let dx = at.x - from.x;
    let dy = at.y - from.y;
    if dx.hypot(dy) <= COORD_EPSILON {
        return DEFAULT_TICK_AXIS;
    }

    let travel = dy.atan2(dx).to_degrees();
    let axis = round_to((travel + 90.0).rem_euclid(180.0), AXIS_DECIMALS);
    if axis >= 180.0 {
        0.0
    } else {
        axis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::event::EventKind;
    use crate::core::lattice::LatticeRegistry;

    fn kinds(path: &EncodedPath) -> Vec<EventKind> {
        path.events.iter().map(|e| e.kind()).collect()
    }

    #[test]
    fn empty_text_has_no_events() {
        let registry = LatticeRegistry::builtin();
        let g1 = registry.get_default();
        let path = encode(g1, &canonicalize(g1, ""));
        assert!(path.events.is_empty());
        assert_eq!(path.lattice_key.as_str(), "G1");
    }

    #[test]
    fn single_char_is_lone_move() {
        let registry = LatticeRegistry::builtin();
        let g1 = registry.get_default();
        let path = encode(g1, &canonicalize(g1, "Q"));
        assert_eq!(path.events, vec![PathEvent::move_to(g1.anchor('Q').unwrap())]);
    }

    #[test]
    fn hello_uses_one_tick() {
        use EventKind::*;
        let registry = LatticeRegistry::builtin();
        let g1 = registry.get_default();
        let path = encode(g1, &canonicalize(g1, "HELLO"));
        assert_eq!(kinds(&path), vec![Move, Line, Line, Tick, Line]);

        let l = g1.anchor('L').unwrap();
        assert_eq!(path.events[3].coord(), l);
        assert_eq!(path.events[4].coord(), g1.anchor('O').unwrap());
    }

    #[test]
    fn leading_repeat_uses_default_axis() {
        let registry = LatticeRegistry::builtin();
        let g1 = registry.get_default();
        let path = encode(g1, &canonicalize(g1, "AA"));
        assert_eq!(path.events[1].axis(), Some(DEFAULT_TICK_AXIS));
    }

    #[test]
    fn separator_repeats_are_collapsed_before_encoding() {
        let registry = LatticeRegistry::builtin();
        let g1 = registry.get_default();
        let path = encode(g1, &canonicalize(g1, "A  B"));
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn axis_perpendicular_to_travel() {
        // Travel along +x: tick is vertical.
        let axis = tick_axis(Some(Coord::new2(0.1, 0.5)), Coord::new2(0.9, 0.5));
        assert_eq!(axis, 90.0);
        // Travel along +y: tick is horizontal.
        let axis = tick_axis(Some(Coord::new2(0.5, 0.1)), Coord::new2(0.5, 0.9));
        assert_eq!(axis, 0.0);
        // Travel along -x folds into the same half-turn.
        let axis = tick_axis(Some(Coord::new2(0.9, 0.5)), Coord::new2(0.1, 0.5));
        assert_eq!(axis, 90.0);
        // Diagonal.
        let axis = tick_axis(Some(Coord::new2(0.0, 0.0)), Coord::new2(0.5, 0.5));
        assert_eq!(axis, 135.0);
    }

    #[test]
    fn axis_defaults_without_planar_travel() {
        let from = Coord::new3(0.5, 0.5, 0.1);
        let at = Coord::new3(0.5, 0.5, 0.9);
        assert_eq!(tick_axis(Some(from), at), DEFAULT_TICK_AXIS);
        assert_eq!(tick_axis(None, at), DEFAULT_TICK_AXIS);
    }

    #[test]
    fn axis_uses_last_distinct_vertex() {
        let registry = LatticeRegistry::builtin();
        let g1 = registry.get_default();
        let path = encode(g1, &canonicalize(g1, "ABBB"));
        let expected = tick_axis(g1.anchor('A'), g1.anchor('B').unwrap());
        assert_eq!(path.events[2].axis(), Some(expected));
        assert_eq!(path.events[3].axis(), Some(expected));
    }

    #[test]
    fn foreign_canonical_text_is_recanonicalized() {
        let registry = LatticeRegistry::builtin();
        let g2 = registry.get("G2").unwrap();
        let g1 = registry.get_default();
        let text = canonicalize(g2, "hi");
        let path = encode(g1, &text);
        assert_eq!(path.events[0].coord(), g1.anchor('H').unwrap());
    }

    #[test]
    fn three_d_events_carry_z() {
        let registry = LatticeRegistry::builtin();
        let g3 = registry.get("G3").unwrap();
        let path = encode(g3, &canonicalize(g3, "ZOO"));
        assert!(path.events.iter().all(|e| e.coord().z.is_some()));
        assert_eq!(path.events[2].kind(), EventKind::Tick);
    }
}
