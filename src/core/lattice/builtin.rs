//! core::lattice::builtin
//!
//! The fixed table of lattices every registry starts with.
//!
//! - `G1`: upper case letters, digits and light punctuation on three
//!   concentric rings around the centre (2D)
//! - `G2`: case-preserving letters and digits on an 8x8 grid (2D)
//! - `G3`: upper case letters and digits on a Fibonacci sphere (3D)
//!
//! All coordinates are rounded to [`ANCHOR_DECIMALS`] places so they
//! serialize to short, stable JSON numbers.

use std::f64::consts::PI;

use super::{Casing, Lattice};
use crate::core::types::{Coord, Dimension, LatticeKey};

/// Key of the registry's default lattice.
pub const DEFAULT_LATTICE_KEY: &str = "G1";

/// Separator character shared by the built-in lattices.
pub const SEPARATOR: char = ' ';

/// Decimal places kept on built-in anchor coordinates.
pub const ANCHOR_DECIMALS: i32 = 4;

/// G1 rings, innermost first: (radius, characters). Frequent letters sit
/// close to the centre so common words draw compact strokes.
const G1_RINGS: [(f64, &str); 3] = [
    (0.15, "ETAOIN"),
    (0.30, "SHRDLCUMWFGY"),
    (0.45, "PBVKJXQZ0123456789.,?!'-"),
];

const G2_GRID_SIDE: usize = 8;
const G2_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789.,";

const G3_RADIUS: f64 = 0.45;
const G3_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn key(s: &'static str) -> LatticeKey {
    LatticeKey::from_static(s)
}

pub(super) fn g1() -> Lattice {
    let anchors = G1_RINGS.iter().flat_map(|(radius, chars)| {
        let count = chars.chars().count() as f64;
        chars.chars().enumerate().map(move |(i, c)| {
            // Clockwise from twelve o'clock; y grows downwards as in SVG.
            let theta = 2.0 * PI * i as f64 / count;
            let coord = Coord::new2(0.5 + radius * theta.sin(), 0.5 - radius * theta.cos());
            (c, coord.rounded(ANCHOR_DECIMALS))
        })
    });

    Lattice::builder(key(DEFAULT_LATTICE_KEY), Dimension::TwoD)
        .description("Concentric rings, upper case, digits and punctuation")
        .casing(Casing::Upper)
        .anchors(anchors)
        .build_trusted()
}

pub(super) fn g2() -> Lattice {
    let side = G2_GRID_SIDE as f64;
    let anchors = G2_ALPHABET.chars().enumerate().map(|(i, c)| {
        let col = (i % G2_GRID_SIDE) as f64;
        let row = (i / G2_GRID_SIDE) as f64;
        let coord = Coord::new2((col + 0.5) / side, (row + 0.5) / side);
        (c, coord.rounded(ANCHOR_DECIMALS))
    });

    Lattice::builder(key("G2"), Dimension::TwoD)
        .description("8x8 grid, case preserving")
        .casing(Casing::Preserve)
        .anchors(anchors)
        .build_trusted()
}

pub(super) fn g3() -> Lattice {
    let count = G3_ALPHABET.chars().count() as f64;
    let golden_angle = PI * (3.0 - 5f64.sqrt());
    let anchors = G3_ALPHABET.chars().enumerate().map(move |(i, c)| {
        let i = i as f64;
        let y = 1.0 - 2.0 * (i + 0.5) / count;
        let ring = (1.0 - y * y).sqrt();
        let phi = golden_angle * i;
        let coord = Coord::new3(
            0.5 + G3_RADIUS * ring * phi.cos(),
            0.5 + G3_RADIUS * y,
            0.5 + G3_RADIUS * ring * phi.sin(),
        );
        (c, coord.rounded(ANCHOR_DECIMALS))
    });

    Lattice::builder(key("G3"), Dimension::ThreeD)
        .description("Fibonacci sphere, upper case and digits")
        .casing(Casing::Upper)
        .anchors(anchors)
        .build_trusted()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn g1_alphabet() {
        let g1 = g1();
        assert_eq!(g1.len(), 42);
        for c in ('A'..='Z').chain('0'..='9').chain(".,?!'-".chars()) {
            assert!(g1.supports(c), "{c:?}");
        }
        assert!(!g1.supports('a'));
        assert!(g1.supports(' '));
    }

    #[test]
    fn g1_first_ring_starts_at_top() {
        let e = g1().anchor('E').unwrap();
        assert_eq!(e, Coord::new2(0.5, 0.35));
    }

    #[test]
    fn g2_alphabet_fills_grid() {
        let g2 = g2();
        assert_eq!(g2.len(), G2_GRID_SIDE * G2_GRID_SIDE);
        assert_eq!(g2.anchor('a'), Some(Coord::new2(0.0625, 0.0625)));
        assert_eq!(g2.casing(), Casing::Preserve);
    }

    #[test]
    fn g3_is_three_dimensional() {
        let g3 = g3();
        assert_eq!(g3.dimension(), Dimension::ThreeD);
        assert!(g3.alphabet().all(|c| g3.anchor(c).unwrap().z.is_some()));
        assert_eq!(g3.separator_anchor(), Coord::new3(0.5, 0.5, 0.5));
    }

    #[test]
    fn keys_are_valid() {
        for k in [DEFAULT_LATTICE_KEY, "G2", "G3"] {
            assert!(LatticeKey::new(k).is_ok());
        }
    }

    #[test]
    fn all_validate() {
        g1().validate().unwrap();
        g2().validate().unwrap();
        g3().validate().unwrap();
    }
}
