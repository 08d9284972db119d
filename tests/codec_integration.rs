//! Integration tests for the codec pipeline.
//!
//! These tests drive text through canonicalization, encoding, packaging,
//! serialization and decoding using only the public API.

use qbc::codec::{Codec, CodecError, DecodeState, DecodeStatus, Decoder, EventKind, PathEvent};
use qbc::core::lattice::{Casing, Lattice, LatticeRegistry, RegistryError};
use qbc::core::types::{ContentHash, Coord, Dimension, LatticeKey, UtcTimestamp};
use qbc::package::schema::{to_json, GlyphPackage};
use qbc::{decode_package, encode_to_package};

// =============================================================================
// Test Fixtures
// =============================================================================

const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

fn fixed_time() -> UtcTimestamp {
    let dt = chrono::DateTime::parse_from_rfc3339("2024-03-14T15:09:26Z")
        .unwrap()
        .with_timezone(&chrono::Utc);
    UtcTimestamp::from_datetime(dt)
}

fn kinds(package: &GlyphPackage) -> Vec<EventKind> {
    package.path.events.iter().map(|e| e.kind()).collect()
}

/// A small 2D lattice with lower-case letters only.
fn tiny_lattice() -> Lattice {
    Lattice::builder(LatticeKey::new("tiny").unwrap(), Dimension::TwoD)
        .description("three letters")
        .casing(Casing::Lower)
        .anchor('a', Coord::new2(0.1, 0.1))
        .anchor('b', Coord::new2(0.9, 0.1))
        .anchor('c', Coord::new2(0.5, 0.9))
        .build()
        .unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

mod scenarios {
    use super::*;

    #[test]
    fn hello() {
        let package = encode_to_package("Hello", None).unwrap();

        assert_eq!(package.metadata.lattice_key.as_str(), "G1");
        assert_eq!(package.metadata.dimension, Dimension::TwoD);
        assert_eq!(
            kinds(&package),
            vec![
                EventKind::Move,
                EventKind::Line,
                EventKind::Line,
                EventKind::Tick,
                EventKind::Line
            ]
        );
        assert_eq!(package.metadata.content_hash, ContentHash::of_str("HELLO"));

        let decoded = decode_package(&package).unwrap();
        assert_eq!(decoded.text, "HELLO");
        assert_eq!(decoded.confidence, 1.0);
        assert_eq!(decoded.status, DecodeStatus::Resolved);
        assert!(decoded.notes.is_empty());
    }

    #[test]
    fn empty_input() {
        let package = encode_to_package("", None).unwrap();
        assert!(package.path.events.is_empty());
        assert_eq!(package.metadata.content_hash.as_str(), EMPTY_SHA256);

        let decoded = decode_package(&package).unwrap();
        assert_eq!(decoded.text, "");
        assert_eq!(decoded.confidence, 1.0);
    }

    #[test]
    fn whitespace_only_input_is_empty() {
        let package = encode_to_package(" \t\n ", None).unwrap();
        assert!(package.path.events.is_empty());
    }

    #[test]
    fn unknown_lattice_on_encode() {
        assert_eq!(
            encode_to_package("Hello", Some("ZZ")),
            Err(CodecError::UnknownLattice("ZZ".into()))
        );
    }

    #[test]
    fn unknown_lattice_on_decode() {
        let registry = LatticeRegistry::builtin();
        let mut custom = LatticeRegistry::builtin();
        custom.register(tiny_lattice()).unwrap();

        let package = Codec::new(&custom).encode_to_package("abc", Some("tiny")).unwrap();
        assert_eq!(
            Codec::new(&registry).decode_package(&package),
            Err(CodecError::UnknownLattice("tiny".into()))
        );
    }

    #[test]
    fn long_runs() {
        let package = encode_to_package("Zzzzzzzz!!!", None).unwrap();
        let ticks = kinds(&package)
            .into_iter()
            .filter(|k| *k == EventKind::Tick)
            .count();
        assert_eq!(ticks, 7 + 2);
        assert_eq!(decode_package(&package).unwrap().text, "ZZZZZZZZ!!!");
    }

    #[test]
    fn accents_and_symbols_canonicalize() {
        let package = encode_to_package("Crème brûlée ☕ 100%", None).unwrap();
        let decoded = decode_package(&package).unwrap();
        assert_eq!(decoded.text, "CREME BRULEE 100");
        assert!(decoded.is_exact());
    }

    #[test]
    fn case_preserving_lattice() {
        let package = encode_to_package("Hello, World", Some("G2")).unwrap();
        let decoded = decode_package(&package).unwrap();
        assert_eq!(decoded.text, "Hello, World");
    }

    #[test]
    fn three_d() {
        let package = encode_to_package("ZOO 3D", Some("G3")).unwrap();
        assert_eq!(package.metadata.dimension, Dimension::ThreeD);
        assert!(package.path.events.iter().all(|e| e.coord().z.is_some()));

        let json = to_json(&package).unwrap();
        assert!(json.contains("\"z\""));

        let decoded = decode_package(&package).unwrap();
        assert_eq!(decoded.text, "ZOO 3D");
        assert!(decoded.is_exact());
    }

    #[test]
    fn fixed_timestamp_is_deterministic() {
        let registry = LatticeRegistry::builtin();
        let codec = Codec::new(&registry);
        let a = codec.encode_to_package_at("same", None, fixed_time()).unwrap();
        let b = codec.encode_to_package_at("same", None, fixed_time()).unwrap();
        assert_eq!(a, b);
        assert_eq!(to_json(&a).unwrap(), to_json(&b).unwrap());
        assert!(to_json(&a).unwrap().contains("2024-03-14T15:09:26Z"));
    }
}

// =============================================================================
// Confidence
// =============================================================================

mod confidence {
    use super::*;

    #[test]
    fn tampered_hash_lowers_confidence() {
        let mut package = encode_to_package("Hello", None).unwrap();
        package.metadata.content_hash = ContentHash::of_str("GOODBYE");

        let decoded = decode_package(&package).unwrap();
        assert_eq!(decoded.text, "HELLO");
        assert_eq!(decoded.confidence, 0.75);
        assert_eq!(decoded.status, DecodeStatus::PartiallyResolved);
        assert!(!decoded.hash_verified);
        assert!(decoded.notes.iter().any(|n| n.contains("content hash")));
    }

    #[test]
    fn unresolved_vertex_is_partial_not_error() {
        let mut package = encode_to_package("Hello", None).unwrap();
        package.path.events[1] = PathEvent::line_to(Coord::new2(0.02, 0.98));

        let decoded = decode_package(&package).unwrap();
        assert_eq!(decoded.text, "H\u{FFFD}LLO");
        assert_eq!(decoded.unresolved, 1);
        assert_eq!(decoded.confidence, 0.95);
        assert_eq!(decoded.status, DecodeStatus::PartiallyResolved);
        assert!(!decoded.is_exact());
    }

    #[test]
    fn confidence_has_a_floor() {
        let mut package = encode_to_package("ABCDEFGHIJKLMNOPQRSTUVWXYZ", None).unwrap();
        for event in &mut package.path.events {
            let stray = Coord::new2(0.01, 0.99);
            *event = match event.kind() {
                EventKind::Move => PathEvent::move_to(stray),
                _ => PathEvent::line_to(stray),
            };
        }

        let decoded = decode_package(&package).unwrap();
        assert_eq!(decoded.unresolved, 26);
        assert_eq!(decoded.confidence, 0.01);
        assert!(decoded.text.chars().all(|c| c == '\u{FFFD}'));
    }

    #[test]
    fn serialization_noise_within_epsilon_resolves() {
        let mut package = encode_to_package("Hi", None).unwrap();
        let at = package.path.events[0].coord();
        package.path.events[0] = PathEvent::move_to(Coord::new2(at.x + 1e-9, at.y - 1e-9));

        let decoded = decode_package(&package).unwrap();
        assert_eq!(decoded.text, "HI");
        assert!(decoded.is_exact());
    }
}

// =============================================================================
// Errors
// =============================================================================

mod errors {
    use super::*;

    #[test]
    fn leading_tick_is_malformed_path() {
        let mut package = encode_to_package("AB", None).unwrap();
        let at = package.path.events[0].coord();
        package.path.events[0] = PathEvent::tick_at(at, 0.0);

        let err = decode_package(&package).unwrap_err();
        assert!(matches!(err, CodecError::MalformedPath(_)));
        assert_eq!(err.kind(), "malformed_path");
    }

    #[test]
    fn in_memory_package_with_unsupported_version() {
        let mut package = encode_to_package("Hello", None).unwrap();
        package.version = "2.0".to_string();
        assert_eq!(
            decode_package(&package),
            Err(CodecError::UnsupportedVersion("2.0".into()))
        );
    }

    #[test]
    fn in_memory_package_with_unknown_lattice() {
        let mut package = encode_to_package("Hello", None).unwrap();
        let zz = LatticeKey::new("ZZ").unwrap();
        package.metadata.lattice_key = zz.clone();
        package.path.lattice_key = zz;
        assert_eq!(
            decode_package(&package),
            Err(CodecError::UnknownLattice("ZZ".into()))
        );
    }

    #[test]
    fn in_memory_package_with_mismatched_lattice_keys() {
        let mut package = encode_to_package("Hello", None).unwrap();
        package.metadata.lattice_key = LatticeKey::new("ZZ").unwrap();

        let err = decode_package(&package).unwrap_err();
        assert!(matches!(err, CodecError::MalformedPackage(_)));
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn malformed_json() {
        let registry = LatticeRegistry::builtin();
        let err = Codec::new(&registry).decode_json("{\"version\": \"1.0\"}").unwrap_err();
        assert!(matches!(err, CodecError::MalformedPackage(_)));
    }

    #[test]
    fn svg_without_metadata() {
        let registry = LatticeRegistry::builtin();
        let err = Codec::new(&registry)
            .decode_svg("<svg xmlns=\"http://www.w3.org/2000/svg\"><path d=\"M1 1L2 2\"/></svg>")
            .unwrap_err();
        assert_eq!(err, CodecError::NoEmbeddedMetadata);
    }
}

// =============================================================================
// Decoder state machine
// =============================================================================

mod state_machine {
    use super::*;

    #[test]
    fn transitions() {
        let registry = LatticeRegistry::builtin();
        let package = Codec::new(&registry).encode_to_package("state", None).unwrap();
        let mut decoder = Decoder::new(&registry);
        assert_eq!(decoder.state(), DecodeState::Idle);

        decoder.decode(&package).unwrap();
        assert_eq!(decoder.state(), DecodeState::Resolved);

        let mut tampered = package.clone();
        tampered.metadata.content_hash = ContentHash::of_str("other");
        decoder.decode(&tampered).unwrap();
        assert_eq!(decoder.state(), DecodeState::PartiallyResolved);

        let future = to_json(&package).unwrap().replace("\"1.0\"", "\"2.0\"");
        assert!(decoder.decode_json(&future).is_err());
        assert_eq!(decoder.state(), DecodeState::Failed);

        let mut stale = package.clone();
        stale.version = "9.0".to_string();
        assert!(decoder.decode(&stale).is_err());
        assert_eq!(decoder.state(), DecodeState::Failed);

        // Reusable after a failure.
        decoder.decode_json(&to_json(&package).unwrap()).unwrap();
        assert_eq!(decoder.state(), DecodeState::Resolved);
    }
}

// =============================================================================
// Registry
// =============================================================================

mod registry {
    use super::*;

    #[test]
    fn custom_lattice_roundtrip() {
        let mut registry = LatticeRegistry::builtin();
        registry.register(tiny_lattice()).unwrap();
        let codec = Codec::new(&registry);

        let package = codec.encode_to_package("ABBA cab!", Some("tiny")).unwrap();
        let decoded = codec.decode_package(&package).unwrap();
        assert_eq!(decoded.text, "abba cab");
        assert!(decoded.is_exact());
    }

    #[test]
    fn duplicate_key_rejected() {
        let mut registry = LatticeRegistry::builtin();
        registry.register(tiny_lattice()).unwrap();
        assert!(matches!(
            registry.register(tiny_lattice()),
            Err(RegistryError::DuplicateKey(_))
        ));
    }

    #[test]
    fn colliding_anchors_rejected() {
        let result = Lattice::builder(LatticeKey::new("bad").unwrap(), Dimension::TwoD)
            .anchor('A', Coord::new2(0.2, 0.2))
            .anchor('B', Coord::new2(0.2, 0.2))
            .build();
        assert!(matches!(result, Err(RegistryError::InvalidLattice { .. })));
    }

    #[test]
    fn wrong_dimension_anchor_rejected() {
        let result = Lattice::builder(LatticeKey::new("flat").unwrap(), Dimension::ThreeD)
            .anchor('A', Coord::new2(0.2, 0.2))
            .build();
        assert!(matches!(result, Err(RegistryError::InvalidLattice { .. })));
    }

    #[test]
    fn shared_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    let text = format!("thread {i}");
                    let package = encode_to_package(&text, None).unwrap();
                    decode_package(&package).unwrap().text
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!("THREAD {i}"));
        }
    }
}
