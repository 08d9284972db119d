//! core
//!
//! Core domain types and operations for QBC.
//!
//! # Modules
//!
//! - [`types`] - Strong types: LatticeKey, Coord, ContentHash, etc.
//! - [`lattice`] - Lattices and the registry that owns them
//! - [`canonical`] - Text canonicalization per lattice
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - The registry is read-only once built
//! - All operations are deterministic

pub mod canonical;
pub mod config;
pub mod lattice;
pub mod types;
