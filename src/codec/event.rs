//! codec::event
//!
//! Path events and the encoded path that carries them.
//!
//! # Wire Shape
//!
//! Events are internally tagged by `type`:
//!
//! ```json
//! {"type":"move","x":0.5,"y":0.2}
//! {"type":"line","x":0.7598,"y":0.35}
//! {"type":"tick","x":0.7598,"y":0.35,"axis":150.0}
//! ```
//!
//! 3D events add `z`. Unknown fields are rejected.

use serde::{Deserialize, Serialize};

use crate::core::types::{Coord, Dimension, LatticeKey};

/// One atomic drawing instruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum PathEvent {
    /// Lift the pen and start a new stroke at a vertex.
    Move {
        x: f64,
        y: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        z: Option<f64>,
    },
    /// Draw a segment from the current position to a vertex.
    Line {
        x: f64,
        y: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        z: Option<f64>,
    },
    /// Mark one repetition of the current character at the current vertex.
    /// `axis` is the mark's orientation in degrees, in `[0, 180)`.
    Tick {
        x: f64,
        y: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        z: Option<f64>,
        axis: f64,
    },
}

/// Event discriminant, for counting and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Move,
    Line,
    Tick,
}

impl PathEvent {
    pub fn move_to(at: Coord) -> Self {
        PathEvent::Move {
            x: at.x,
            y: at.y,
            z: at.z,
        }
    }

    pub fn line_to(at: Coord) -> Self {
        PathEvent::Line {
            x: at.x,
            y: at.y,
            z: at.z,
        }
    }

    pub fn tick_at(at: Coord, axis: f64) -> Self {
        PathEvent::Tick {
            x: at.x,
            y: at.y,
            z: at.z,
            axis,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            PathEvent::Move { .. } => EventKind::Move,
            PathEvent::Line { .. } => EventKind::Line,
            PathEvent::Tick { .. } => EventKind::Tick,
        }
    }

    /// The vertex this event refers to.
    pub fn coord(&self) -> Coord {
        match *self {
            PathEvent::Move { x, y, z } | PathEvent::Line { x, y, z } => Coord { x, y, z },
            PathEvent::Tick { x, y, z, .. } => Coord { x, y, z },
        }
    }

    /// Tick orientation, `None` for moves and lines.
    pub fn axis(&self) -> Option<f64> {
        match self {
            PathEvent::Tick { axis, .. } => Some(*axis),
            _ => None,
        }
    }
}

/// The ordered event stream for one piece of text on one lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncodedPath {
    pub events: Vec<PathEvent>,
    pub lattice_key: LatticeKey,
    pub dimension: Dimension,
}

/// Event counts and drawn length of a path.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PathSummary {
    pub moves: usize,
    pub lines: usize,
    pub ticks: usize,
    /// Total length of all `line` segments, in lattice units.
    pub length: f64,
}

impl PathSummary {
    pub fn events(&self) -> usize {
        self.moves + self.lines + self.ticks
    }
}

impl EncodedPath {
    pub fn new(lattice_key: LatticeKey, dimension: Dimension) -> Self {
        Self {
            events: Vec::new(),
            lattice_key,
            dimension,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Count events by kind and measure the drawn length.
    pub fn summary(&self) -> PathSummary {
        let mut summary = PathSummary::default();
        let mut position: Option<Coord> = None;
        for event in &self.events {
            let at = event.coord();
            match event.kind() {
                EventKind::Move => summary.moves += 1,
                EventKind::Line => {
                    summary.lines += 1;
                    if let Some(from) = position {
                        summary.length += from.distance(&at);
                    }
                }
                EventKind::Tick => summary.ticks += 1,
            }
            position = Some(at);
        }
        summary
    }
}
