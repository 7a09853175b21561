//! Navigation history and the travel-line geometry in (z, t) space.

use std::collections::VecDeque;

use kurbo::{Point, Vec2};

/// Number of recent moves the history retains.
const MOVE_WINDOW: usize = 32;

/// A (z, t) coordinate in navigation space; the plane-cache key.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct PlanePoint {
    /// Optical section index.
    pub z: u32,
    /// Timepoint index.
    pub t: u32,
}

impl PlanePoint {
    /// Build a point.
    pub fn new(z: u32, t: u32) -> Self {
        Self { z, t }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Self) -> f64 {
        self.to_point().distance(other.to_point())
    }

    fn to_point(self) -> Point {
        Point::new(f64::from(self.z), f64::from(self.t))
    }
}

/// Open half-lines of a [`TravelLine`], relative to its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Half {
    /// Strictly past the anchor along the direction of travel.
    Ahead,
    /// Strictly before the anchor, already travelled.
    Behind,
}

/// The current direction of travel through (z, t) space.
///
/// Anchored at the most recent position, pointing the way the user is moving.
/// Coordinates are integer lattice points, so the cross/dot products below
/// are exact in f64 and the predicates need no tolerance.
#[derive(Clone, Copy, Debug)]
pub struct TravelLine {
    anchor: Point,
    direction: Vec2,
}

impl TravelLine {
    /// The line through two distinct points, anchored at `to`. Returns `None`
    /// when the points coincide.
    pub fn through(from: PlanePoint, to: PlanePoint) -> Option<Self> {
        if from == to {
            return None;
        }
        let anchor = to.to_point();
        Some(Self {
            anchor,
            direction: anchor - from.to_point(),
        })
    }

    /// Whether `p` lies on the line.
    pub fn lies_on(&self, p: PlanePoint) -> bool {
        self.direction.cross(p.to_point() - self.anchor) == 0.0
    }

    /// Whether `p` lies on the given open half-line. The anchor itself lies
    /// on neither half.
    pub fn lies_on_half(&self, p: PlanePoint, half: Half) -> bool {
        if !self.lies_on(p) {
            return false;
        }
        let along = self.direction.dot(p.to_point() - self.anchor);
        match half {
            Half::Ahead => along > 0.0,
            Half::Behind => along < 0.0,
        }
    }
}

/// Sequence of visited (z, t) coordinates and the direction they imply.
#[derive(Clone, Debug, Default)]
pub struct NavigationHistory {
    moves: VecDeque<PlanePoint>,
}

impl NavigationHistory {
    /// An empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visit.
    pub fn record_move(&mut self, to: PlanePoint) {
        if self.moves.len() == MOVE_WINDOW {
            self.moves.pop_front();
        }
        self.moves.push_back(to);
    }

    /// The current direction of travel: the line through the two most recent
    /// distinct positions, anchored at the latest. `None` until two distinct
    /// points have been recorded.
    pub fn current_direction(&self) -> Option<TravelLine> {
        let last = *self.moves.back()?;
        let prev = self.moves.iter().rev().find(|&&p| p != last)?;
        TravelLine::through(*prev, last)
    }
}
