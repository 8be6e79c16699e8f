//! Static rectangular obstacles
//!
//! Obstacles are axis-aligned rectangles in display coordinates (y grows
//! downward). They have no physics of their own; actors reflect off their
//! edges. Edge detection works on the actor's center, like the walls do.

use serde::{Deserialize, Serialize};

use super::actor::ActorId;
use super::vector::Vector;
use crate::error::{Error, Result};

/// Which kind of edge an actor touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    /// Top or bottom edge (reflects the y velocity)
    TopBottom,
    /// Left or right edge (reflects the x velocity)
    LeftRight,
}

/// An actor touched an obstacle edge during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleContact {
    /// Index into the obstacle list passed to the update
    pub obstacle: usize,
    pub actor: ActorId,
    pub edge: Edge,
}

/// Edges touched by one motion step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeHits {
    pub top_bottom: bool,
    pub left_right: bool,
}

impl EdgeHits {
    pub fn any(&self) -> bool {
        self.top_bottom || self.left_right
    }
}

/// A static axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Obstacle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        if ![x, y, width, height].iter().all(|v| v.is_finite()) {
            return Err(Error::validation(format!(
                "obstacle at ({x}, {y}) has non-finite geometry"
            )));
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(Error::validation(format!(
                "obstacle at ({x}, {y}) must have positive size, got {width}x{height}"
            )));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Edges a center touches while moving from `from` by `step`
    ///
    /// An edge counts when the segment `from -> from + step` meets the edge
    /// line inside the edge's span, endpoints included. A center resting
    /// exactly on an edge therefore always counts, and a fast actor cannot
    /// skip over an edge between two ticks.
    pub fn touched_edges(&self, from: Vector, step: Vector) -> EdgeHits {
        let on_horizontal = |edge_y: f64| {
            crossing(from.y, step.y, edge_y)
                .map(|t| from.x + step.x * t)
                .is_some_and(|x| x >= self.x && x <= self.right())
        };
        let on_vertical = |edge_x: f64| {
            crossing(from.x, step.x, edge_x)
                .map(|t| from.y + step.y * t)
                .is_some_and(|y| y >= self.y && y <= self.bottom())
        };

        EdgeHits {
            top_bottom: on_horizontal(self.y) || on_horizontal(self.bottom()),
            left_right: on_vertical(self.x) || on_vertical(self.right()),
        }
    }
}

/// Parameter `t` in `[0, 1]` at which `from + delta * t` reaches `edge`
fn crossing(from: f64, delta: f64, edge: f64) -> Option<f64> {
    if delta == 0.0 {
        return (from == edge).then_some(0.0);
    }
    let t = (edge - from) / delta;
    (0.0..=1.0).contains(&t).then_some(t)
}
