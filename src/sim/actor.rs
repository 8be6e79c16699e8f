//! Ball actors and their collision history

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::vector::{self, Vector};
use super::world::Bounds;
use crate::consts::*;
use crate::error::{Error, Result};

/// Stable actor identity, unique within a world for the whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tick counter; only used to deduplicate pair resolution within a tick
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TickId(pub u64);

impl TickId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// RGBA fill color (render-only; never read by the physics)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const BLACK: Color = Color([0.0, 0.0, 0.0, 1.0]);
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);
    pub const GREEN: Color = Color([0.0, 0.5, 0.0, 1.0]);
    pub const BLUE: Color = Color([0.0, 0.0, 1.0, 1.0]);
    pub const RED: Color = Color([1.0, 0.0, 0.0, 1.0]);

    /// Parse a CSS-style color name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "black" => Some(Color::BLACK),
            "white" => Some(Color::WHITE),
            "green" => Some(Color::GREEN),
            "blue" => Some(Color::BLUE),
            "red" => Some(Color::RED),
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::GREEN
    }
}

/// "Actor collided with `partner` during `tick`"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionRecord {
    pub partner: ActorId,
    pub tick: TickId,
}

/// Trimming policy for a collision history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLimits {
    /// Longest the history may get
    pub cap: usize,
    /// Records kept (newest) once `cap` is exceeded
    pub keep: usize,
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            cap: COLLISION_HISTORY_CAP,
            keep: COLLISION_HISTORY_KEEP,
        }
    }
}

impl HistoryLimits {
    pub fn new(cap: usize, keep: usize) -> Result<Self> {
        let limits = Self { cap, keep };
        limits.validate()?;
        Ok(limits)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cap == 0 {
            return Err(Error::validation("collision history cap must be at least 1"));
        }
        if self.cap > MAX_COLLISION_HISTORY_CAP {
            return Err(Error::validation(format!(
                "collision history cap ({}) exceeds {}",
                self.cap, MAX_COLLISION_HISTORY_CAP
            )));
        }
        if self.keep > self.cap {
            return Err(Error::validation(format!(
                "collision history keep ({}) exceeds cap ({})",
                self.keep, self.cap
            )));
        }
        Ok(())
    }
}

/// Bounded log of recent collision partners, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionHistory {
    records: Vec<CollisionRecord>,
    limits: HistoryLimits,
}

impl CollisionHistory {
    pub fn new(limits: HistoryLimits) -> Self {
        Self {
            records: Vec::new(),
            limits,
        }
    }

    pub fn limits(&self) -> HistoryLimits {
        self.limits
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the pair with `partner` was already resolved during `tick`
    pub fn contains(&self, partner: ActorId, tick: TickId) -> bool {
        self.records
            .iter()
            .any(|r| r.partner == partner && r.tick == tick)
    }

    /// Append a record, trimming to the newest `keep` once past `cap`
    pub fn record(&mut self, partner: ActorId, tick: TickId) {
        self.records.push(CollisionRecord { partner, tick });
        if self.records.len() > self.limits.cap {
            let excess = self.records.len().saturating_sub(self.limits.keep);
            self.records.drain(..excess);
        }
    }
}

/// A moving circular actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub position: Vector,
    pub velocity: Vector,
    pub radius: f64,
    pub color: Color,
    pub collisions: CollisionHistory,
    /// Recent positions for rendering (newest first)
    #[serde(skip)]
    pub trail: Vec<Vector>,
}

impl Actor {
    /// Create a validated actor with the default color and history limits
    pub fn new(id: ActorId, position: Vector, velocity: Vector, radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::validation(format!(
                "actor {id}: radius must be finite and positive, got {radius}"
            )));
        }
        if !vector::is_finite(position) {
            return Err(Error::validation(format!(
                "actor {id}: position must be finite, got {position}"
            )));
        }
        if !vector::is_finite(velocity) {
            return Err(Error::validation(format!(
                "actor {id}: velocity must be finite, got {velocity}"
            )));
        }

        Ok(Self::from_parts(
            id,
            position,
            velocity,
            radius,
            Color::default(),
            CollisionHistory::default(),
            Vec::new(),
        ))
    }

    /// Assemble an actor from every one of its fields
    ///
    /// Used for the per-tick rebuild, where each field is either carried over
    /// or freshly computed. No validation happens here.
    pub fn from_parts(
        id: ActorId,
        position: Vector,
        velocity: Vector,
        radius: f64,
        color: Color,
        collisions: CollisionHistory,
        trail: Vec<Vector>,
    ) -> Self {
        Self {
            id,
            position,
            velocity,
            radius,
            color,
            collisions,
            trail,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Replace the collision history with an empty one using `limits`
    pub fn with_history_limits(mut self, limits: HistoryLimits) -> Result<Self> {
        limits
            .validate()
            .map_err(|e| Error::validation(format!("actor {}: {e}", self.id)))?;
        self.collisions = CollisionHistory::new(limits);
        Ok(self)
    }

    /// Trail for the next tick: the current position pushed to the front,
    /// capped at `TRAIL_LENGTH`
    pub fn next_trail(&self) -> Vec<Vector> {
        let mut trail = Vec::with_capacity(TRAIL_LENGTH);
        trail.push(self.position);
        trail.extend(self.trail.iter().take(TRAIL_LENGTH - 1).copied());
        trail
    }

    /// Disc area, used as the actor's mass
    #[inline]
    pub fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    /// Velocity after bouncing off the display walls
    ///
    /// An axis flips when the center is within one radius of either edge.
    pub fn wall_reflected_velocity(&self, bounds: &Bounds) -> Vector {
        let mut velocity = self.velocity;
        let (p, r) = (self.position, self.radius);

        if p.x >= bounds.width - r || p.x - r <= 0.0 {
            velocity = vector::flip_x(velocity);
        }
        if p.y >= bounds.height - r || p.y - r <= 0.0 {
            velocity = vector::flip_y(velocity);
        }
        velocity
    }

    /// Euler step from `position` by `velocity`, clamped to stay one radius
    /// inside the display
    pub fn integrate(&self, velocity: Vector, bounds: &Bounds) -> Vector {
        let next = vector::add(self.position, velocity);
        let r = self.radius;
        Vector::new(
            clamp_axis(next.x, r, bounds.width - r),
            clamp_axis(next.y, r, bounds.height - r),
        )
    }
}

/// `max(min(v, hi), lo)`: a display narrower than the actor pins it to `lo`
#[inline]
fn clamp_axis(v: f64, lo: f64, hi: f64) -> f64 {
    v.min(hi).max(lo)
}
