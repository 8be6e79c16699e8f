//! Simulation module
//!
//! All physics lives here. This module is pure and deterministic:
//! - Every tick returns a new `World`; nothing is mutated in place
//! - Tick ids come from a counter, never from an RNG
//! - Stable iteration order (actor list order)
//! - No rendering or platform dependencies

pub mod actor;
pub mod collision;
pub mod obstacle;
pub mod vector;
pub mod world;

pub use actor::{Actor, ActorId, CollisionHistory, CollisionRecord, Color, HistoryLimits, TickId};
pub use collision::{CollisionError, collision_velocity, overlaps, resolve_pair};
pub use obstacle::{Edge, EdgeHits, Obstacle, ObstacleContact};
pub use vector::Vector;
pub use world::{Bounds, World};
