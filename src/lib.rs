//! Bounce Canvas - balls bouncing off walls, obstacles and each other
//!
//! Core modules:
//! - `sim`: Pure per-tick simulation (vectors, actors, obstacles, collisions, world)
//! - `driver`: Frame-time to tick conversion for the render loop
//! - `renderer`: Display abstraction, vertex frames and the WebGPU pipeline
//! - `settings`: Scene configuration (JSON)

pub mod driver;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::SceneConfig;

/// Simulation configuration constants
pub mod consts {
    /// Default display size in pixels (canvas default)
    pub const DISPLAY_WIDTH: f64 = 450.0;
    pub const DISPLAY_HEIGHT: f64 = 300.0;

    /// Largest frame delta forwarded to the simulation, in milliseconds
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

    /// Ball defaults
    pub const BALL_RADIUS: f64 = 10.0;

    /// Collision history is trimmed once it grows past this many records...
    pub const COLLISION_HISTORY_CAP: usize = 10;
    /// ...down to this many newest records
    pub const COLLISION_HISTORY_KEEP: usize = 3;
    /// Largest configurable history cap
    pub const MAX_COLLISION_HISTORY_CAP: usize = 1024;

    /// Past positions kept per ball for the fading trail
    pub const TRAIL_LENGTH: usize = 8;

    /// Largest ball count accepted for scattered scenes
    pub const MAX_SCATTER_BALLS: u64 = 10_000;
}
