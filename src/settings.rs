//! Scene configuration
//!
//! A scene is the display size, the history policy, and the initial actors
//! and obstacles. Scenes are plain serde data so they can be read from JSON;
//! `build` validates everything before any simulation starts.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::sim::{Actor, ActorId, Bounds, Color, HistoryLimits, Obstacle, Vector, World};

/// Display size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DISPLAY_WIDTH,
            height: DISPLAY_HEIGHT,
        }
    }
}

/// Initial state of one actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorConfig {
    /// Defaults to the actor's 1-based position in the list
    #[serde(default)]
    pub id: Option<u32>,
    pub position: (f64, f64),
    #[serde(default)]
    pub velocity: (f64, f64),
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Color name ("green", "blue", ...)
    #[serde(default)]
    pub color: Option<String>,
}

fn default_radius() -> f64 {
    BALL_RADIUS
}

/// A rectangular obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleConfig {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Complete scene description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub history: HistoryLimits,
    #[serde(default)]
    pub actors: Vec<ActorConfig>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleConfig>,
}

impl Default for SceneConfig {
    /// One green ball above two stacked boxes on a 450x300 display
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            history: HistoryLimits::default(),
            actors: vec![ActorConfig {
                id: Some(1),
                position: (290.0, 50.0),
                velocity: (-2.0, 2.0),
                radius: BALL_RADIUS,
                color: Some("green".into()),
            }],
            obstacles: vec![
                ObstacleConfig {
                    x: 140.0,
                    y: 100.0,
                    width: 100.0,
                    height: 100.0,
                },
                ObstacleConfig {
                    x: 160.0,
                    y: 140.0,
                    width: 100.0,
                    height: 30.0,
                },
            ],
        }
    }
}

impl SceneConfig {
    /// Default scene plus a second, blue ball drifting left
    pub fn two_ball() -> Self {
        let mut scene = Self::default();
        scene.actors.push(ActorConfig {
            id: Some(2),
            position: (200.0, 100.0),
            velocity: (-1.0, 0.0),
            radius: BALL_RADIUS,
            color: Some("blue".into()),
        });
        scene
    }

    /// Seeded random scene: `count` balls scattered over an empty display
    ///
    /// Balls never start overlapping each other; placement gives up after a
    /// bounded number of attempts, or once the display looks full, so crowded
    /// displays may get fewer balls.
    pub fn scatter(seed: u64, count: usize, display: DisplayConfig) -> Self {
        const ATTEMPTS_PER_BALL: usize = 64;
        const MAX_MISSES_IN_A_ROW: usize = 4 * ATTEMPTS_PER_BALL;
        const PALETTE: [&str; 4] = ["green", "blue", "red", "black"];

        let mut rng = Pcg32::seed_from_u64(seed);
        let mut actors: Vec<ActorConfig> = Vec::new();
        let mut misses = 0;

        for _ in 0..count.saturating_mul(ATTEMPTS_PER_BALL) {
            if actors.len() == count || misses >= MAX_MISSES_IN_A_ROW {
                break;
            }
            let radius = rng.random_range(5.0..15.0);
            if 2.0 * radius >= display.width || 2.0 * radius >= display.height {
                misses += 1;
                continue;
            }
            let position = (
                rng.random_range(radius..display.width - radius),
                rng.random_range(radius..display.height - radius),
            );
            let free = actors.iter().all(|a| {
                let (dx, dy) = (a.position.0 - position.0, a.position.1 - position.1);
                (dx * dx + dy * dy).sqrt() > a.radius + radius
            });
            if !free {
                misses += 1;
                continue;
            }
            misses = 0;

            let id = actors.len() as u32 + 1;
            let color = PALETTE[actors.len() % PALETTE.len()];
            actors.push(ActorConfig {
                id: Some(id),
                position,
                velocity: (rng.random_range(-3.0..3.0), rng.random_range(-3.0..3.0)),
                radius,
                color: Some(color.into()),
            });
        }

        if actors.len() < count {
            log::warn!(
                "scatter placed {} of {} balls on a {}x{} display",
                actors.len(),
                count,
                display.width,
                display.height
            );
        }

        Self {
            display,
            history: HistoryLimits::default(),
            actors,
            obstacles: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a scene from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let scene = Self::from_json(&json)?;
        log::info!(
            "Loaded scene from {} ({} actors, {} obstacles)",
            path.as_ref().display(),
            scene.actors.len(),
            scene.obstacles.len()
        );
        Ok(scene)
    }

    /// Validate the scene and produce the initial world and obstacle list
    pub fn build(&self) -> Result<(World, Vec<Obstacle>)> {
        self.history.validate()?;
        let bounds = Bounds::new(self.display.width, self.display.height)?;

        let actors = self
            .actors
            .iter()
            .enumerate()
            .map(|(i, cfg)| self.build_actor(i, cfg))
            .collect::<Result<Vec<_>>>()?;

        let obstacles = self
            .obstacles
            .iter()
            .map(|o| Obstacle::new(o.x, o.y, o.width, o.height))
            .collect::<Result<Vec<_>>>()?;

        Ok((World::new(bounds, actors)?, obstacles))
    }

    fn build_actor(&self, index: usize, cfg: &ActorConfig) -> Result<Actor> {
        let id = ActorId(cfg.id.unwrap_or(index as u32 + 1));
        let color = match cfg.color.as_deref() {
            None => Color::default(),
            Some(name) => Color::from_name(name)
                .ok_or_else(|| Error::validation(format!("actor {id}: unknown color {name:?}")))?,
        };

        Actor::new(
            id,
            Vector::new(cfg.position.0, cfg.position.1),
            Vector::new(cfg.velocity.0, cfg.velocity.1),
            cfg.radius,
        )?
        .with_color(color)
        .with_history_limits(self.history)
    }
}
