//! CPU-side frame assembly

use glam::Vec2;

use super::Display;
use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::TRAIL_LENGTH;
use crate::sim::{Actor, Bounds, Color, Obstacle};

/// Circle tessellation
const CIRCLE_SEGMENTS: u32 = 32;

/// Opacity of the newest trail ghost; older ones fade out linearly
const TRAIL_ALPHA: f32 = 0.4;

/// Fill for the trail ghost `age` ticks old (0 = newest)
fn ghost_color(color: Color, age: usize) -> Color {
    let [r, g, b, a] = color.0;
    let fade = 1.0 - age as f32 / TRAIL_LENGTH as f32;
    Color([r, g, b, a * TRAIL_ALPHA * fade])
}

/// A `Display` that collects one frame of triangles
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    width: f64,
    height: f64,
    background: Color,
    vertices: Vec<Vertex>,
}

impl FrameBuilder {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            width: bounds.width,
            height: bounds.height,
            background: colors::BACKGROUND,
            vertices: Vec::new(),
        }
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Triangles drawn since the last `clear`, in pixel coordinates
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }
}

impl Display for FrameBuilder {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.vertices.clear();
    }

    fn draw_circle(&mut self, actor: &Actor) {
        // Oldest ghost first so newer ones blend over it
        for (age, point) in actor.trail.iter().enumerate().rev() {
            self.vertices.extend(shapes::circle(
                Vec2::new(point.x as f32, point.y as f32),
                actor.radius as f32,
                ghost_color(actor.color, age),
                CIRCLE_SEGMENTS,
            ));
        }

        let center = Vec2::new(actor.position.x as f32, actor.position.y as f32);
        self.vertices.extend(shapes::circle(
            center,
            actor.radius as f32,
            actor.color,
            CIRCLE_SEGMENTS,
        ));
    }

    fn draw_rect(&mut self, obstacle: &Obstacle, color: Color) {
        self.vertices.extend(shapes::rect(
            Vec2::new(obstacle.x as f32, obstacle.y as f32),
            Vec2::new(obstacle.width as f32, obstacle.height as f32),
            color,
        ));
    }
}
