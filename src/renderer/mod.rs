//! Rendering
//!
//! The simulation never draws. It is handed to a `Display`, which receives
//! the clear, obstacle and actor draw calls for one frame. `FrameBuilder`
//! turns those calls into triangles; `RenderState` presents them with WebGPU.

pub mod frame;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use frame::FrameBuilder;
pub use pipeline::RenderState;

use crate::sim::{Actor, Color, Edge, Obstacle, World};

/// A drawing surface for one frame at a time
pub trait Display {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    /// Start a new frame
    fn clear(&mut self);
    /// Draw an actor's disc, along with its trail if the display shows one
    fn draw_circle(&mut self, actor: &Actor);
    fn draw_rect(&mut self, obstacle: &Obstacle, color: Color);
}

/// Obstacle fill for the edge kind touched last tick
pub fn obstacle_color(contact: Option<Edge>) -> Color {
    match contact {
        None => Color::BLACK,
        Some(Edge::TopBottom) => Color::RED,
        Some(Edge::LeftRight) => Color::BLUE,
    }
}

/// Draw a full frame: clear, then obstacles, then actors on top
///
/// The display must have the same size as the world it shows.
pub fn draw_world<D: Display + ?Sized>(display: &mut D, world: &World, obstacles: &[Obstacle]) {
    debug_assert!(
        display.width() == world.bounds.width && display.height() == world.bounds.height,
        "display is {}x{} but the world is {}x{}",
        display.width(),
        display.height(),
        world.bounds.width,
        world.bounds.height
    );
    display.clear();
    for (index, obstacle) in obstacles.iter().enumerate() {
        display.draw_rect(obstacle, obstacle_color(world.obstacle_contact(index)));
    }
    for actor in world.actors() {
        display.draw_circle(actor);
    }
}
