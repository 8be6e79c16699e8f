//! World state and the per-tick update
//!
//! A `World` is a value: `update` never mutates it and instead returns the
//! next one. Every actor is advanced against the same pre-tick snapshot, so
//! the result does not depend on actor order. The flip side is that a chain
//! of collisions (A hits B which then hits C) plays out over several ticks
//! rather than within one.

use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorId, TickId};
use super::collision::{self, CollisionError};
use super::obstacle::{Edge, Obstacle, ObstacleContact};
use super::vector::{self, Vector};
use crate::error::{Error, Result};

/// Size of the display the actors live in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(Error::validation(format!(
                "display must have positive finite size, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }
}

/// Simulation state for one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub bounds: Bounds,
    /// Actors in a stable order
    actors: Vec<Actor>,
    /// Tick that produced this state (0 for a fresh world)
    tick: TickId,
    /// Obstacle edges touched during that tick
    contacts: Vec<ObstacleContact>,
}

impl World {
    /// Create a world, rejecting duplicate ids and actors that do not fit
    pub fn new(bounds: Bounds, actors: Vec<Actor>) -> Result<Self> {
        let mut ids: Vec<ActorId> = actors.iter().map(|a| a.id).collect();
        ids.sort();
        if let Some(pair) = ids.windows(2).find(|w| w[0] == w[1]) {
            return Err(Error::validation(format!("duplicate actor id {}", pair[0])));
        }

        for actor in &actors {
            actor
                .collisions
                .limits()
                .validate()
                .map_err(|e| Error::validation(format!("actor {}: {e}", actor.id)))?;
            if 2.0 * actor.radius > bounds.width || 2.0 * actor.radius > bounds.height {
                return Err(Error::validation(format!(
                    "actor {} (radius {}) does not fit a {}x{} display",
                    actor.id, actor.radius, bounds.width, bounds.height
                )));
            }
        }

        Ok(Self {
            bounds,
            actors,
            tick: TickId::default(),
            contacts: Vec::new(),
        })
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn tick(&self) -> TickId {
        self.tick
    }

    pub fn contacts(&self) -> &[ObstacleContact] {
        &self.contacts
    }

    /// Edge kind last touched on the given obstacle, if any
    ///
    /// Top/bottom contacts win over left/right ones when both happened.
    pub fn obstacle_contact(&self, obstacle: usize) -> Option<Edge> {
        let mut edges = self
            .contacts
            .iter()
            .filter(|c| c.obstacle == obstacle)
            .map(|c| c.edge);
        let first = edges.next()?;
        Some(if first == Edge::TopBottom || edges.any(|e| e == Edge::TopBottom) {
            Edge::TopBottom
        } else {
            Edge::LeftRight
        })
    }

    /// Advance one tick using the next tick id
    pub fn update(&self, obstacles: &[Obstacle]) -> World {
        self.update_with_tick(self.tick.next(), obstacles)
    }

    /// Advance one tick under an explicit tick id
    pub fn update_with_tick(&self, tick: TickId, obstacles: &[Obstacle]) -> World {
        let mut contacts = Vec::new();

        // Phase 1: walls and obstacles, each actor on its own
        let reflected: Vec<Vector> = self
            .actors
            .iter()
            .map(|actor| self.reflect(actor, obstacles, &mut contacts))
            .collect();

        // Phase 2: pairs, against the pre-tick positions and reflected velocities
        let actors = self
            .actors
            .iter()
            .enumerate()
            .map(|(i, actor)| self.advance(i, actor, &reflected, tick))
            .collect();

        if !contacts.is_empty() {
            log::debug!("tick {}: {} obstacle contact(s)", tick.0, contacts.len());
        }
        log::trace!("tick {} advanced {} actor(s)", tick.0, self.actors.len());

        World {
            bounds: self.bounds,
            actors,
            tick,
            contacts,
        }
    }

    /// Velocity after bouncing off the walls and then each obstacle in turn
    fn reflect(
        &self,
        actor: &Actor,
        obstacles: &[Obstacle],
        contacts: &mut Vec<ObstacleContact>,
    ) -> Vector {
        let mut velocity = actor.wall_reflected_velocity(&self.bounds);

        for (index, obstacle) in obstacles.iter().enumerate() {
            let hits = obstacle.touched_edges(actor.position, velocity);
            if !hits.any() {
                continue;
            }
            if hits.top_bottom {
                velocity = vector::flip_y(velocity);
                contacts.push(ObstacleContact {
                    obstacle: index,
                    actor: actor.id,
                    edge: Edge::TopBottom,
                });
            }
            if hits.left_right {
                velocity = vector::flip_x(velocity);
                contacts.push(ObstacleContact {
                    obstacle: index,
                    actor: actor.id,
                    edge: Edge::LeftRight,
                });
            }
        }
        velocity
    }

    /// Resolve pair collisions for `actor` and integrate its position
    fn advance(&self, index: usize, actor: &Actor, reflected: &[Vector], tick: TickId) -> Actor {
        let mut velocity = reflected[index];
        let mut collisions = actor.collisions.clone();

        for (j, other) in self.actors.iter().enumerate() {
            if j == index || collisions.contains(other.id, tick) {
                continue;
            }
            if !collision::overlaps(actor, other) {
                continue;
            }

            match collision::collision_velocity(actor, velocity, other, reflected[j]) {
                Ok(v) => {
                    velocity = v;
                    collisions.record(other.id, tick);
                }
                Err(CollisionError::CoincidentCenters { a, b }) => {
                    log::warn!("tick {}: skipping {a} vs {b}, centers coincide", tick.0);
                }
            }
        }

        Actor::from_parts(
            actor.id,
            actor.integrate(velocity, &self.bounds),
            velocity,
            actor.radius,
            actor.color,
            collisions,
            actor.next_trail(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::actor::{CollisionHistory, HistoryLimits};

    fn actor(id: u32, pos: (f64, f64), vel: (f64, f64), radius: f64) -> Actor {
        Actor::new(
            ActorId(id),
            Vector::new(pos.0, pos.1),
            Vector::new(vel.0, vel.1),
            radius,
        )
        .unwrap()
    }

    fn world(actors: Vec<Actor>) -> World {
        World::new(Bounds::new(450.0, 300.0).unwrap(), actors).unwrap()
    }

    #[test]
    fn test_bounds_validation() {
        assert!(Bounds::new(0.0, 10.0).is_err());
        assert!(Bounds::new(10.0, f64::NAN).is_err());
        assert!(Bounds::new(10.0, 10.0).is_ok());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let res = World::new(
            Bounds::new(450.0, 300.0).unwrap(),
            vec![
                actor(1, (50.0, 50.0), (0.0, 0.0), 10.0),
                actor(1, (150.0, 50.0), (0.0, 0.0), 10.0),
            ],
        );
        assert!(matches!(res, Err(Error::Validation(_))));
    }

    #[test]
    fn test_oversized_actor_rejected() {
        let res = World::new(
            Bounds::new(40.0, 40.0).unwrap(),
            vec![actor(1, (20.0, 20.0), (0.0, 0.0), 25.0)],
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_unchecked_history_limits_rejected() {
        // Public fields bypass `HistoryLimits::new`; the world still checks
        let mut a = actor(1, (100.0, 100.0), (0.5, 0.0), 10.0);
        a.collisions = CollisionHistory::new(HistoryLimits { cap: 2, keep: 5 });
        let b = actor(2, (110.0, 100.0), (-0.5, 0.0), 10.0);

        let res = World::new(Bounds::new(450.0, 300.0).unwrap(), vec![a, b]);
        assert!(matches!(res, Err(Error::Validation(_))));
    }

    #[test]
    fn test_free_flight() {
        let w = world(vec![actor(1, (100.0, 100.0), (2.0, -1.0), 10.0)]);
        let next = w.update(&[]);

        assert_eq!(next.tick(), TickId(1));
        assert_eq!(next.actors()[0].position, Vector::new(102.0, 99.0));
        assert_eq!(next.actors()[0].velocity, Vector::new(2.0, -1.0));
        // Previous world untouched
        assert_eq!(w.actors()[0].position, Vector::new(100.0, 100.0));
        assert_eq!(w.tick(), TickId(0));
    }

    #[test]
    fn test_left_wall_bounce_stays_inside() {
        let w = world(vec![actor(1, (10.0, 150.0), (-3.0, 0.0), 10.0)]);
        let next = w.update(&[]);
        let a = &next.actors()[0];

        assert_eq!(a.velocity.x, 3.0);
        assert!(a.position.x - a.radius >= 0.0);
        assert_eq!(a.position, Vector::new(13.0, 150.0));
    }

    #[test]
    fn test_clamped_at_far_wall() {
        // Approaching the right wall, overshoot gets clamped
        let w = world(vec![actor(1, (437.0, 150.0), (5.0, 0.0), 10.0)]);
        let next = w.update(&[]);
        assert_eq!(next.actors()[0].position.x, 440.0);

        // Next tick sees the wall and turns around
        let next = next.update(&[]);
        assert_eq!(next.actors()[0].velocity.x, -5.0);
    }

    #[test]
    fn test_obstacle_top_edge_bounce() {
        let obstacle = Obstacle::new(140.0, 100.0, 100.0, 100.0).unwrap();
        let w = world(vec![actor(1, (200.0, 100.0), (0.0, -1.0), 10.0)]);
        let next = w.update(&[obstacle]);

        assert_eq!(next.actors()[0].velocity, Vector::new(0.0, 1.0));
        assert_eq!(
            next.contacts(),
            &[ObstacleContact {
                obstacle: 0,
                actor: ActorId(1),
                edge: Edge::TopBottom
            }]
        );
        assert_eq!(next.obstacle_contact(0), Some(Edge::TopBottom));
    }

    #[test]
    fn test_obstacle_side_edge_bounce() {
        let obstacle = Obstacle::new(140.0, 100.0, 100.0, 100.0).unwrap();
        let w = world(vec![actor(1, (137.0, 150.0), (4.0, 0.0), 10.0)]);
        let next = w.update(&[obstacle]);

        assert_eq!(next.actors()[0].velocity, Vector::new(-4.0, 0.0));
        assert_eq!(next.actors()[0].position, Vector::new(133.0, 150.0));
        assert_eq!(next.obstacle_contact(0), Some(Edge::LeftRight));

        // Contacts only describe the tick that produced them
        let later = next.update(&[obstacle]);
        assert!(later.contacts().is_empty());
        assert_eq!(later.obstacle_contact(0), None);
    }

    #[test]
    fn test_head_on_pair_swaps_and_records() {
        let w = world(vec![
            actor(1, (100.0, 100.0), (3.0, 0.0), 10.0),
            actor(2, (118.0, 100.0), (-3.0, 0.0), 10.0),
        ]);
        let next = w.update(&[]);
        let (a, b) = (&next.actors()[0], &next.actors()[1]);

        assert_eq!(a.velocity, Vector::new(-3.0, 0.0));
        assert_eq!(b.velocity, Vector::new(3.0, 0.0));
        assert!(a.collisions.contains(ActorId(2), TickId(1)));
        assert!(b.collisions.contains(ActorId(1), TickId(1)));
    }

    #[test]
    fn test_pair_conserves_momentum_after_wall_bounce() {
        // Actor 1 touches the left wall and overlaps actor 2 in the same tick
        let a = actor(1, (10.0, 150.0), (-1.0, 0.5), 10.0);
        let b = actor(2, (25.0, 154.0), (-2.0, 0.0), 7.0);
        let (wa, wb) = (a.area(), b.area());
        let w = world(vec![a, b]);
        let next = w.update(&[]);
        let (na, nb) = (&next.actors()[0], &next.actors()[1]);

        assert!(na.collisions.contains(ActorId(2), TickId(1)));
        assert!(nb.collisions.contains(ActorId(1), TickId(1)));

        // The pair sees actor 1's wall-reflected velocity (1, 0.5)
        let before = Vector::new(1.0, 0.5) * wa + Vector::new(-2.0, 0.0) * wb;
        let after = na.velocity * wa + nb.velocity * wb;
        assert!(
            (before - after).length() < 1e-9 * (wa + wb),
            "{before} vs {after}"
        );
    }

    #[test]
    fn test_trail_follows_positions() {
        let mut w = world(vec![actor(1, (100.0, 100.0), (2.0, 0.0), 10.0)]);
        for _ in 0..3 {
            w = w.update(&[]);
        }
        let a = &w.actors()[0];
        assert_eq!(a.position, Vector::new(106.0, 100.0));
        assert_eq!(
            a.trail,
            vec![
                Vector::new(104.0, 100.0),
                Vector::new(102.0, 100.0),
                Vector::new(100.0, 100.0)
            ]
        );
    }

    #[test]
    fn test_order_independent() {
        let a = actor(1, (100.0, 100.0), (2.0, 1.0), 10.0);
        let b = actor(2, (112.0, 108.0), (-1.0, 0.5), 7.0);
        let c = actor(3, (300.0, 200.0), (1.0, 1.0), 5.0);

        let forward = world(vec![a.clone(), b.clone(), c.clone()]).update(&[]);
        let backward = world(vec![c, b, a]).update(&[]);

        for id in [1, 2, 3] {
            assert_eq!(
                forward.actor(ActorId(id)),
                backward.actor(ActorId(id)),
                "actor {id} differs"
            );
        }
    }

    #[test]
    fn test_separated_actors_untouched() {
        let w = world(vec![
            actor(1, (100.0, 100.0), (1.0, 0.0), 10.0),
            actor(2, (130.0, 100.0), (-1.0, 0.0), 10.0),
        ]);
        let next = w.update(&[]);

        assert_eq!(next.actors()[0].velocity, Vector::new(1.0, 0.0));
        assert_eq!(next.actors()[1].velocity, Vector::new(-1.0, 0.0));
        assert!(next.actors()[0].collisions.is_empty());
    }

    #[test]
    fn test_same_tick_not_resolved_twice() {
        // Slow enough to still overlap after the first tick
        let w = world(vec![
            actor(1, (100.0, 100.0), (0.5, 0.0), 10.0),
            actor(2, (110.0, 100.0), (-0.5, 0.0), 10.0),
        ]);
        let once = w.update_with_tick(TickId(7), &[]);
        assert_eq!(once.actors()[0].velocity, Vector::new(-0.5, 0.0));
        assert!(collision::overlaps(&once.actors()[0], &once.actors()[1]));

        // Same tick id again: the pair is already in both histories
        let again = once.update_with_tick(TickId(7), &[]);
        assert_eq!(again.actors()[0].velocity, Vector::new(-0.5, 0.0));
        assert_eq!(again.actors()[0].collisions.len(), 1);
    }

    #[test]
    fn test_coincident_centers_skipped() {
        let w = world(vec![
            actor(1, (100.0, 100.0), (1.0, 0.0), 10.0),
            actor(2, (100.0, 100.0), (-1.0, 0.0), 10.0),
        ]);
        let next = w.update(&[]);

        for a in next.actors() {
            assert!(vector::is_finite(a.velocity));
            assert!(vector::is_finite(a.position));
            assert!(a.collisions.is_empty());
        }
        assert_eq!(next.actors()[0].velocity, Vector::new(1.0, 0.0));
    }

    #[test]
    fn test_history_capped_over_many_ticks() {
        let limits = HistoryLimits::default();
        // Two slow overlapping balls keep re-colliding
        let mut w = world(vec![
            actor(1, (100.0, 100.0), (0.01, 0.0), 10.0).with_history_limits(limits).unwrap(),
            actor(2, (105.0, 100.0), (-0.01, 0.0), 10.0).with_history_limits(limits).unwrap(),
        ]);
        for _ in 0..40 {
            w = w.update(&[]);
            for a in w.actors() {
                assert!(a.collisions.len() <= limits.cap);
            }
        }
    }

    #[test]
    fn test_identity_and_count_preserved() {
        let mut w = world(vec![
            actor(4, (50.0, 50.0), (2.0, 2.0), 10.0),
            actor(9, (300.0, 200.0), (-3.0, 1.0), 12.0),
        ]);
        let obstacles = [Obstacle::new(140.0, 100.0, 100.0, 100.0).unwrap()];
        for _ in 0..500 {
            w = w.update(&obstacles);
        }
        let ids: Vec<_> = w.actors().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![ActorId(4), ActorId(9)]);
        assert_eq!(w.tick(), TickId(500));
        for a in w.actors() {
            assert!(a.position.x >= a.radius && a.position.x <= 450.0 - a.radius);
            assert!(a.position.y >= a.radius && a.position.y <= 300.0 - a.radius);
        }
    }
}
