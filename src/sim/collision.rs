//! Pairwise collision response between circular actors
//!
//! Mass is approximated by disc area, so a ball twice as wide pushes four
//! times as hard. The response is the standard two-body elastic formula
//! applied along the line between centers.

use thiserror::Error;

use super::actor::{Actor, ActorId};
use super::vector::{self, Vector};

/// Why a pair could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CollisionError {
    /// Both centers coincide, so the contact normal is undefined
    #[error("actors {a} and {b} share a center; collision normal is undefined")]
    CoincidentCenters { a: ActorId, b: ActorId },
}

/// Whether two actors' discs touch or overlap
#[inline]
pub fn overlaps(a: &Actor, b: &Actor) -> bool {
    vector::magnitude(vector::subtract(a.position, b.position)) <= a.radius + b.radius
}

/// Post-collision velocity of `a` after hitting `b`
///
/// `va` and `vb` are the velocities going into the collision; they may differ
/// from the actors' stored velocities when walls already reflected them this
/// tick.
pub fn collision_velocity(
    a: &Actor,
    va: Vector,
    b: &Actor,
    vb: Vector,
) -> Result<Vector, CollisionError> {
    let delta_p = vector::subtract(a.position, b.position);
    let distance = vector::magnitude(delta_p);
    if distance == 0.0 {
        return Err(CollisionError::CoincidentCenters { a: a.id, b: b.id });
    }

    let delta_v = vector::subtract(va, vb);
    let scalar = vector::dot(delta_v, delta_p) / (distance * distance);
    let (wa, wb) = (a.area(), b.area());
    let mass_factor = 2.0 * wb / (wa + wb);

    Ok(vector::subtract(va, vector::scale(delta_p, scalar * mass_factor)))
}

/// New velocities for both actors of a colliding pair, using their stored
/// velocities
pub fn resolve_pair(a: &Actor, b: &Actor) -> Result<(Vector, Vector), CollisionError> {
    let va = collision_velocity(a, a.velocity, b, b.velocity)?;
    let vb = collision_velocity(b, b.velocity, a, a.velocity)?;
    Ok((va, vb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn actor(id: u32, pos: (f64, f64), vel: (f64, f64), radius: f64) -> Actor {
        Actor::new(
            ActorId(id),
            Vector::new(pos.0, pos.1),
            Vector::new(vel.0, vel.1),
            radius,
        )
        .unwrap()
    }

    #[test]
    fn test_equal_mass_head_on_swaps() {
        let a = actor(1, (100.0, 100.0), (3.0, 0.0), 10.0);
        let b = actor(2, (118.0, 100.0), (-3.0, 0.0), 10.0);

        let (va, vb) = resolve_pair(&a, &b).unwrap();
        assert_eq!(va, Vector::new(-3.0, 0.0));
        assert_eq!(vb, Vector::new(3.0, 0.0));
    }

    #[test]
    fn test_heavy_ball_barely_moves() {
        let light = actor(1, (100.0, 100.0), (5.0, 0.0), 2.0);
        let heavy = actor(2, (120.0, 100.0), (0.0, 0.0), 20.0);

        let (vl, vh) = resolve_pair(&light, &heavy).unwrap();
        assert!(vl.x < 0.0, "light ball should rebound, got {vl}");
        assert!(vh.x > 0.0 && vh.x < 0.2, "heavy ball should creep, got {vh}");
    }

    #[test]
    fn test_coincident_centers_rejected() {
        let a = actor(1, (50.0, 50.0), (1.0, 0.0), 10.0);
        let b = actor(2, (50.0, 50.0), (-1.0, 0.0), 10.0);

        assert_eq!(
            resolve_pair(&a, &b),
            Err(CollisionError::CoincidentCenters {
                a: ActorId(1),
                b: ActorId(2)
            })
        );
    }

    #[test]
    fn test_overlaps() {
        let a = actor(1, (0.0, 0.0), (0.0, 0.0), 10.0);
        let touching = actor(2, (20.0, 0.0), (0.0, 0.0), 10.0);
        let apart = actor(3, (20.5, 0.0), (0.0, 0.0), 10.0);

        assert!(overlaps(&a, &touching));
        assert!(!overlaps(&a, &apart));
    }

    #[test]
    fn test_inputs_untouched() {
        let a = actor(1, (100.0, 100.0), (1.0, 2.0), 10.0);
        let b = actor(2, (110.0, 105.0), (-2.0, 0.5), 6.0);
        let (a0, b0) = (a.clone(), b.clone());

        let _ = resolve_pair(&a, &b).unwrap();
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    proptest! {
        #[test]
        fn prop_momentum_conserved(
            ax in 0.0f64..400.0, ay in 0.0f64..300.0,
            dx in -30.0f64..30.0, dy in -30.0f64..30.0,
            avx in -5.0f64..5.0, avy in -5.0f64..5.0,
            bvx in -5.0f64..5.0, bvy in -5.0f64..5.0,
            ra in 1.0f64..25.0, rb in 1.0f64..25.0
        ) {
            prop_assume!(dx.abs() + dy.abs() > 1e-3);
            let a = actor(1, (ax, ay), (avx, avy), ra);
            let b = actor(2, (ax + dx, ay + dy), (bvx, bvy), rb);

            let (va, vb) = resolve_pair(&a, &b).unwrap();
            let before = a.velocity * a.area() + b.velocity * b.area();
            let after = va * a.area() + vb * b.area();
            let tol = 1e-9 * (a.area() + b.area()) * 10.0;
            prop_assert!((before - after).length() <= tol, "{before} vs {after}");
        }
    }
}
