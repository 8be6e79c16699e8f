//! 2D vector arithmetic
//!
//! Positions and velocities are `glam::DVec2` values. The free functions here
//! are the whole vocabulary the simulation uses; every one returns a new value
//! and never touches its inputs.

use glam::DVec2;

/// A 2-component real vector
pub type Vector = DVec2;

#[inline]
pub fn add(a: Vector, b: Vector) -> Vector {
    DVec2::new(a.x + b.x, a.y + b.y)
}

#[inline]
pub fn subtract(a: Vector, b: Vector) -> Vector {
    DVec2::new(a.x - b.x, a.y - b.y)
}

#[inline]
pub fn scale(v: Vector, k: f64) -> Vector {
    DVec2::new(k * v.x, k * v.y)
}

#[inline]
pub fn dot(a: Vector, b: Vector) -> f64 {
    a.x * b.x + a.y * b.y
}

/// Euclidean length; zero only for the zero vector
#[inline]
pub fn magnitude(v: Vector) -> f64 {
    (v.x * v.x + v.y * v.y).sqrt()
}

/// Mirror across the vertical axis (bounce off a left/right surface)
#[inline]
pub fn flip_x(v: Vector) -> Vector {
    DVec2::new(-v.x, v.y)
}

/// Mirror across the horizontal axis (bounce off a top/bottom surface)
#[inline]
pub fn flip_y(v: Vector) -> Vector {
    DVec2::new(v.x, -v.y)
}

/// Heading angle, measured as `atan2(x, y)` (clockwise from +y)
#[inline]
pub fn direction(v: Vector) -> f64 {
    v.x.atan2(v.y)
}

/// True when both components are finite
#[inline]
pub fn is_finite(v: Vector) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_basic_ops() {
        let a = DVec2::new(3.0, 4.0);
        let b = DVec2::new(-1.0, 2.0);

        assert_eq!(add(a, b), DVec2::new(2.0, 6.0));
        assert_eq!(subtract(a, b), DVec2::new(4.0, 2.0));
        assert_eq!(scale(a, 2.0), DVec2::new(6.0, 8.0));
        assert_eq!(dot(a, b), 5.0);
        assert_eq!(magnitude(a), 5.0);
    }

    #[test]
    fn test_magnitude_zero_only_for_zero() {
        assert_eq!(magnitude(DVec2::ZERO), 0.0);
        assert!(magnitude(DVec2::new(1e-9, 0.0)) > 0.0);
    }

    #[test]
    fn test_flips_leave_input_untouched() {
        let v = DVec2::new(2.0, -3.0);
        let fx = flip_x(v);
        let fy = flip_y(v);

        assert_eq!(fx, DVec2::new(-2.0, -3.0));
        assert_eq!(fy, DVec2::new(2.0, 3.0));
        assert_eq!(v, DVec2::new(2.0, -3.0));
    }

    #[test]
    fn test_direction() {
        assert!((direction(DVec2::new(0.0, 1.0))).abs() < 1e-12);
        assert!((direction(DVec2::new(1.0, 0.0)) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_add_subtract_round_trip(
            ax in -1e6f64..1e6, ay in -1e6f64..1e6,
            bx in -1e6f64..1e6, by in -1e6f64..1e6
        ) {
            let a = DVec2::new(ax, ay);
            let b = DVec2::new(bx, by);
            let back = subtract(add(a, b), b);
            prop_assert!((back.x - a.x).abs() <= 1e-9 * (1.0 + a.x.abs() + b.x.abs()));
            prop_assert!((back.y - a.y).abs() <= 1e-9 * (1.0 + a.y.abs() + b.y.abs()));
        }

        #[test]
        fn prop_dot_self_is_magnitude_squared(x in -1e3f64..1e3, y in -1e3f64..1e3) {
            let v = DVec2::new(x, y);
            let m = magnitude(v);
            prop_assert!((dot(v, v) - m * m).abs() <= 1e-9 * (1.0 + m * m));
        }
    }
}
