pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Default radius of a wall vertex; walls must keep this clearance.
pub const NODE_RADIUS: f64 = 0.015;

/// Perpendicular dot product (2D cross product) of `a` and `b`.
///
/// Positive when `b` turns counter-clockwise from `a`, negative when it turns
/// clockwise, zero when the vectors are parallel.
#[must_use]
pub fn perp_dot(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Linear interpolation between `a` and `b`.
#[must_use]
pub fn lerp(a: &Point2, b: &Point2, t: f64) -> Point2 {
    a + (b - a) * t
}

/// Squared Euclidean distance between two points.
#[must_use]
pub fn squared_distance(a: &Point2, b: &Point2) -> f64 {
    (b - a).norm_squared()
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: &Point2, b: &Point2) -> f64 {
    (b - a).norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perp_dot_sign_follows_turn_direction() {
        let east = Vector2::new(1.0, 0.0);
        assert!(perp_dot(&east, &Vector2::new(0.0, 1.0)) > 0.0);
        assert!(perp_dot(&east, &Vector2::new(0.0, -1.0)) < 0.0);
        assert_relative_eq!(perp_dot(&east, &Vector2::new(-3.0, 0.0)), 0.0);
    }

    #[test]
    fn lerp_midpoint() {
        let p = lerp(&Point2::new(0.0, 0.0), &Point2::new(2.0, 4.0), 0.5);
        assert_relative_eq!(p.x, 1.0);
        assert_relative_eq!(p.y, 2.0);
    }

    #[test]
    fn distances() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        assert_relative_eq!(squared_distance(&a, &b), 25.0);
        assert_relative_eq!(distance(&a, &b), 5.0);
    }
}
