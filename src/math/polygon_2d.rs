use super::{perp_dot, Point2, Vector2};

/// Tests whether `point` lies inside (or on the boundary of) a convex polygon.
///
/// `polygon` lists the vertices in order, either winding; the last vertex
/// connects back to the first. The point is inside when it never lies on
/// opposite sides of two edges.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn point_in_convex_polygon(point: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    let mut prev_side = 0.0;
    for i in 0..n {
        let a = &polygon[i];
        let b = &polygon[(i + 1) % n];
        let side = perp_dot(&(b - a), &(point - a));
        if prev_side == 0.0 {
            prev_side = side;
        } else if prev_side * side < 0.0 {
            return false;
        }
    }
    true
}

/// Mean of the polygon's vertex positions.
///
/// Returns the origin for an empty slice.
#[must_use]
pub fn vertex_centroid(points: &[Point2]) -> Point2 {
    if points.is_empty() {
        return Point2::origin();
    }
    let sum = points
        .iter()
        .fold(Vector2::zeros(), |acc, p| acc + p.coords);
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    Point2::from(sum / n)
}
