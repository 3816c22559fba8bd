use super::{squared_distance, Point2, TOLERANCE};

/// Projects `point` onto the infinite line through `a` and `b`.
///
/// A degenerate (zero-length) line projects everything onto `a`.
#[must_use]
pub fn project_onto_line(a: &Point2, b: &Point2, point: &Point2) -> Point2 {
    let dir = b - a;
    let len_sq = dir.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return *a;
    }
    // Axis-aligned lines keep the fixed coordinate exact so boundary checks
    // against the floor rectangle compare equal.
    if dir.x == 0.0 {
        return Point2::new(a.x, point.y);
    }
    if dir.y == 0.0 {
        return Point2::new(point.x, a.y);
    }
    let t = (point - a).dot(&dir) / len_sq;
    a + dir * t
}

/// Returns the projection of `point` onto the line through `a` and `b` if it
/// falls within the segment's bounding box, otherwise `None`.
#[must_use]
pub fn closest_point_within_segment(a: &Point2, b: &Point2, point: &Point2) -> Option<Point2> {
    let projected = project_onto_line(a, b, point);
    let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
    let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
    let inside = (min_x..=max_x).contains(&projected.x) && (min_y..=max_y).contains(&projected.y);
    inside.then_some(projected)
}

/// Squared distance from `point` to the segment `a`–`b`, or `None` when the
/// perpendicular foot lies outside the segment.
#[must_use]
pub fn squared_distance_to_segment(a: &Point2, b: &Point2, point: &Point2) -> Option<f64> {
    closest_point_within_segment(a, b, point).map(|foot| squared_distance(&foot, point))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn projection_onto_diagonal() {
        let p = project_onto_line(
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 2.0),
            &Point2::new(2.0, 0.0),
        );
        assert_relative_eq!(p.x, 1.0);
        assert_relative_eq!(p.y, 1.0);
    }

    #[test]
    fn projection_onto_axis_aligned_lines_is_exact() {
        let h = project_onto_line(
            &Point2::new(0.0, 1.0),
            &Point2::new(1.75, 1.0),
            &Point2::new(0.3, 0.99),
        );
        assert!((h.y - 1.0).abs() < f64::EPSILON);
        let v = project_onto_line(
            &Point2::new(1.75, 0.0),
            &Point2::new(1.75, 1.0),
            &Point2::new(1.7, 0.4),
        );
        assert!((v.x - 1.75).abs() < f64::EPSILON);
    }

    #[test]
    fn closest_point_outside_segment_is_none() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        assert!(closest_point_within_segment(&a, &b, &Point2::new(1.5, 0.2)).is_none());
        let inside = closest_point_within_segment(&a, &b, &Point2::new(0.5, 0.2)).unwrap();
        assert_relative_eq!(inside.x, 0.5);
        assert_relative_eq!(inside.y, 0.0);
    }

    #[test]
    fn squared_distance_to_segment_interior() {
        let d = squared_distance_to_segment(
            &Point2::new(0.0, 0.0),
            &Point2::new(0.0, 4.0),
            &Point2::new(3.0, 2.0),
        )
        .unwrap();
        assert_relative_eq!(d, 9.0);
    }
}
