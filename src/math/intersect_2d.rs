use super::{perp_dot, Point2, TOLERANCE};

/// Orientation of `c` relative to the directed line `a → b`.
///
/// Returns `1` for a counter-clockwise turn, `-1` for clockwise and `0` when
/// the three points are collinear within [`TOLERANCE`].
fn orientation(a: &Point2, b: &Point2, c: &Point2) -> i8 {
    let cross = perp_dot(&(b - a), &(c - a));
    if cross > TOLERANCE {
        1
    } else if cross < -TOLERANCE {
        -1
    } else {
        0
    }
}

/// For collinear `a`, `b`, `p`: whether `p` lies within the bounding box of `a`–`b`.
fn within_box(a: &Point2, b: &Point2, p: &Point2) -> bool {
    p.x <= a.x.max(b.x) + TOLERANCE
        && p.x >= a.x.min(b.x) - TOLERANCE
        && p.y <= a.y.max(b.y) + TOLERANCE
        && p.y >= a.y.min(b.y) - TOLERANCE
}

/// Closed segment-segment intersection test in 2D.
///
/// Segments that merely touch (an endpoint lying on the other segment) or
/// overlap collinearly count as intersecting.
#[must_use]
pub fn segments_intersect(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let o1 = orientation(a0, a1, b0);
    let o2 = orientation(a0, a1, b1);
    let o3 = orientation(b0, b1, a0);
    let o4 = orientation(b0, b1, a1);

    if o1 * o2 < 0 && o3 * o4 < 0 {
        return true;
    }

    (o1 == 0 && within_box(a0, a1, b0))
        || (o2 == 0 && within_box(a0, a1, b1))
        || (o3 == 0 && within_box(b0, b1, a0))
        || (o4 == 0 && within_box(b0, b1, a1))
}
