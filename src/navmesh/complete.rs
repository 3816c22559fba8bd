use std::collections::HashSet;

use super::SYNTHETIC_EDGE;
use crate::graph::Graph;
use crate::math::intersect_2d::segments_intersect;
use crate::math::{perp_dot, squared_distance};
use crate::topology::WallKind;

/// Adds synthetic edges to a wall graph until no interior vertex has a reflex
/// angle between its edges.
///
/// For each vertex off the outer boundary, every incident edge must have
/// another incident edge strictly on each side of it. When a side is empty the
/// vertex is joined to the nearest vertex on that side whose connecting segment
/// crosses no existing edge. Passes repeat until one adds nothing.
#[derive(Debug)]
pub struct CompleteMesh<'a> {
    walls: &'a Graph,
}

/// Which sides of an edge already have an incident edge.
#[derive(Debug, Clone, Copy, Default)]
struct Sides {
    counter_clockwise: bool,
    clockwise: bool,
}

impl Sides {
    fn both(self) -> bool {
        self.counter_clockwise && self.clockwise
    }
}

impl<'a> CompleteMesh<'a> {
    /// Creates a new mesh completion operation over a wall graph.
    #[must_use]
    pub fn new(walls: &'a Graph) -> Self {
        Self { walls }
    }

    /// Executes the completion, returning the wall graph with synthetic edges added.
    #[must_use]
    pub fn execute(&self) -> Graph {
        let mut mesh = self.walls.clone();
        let n = mesh.vertex_count();
        let mut checked = HashSet::new();

        let mut changed = true;
        while changed {
            changed = false;
            for vertex in 0..n {
                if touches_boundary(&mesh, vertex) {
                    continue;
                }
                for other in 0..n {
                    if !mesh.has_edge(vertex, other) || !checked.insert((vertex, other)) {
                        continue;
                    }
                    let sides = occupied_sides(&mesh, vertex, other);
                    if sides.both() {
                        continue;
                    }
                    for target in find_joins(&mesh, vertex, other, sides) {
                        mesh.set_edge(vertex, target, SYNTHETIC_EDGE, true);
                        changed = true;
                    }
                }
            }
        }

        mesh
    }
}

fn touches_boundary(mesh: &Graph, vertex: usize) -> bool {
    (0..mesh.vertex_count())
        .any(|other| WallKind::from_code(mesh.edge_value(vertex, other)) == Some(WallKind::Boundary))
}

/// Sides of `vertex → other` on which `vertex` has another incident edge.
fn occupied_sides(mesh: &Graph, vertex: usize, other: usize) -> Sides {
    let origin = mesh.position(vertex);
    let edge = mesh.position(other) - origin;
    let mut sides = Sides::default();
    for next in mesh.neighbours(vertex) {
        let turn = perp_dot(&edge, &(mesh.position(next) - origin));
        if turn > 0.0 {
            sides.counter_clockwise = true;
        } else if turn < 0.0 {
            sides.clockwise = true;
        }
        if sides.both() {
            break;
        }
    }
    sides
}

/// Nearest unobstructed vertices on each empty side of `vertex → other`.
fn find_joins(mesh: &Graph, vertex: usize, other: usize, mut sides: Sides) -> Vec<usize> {
    let origin = mesh.position(vertex);
    let edge = mesh.position(other) - origin;

    let mut candidates: Vec<usize> = (0..mesh.vertex_count())
        .filter(|&c| c != vertex && c != other)
        .collect();
    candidates.sort_by(|&a, &b| {
        squared_distance(&origin, &mesh.position(a))
            .total_cmp(&squared_distance(&origin, &mesh.position(b)))
    });

    let mut joins = Vec::new();
    for candidate in candidates {
        if mesh.has_edge(vertex, candidate) {
            continue;
        }
        let turn = perp_dot(&edge, &(mesh.position(candidate) - origin));
        let wanted = (turn > 0.0 && !sides.counter_clockwise) || (turn < 0.0 && !sides.clockwise);
        if wanted && !crosses_any_edge(mesh, vertex, candidate) {
            joins.push(candidate);
            if turn > 0.0 {
                sides.counter_clockwise = true;
            } else {
                sides.clockwise = true;
            }
        }
        if sides.both() {
            break;
        }
    }
    joins
}

/// Whether segment `a`–`b` crosses any edge not sharing an endpoint with it.
fn crosses_any_edge(mesh: &Graph, a: usize, b: usize) -> bool {
    let (pa, pb) = (mesh.position(a), mesh.position(b));
    let n = mesh.vertex_count();
    (0..n)
        .flat_map(|i| (0..i).map(move |j| (i, j)))
        .filter(|&(i, j)| mesh.has_edge(i, j) && ![i, j].contains(&a) && ![i, j].contains(&b))
        .any(|(i, j)| segments_intersect(&mesh.position(i), &mesh.position(j), &pa, &pb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floor::Floor;
    use crate::math::Point2;

    #[test]
    fn rectangle_needs_nothing() {
        let walls = Floor::default().wall_graph();
        let mesh = CompleteMesh::new(&walls).execute();
        assert_eq!(mesh.edge_count(), 4);
    }

    #[test]
    fn wall_through_the_middle_needs_nothing() {
        let mut floor = Floor::default();
        assert!(floor.add_wall(Point2::new(0.5, 0.0), Point2::new(0.5, 1.0)));
        let walls = floor.wall_graph();
        let mesh = CompleteMesh::new(&walls).execute();
        assert_eq!(mesh.edge_count(), walls.edge_count());
    }

    #[test]
    fn dangling_wall_is_braced_on_both_sides() {
        let mut floor = Floor::default();
        assert!(floor.add_wall(Point2::new(0.5, 0.0), Point2::new(0.5, 0.6)));
        let walls = floor.wall_graph();
        let mesh = CompleteMesh::new(&walls).execute();
        let tip = (0..mesh.vertex_count())
            .find(|&v| mesh.position(v) == Point2::new(0.5, 0.6))
            .unwrap_or_default();
        // The free end gets one synthetic edge on each side of the wall.
        let synthetic: Vec<_> = mesh
            .neighbours(tip)
            .filter(|&v| (mesh.edge_value(tip, v) - SYNTHETIC_EDGE).abs() < f64::EPSILON)
            .collect();
        assert_eq!(synthetic.len(), 2);
        let xs: Vec<f64> = synthetic.iter().map(|&v| mesh.position(v).x).collect();
        assert!(xs.iter().any(|&x| x < 0.5) && xs.iter().any(|&x| x > 0.5));
        for &v in &synthetic {
            assert!(!crosses_any_edge(&mesh, tip, v));
        }
    }
}
