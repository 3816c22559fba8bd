use super::NavigationMesh;
use crate::error::MeshError;
use crate::math::distance_2d::squared_distance_to_segment;
use crate::math::Point2;

/// Traversal state of a navigation edge between `a` and `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeState {
    /// Open both ways, with the `a → b` and `b → a` weights.
    Bidirectional { forward: f64, backward: f64 },
    /// Open only `a → b`.
    Forward(f64),
    /// Open only `b → a`.
    Backward(f64),
    /// Present but closed both ways.
    Blocked,
}

/// A navigation edge selected by an edit, with its state after the edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavEdge {
    pub a: usize,
    pub b: usize,
    pub state: EdgeState,
}

/// Value written to a closed direction of a navigation edge.
const BLOCKED: f64 = -1.0;

impl NavigationMesh {
    /// Sets the weight of the edge nearest `point`.
    ///
    /// An edge open both ways, or blocked, gets `weight` in both directions; a
    /// one-way edge keeps its direction. The heuristic scale is lowered if the
    /// new weight requires it.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidWeight`] if `weight` is not a positive number.
    pub fn edit_weight(&mut self, point: Point2, weight: f64) -> Result<Option<NavEdge>, MeshError> {
        if weight.is_nan() || weight <= 0.0 {
            return Err(MeshError::InvalidWeight(weight));
        }
        let Some((a, b)) = self.edge_near(&point) else {
            return Ok(None);
        };
        match self.edge_state(a, b) {
            EdgeState::Bidirectional { .. } | EdgeState::Blocked => {
                self.nav_graph.set_weight(a, b, weight, true);
            }
            EdgeState::Forward(_) => self.nav_graph.set_weight(a, b, weight, false),
            EdgeState::Backward(_) => self.nav_graph.set_weight(b, a, weight, false),
        }
        Ok(Some(self.nav_edge(a, b)))
    }

    /// Cycles the direction of the edge nearest `point`.
    ///
    /// Open both ways becomes `a → b` only, which becomes `b → a` only, which
    /// becomes open both ways again. Blocked edges are left alone.
    pub fn change_direction(&mut self, point: Point2) -> Option<NavEdge> {
        let (a, b) = self.edge_near(&point)?;
        match self.edge_state(a, b) {
            EdgeState::Bidirectional { .. } => self.nav_graph.set_value(b, a, BLOCKED, false),
            EdgeState::Forward(weight) => {
                self.nav_graph.set_value(a, b, BLOCKED, false);
                self.nav_graph.set_value(b, a, weight, false);
            }
            EdgeState::Backward(weight) => self.nav_graph.set_value(a, b, weight, false),
            EdgeState::Blocked => {}
        }
        Some(self.nav_edge(a, b))
    }

    /// Closes the edge nearest `point` in both directions.
    pub fn block_path(&mut self, point: Point2) -> Option<NavEdge> {
        let (a, b) = self.edge_near(&point)?;
        if self.edge_state(a, b) != EdgeState::Blocked {
            self.nav_graph.set_value(a, b, BLOCKED, true);
        }
        Some(self.nav_edge(a, b))
    }

    /// First navigation edge whose segment passes within the edit threshold of
    /// `point`. Points beyond either end of a segment select nothing.
    #[allow(clippy::float_cmp)]
    fn edge_near(&self, point: &Point2) -> Option<(usize, usize)> {
        let graph = &self.nav_graph;
        let threshold_sq = self.edit_threshold * self.edit_threshold;
        let n = graph.vertex_count();
        (0..n)
            .flat_map(|a| (0..a).map(move |b| (a, b)))
            .filter(|&(a, b)| graph.edge_value(a, b) != 0.0 || graph.edge_value(b, a) != 0.0)
            .find(|&(a, b)| {
                squared_distance_to_segment(&graph.position(a), &graph.position(b), point)
                    .is_some_and(|d| d < threshold_sq)
            })
    }

    fn edge_state(&self, a: usize, b: usize) -> EdgeState {
        let forward = self.nav_graph.edge_value(a, b);
        let backward = self.nav_graph.edge_value(b, a);
        match (forward > 0.0, backward > 0.0) {
            (true, true) => EdgeState::Bidirectional { forward, backward },
            (true, false) => EdgeState::Forward(forward),
            (false, true) => EdgeState::Backward(backward),
            (false, false) => EdgeState::Blocked,
        }
    }

    fn nav_edge(&self, a: usize, b: usize) -> NavEdge {
        NavEdge {
            a,
            b,
            state: self.edge_state(a, b),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::floor::Floor;
    use crate::graph::SearchGraph;
    use approx::assert_relative_eq;

    /// Two links in an open floor: one edge from (0.2, 0.5) to (1.2, 0.5).
    fn corridor() -> NavigationMesh {
        let mut floor = Floor::default();
        floor.add_link("A", Point2::new(0.2, 0.5));
        floor.add_link("B", Point2::new(1.2, 0.5));
        NavigationMesh::build(&floor.wall_graph(), floor.links(), 1).unwrap()
    }

    fn on_edge() -> Point2 {
        Point2::new(0.7, 0.505)
    }

    #[test]
    fn direction_cycles_through_three_states() {
        let mut nav = corridor();
        let first = nav.change_direction(on_edge()).unwrap();
        // Vertex ids: A = 0, B = 1; edges are scanned larger id first.
        assert_eq!((first.a, first.b), (1, 0));
        assert!(matches!(first.state, EdgeState::Forward(w) if (w - 1.0).abs() < 1e-12));
        assert_relative_eq!(nav.nav_graph().edge_value(0, 1), -1.0);

        let second = nav.change_direction(on_edge()).unwrap();
        assert!(matches!(second.state, EdgeState::Backward(_)));
        assert!(nav.nav_graph().has_edge(0, 1));
        assert!(!nav.nav_graph().has_edge(1, 0));

        let third = nav.change_direction(on_edge()).unwrap();
        assert!(matches!(third.state, EdgeState::Bidirectional { .. }));
    }

    #[test]
    fn blocked_edges_stay_blocked() {
        let mut nav = corridor();
        let edge = nav.block_path(on_edge()).unwrap();
        assert_eq!(edge.state, EdgeState::Blocked);
        assert_eq!(nav.change_direction(on_edge()).unwrap().state, EdgeState::Blocked);
        assert_eq!(nav.block_path(on_edge()).unwrap().state, EdgeState::Blocked);
        // Blocked edges can still be selected and reopened.
        let reopened = nav.edit_weight(on_edge(), 2.0).unwrap().unwrap();
        assert_eq!(
            reopened.state,
            EdgeState::Bidirectional {
                forward: 2.0,
                backward: 2.0
            }
        );
    }

    #[test]
    fn cheap_weight_lowers_heuristic() {
        let mut nav = corridor();
        nav.edit_weight(on_edge(), 0.25).unwrap().unwrap();
        assert_relative_eq!(nav.nav_graph().heuristic_scale(), 0.25, epsilon = 1e-12);
        assert!(nav.nav_graph().heuristic(0, 1) <= nav.nav_graph().edge_value(0, 1) + 1e-12);
    }

    #[test]
    fn one_way_edit_keeps_direction() {
        let mut nav = corridor();
        nav.change_direction(on_edge());
        let edge = nav.edit_weight(on_edge(), 3.0).unwrap().unwrap();
        assert_eq!(edge.state, EdgeState::Forward(3.0));
        assert_relative_eq!(nav.nav_graph().edge_value(0, 1), -1.0);
    }

    #[test]
    fn invalid_weight_and_missed_clicks() {
        let mut nav = corridor();
        assert!(matches!(
            nav.edit_weight(on_edge(), 0.0),
            Err(MeshError::InvalidWeight(_))
        ));
        assert!(nav.edit_weight(Point2::new(0.7, 0.6), 1.0).unwrap().is_none());
        // Beyond the end of the segment.
        assert!(nav.block_path(Point2::new(1.205, 0.5)).is_none());
    }
}
