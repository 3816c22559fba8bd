use std::collections::HashMap;

use super::weighted::WeightedGraph;
use super::SearchGraph;
use crate::math::{distance, Point2, TOLERANCE};

/// A temporary layer over a borrowed [`WeightedGraph`].
///
/// The overlay can append vertices, write edge values and hide edges. Reads see
/// the overlay's writes first and fall back to the base graph; the base is never
/// modified, so dropping the overlay discards every change.
#[derive(Debug, Clone)]
pub struct GraphOverlay<'a> {
    base: &'a WeightedGraph,
    extra_positions: Vec<Point2>,
    edges: HashMap<(usize, usize), f64>,
    heuristic_scale: f64,
}

impl<'a> GraphOverlay<'a> {
    #[must_use]
    pub fn new(base: &'a WeightedGraph) -> Self {
        Self {
            base,
            extra_positions: Vec::new(),
            edges: HashMap::new(),
            heuristic_scale: base.heuristic_scale(),
        }
    }

    /// Appends a temporary vertex and returns its id.
    pub fn add_vertex(&mut self, position: Point2) -> usize {
        self.extra_positions.push(position);
        self.base.vertex_count() + self.extra_positions.len() - 1
    }

    /// Writes a raw value without touching the heuristic scale.
    pub fn set_value(&mut self, from: usize, to: usize, value: f64, symmetric: bool) {
        self.edges.insert((from, to), value);
        if symmetric {
            self.edges.insert((to, from), value);
        }
    }

    /// Writes a traversal weight, lowering the overlay's heuristic scale if needed.
    pub fn set_weight(&mut self, from: usize, to: usize, weight: f64, symmetric: bool) {
        self.set_value(from, to, weight, symmetric);
        let length = distance(&self.position(from), &self.position(to));
        if length > TOLERANCE {
            self.heuristic_scale = self.heuristic_scale.min(weight / length);
        }
    }

    /// Hides the edge between `a` and `b` in both directions.
    pub fn hide_edge(&mut self, a: usize, b: usize) {
        self.set_value(a, b, 0.0, true);
    }
}

impl SearchGraph for GraphOverlay<'_> {
    fn vertex_count(&self) -> usize {
        self.base.vertex_count() + self.extra_positions.len()
    }

    fn position(&self, vertex: usize) -> Point2 {
        match vertex.checked_sub(self.base.vertex_count()) {
            Some(extra) => self.extra_positions[extra],
            None => self.base.position(vertex),
        }
    }

    fn edge_value(&self, from: usize, to: usize) -> f64 {
        if let Some(&value) = self.edges.get(&(from, to)) {
            return value;
        }
        let n = self.base.vertex_count();
        if from < n && to < n {
            self.base.edge_value(from, to)
        } else {
            0.0
        }
    }

    fn heuristic_scale(&self) -> f64 {
        self.heuristic_scale
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::graph::search::{a_star, dijkstra};
    use crate::graph::Graph;
    use approx::assert_relative_eq;

    fn triangle() -> WeightedGraph {
        let mut g = WeightedGraph::from_graph(Graph::with_positions(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]));
        g.set_euclidean(0, 1);
        g.set_euclidean(1, 2);
        g.set_euclidean(2, 0);
        g
    }

    #[test]
    fn hidden_edge_forces_detour() {
        let base = triangle();
        let mut overlay = GraphOverlay::new(&base);
        overlay.hide_edge(0, 1);
        let tree = a_star(&overlay, 0, 1).unwrap();
        assert_eq!(tree.path(), vec![0, 2, 1]);
        // The base still has the edge.
        assert!(base.has_edge(0, 1));
    }

    #[test]
    fn temporary_vertices_join_the_search() {
        let base = triangle();
        let mut overlay = GraphOverlay::new(&base);
        let extra = overlay.add_vertex(Point2::new(2.0, 0.0));
        assert_eq!(extra, 3);
        assert_eq!(overlay.vertex_count(), 4);
        overlay.set_weight(1, extra, 0.5, true);
        assert_relative_eq!(overlay.heuristic_scale(), 0.5);
        let tree = dijkstra(&overlay, 2, extra).unwrap();
        assert_eq!(tree.path(), vec![2, 1, 3]);
        assert_eq!(base.vertex_count(), 3);
        assert_relative_eq!(base.heuristic_scale(), 1.0);
    }
}
