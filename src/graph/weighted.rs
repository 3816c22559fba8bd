use super::base::Graph;
use super::SearchGraph;
use crate::math::{distance, Point2, TOLERANCE};

/// A [`Graph`] whose edge values are traversal weights, with a heuristic scale
/// that keeps the Euclidean A* estimate admissible.
///
/// The scale starts at `1.0` and only shrinks: every weight written through
/// [`set_weight`](Self::set_weight) lowers it to `weight / length` when that
/// ratio is smaller. So for every such edge, `length * scale <= weight`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedGraph {
    graph: Graph,
    heuristic_scale: f64,
}

impl Default for WeightedGraph {
    fn default() -> Self {
        Self::from_graph(Graph::new())
    }
}

impl WeightedGraph {
    /// Creates an empty weighted graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing graph, treating its edge values as weights.
    #[must_use]
    pub fn from_graph(graph: Graph) -> Self {
        Self {
            graph,
            heuristic_scale: 1.0,
        }
    }

    /// The underlying graph.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Current heuristic scale.
    #[must_use]
    pub fn heuristic_scale(&self) -> f64 {
        self.heuristic_scale
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.graph.vertex_count()
    }

    #[must_use]
    pub fn position(&self, vertex: usize) -> Point2 {
        self.graph.position(vertex)
    }

    #[must_use]
    pub fn positions(&self) -> &[Point2] {
        self.graph.positions()
    }

    #[must_use]
    pub fn edge_value(&self, from: usize, to: usize) -> f64 {
        self.graph.edge_value(from, to)
    }

    #[must_use]
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.graph.has_edge(from, to)
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn add_vertex(&mut self, position: Point2) -> usize {
        self.graph.add_vertex(position)
    }

    pub fn delete_vertex(&mut self, vertex: usize) {
        self.graph.delete_vertex(vertex);
    }

    /// Stores a raw value without touching the heuristic scale.
    ///
    /// Used for zeroing edges and for the `-1` blocked sentinel.
    pub fn set_value(&mut self, from: usize, to: usize, value: f64, symmetric: bool) {
        self.graph.set_edge(from, to, value, symmetric);
    }

    /// Stores a traversal weight and lowers the heuristic scale if needed.
    ///
    /// Zero-length edges leave the scale alone.
    pub fn set_weight(&mut self, from: usize, to: usize, weight: f64, symmetric: bool) {
        self.graph.set_edge(from, to, weight, symmetric);
        let length = distance(&self.graph.position(from), &self.graph.position(to));
        if length > TOLERANCE {
            self.heuristic_scale = self.heuristic_scale.min(weight / length);
        }
    }

    /// Sets a symmetric edge weighted by its Euclidean length.
    pub fn set_euclidean(&mut self, a: usize, b: usize) {
        let length = distance(&self.graph.position(a), &self.graph.position(b));
        self.graph.set_edge(a, b, length, true);
    }

    pub fn neighbours(&self, vertex: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph.neighbours(vertex)
    }
}

impl SearchGraph for WeightedGraph {
    fn vertex_count(&self) -> usize {
        self.graph.vertex_count()
    }

    fn position(&self, vertex: usize) -> Point2 {
        self.graph.position(vertex)
    }

    fn edge_value(&self, from: usize, to: usize) -> f64 {
        self.graph.edge_value(from, to)
    }

    fn heuristic_scale(&self) -> f64 {
        self.heuristic_scale
    }
}
