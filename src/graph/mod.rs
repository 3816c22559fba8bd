//! Matrix-backed graphs and the searches that run over them.
//!
//! Every search is generic over [`SearchGraph`], so the same algorithms run on
//! a plain [`Graph`], a [`WeightedGraph`], or a [`GraphOverlay`] that layers
//! temporary vertices over a borrowed base graph.

mod base;
pub mod matrix;
mod overlay;
pub mod queue;
pub mod search;
mod weighted;

pub use base::Graph;
pub use matrix::AdjacencyMatrix;
pub use overlay::GraphOverlay;
pub use search::{path_cost, SearchAlgorithm, SearchTree};
pub use weighted::WeightedGraph;

use crate::math::{distance, Point2};

/// Read access to a graph with positioned vertices and directed edge values.
///
/// Edge values follow the matrix convention: `0` is no edge, a positive value
/// is a traversable weight, and negative values are blocked sentinels.
pub trait SearchGraph {
    /// Number of vertices; ids are `0..vertex_count()`.
    fn vertex_count(&self) -> usize;

    /// Position of `vertex`.
    fn position(&self, vertex: usize) -> Point2;

    /// Raw stored value of the directed edge `from → to`.
    fn edge_value(&self, from: usize, to: usize) -> f64;

    /// Multiplier applied to Euclidean distance by [`heuristic`](Self::heuristic).
    fn heuristic_scale(&self) -> f64 {
        1.0
    }

    /// Whether `from → to` can be traversed.
    fn has_edge(&self, from: usize, to: usize) -> bool {
        self.edge_value(from, to) > 0.0
    }

    /// Traversal cost of `from → to`, if the edge can be traversed.
    fn traversable_weight(&self, from: usize, to: usize) -> Option<f64> {
        let value = self.edge_value(from, to);
        (value > 0.0).then_some(value)
    }

    /// Admissible estimate of the cost from `a` to `b`.
    fn heuristic(&self, a: usize, b: usize) -> f64 {
        distance(&self.position(a), &self.position(b)) * self.heuristic_scale()
    }

    /// Vertices reachable from `vertex` over one traversable edge, in id order.
    fn successors(&self, vertex: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        (0..self.vertex_count())
            .filter_map(move |next| self.traversable_weight(vertex, next).map(|w| (next, w)))
    }
}
