use super::matrix::AdjacencyMatrix;
use super::SearchGraph;
use crate::math::Point2;

/// A graph of positioned vertices with edges stored in an adjacency matrix.
///
/// Vertex ids are dense indices. Deleting a vertex compacts the ids: every
/// vertex above the deleted one moves down by one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    positions: Vec<Point2>,
    matrix: AdjacencyMatrix,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph with the given vertices and no edges.
    #[must_use]
    pub fn with_positions(positions: Vec<Point2>) -> Self {
        let matrix = AdjacencyMatrix::new(positions.len());
        Self { positions, matrix }
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// All vertex positions, indexed by vertex id.
    #[must_use]
    pub fn positions(&self) -> &[Point2] {
        &self.positions
    }

    /// Position of `vertex`.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is out of range.
    #[must_use]
    pub fn position(&self, vertex: usize) -> Point2 {
        self.positions[vertex]
    }

    /// Appends a vertex and returns its id.
    pub fn add_vertex(&mut self, position: Point2) -> usize {
        self.matrix.expand();
        self.positions.push(position);
        self.positions.len() - 1
    }

    /// Removes `vertex` and all its edges; higher ids shift down by one.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is out of range.
    pub fn delete_vertex(&mut self, vertex: usize) {
        self.matrix.remove(vertex);
        self.positions.remove(vertex);
    }

    /// Raw stored value of `from → to`.
    #[must_use]
    pub fn edge_value(&self, from: usize, to: usize) -> f64 {
        self.matrix.get(from, to)
    }

    /// Whether `from → to` is a traversable edge. Negative values count as absent.
    #[must_use]
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.edge_value(from, to) > 0.0
    }

    /// Stores `value` on `from → to`, mirrored onto `to → from` when `symmetric`.
    pub fn set_edge(&mut self, from: usize, to: usize, value: f64, symmetric: bool) {
        self.matrix.set(from, to, value, symmetric);
    }

    /// Appends two vertices joined by a symmetric edge of `value`.
    pub fn create_edge(&mut self, a: Point2, b: Point2, value: f64) -> (usize, usize) {
        let first = self.add_vertex(a);
        let second = self.add_vertex(b);
        self.set_edge(first, second, value, true);
        (first, second)
    }

    /// Number of vertex pairs joined in at least one direction.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        let n = self.vertex_count();
        (0..n)
            .flat_map(|a| (0..a).map(move |b| (a, b)))
            .filter(|&(a, b)| self.has_edge(a, b) || self.has_edge(b, a))
            .count()
    }

    /// Ids of vertices reachable from `vertex` over one traversable edge.
    pub fn neighbours(&self, vertex: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.vertex_count()).filter(move |&other| self.has_edge(vertex, other))
    }
}

impl SearchGraph for Graph {
    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn position(&self, vertex: usize) -> Point2 {
        self.positions[vertex]
    }

    fn edge_value(&self, from: usize, to: usize) -> f64 {
        self.matrix.get(from, to)
    }
}
