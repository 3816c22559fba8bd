use std::collections::HashMap;

use super::{edge_key, is_synthetic};
use crate::graph::{Graph, WeightedGraph};
use crate::math::lerp;

/// Interpolated navigation vertices of each synthetic edge, keyed by
/// `(larger id, smaller id)`.
pub type EdgeVertices = HashMap<(usize, usize), Vec<usize>>;

/// Builds the navigation graph of a completed mesh from its regions.
///
/// Every synthetic edge gets `verts_per_edge` evenly spaced vertices, shared by
/// the two regions it borders. All vertices on one region's boundary are then
/// joined pairwise by straight-line edges.
#[derive(Debug)]
pub struct BuildNavGraph<'a> {
    mesh: &'a Graph,
    regions: &'a [Vec<usize>],
    verts_per_edge: usize,
}

impl<'a> BuildNavGraph<'a> {
    /// Creates a new navigation graph build.
    #[must_use]
    pub fn new(mesh: &'a Graph, regions: &'a [Vec<usize>], verts_per_edge: usize) -> Self {
        Self {
            mesh,
            regions,
            verts_per_edge,
        }
    }

    /// Executes the build, returning the graph and the vertices placed on each edge.
    #[must_use]
    pub fn execute(&self) -> (WeightedGraph, EdgeVertices) {
        let mut graph = WeightedGraph::new();
        let mut edge_vertices = EdgeVertices::new();
        #[allow(clippy::cast_precision_loss)]
        let spacing = (self.verts_per_edge + 1) as f64;

        for region in self.regions {
            let mut members = Vec::new();
            for (i, &a) in region.iter().enumerate() {
                let b = region[(i + 1) % region.len()];
                if !is_synthetic(self.mesh, a, b) {
                    continue;
                }
                let key = edge_key(a, b);
                // Interpolated from the smaller id, whichever region gets here first.
                let placed = edge_vertices.entry(key).or_insert_with(|| {
                    let (pa, pb) = (self.mesh.position(key.1), self.mesh.position(key.0));
                    (1..=self.verts_per_edge)
                        .map(|step| {
                            #[allow(clippy::cast_precision_loss)]
                            let t = step as f64 / spacing;
                            graph.add_vertex(lerp(&pa, &pb, t))
                        })
                        .collect()
                });
                members.extend_from_slice(placed);
            }
            for (i, &a) in members.iter().enumerate() {
                for &b in &members[..i] {
                    graph.set_euclidean(a, b);
                }
            }
        }

        (graph, edge_vertices)
    }
}
