use std::collections::{HashMap, HashSet};
use std::iter;

use tracing::error;

use super::edge_key;
use crate::error::MeshError;
use crate::graph::search::a_star;
use crate::graph::{Graph, GraphOverlay, WeightedGraph};
use crate::topology::WallKind;

/// Finds the convex regions of a completed mesh as shortest cycles.
///
/// Every boundary edge borders exactly one region and every other edge two.
/// Each region is found by hiding one of its edges and taking the shortest
/// path between the edge's endpoints. Edges are removed from the search once
/// they border two regions, so no region is found twice.
#[derive(Debug)]
pub struct ExtractRegions<'a> {
    mesh: &'a Graph,
}

impl<'a> ExtractRegions<'a> {
    /// Creates a new region extraction over a completed mesh.
    #[must_use]
    pub fn new(mesh: &'a Graph) -> Self {
        Self { mesh }
    }

    /// Executes the extraction, returning each region as a vertex cycle.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::OpenEdge`] if an edge closes no cycle, or
    /// [`MeshError::DuplicateRegion`] if two regions cover the same vertices.
    pub fn execute(&self) -> Result<Vec<Vec<usize>>, MeshError> {
        let n = self.mesh.vertex_count();

        // Step 1: Weight every edge by its length.
        let mut weighted = WeightedGraph::from_graph(Graph::with_positions(self.mesh.positions().to_vec()));
        let mut borders: HashMap<(usize, usize), u8> = HashMap::new();
        for a in 0..n {
            for b in 0..a {
                if self.mesh.has_edge(a, b) {
                    weighted.set_euclidean(a, b);
                }
                if WallKind::from_code(self.mesh.edge_value(a, b)) == Some(WallKind::Boundary) {
                    borders.insert(edge_key(a, b), 1);
                }
            }
        }

        // Step 2: Edges bordering no region first, then edges bordering one.
        let mut regions = Vec::new();
        for pass in 0..2 {
            for a in 0..n {
                for b in 0..a {
                    let count = borders.get(&edge_key(a, b)).copied().unwrap_or_default();
                    if !weighted.has_edge(a, b) || count != pass {
                        continue;
                    }
                    let cycle = shortest_cycle(&weighted, a, b).ok_or_else(|| {
                        error!(a, b, "mesh edge closes no region");
                        MeshError::OpenEdge(a, b)
                    })?;
                    let closing = iter::once((b, a));
                    for (x, y) in cycle.windows(2).map(|w| (w[0], w[1])).chain(closing) {
                        let count = borders.entry(edge_key(x, y)).or_default();
                        *count += 1;
                        if *count >= 2 {
                            weighted.set_value(x, y, 0.0, true);
                        }
                    }
                    regions.push(cycle);
                }
            }
        }

        // Step 3: Sanity check that no cycle was found twice.
        let mut seen = HashSet::new();
        for region in &regions {
            let mut vertices = region.clone();
            vertices.sort_unstable();
            if !seen.insert(vertices.clone()) {
                error!(?vertices, "region found twice");
                return Err(MeshError::DuplicateRegion(vertices));
            }
        }

        Ok(regions)
    }
}

/// Shortest path from `a` to `b` that avoids the direct edge between them.
fn shortest_cycle(graph: &WeightedGraph, a: usize, b: usize) -> Option<Vec<usize>> {
    let mut overlay = GraphOverlay::new(graph);
    overlay.hide_edge(a, b);
    a_star(&overlay, a, b).map(|tree| tree.path())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::floor::Floor;
    use crate::math::Point2;
    use crate::navmesh::complete::CompleteMesh;

    fn regions_of(floor: &Floor) -> (Graph, Vec<Vec<usize>>) {
        let walls = floor.wall_graph();
        let mesh = CompleteMesh::new(&walls).execute();
        let regions = ExtractRegions::new(&mesh).execute().unwrap();
        (mesh, regions)
    }

    #[test]
    fn empty_floor_is_one_region() {
        let (_, regions) = regions_of(&Floor::default());
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].len(), 4);
    }

    #[test]
    fn dividing_wall_makes_two_regions() {
        let mut floor = Floor::default();
        assert!(floor.add_wall(Point2::new(0.5, 0.0), Point2::new(0.5, 1.0)));
        let (mesh, regions) = regions_of(&floor);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions.len(), mesh.edge_count() - mesh.vertex_count() + 1);
        for region in &regions {
            assert_eq!(region.len(), 4);
        }
    }

    #[test]
    fn every_edge_borders_the_right_number_of_regions() {
        let mut floor = Floor::default();
        assert!(floor.add_wall(Point2::new(0.5, 0.0), Point2::new(0.5, 0.6)));
        assert!(floor.add_wall(Point2::new(1.2, 1.0), Point2::new(1.2, 0.3)));
        let (mesh, regions) = regions_of(&floor);
        assert_eq!(regions.len(), mesh.edge_count() - mesh.vertex_count() + 1);

        let mut uses: HashMap<(usize, usize), usize> = HashMap::new();
        for region in &regions {
            for i in 0..region.len() {
                let (a, b) = (region[i], region[(i + 1) % region.len()]);
                *uses.entry((a.max(b), a.min(b))).or_default() += 1;
            }
        }
        for ((a, b), count) in uses {
            let boundary = WallKind::from_code(mesh.edge_value(a, b)) == Some(WallKind::Boundary);
            assert_eq!(count, if boundary { 1 } else { 2 }, "edge ({a}, {b})");
        }
    }

    #[test]
    fn bridge_edge_is_open() {
        // A triangle with a pendant edge: the pendant closes no cycle.
        let mut mesh = Graph::with_positions(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(2.0, 0.0),
        ]);
        mesh.set_edge(0, 1, 1.0, true);
        mesh.set_edge(1, 2, 1.0, true);
        mesh.set_edge(2, 0, 1.0, true);
        mesh.set_edge(3, 1, 1.0, true);
        assert!(matches!(
            ExtractRegions::new(&mesh).execute(),
            Err(MeshError::OpenEdge(3, 1))
        ));
    }
}
