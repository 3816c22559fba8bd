//! Navigation meshes: convex regions of a floor and the search graph across them.
//!
//! Building a mesh runs three steps over a floor's wall graph:
//! [`CompleteMesh`] adds synthetic edges until every region is convex,
//! [`ExtractRegions`] finds those regions, and [`BuildNavGraph`] places
//! navigation vertices on the synthetic edges. Links are attached afterwards.

pub mod complete;
mod edit;
pub mod nav_graph;
mod overlay;
pub mod regions;

pub use complete::CompleteMesh;
pub use edit::{EdgeState, NavEdge};
pub use nav_graph::{BuildNavGraph, EdgeVertices};
pub use overlay::NavOverlay;
pub use regions::ExtractRegions;

use std::collections::HashMap;

use tracing::debug;

use crate::error::MeshError;
use crate::floor::Link;
use crate::graph::{Graph, WeightedGraph};
use crate::math::polygon_2d::{point_in_convex_polygon, vertex_centroid};
use crate::math::{distance, squared_distance, Point2, TOLERANCE};

/// Edge value of a synthetic edge added by mesh completion.
pub const SYNTHETIC_EDGE: f64 = 3.0;

/// Default maximum distance between an edit point and the edge it selects.
pub const DEFAULT_EDIT_THRESHOLD: f64 = 0.01;

/// Canonical key of an undirected edge.
pub(crate) fn edge_key(a: usize, b: usize) -> (usize, usize) {
    (a.max(b), a.min(b))
}

pub(crate) fn is_synthetic(mesh: &Graph, a: usize, b: usize) -> bool {
    (mesh.edge_value(a, b) - SYNTHETIC_EDGE).abs() < TOLERANCE
}

/// The navigable structure derived from one floor.
#[derive(Debug, Clone)]
pub struct NavigationMesh {
    mesh: Graph,
    regions: Vec<Vec<usize>>,
    region_centroids: Vec<Point2>,
    nav_graph: WeightedGraph,
    edge_vertices: EdgeVertices,
    region_links: HashMap<usize, Vec<usize>>,
    link_vertices: Vec<usize>,
    edit_threshold: f64,
}

impl NavigationMesh {
    /// Builds the mesh for a floor's wall graph and attaches its links in order.
    ///
    /// # Errors
    ///
    /// Returns a [`MeshError`] if the completed mesh does not split cleanly
    /// into regions.
    pub fn build(walls: &Graph, links: &[Link], verts_per_edge: usize) -> Result<Self, MeshError> {
        // Step 1: Add synthetic edges until every region is convex.
        let mesh = CompleteMesh::new(walls).execute();

        // Step 2: Find the regions.
        let regions = ExtractRegions::new(&mesh).execute()?;
        let region_centroids = regions
            .iter()
            .map(|region| {
                let points: Vec<_> = region.iter().map(|&v| mesh.position(v)).collect();
                vertex_centroid(&points)
            })
            .collect();

        // Step 3: Place navigation vertices on the synthetic edges.
        let (nav_graph, edge_vertices) = BuildNavGraph::new(&mesh, &regions, verts_per_edge).execute();

        let mut nav = Self {
            mesh,
            regions,
            region_centroids,
            nav_graph,
            edge_vertices,
            region_links: HashMap::new(),
            link_vertices: Vec::new(),
            edit_threshold: DEFAULT_EDIT_THRESHOLD,
        };
        for link in links {
            nav.add_link(link.position);
        }

        debug!(
            vertices = nav.mesh.vertex_count(),
            edges = nav.mesh.edge_count(),
            regions = nav.regions.len(),
            nav_vertices = nav.nav_graph.vertex_count(),
            "navigation mesh built"
        );
        Ok(nav)
    }

    /// Sets the distance within which edits select a navigation edge.
    #[must_use]
    pub fn with_edit_threshold(mut self, threshold: f64) -> Self {
        self.edit_threshold = threshold;
        self
    }

    /// The completed wall graph; synthetic edges carry [`SYNTHETIC_EDGE`].
    #[must_use]
    pub fn mesh(&self) -> &Graph {
        &self.mesh
    }

    /// Regions as vertex cycles of [`mesh`](Self::mesh).
    #[must_use]
    pub fn regions(&self) -> &[Vec<usize>] {
        &self.regions
    }

    #[must_use]
    pub fn region_centroids(&self) -> &[Point2] {
        &self.region_centroids
    }

    #[must_use]
    pub fn nav_graph(&self) -> &WeightedGraph {
        &self.nav_graph
    }

    pub(crate) fn nav_graph_mut(&mut self) -> &mut WeightedGraph {
        &mut self.nav_graph
    }

    /// Navigation vertex of the `index`-th attached link.
    #[must_use]
    pub fn link_vertex(&self, index: usize) -> Option<usize> {
        self.link_vertices.get(index).copied()
    }

    #[must_use]
    pub fn link_count(&self) -> usize {
        self.link_vertices.len()
    }

    /// Index of the region containing `point`.
    ///
    /// Regions are tried nearest centroid first; a point on a shared edge
    /// belongs to whichever of its regions is tried first.
    #[must_use]
    pub fn region_containing(&self, point: &Point2) -> Option<usize> {
        let mut order: Vec<usize> = (0..self.regions.len()).collect();
        order.sort_by(|&a, &b| {
            squared_distance(point, &self.region_centroids[a])
                .total_cmp(&squared_distance(point, &self.region_centroids[b]))
        });
        order.into_iter().find(|&index| {
            let polygon: Vec<_> = self.regions[index]
                .iter()
                .map(|&v| self.mesh.position(v))
                .collect();
            point_in_convex_polygon(point, &polygon)
        })
    }

    /// Navigation vertices on the synthetic edges of a region.
    pub(crate) fn region_edge_vertices(&self, region: usize) -> Vec<usize> {
        let cycle = &self.regions[region];
        cycle
            .iter()
            .enumerate()
            .filter_map(|(i, &a)| {
                let b = cycle[(i + 1) % cycle.len()];
                self.edge_vertices.get(&edge_key(a, b))
            })
            .flatten()
            .copied()
            .collect()
    }

    /// Links already attached inside a region.
    pub(crate) fn region_links(&self, region: usize) -> &[usize] {
        self.region_links.get(&region).map_or(&[], Vec::as_slice)
    }

    /// Attaches a link at `point` and returns its navigation vertex.
    ///
    /// The link is joined to every other link in its region and to every
    /// navigation vertex on the region's boundary. A point outside every region
    /// gets an unconnected vertex.
    pub fn add_link(&mut self, point: Point2) -> usize {
        let vertex = self.nav_graph.add_vertex(point);
        self.link_vertices.push(vertex);
        let Some(region) = self.region_containing(&point) else {
            debug!(?point, "link lies outside every region");
            return vertex;
        };
        let targets: Vec<usize> = self
            .region_links(region)
            .iter()
            .copied()
            .chain(self.region_edge_vertices(region))
            .collect();
        for target in targets {
            let length = distance(&self.nav_graph.position(target), &point);
            self.nav_graph.set_value(target, vertex, length, true);
        }
        self.region_links.entry(region).or_default().push(vertex);
        vertex
    }

    /// A temporary view for attaching extra links without changing this mesh.
    #[must_use]
    pub fn overlay(&self) -> NavOverlay<'_> {
        NavOverlay::new(self)
    }
}
