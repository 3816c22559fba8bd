use std::collections::HashMap;

use super::NavigationMesh;
use crate::graph::{GraphOverlay, SearchGraph};
use crate::math::{distance, Point2};

/// A [`NavigationMesh`] with temporary links attached.
///
/// Links added here are joined exactly as [`NavigationMesh::add_link`] would
/// join them, but only inside the overlay; the mesh itself is borrowed and
/// never changed.
#[derive(Debug, Clone)]
pub struct NavOverlay<'a> {
    mesh: &'a NavigationMesh,
    graph: GraphOverlay<'a>,
    region_links: HashMap<usize, Vec<usize>>,
}

impl<'a> NavOverlay<'a> {
    pub(super) fn new(mesh: &'a NavigationMesh) -> Self {
        Self {
            mesh,
            graph: GraphOverlay::new(&mesh.nav_graph),
            region_links: HashMap::new(),
        }
    }

    /// The navigation graph with the temporary links included.
    #[must_use]
    pub fn graph(&self) -> &GraphOverlay<'a> {
        &self.graph
    }

    /// Attaches a temporary link at `point` and returns its vertex id.
    pub fn add_link(&mut self, point: Point2) -> usize {
        let vertex = self.graph.add_vertex(point);
        let Some(region) = self.mesh.region_containing(&point) else {
            return vertex;
        };
        let earlier = self.region_links.entry(region).or_default();
        let targets: Vec<usize> = self
            .mesh
            .region_links(region)
            .iter()
            .chain(earlier.iter())
            .copied()
            .chain(self.mesh.region_edge_vertices(region))
            .collect();
        earlier.push(vertex);
        for target in targets {
            let length = distance(&self.graph.position(target), &point);
            self.graph.set_value(target, vertex, length, true);
        }
        vertex
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::floor::Floor;
    use crate::graph::search::a_star;

    #[test]
    fn temporary_links_connect_without_touching_the_mesh() {
        let mut floor = Floor::default();
        assert!(floor.add_wall(Point2::new(0.5, 0.0), Point2::new(0.5, 0.6)));
        floor.add_link("A", Point2::new(1.5, 0.2));
        let nav = NavigationMesh::build(&floor.wall_graph(), floor.links(), 1).unwrap();
        let before = nav.nav_graph().vertex_count();

        let mut overlay = nav.overlay();
        let start = overlay.add_link(Point2::new(0.2, 0.2));
        let goal = overlay.add_link(Point2::new(0.3, 0.3));
        assert_eq!(start, before);
        assert_eq!(goal, before + 1);
        // Both temporary links share a region, so they are joined directly.
        assert!(overlay.graph().has_edge(start, goal));

        let link = nav.link_vertex(0).unwrap();
        let tree = a_star(overlay.graph(), start, link).unwrap();
        assert_eq!(tree.path().first(), Some(&start));
        assert_eq!(tree.path().last(), Some(&link));

        assert_eq!(nav.nav_graph().vertex_count(), before);
    }
}
