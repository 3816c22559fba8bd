//! A single floor plan: walls inside a fixed outer rectangle, plus links.

mod edit;

pub use edit::Deletion;

use std::collections::HashSet;

use slotmap::SecondaryMap;

use crate::config::FloorConfig;
use crate::error::TopologyError;
use crate::graph::Graph;
use crate::math::Point2;
use crate::topology::{Wall, WallKind, WallStore, WallVertexId};

/// A named portal on a floor. Links sharing an id are joined across floors.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: String,
    pub position: Point2,
}

impl Link {
    #[must_use]
    pub fn new(id: impl Into<String>, position: Point2) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }
}

/// Wall layout and links of one floor.
///
/// The four corners of the outer rectangle are created with the floor and can
/// never be deleted; the rectangle's sides are always boundary walls.
#[derive(Debug, Clone)]
pub struct Floor {
    config: FloorConfig,
    walls: WallStore,
    corners: [WallVertexId; 4],
    links: Vec<Link>,
}

impl Floor {
    /// Creates an empty floor: the outer rectangle and nothing else.
    #[must_use]
    pub fn new(config: FloorConfig) -> Self {
        let mut walls = WallStore::new();
        let ids = walls.insert_polygon(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(config.width, 0.0),
                Point2::new(config.width, config.height),
                Point2::new(0.0, config.height),
            ],
            WallKind::Boundary,
        );
        let corners = [ids[0], ids[1], ids[2], ids[3]];
        Self {
            config,
            walls,
            corners,
            links: Vec::new(),
        }
    }

    /// Rebuilds a floor from a dense wall graph whose edge values are wall codes.
    ///
    /// The first four vertices become the corners. Cells holding anything other
    /// than a wall code are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::MissingCorners`] if the graph has fewer than
    /// four vertices.
    pub fn from_wall_graph(
        config: FloorConfig,
        graph: &Graph,
        links: Vec<Link>,
    ) -> Result<Self, TopologyError> {
        let n = graph.vertex_count();
        if n < 4 {
            return Err(TopologyError::MissingCorners(n));
        }
        let walls = (0..n).flat_map(|a| (0..a).map(move |b| (a, b))).filter_map(|(a, b)| {
            WallKind::from_code(graph.edge_value(a, b)).map(|kind| (a, b, kind))
        });
        let (walls, ids) = WallStore::from_dense(graph.positions(), walls);
        Ok(Self {
            config,
            walls,
            corners: [ids[0], ids[1], ids[2], ids[3]],
            links,
        })
    }

    #[must_use]
    pub fn config(&self) -> &FloorConfig {
        &self.config
    }

    /// The four corners of the outer rectangle.
    #[must_use]
    pub fn corners(&self) -> [WallVertexId; 4] {
        self.corners
    }

    #[must_use]
    pub fn is_corner(&self, id: WallVertexId) -> bool {
        self.corners.contains(&id)
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.walls.len()
    }

    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.walls.wall_count()
    }

    /// Position of a wall vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex does not exist on this floor.
    pub fn position(&self, id: WallVertexId) -> Result<Point2, TopologyError> {
        self.walls.position(id)
    }

    /// Kind of the wall between `a` and `b`, if any.
    #[must_use]
    pub fn wall_kind(&self, a: WallVertexId, b: WallVertexId) -> Option<WallKind> {
        self.walls.wall_kind(a, b)
    }

    /// Every wall once.
    pub fn walls(&self) -> impl Iterator<Item = Wall> + '_ {
        self.walls.walls()
    }

    /// Every vertex with its position, corners first.
    pub fn vertices(&self) -> impl Iterator<Item = (WallVertexId, Point2)> + '_ {
        self.walls.iter().map(|(id, vertex)| (id, vertex.position))
    }

    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Appends a link.
    pub fn add_link(&mut self, id: impl Into<String>, position: Point2) {
        self.links.push(Link::new(id, position));
    }

    /// Whether the floor differs from a freshly created one.
    #[must_use]
    pub fn is_edited(&self) -> bool {
        self.vertex_count() > 4 || !self.links.is_empty()
    }

    /// Whether every wall vertex can be reached from the corners along walls.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        let mut seen = HashSet::new();
        let mut stack = vec![self.corners[0]];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Ok(vertex) = self.walls.vertex(id) {
                stack.extend(vertex.neighbours.iter().map(|&(next, _)| next));
            }
        }
        seen.len() == self.vertex_count()
    }

    /// Dense copy of the wall layout: vertex ids in arena order (corners first),
    /// edge values equal to wall codes.
    #[must_use]
    pub fn wall_graph(&self) -> Graph {
        let mut index = SecondaryMap::new();
        let mut positions = Vec::with_capacity(self.vertex_count());
        for (id, vertex) in self.walls.iter() {
            index.insert(id, positions.len());
            positions.push(vertex.position);
        }
        let mut graph = Graph::with_positions(positions);
        for wall in self.walls.walls() {
            if let (Some(&a), Some(&b)) = (index.get(wall.a), index.get(wall.b)) {
                graph.set_edge(a, b, wall.kind.code(), true);
            }
        }
        graph
    }
}

impl Default for Floor {
    fn default() -> Self {
        Self::new(FloorConfig::default())
    }
}
