pub mod vertex;
pub mod wall;

pub use vertex::{WallVertex, WallVertexId};
pub use wall::{Wall, WallKind};

use crate::error::TopologyError;
use crate::math::Point2;
use slotmap::SlotMap;

/// Arena owning the wall vertices of one floor.
///
/// Walls are stored as symmetric neighbour entries on both endpoints. Vertex
/// ids are generational keys, so removing a vertex never renumbers the rest.
#[derive(Debug, Clone, Default)]
pub struct WallStore {
    vertices: SlotMap<WallVertexId, WallVertex>,
}

impl WallStore {
    /// Creates a new, empty wall store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    // --- Vertex operations ---

    /// Inserts an unconnected vertex and returns its ID.
    pub fn add_vertex(&mut self, position: Point2) -> WallVertexId {
        self.vertices.insert(WallVertex::new(position))
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is not in the store.
    pub fn vertex(&self, id: WallVertexId) -> Result<&WallVertex, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("wall vertex".into()))
    }

    /// Position of a vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is not in the store.
    pub fn position(&self, id: WallVertexId) -> Result<Point2, TopologyError> {
        Ok(self.vertex(id)?.position)
    }

    /// Removes a vertex together with every wall meeting at it.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is not in the store.
    pub fn remove_vertex(&mut self, id: WallVertexId) -> Result<WallVertex, TopologyError> {
        let removed = self
            .vertices
            .remove(id)
            .ok_or_else(|| TopologyError::EntityNotFound("wall vertex".into()))?;
        for &(neighbour, _) in &removed.neighbours {
            if let Some(vertex) = self.vertices.get_mut(neighbour) {
                vertex.neighbours.retain(|&(other, _)| other != id);
            }
        }
        Ok(removed)
    }

    /// Iterates over vertices in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (WallVertexId, &WallVertex)> {
        self.vertices.iter()
    }

    // --- Wall operations ---

    /// Joins `a` and `b` with a wall of `kind`, replacing any existing wall.
    ///
    /// # Errors
    ///
    /// Returns an error if either vertex is not in the store.
    pub fn set_wall(
        &mut self,
        a: WallVertexId,
        b: WallVertexId,
        kind: WallKind,
    ) -> Result<(), TopologyError> {
        self.vertex(a)?;
        self.vertex(b)?;
        for (from, to) in [(a, b), (b, a)] {
            let vertex = self.vertex_mut(from)?;
            match vertex.neighbours.iter_mut().find(|(id, _)| *id == to) {
                Some(entry) => entry.1 = kind,
                None => vertex.neighbours.push((to, kind)),
            }
        }
        Ok(())
    }

    /// Removes the wall between `a` and `b`, returning its kind if one existed.
    pub fn remove_wall(&mut self, a: WallVertexId, b: WallVertexId) -> Option<WallKind> {
        let kind = self.wall_kind(a, b)?;
        for (from, to) in [(a, b), (b, a)] {
            if let Some(vertex) = self.vertices.get_mut(from) {
                vertex.neighbours.retain(|&(id, _)| id != to);
            }
        }
        Some(kind)
    }

    /// Kind of the wall between `a` and `b`, if any.
    #[must_use]
    pub fn wall_kind(&self, a: WallVertexId, b: WallVertexId) -> Option<WallKind> {
        self.vertices.get(a)?.wall_to(b)
    }

    /// Every wall once, in arena order of its first endpoint.
    pub fn walls(&self) -> impl Iterator<Item = Wall> + '_ {
        self.vertices.iter().flat_map(|(a, vertex)| {
            vertex
                .neighbours
                .iter()
                .filter(move |&&(b, _)| a < b)
                .map(move |&(b, kind)| Wall { a, b, kind })
        })
    }

    /// Every wall once, with its endpoint positions.
    pub fn segments(&self) -> impl Iterator<Item = (Wall, Point2, Point2)> + '_ {
        self.walls()
            .map(|wall| (wall, self.vertices[wall.a].position, self.vertices[wall.b].position))
    }

    /// Number of walls.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.walls().count()
    }

    /// Inserts a closed polygon of vertices joined by walls of `kind`.
    pub fn insert_polygon(&mut self, points: &[Point2], kind: WallKind) -> Vec<WallVertexId> {
        let ids: Vec<_> = points.iter().map(|&p| self.add_vertex(p)).collect();
        for (i, &a) in ids.iter().enumerate() {
            let b = ids[(i + 1) % ids.len()];
            if a != b {
                self.vertices[a].neighbours.push((b, kind));
                self.vertices[b].neighbours.push((a, kind));
            }
        }
        ids
    }

    /// Builds a store from dense vertex positions and index-based walls.
    ///
    /// Returns the store and the ID assigned to each input position. Walls with
    /// an out-of-range or repeated endpoint are skipped.
    pub fn from_dense<I>(positions: &[Point2], walls: I) -> (Self, Vec<WallVertexId>)
    where
        I: IntoIterator<Item = (usize, usize, WallKind)>,
    {
        let mut store = Self::new();
        let ids: Vec<_> = positions.iter().map(|&p| store.add_vertex(p)).collect();
        for (i, j, kind) in walls {
            let (Some(&a), Some(&b)) = (ids.get(i), ids.get(j)) else {
                continue;
            };
            if a != b && store.wall_kind(a, b).is_none() {
                store.vertices[a].neighbours.push((b, kind));
                store.vertices[b].neighbours.push((a, kind));
            }
        }
        (store, ids)
    }

    fn vertex_mut(&mut self, id: WallVertexId) -> Result<&mut WallVertex, TopologyError> {
        self.vertices
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("wall vertex".into()))
    }
}
