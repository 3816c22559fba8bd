use super::wall::WallKind;
use crate::math::Point2;

slotmap::new_key_type! {
    /// Stable identifier for a wall vertex in the wall store.
    pub struct WallVertexId;
}

/// A wall endpoint and the walls meeting at it.
#[derive(Debug, Clone)]
pub struct WallVertex {
    /// The 2D position of the vertex.
    pub position: Point2,
    /// Adjacent vertices with the kind of wall joining them.
    pub neighbours: Vec<(WallVertexId, WallKind)>,
}

impl WallVertex {
    /// Creates an unconnected vertex at the given point.
    #[must_use]
    pub fn new(position: Point2) -> Self {
        Self {
            position,
            neighbours: Vec::new(),
        }
    }

    /// Kind of the wall to `other`, if one exists.
    #[must_use]
    pub fn wall_to(&self, other: WallVertexId) -> Option<WallKind> {
        self.neighbours
            .iter()
            .find_map(|&(id, kind)| (id == other).then_some(kind))
    }
}
