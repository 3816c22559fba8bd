use tracing::{debug, error};

use super::{Floor, Link};
use crate::config::FloorConfig;
use crate::error::TopologyError;
use crate::math::distance_2d::{closest_point_within_segment, squared_distance_to_segment};
use crate::math::intersect_2d::segments_intersect;
use crate::math::{squared_distance, Point2};
use crate::topology::{Wall, WallKind, WallStore, WallVertexId};

/// What a [`Floor::delete`] call removed.
#[derive(Debug, Clone, PartialEq)]
pub enum Deletion {
    Link(Link),
    /// A wall vertex, with every wall that met at it.
    Vertex(WallVertexId),
    /// A single interior wall.
    Wall(Wall),
}

impl Floor {
    /// Tries to add a wall from `start` to `end`, returning whether it was added.
    ///
    /// Each endpoint snaps to a nearby vertex, or splits a nearby wall, or
    /// becomes a new vertex. The wall is rejected if its endpoints are too close,
    /// if it passes within the node radius of another vertex, or if it crosses
    /// another wall. A rejected call leaves the floor untouched.
    pub fn add_wall(&mut self, start: Point2, end: Point2) -> bool {
        if squared_distance(&start, &end) < self.config.snap_distance_squared() {
            debug!(?start, ?end, "wall rejected: endpoints too close");
            return false;
        }
        match self.stage_wall(start, end) {
            Ok(Some(staged)) => {
                self.walls = staged;
                true
            }
            Ok(None) => false,
            Err(e) => {
                error!("wall store inconsistent while adding a wall: {e}");
                false
            }
        }
    }

    /// Applies the wall to a copy of the store, returning the copy on success.
    fn stage_wall(&self, start: Point2, end: Point2) -> Result<Option<WallStore>, TopologyError> {
        let mut staged = self.walls.clone();
        let a = place_vertex(&mut staged, start, &self.config)?;
        let b = place_vertex(&mut staged, end, &self.config)?;
        if a == b {
            debug!(?start, ?end, "wall rejected: both endpoints snap to one vertex");
            return Ok(None);
        }
        if is_obstructed(&staged, a, b, self.config.clearance_squared())? {
            debug!(?start, ?end, "wall rejected: obstructed");
            return Ok(None);
        }
        let kind = if self.on_one_side(&staged.position(a)?, &staged.position(b)?) {
            WallKind::Boundary
        } else {
            WallKind::Interior
        };
        staged.set_wall(a, b, kind)?;
        Ok(Some(staged))
    }

    /// Whether both points lie exactly on the same side of the outer rectangle.
    #[allow(clippy::float_cmp)]
    fn on_one_side(&self, a: &Point2, b: &Point2) -> bool {
        let (w, h) = (self.config.width, self.config.height);
        (a.x == 0.0 && b.x == 0.0)
            || (a.x == w && b.x == w)
            || (a.y == 0.0 && b.y == 0.0)
            || (a.y == h && b.y == h)
    }

    /// Deletes the link, vertex or interior wall nearest `point`.
    ///
    /// Links are tried first, then non-corner vertices, then interior walls; the
    /// first one within the node radius is removed. Deleting a vertex on the
    /// boundary rejoins its two boundary neighbours. Any vertex left without
    /// walls by the deletion is removed too.
    pub fn delete(&mut self, point: Point2) -> Option<Deletion> {
        match self.try_delete(point) {
            Ok(deletion) => deletion,
            Err(e) => {
                error!("wall store inconsistent while deleting: {e}");
                None
            }
        }
    }

    fn try_delete(&mut self, point: Point2) -> Result<Option<Deletion>, TopologyError> {
        let radius_sq = self.config.clearance_squared();

        if let Some(index) = self
            .links
            .iter()
            .position(|link| squared_distance(&link.position, &point) < radius_sq)
        {
            return Ok(Some(Deletion::Link(self.links.remove(index))));
        }

        let near_vertex = self
            .walls
            .iter()
            .find(|&(id, v)| !self.is_corner(id) && squared_distance(&v.position, &point) < radius_sq)
            .map(|(id, _)| id);
        if let Some(id) = near_vertex {
            self.delete_vertex(id)?;
            return Ok(Some(Deletion::Vertex(id)));
        }

        let near_wall = self
            .walls
            .segments()
            .filter(|(wall, _, _)| wall.kind == WallKind::Interior)
            .find(|(_, a, b)| squared_distance_to_segment(a, b, &point).is_some_and(|d| d < radius_sq))
            .map(|(wall, _, _)| wall);
        if let Some(wall) = near_wall {
            self.walls.remove_wall(wall.a, wall.b);
            self.remove_if_isolated(wall.a)?;
            self.remove_if_isolated(wall.b)?;
            return Ok(Some(Deletion::Wall(wall)));
        }

        Ok(None)
    }

    fn delete_vertex(&mut self, id: WallVertexId) -> Result<(), TopologyError> {
        let neighbours = self.walls.vertex(id)?.neighbours.clone();
        let boundary: Vec<_> = neighbours
            .iter()
            .filter(|&&(_, kind)| kind == WallKind::Boundary)
            .map(|&(n, _)| n)
            .collect();
        if let [first, second] = boundary[..] {
            self.walls.set_wall(first, second, WallKind::Boundary)?;
        }
        self.walls.remove_vertex(id)?;
        for (neighbour, kind) in neighbours {
            if kind == WallKind::Interior {
                self.remove_if_isolated(neighbour)?;
            }
        }
        Ok(())
    }

    /// Removes `id` if no wall meets at it. Corners always stay.
    fn remove_if_isolated(&mut self, id: WallVertexId) -> Result<bool, TopologyError> {
        if self.is_corner(id) || !self.walls.vertex(id)?.neighbours.is_empty() {
            return Ok(false);
        }
        self.walls.remove_vertex(id)?;
        Ok(true)
    }
}

/// Finds or creates the vertex an endpoint at `point` attaches to.
fn place_vertex(
    store: &mut WallStore,
    point: Point2,
    config: &FloorConfig,
) -> Result<WallVertexId, TopologyError> {
    let snap_sq = config.snap_distance_squared();
    if let Some((id, _)) = store
        .iter()
        .find(|(_, v)| squared_distance(&v.position, &point) < snap_sq)
    {
        return Ok(id);
    }

    let radius_sq = config.clearance_squared();
    let split = store.segments().find_map(|(wall, a, b)| {
        closest_point_within_segment(&a, &b, &point)
            .filter(|foot| squared_distance(foot, &point) < radius_sq)
            .map(|foot| (wall, foot))
    });
    if let Some((wall, foot)) = split {
        let middle = store.add_vertex(foot);
        store.remove_wall(wall.a, wall.b);
        store.set_wall(wall.a, middle, wall.kind)?;
        store.set_wall(middle, wall.b, wall.kind)?;
        return Ok(middle);
    }

    Ok(store.add_vertex(point))
}

/// Whether the segment `a`–`b` passes within the clearance of another vertex
/// or crosses a wall that does not share an endpoint with it.
fn is_obstructed(
    store: &WallStore,
    a: WallVertexId,
    b: WallVertexId,
    radius_sq: f64,
) -> Result<bool, TopologyError> {
    let (pa, pb) = (store.position(a)?, store.position(b)?);

    let near_vertex = store.iter().any(|(id, v)| {
        id != a
            && id != b
            && squared_distance_to_segment(&pa, &pb, &v.position).is_some_and(|d| d <= radius_sq)
    });
    if near_vertex {
        return Ok(true);
    }

    Ok(store.segments().any(|(wall, p, q)| {
        !wall.touches(a) && !wall.touches(b) && segments_intersect(&p, &q, &pa, &pb)
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn divided() -> Floor {
        let mut floor = Floor::default();
        assert!(floor.add_wall(Point2::new(0.5, 0.0), Point2::new(0.5, 1.0)));
        floor
    }

    fn vertex_at(floor: &Floor, point: Point2) -> WallVertexId {
        floor
            .vertices()
            .find(|(_, p)| squared_distance(p, &point) < 1e-12)
            .map(|(id, _)| id)
            .unwrap()
    }

    #[test]
    fn interior_wall_splits_the_boundary() {
        let floor = divided();
        assert_eq!(floor.vertex_count(), 6);
        assert_eq!(floor.wall_count(), 7);
        let bottom = vertex_at(&floor, Point2::new(0.5, 0.0));
        let top = vertex_at(&floor, Point2::new(0.5, 1.0));
        assert_eq!(floor.wall_kind(bottom, top), Some(WallKind::Interior));
        let [origin, ..] = floor.corners();
        assert_eq!(floor.wall_kind(origin, bottom), Some(WallKind::Boundary));
        assert!(floor.is_connected());
    }

    #[test]
    fn crossing_wall_is_rejected_without_side_effects() {
        let mut floor = divided();
        assert!(!floor.add_wall(Point2::new(0.2, 0.5), Point2::new(0.8, 0.5)));
        assert_eq!(floor.vertex_count(), 6);
        assert_eq!(floor.wall_count(), 7);
        // A crossing wall attached to the boundary must not leave its splits behind.
        assert!(!floor.add_wall(Point2::new(0.2, 0.0), Point2::new(0.8, 1.0)));
        assert_eq!(floor.vertex_count(), 6);
    }

    #[test]
    fn endpoints_too_close_are_rejected() {
        let mut floor = Floor::default();
        assert!(!floor.add_wall(Point2::new(0.5, 0.5), Point2::new(0.51, 0.51)));
        assert!(!floor.is_edited());
    }

    #[test]
    fn wall_grazing_a_vertex_is_rejected() {
        let mut floor = Floor::default();
        assert!(floor.add_wall(Point2::new(0.2, 0.5), Point2::new(0.4, 0.5)));
        // Passes 0.01 from the end of the first wall without touching it.
        assert!(!floor.add_wall(Point2::new(0.41, 0.3), Point2::new(0.41, 0.7)));
        assert_eq!(floor.vertex_count(), 6);
    }

    #[test]
    fn endpoint_near_a_wall_joins_it() {
        let mut floor = Floor::default();
        assert!(floor.add_wall(Point2::new(0.2, 0.5), Point2::new(0.6, 0.5)));
        assert!(floor.add_wall(Point2::new(0.4, 0.51), Point2::new(0.4, 0.9)));
        let joint = vertex_at(&floor, Point2::new(0.4, 0.5));
        assert_eq!(floor.walls.vertex(joint).unwrap().neighbours.len(), 3);
    }

    #[test]
    fn wall_along_the_edge_is_boundary() {
        let mut floor = Floor::default();
        assert!(floor.add_wall(Point2::new(0.2, 0.0), Point2::new(0.6, 0.0)));
        let a = vertex_at(&floor, Point2::new(0.2, 0.0));
        let b = vertex_at(&floor, Point2::new(0.6, 0.0));
        assert_eq!(floor.wall_kind(a, b), Some(WallKind::Boundary));
    }

    #[test]
    fn delete_link_first() {
        let mut floor = divided();
        floor.add_link("A", Point2::new(0.5, 0.5));
        let deleted = floor.delete(Point2::new(0.5, 0.5));
        assert!(matches!(deleted, Some(Deletion::Link(link)) if link.id == "A"));
        assert_eq!(floor.wall_count(), 7);
    }

    #[test]
    fn delete_boundary_vertex_repairs_the_edge() {
        let mut floor = divided();
        let deleted = floor.delete(Point2::new(0.5, 0.0));
        assert!(matches!(deleted, Some(Deletion::Vertex(_))));
        // The interior wall went with the vertex; the top split remains on the boundary.
        assert_eq!(floor.vertex_count(), 5);
        assert_eq!(floor.wall_count(), 5);
        let [origin, east, ..] = floor.corners();
        assert_eq!(floor.wall_kind(origin, east), Some(WallKind::Boundary));
        assert!(floor.is_connected());
    }

    #[test]
    fn delete_vertex_cascades_to_dangling_neighbours() {
        let mut floor = Floor::default();
        assert!(floor.add_wall(Point2::new(0.5, 0.0), Point2::new(0.5, 0.3)));
        assert!(floor.add_wall(Point2::new(0.5, 0.3), Point2::new(0.5, 0.6)));
        assert_eq!(floor.vertex_count(), 7);
        assert!(floor.delete(Point2::new(0.5, 0.3)).is_some());
        // (0.5, 0.6) is left without walls and goes too; (0.5, 0) stays on the boundary.
        assert_eq!(floor.vertex_count(), 5);
        assert!(floor.is_connected());
    }

    #[test]
    fn delete_interior_wall_keeps_boundary_vertices() {
        let mut floor = divided();
        let deleted = floor.delete(Point2::new(0.5, 0.5));
        assert!(matches!(deleted, Some(Deletion::Wall(wall)) if wall.kind == WallKind::Interior));
        assert_eq!(floor.vertex_count(), 6);
        assert_eq!(floor.wall_count(), 6);
    }

    #[test]
    fn deleting_elsewhere_keeps_a_closed_room_closed() {
        use crate::config::PathfindingOptions;
        use crate::map::{GenerationOutcome, Map};

        let mut floor = Floor::default();
        assert!(floor.add_wall(Point2::new(0.0, 0.5), Point2::new(0.5, 0.5)));
        assert!(floor.add_wall(Point2::new(0.5, 0.5), Point2::new(0.5, 0.0)));
        assert!(floor.add_wall(Point2::new(1.2, 0.3), Point2::new(1.2, 0.5)));
        assert!(floor.add_wall(Point2::new(1.2, 0.5), Point2::new(1.2, 0.7)));

        // The joint of the free-standing wall, then what is left of it.
        assert!(matches!(
            floor.delete(Point2::new(1.2, 0.5)),
            Some(Deletion::Vertex(_))
        ));
        assert!(floor.delete(Point2::new(1.2, 0.4)).is_none());
        assert_eq!(floor.vertex_count(), 7);

        let mut map = Map::default();
        *map.floor_mut(0).unwrap() = floor;
        assert_eq!(map.generate().unwrap(), GenerationOutcome::Completed);
        let options = PathfindingOptions::default();
        map.join_links(&options).unwrap();

        let outside = Point2::new(1.0, 0.8);
        let inside = Point2::new(0.2, 0.2);
        assert!(map.pathfind(outside, 0, inside, 0, &options).unwrap().is_none());
        assert!(map
            .pathfind(outside, 0, Point2::new(1.4, 0.5), 0, &options)
            .unwrap()
            .is_some());
    }

    #[test]
    fn corners_and_empty_space_are_not_deleted() {
        let mut floor = Floor::default();
        assert!(floor.delete(Point2::new(0.0, 0.0)).is_none());
        assert!(floor.delete(Point2::new(0.9, 0.5)).is_none());
        assert_eq!(floor.vertex_count(), 4);
    }
}
