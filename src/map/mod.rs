//! A building: floors, their navigation meshes, and the link graph joining them.

pub mod format;
mod generate;
mod links;
mod pathfind;

pub use generate::GenerationOutcome;
pub use pathfind::{Leg, Route};

use std::collections::BTreeMap;

use crate::config::MapConfig;
use crate::error::MapError;
use crate::floor::Floor;
use crate::graph::WeightedGraph;
use crate::navmesh::NavigationMesh;

/// Identifier of a floor. Floors may be numbered from any integer, negatives included.
pub type FloorId = i32;

/// What a link-graph vertex stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LinkLabel {
    /// A link placed on a floor.
    Named(String),
    /// The temporary start point of a route.
    Start,
    /// The temporary goal point of a route.
    Goal,
}

/// A link-graph vertex: the `link_index`-th link of `floor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkNode {
    pub floor: FloorId,
    pub link_index: usize,
    pub label: LinkLabel,
}

/// Every floor of a building together with the derived search structures.
///
/// Floors are edited through [`floor_mut`](Self::floor_mut); meshes come from
/// [`generate_nav_meshes`](Self::generate_nav_meshes) and the link graph from
/// [`join_links`](Self::join_links). Editing or removing a floor drops its mesh
/// and the link graph, so stale ids never reach a search.
#[derive(Debug, Clone)]
pub struct Map {
    config: MapConfig,
    floors: BTreeMap<FloorId, Floor>,
    nav_meshes: BTreeMap<FloorId, NavigationMesh>,
    link_graph: WeightedGraph,
    link_nodes: Vec<LinkNode>,
}

impl Map {
    /// Creates a map holding one empty floor, numbered 0.
    #[must_use]
    pub fn new(config: MapConfig) -> Self {
        let mut map = Self::empty(config);
        map.floors.insert(0, Floor::new(config.floor));
        map
    }

    pub(crate) fn empty(config: MapConfig) -> Self {
        Self {
            config,
            floors: BTreeMap::new(),
            nav_meshes: BTreeMap::new(),
            link_graph: WeightedGraph::new(),
            link_nodes: Vec::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Floor ids in ascending order.
    pub fn floor_ids(&self) -> impl Iterator<Item = FloorId> + '_ {
        self.floors.keys().copied()
    }

    /// Adds an empty floor.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::DuplicateFloor`] if `id` is taken.
    pub fn add_floor(&mut self, id: FloorId) -> Result<&mut Floor, MapError> {
        if self.floors.contains_key(&id) {
            return Err(MapError::DuplicateFloor(id));
        }
        let floor = Floor::new(self.config.floor);
        Ok(self.floors.entry(id).or_insert(floor))
    }

    /// Removes a floor along with its mesh.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::UnknownFloor`] if there is no such floor.
    pub fn remove_floor(&mut self, id: FloorId) -> Result<Floor, MapError> {
        let floor = self.floors.remove(&id).ok_or(MapError::UnknownFloor(id))?;
        self.nav_meshes.remove(&id);
        self.clear_link_graph();
        Ok(floor)
    }

    /// # Errors
    ///
    /// Returns [`MapError::UnknownFloor`] if there is no such floor.
    pub fn floor(&self, id: FloorId) -> Result<&Floor, MapError> {
        self.floors.get(&id).ok_or(MapError::UnknownFloor(id))
    }

    /// Mutable access to a floor. Its mesh and the link graph are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::UnknownFloor`] if there is no such floor.
    pub fn floor_mut(&mut self, id: FloorId) -> Result<&mut Floor, MapError> {
        if !self.floors.contains_key(&id) {
            return Err(MapError::UnknownFloor(id));
        }
        self.nav_meshes.remove(&id);
        self.clear_link_graph();
        self.floors.get_mut(&id).ok_or(MapError::UnknownFloor(id))
    }

    /// The generated mesh of a floor, if any.
    #[must_use]
    pub fn nav_mesh(&self, id: FloorId) -> Option<&NavigationMesh> {
        self.nav_meshes.get(&id)
    }

    /// Mutable access for navigation edge edits.
    ///
    /// Precomputed link weights are not refreshed; call
    /// [`join_links`](Self::join_links) again after editing.
    pub fn nav_mesh_mut(&mut self, id: FloorId) -> Option<&mut NavigationMesh> {
        self.nav_meshes.get_mut(&id)
    }

    #[must_use]
    pub fn link_graph(&self) -> &WeightedGraph {
        &self.link_graph
    }

    /// What each link-graph vertex stands for, by vertex id.
    #[must_use]
    pub fn link_nodes(&self) -> &[LinkNode] {
        &self.link_nodes
    }

    /// Whether every floor has a generated mesh.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.floors.keys().all(|id| self.nav_meshes.contains_key(id))
    }

    fn clear_link_graph(&mut self) {
        self.link_graph = WeightedGraph::new();
        self.link_nodes.clear();
    }

    /// Mesh of a floor that must exist and be generated.
    fn generated_mesh(&self, id: FloorId) -> Result<&NavigationMesh, MapError> {
        if !self.floors.contains_key(&id) {
            return Err(MapError::UnknownFloor(id));
        }
        self.nav_meshes.get(&id).ok_or(MapError::MissingNavMesh(id))
    }
}

impl Default for Map {
    fn default() -> Self {
        Self::new(MapConfig::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;

    #[test]
    fn new_map_has_floor_zero() {
        let map = Map::default();
        assert_eq!(map.floor_ids().collect::<Vec<_>>(), vec![0]);
        assert!(!map.floor(0).unwrap().is_edited());
        assert!(map.nav_mesh(0).is_none());
        assert!(!map.is_generated());
    }

    #[test]
    fn floors_are_kept_in_order() {
        let mut map = Map::default();
        map.add_floor(3).unwrap();
        map.add_floor(-1).unwrap();
        assert_eq!(map.floor_ids().collect::<Vec<_>>(), vec![-1, 0, 3]);
        assert!(matches!(map.add_floor(3), Err(MapError::DuplicateFloor(3))));
        map.remove_floor(0).unwrap();
        assert!(matches!(map.floor(0), Err(MapError::UnknownFloor(0))));
        assert!(matches!(map.remove_floor(0), Err(MapError::UnknownFloor(0))));
    }

    #[test]
    fn editing_a_floor_drops_its_mesh() {
        let mut map = Map::default();
        map.add_floor(1).unwrap();
        assert_eq!(map.generate().unwrap(), GenerationOutcome::Completed);
        assert!(map.is_generated());

        map.floor_mut(1).unwrap().add_link("A", Point2::new(0.5, 0.5));
        assert!(map.nav_mesh(1).is_none());
        assert!(map.nav_mesh(0).is_some());
        assert!(matches!(
            map.generated_mesh(1),
            Err(MapError::MissingNavMesh(1))
        ));
    }
}
