use std::collections::HashMap;

use tracing::info;

use super::{FloorId, LinkLabel, LinkNode, Map};
use crate::config::PathfindingOptions;
use crate::error::{MapError, Result};
use crate::graph::search::dfs;
use crate::graph::{path_cost, GraphOverlay, SearchGraph, WeightedGraph};
use crate::math::Point2;

/// Position of a link-graph vertex. Only the floor matters, so the heuristic
/// steers towards the goal floor.
pub(super) fn link_position(floor: FloorId) -> Point2 {
    Point2::new(0.0, f64::from(floor))
}

/// A link graph that accepts directed weights.
pub(super) trait LinkWeights: SearchGraph {
    fn write_weight(&mut self, from: usize, to: usize, weight: f64);

    /// Stores `from → to` unless a lighter edge is already there.
    fn keep_lighter(&mut self, from: usize, to: usize, weight: f64) {
        if !self.has_edge(from, to) || weight < self.edge_value(from, to) {
            self.write_weight(from, to, weight);
        }
    }
}

impl LinkWeights for WeightedGraph {
    fn write_weight(&mut self, from: usize, to: usize, weight: f64) {
        self.set_weight(from, to, weight, false);
    }
}

impl LinkWeights for GraphOverlay<'_> {
    fn write_weight(&mut self, from: usize, to: usize, weight: f64) {
        self.set_weight(from, to, weight, false);
    }
}

/// Cost of walking `from → to` on one floor's navigation graph, if possible.
fn floor_cost<N: SearchGraph + ?Sized>(
    nav: &N,
    from: usize,
    to: usize,
    options: &PathfindingOptions,
) -> Option<f64> {
    if options.precompute_link_dist {
        let tree = options.primary_algorithm.shortest_path(nav, from, to)?;
        path_cost(nav, &tree.path())
    } else {
        dfs(nav, from)[to].then(|| nav.heuristic(from, to))
    }
}

/// Joins link-graph vertex `vertex` to the earlier vertices on its floor.
///
/// Each entry pairs a link-graph vertex with its navigation vertex. An edge is
/// added per direction the floor can be walked.
pub(super) fn join_on_floor<L, N>(
    links: &mut L,
    nav: &N,
    (vertex, nav_vertex): (usize, usize),
    earlier: &[(usize, usize)],
    options: &PathfindingOptions,
) where
    L: LinkWeights,
    N: SearchGraph + ?Sized,
{
    for &(other, other_nav) in earlier {
        if let Some(weight) = floor_cost(nav, nav_vertex, other_nav, options) {
            links.keep_lighter(vertex, other, weight);
        }
        if let Some(weight) = floor_cost(nav, other_nav, nav_vertex, options) {
            links.keep_lighter(other, vertex, weight);
        }
    }
}

impl Map {
    /// Rebuilds the link graph from the links of every floor.
    ///
    /// Links sharing an id are joined both ways at `options.link_weight`. Links
    /// on one floor are joined in each direction the floor can be walked,
    /// weighted by the path cost when `options.precompute_link_dist` is set and
    /// by the straight-line estimate otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLinkWeight`](crate::error::ConfigError::InvalidLinkWeight)
    /// for a link weight that is not positive, or [`MapError::MissingNavMesh`]
    /// if a floor with links has no generated mesh.
    pub fn join_links(&mut self, options: &PathfindingOptions) -> Result<()> {
        options.validate()?;
        let mut graph = WeightedGraph::new();
        let mut nodes = Vec::new();
        let mut by_id: HashMap<&str, Vec<usize>> = HashMap::new();

        for (&floor_id, floor) in &self.floors {
            if floor.links().is_empty() {
                continue;
            }
            let nav = self
                .nav_meshes
                .get(&floor_id)
                .filter(|nav| nav.link_count() == floor.links().len())
                .ok_or(MapError::MissingNavMesh(floor_id))?;

            let mut on_floor: Vec<(usize, usize)> = Vec::new();
            for (index, link) in floor.links().iter().enumerate() {
                let vertex = graph.add_vertex(link_position(floor_id));
                let nav_vertex = nav
                    .link_vertex(index)
                    .ok_or(MapError::MissingNavMesh(floor_id))?;

                let same_id = by_id.entry(link.id.as_str()).or_default();
                for &other in same_id.iter() {
                    graph.set_weight(vertex, other, options.link_weight, true);
                }
                same_id.push(vertex);

                join_on_floor(
                    &mut graph,
                    nav.nav_graph(),
                    (vertex, nav_vertex),
                    &on_floor,
                    options,
                );
                on_floor.push((vertex, nav_vertex));
                nodes.push(LinkNode {
                    floor: floor_id,
                    link_index: index,
                    label: LinkLabel::Named(link.id.clone()),
                });
            }
        }

        info!(
            links = nodes.len(),
            edges = graph.edge_count(),
            "link graph rebuilt"
        );
        self.link_graph = graph;
        self.link_nodes = nodes;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, NavError};
    use crate::graph::SearchAlgorithm;
    use crate::map::GenerationOutcome;
    use approx::assert_relative_eq;

    /// Floor 0 has a wall between links "A" and "B"; floor 1 has "A" again.
    fn building() -> Map {
        let mut map = Map::default();
        let ground = map.floor_mut(0).unwrap();
        assert!(ground.add_wall(Point2::new(0.5, 0.0), Point2::new(0.5, 0.6)));
        ground.add_link("A", Point2::new(0.25, 0.2));
        ground.add_link("B", Point2::new(0.75, 0.2));
        map.add_floor(1)
            .unwrap()
            .add_link("A", Point2::new(1.0, 0.5));
        assert_eq!(map.generate().unwrap(), GenerationOutcome::Completed);
        map
    }

    #[test]
    fn links_are_joined_by_id_and_floor() {
        let mut map = building();
        let options = PathfindingOptions::default();
        map.join_links(&options).unwrap();

        let graph = map.link_graph();
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(map.link_nodes()[2].floor, 1);
        assert_eq!(map.link_nodes()[2].label, LinkLabel::Named("A".into()));
        // Same id across floors.
        assert_relative_eq!(graph.edge_value(0, 2), 0.1);
        assert_relative_eq!(graph.edge_value(2, 0), 0.1);
        // Same floor, straight-line estimate both ways.
        assert_relative_eq!(graph.edge_value(0, 1), 0.5);
        assert_relative_eq!(graph.edge_value(1, 0), 0.5);
        assert!(!graph.has_edge(1, 2));
        // One floor apart at 0.1 per floor.
        assert_relative_eq!(graph.heuristic_scale(), 0.1);
    }

    #[test]
    fn precomputed_weights_follow_the_walls() {
        let mut map = building();
        let options = PathfindingOptions {
            precompute_link_dist: true,
            primary_algorithm: SearchAlgorithm::Dijkstra,
            ..PathfindingOptions::default()
        };
        map.join_links(&options).unwrap();
        let around = map.link_graph().edge_value(0, 1);
        assert!(around > 0.5);

        // BFS counts hops, but link weights are still path costs.
        let bfs = PathfindingOptions {
            primary_algorithm: SearchAlgorithm::Bfs,
            ..options
        };
        map.join_links(&bfs).unwrap();
        assert!(map.link_graph().edge_value(0, 1) >= around - 1e-12);
    }

    #[test]
    fn blocked_floors_leave_links_apart() {
        let mut map = Map::default();
        let ground = map.floor_mut(0).unwrap();
        assert!(ground.add_wall(Point2::new(0.5, 0.0), Point2::new(0.5, 1.0)));
        ground.add_link("West", Point2::new(0.25, 0.5));
        ground.add_link("East", Point2::new(1.0, 0.5));
        assert_eq!(map.generate().unwrap(), GenerationOutcome::Completed);
        map.join_links(&PathfindingOptions::default()).unwrap();
        assert_eq!(map.link_graph().vertex_count(), 2);
        assert_eq!(map.link_graph().edge_count(), 0);
    }

    #[test]
    fn zero_link_weight_is_rejected() {
        let mut map = building();
        let options = PathfindingOptions {
            link_weight: 0.0,
            ..PathfindingOptions::default()
        };
        assert!(matches!(
            map.join_links(&options),
            Err(NavError::Config(ConfigError::InvalidLinkWeight(_)))
        ));
        assert_eq!(map.link_graph().vertex_count(), 0);
    }

    #[test]
    fn links_need_a_mesh() {
        let mut map = building();
        map.floor_mut(1)
            .unwrap()
            .add_link("C", Point2::new(0.2, 0.2));
        assert!(matches!(
            map.join_links(&PathfindingOptions::default()),
            Err(NavError::Map(MapError::MissingNavMesh(1)))
        ));
    }
}
