use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::links::{join_on_floor, link_position};
use super::{FloorId, LinkLabel, Map};
use crate::config::PathfindingOptions;
use crate::error::{MapError, Result};
use crate::graph::{GraphOverlay, SearchGraph};
use crate::math::Point2;
use crate::navmesh::NavOverlay;

/// The part of a route that crosses one floor.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    /// Navigation vertices in walking order.
    pub vertices: Vec<usize>,
    /// Positions of [`vertices`](Self::vertices); temporary start and goal
    /// vertices are included.
    pub points: Vec<Point2>,
}

/// A route through the building.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// The link-graph vertices visited, as `(floor, label)` from start to goal.
    pub hops: Vec<(FloorId, LinkLabel)>,
    /// Walking legs keyed by `(hop index, floor)`. A floor can be crossed more
    /// than once, so the hop index keeps legs apart.
    pub legs: BTreeMap<(usize, FloorId), Leg>,
}

/// A link-graph vertex on the route, resolved to its floor's navigation graph.
struct Hop {
    floor: FloorId,
    nav_vertex: usize,
    label: LinkLabel,
}

impl Map {
    /// Finds a route from `start` on `start_floor` to `goal` on `goal_floor`.
    ///
    /// Start and goal are attached as temporary links to their floors' meshes
    /// and to the link graph; the link graph is searched with
    /// `options.link_algorithm` and every floor crossing with
    /// `options.primary_algorithm`. Nothing in the map is modified.
    ///
    /// Returns `Ok(None)` if no route exists.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::UnknownFloor`](crate::error::MapError::UnknownFloor)
    /// or [`MapError::MissingNavMesh`](crate::error::MapError::MissingNavMesh)
    /// if either floor does not exist or has no generated mesh, and
    /// [`ConfigError::InvalidLinkWeight`](crate::error::ConfigError::InvalidLinkWeight)
    /// for an unusable link weight.
    pub fn pathfind(
        &self,
        start: Point2,
        start_floor: FloorId,
        goal: Point2,
        goal_floor: FloorId,
        options: &PathfindingOptions,
    ) -> Result<Option<Route>> {
        options.validate()?;

        // Step 1: Attach start and goal to their floors.
        let mut overlays = BTreeMap::new();
        let start_nav = self.attach(&mut overlays, start_floor, start)?;
        let goal_nav = self.attach(&mut overlays, goal_floor, goal)?;

        // A zero-length edge reads as no edge, so standing still is answered here.
        if start_floor == goal_floor && start == goal {
            return Ok(Some(Route {
                hops: vec![(start_floor, LinkLabel::Start), (goal_floor, LinkLabel::Goal)],
                legs: BTreeMap::from([(
                    (0, start_floor),
                    Leg {
                        vertices: vec![start_nav, goal_nav],
                        points: vec![start, goal],
                    },
                )]),
            }));
        }

        // Step 2: Attach them to the link graph at zero link weight.
        let join_options = PathfindingOptions {
            link_weight: 0.0,
            ..*options
        };
        let mut links = GraphOverlay::new(&self.link_graph);
        let start_vertex = links.add_vertex(link_position(start_floor));
        let goal_vertex = links.add_vertex(link_position(goal_floor));
        let mut hops: Vec<Hop> = Vec::with_capacity(links.vertex_count());
        for node in &self.link_nodes {
            let nav_vertex = self
                .generated_mesh(node.floor)?
                .link_vertex(node.link_index)
                .ok_or(MapError::MissingNavMesh(node.floor))?;
            hops.push(Hop {
                floor: node.floor,
                nav_vertex,
                label: node.label.clone(),
            });
        }
        hops.push(Hop {
            floor: start_floor,
            nav_vertex: start_nav,
            label: LinkLabel::Start,
        });
        hops.push(Hop {
            floor: goal_floor,
            nav_vertex: goal_nav,
            label: LinkLabel::Goal,
        });

        for vertex in [start_vertex, goal_vertex] {
            let floor = hops[vertex].floor;
            let earlier: Vec<(usize, usize)> = hops[..vertex]
                .iter()
                .enumerate()
                .filter(|(_, hop)| hop.floor == floor)
                .map(|(id, hop)| (id, hop.nav_vertex))
                .collect();
            if let Some(overlay) = overlays.get(&floor) {
                join_on_floor(
                    &mut links,
                    overlay.graph(),
                    (vertex, hops[vertex].nav_vertex),
                    &earlier,
                    &join_options,
                );
            }
        }

        // Step 3: Search the link graph.
        let Some(tree) = options
            .link_algorithm
            .shortest_path(&links, start_vertex, goal_vertex)
        else {
            debug!(start_floor, goal_floor, "no route between floors");
            return Ok(None);
        };
        let path = tree.path();

        // Step 4: Walk each floor crossing that is not a same-id hop.
        let mut legs = BTreeMap::new();
        for (index, pair) in path.windows(2).enumerate() {
            let (from, to) = (&hops[pair[0]], &hops[pair[1]]);
            if from.floor != to.floor || is_transfer(&links, pair[0], pair[1], from, to, options) {
                continue;
            }
            let leg = match overlays.get(&from.floor) {
                Some(overlay) => walk(overlay.graph(), from.nav_vertex, to.nav_vertex, options),
                None => walk(
                    self.generated_mesh(from.floor)?.nav_graph(),
                    from.nav_vertex,
                    to.nav_vertex,
                    options,
                ),
            };
            let Some(leg) = leg else {
                warn!(
                    floor = from.floor,
                    hop = index,
                    "route abandoned, floor crossing could not be walked"
                );
                return Ok(None);
            };
            legs.insert((index, from.floor), leg);
        }

        Ok(Some(Route {
            hops: path
                .iter()
                .map(|&vertex| (hops[vertex].floor, hops[vertex].label.clone()))
                .collect(),
            legs,
        }))
    }

    /// Attaches a temporary link to the overlay of `floor`, creating the overlay
    /// on first use.
    fn attach<'m>(
        &'m self,
        overlays: &mut BTreeMap<FloorId, NavOverlay<'m>>,
        floor: FloorId,
        point: Point2,
    ) -> Result<usize> {
        let overlay = match overlays.entry(floor) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(self.generated_mesh(floor)?.overlay()),
        };
        Ok(overlay.add_link(point))
    }
}

/// Whether `a → b` just moves between two links sharing an id.
#[allow(clippy::float_cmp)]
fn is_transfer(
    links: &GraphOverlay<'_>,
    a: usize,
    b: usize,
    from: &Hop,
    to: &Hop,
    options: &PathfindingOptions,
) -> bool {
    from.label == to.label && links.edge_value(a, b) == options.link_weight
}

fn walk<G: SearchGraph + ?Sized>(
    graph: &G,
    from: usize,
    to: usize,
    options: &PathfindingOptions,
) -> Option<Leg> {
    let tree = options.primary_algorithm.shortest_path(graph, from, to)?;
    let vertices = tree.path();
    let points = vertices.iter().map(|&v| graph.position(v)).collect();
    Some(Leg { vertices, points })
}
