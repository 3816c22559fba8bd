//! Path searches over any [`SearchGraph`].
//!
//! Every search takes a source and target vertex and returns `None` when the
//! target cannot be reached. A missing path is an ordinary outcome, not an error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::queue::{MinHeap, Queue, Stack};
use super::SearchGraph;
use crate::error::SearchError;

/// Predecessor and distance labels left behind by a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTree {
    pub source: usize,
    pub target: usize,
    /// Vertex each labelled vertex was reached from.
    pub predecessors: Vec<Option<usize>>,
    /// Accumulated cost of each labelled vertex. Hop counts for BFS.
    pub distances: Vec<Option<f64>>,
}

impl SearchTree {
    fn new(source: usize, target: usize, vertex_count: usize) -> Self {
        let mut distances = vec![None; vertex_count];
        distances[source] = Some(0.0);
        Self {
            source,
            target,
            predecessors: vec![None; vertex_count],
            distances,
        }
    }

    fn label(&mut self, vertex: usize, from: usize, cost: f64) {
        self.predecessors[vertex] = Some(from);
        self.distances[vertex] = Some(cost);
    }

    fn distance(&self, vertex: usize) -> Option<f64> {
        self.distances[vertex]
    }

    /// Vertex sequence from source to target.
    #[must_use]
    pub fn path(&self) -> Vec<usize> {
        let mut path = vec![self.target];
        let mut current = self.target;
        while current != self.source {
            match self.predecessors[current] {
                Some(previous) => {
                    path.push(previous);
                    current = previous;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }

    /// Distance label of the target.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.distances[self.target].unwrap_or(f64::INFINITY)
    }
}

/// Breadth-first search by hop count.
///
/// Stops as soon as the target is discovered; hop counts are final at discovery.
pub fn bfs<G: SearchGraph + ?Sized>(graph: &G, source: usize, target: usize) -> Option<SearchTree> {
    let mut tree = SearchTree::new(source, target, graph.vertex_count());
    if source == target {
        return Some(tree);
    }
    let mut frontier = Queue::new();
    frontier.enqueue(source);
    while let Some(current) = frontier.dequeue() {
        let hops = tree.distance(current).unwrap_or_default() + 1.0;
        for (next, _) in graph.successors(current) {
            if tree.distance(next).is_some() {
                continue;
            }
            tree.label(next, current, hops);
            if next == target {
                return Some(tree);
            }
            frontier.enqueue(next);
        }
    }
    None
}

/// Depth-first reachability from `source`.
#[must_use]
pub fn dfs<G: SearchGraph + ?Sized>(graph: &G, source: usize) -> Vec<bool> {
    let mut visited = vec![false; graph.vertex_count()];
    let mut stack = Stack::new();
    stack.push(source);
    while let Some(current) = stack.pop() {
        if visited[current] {
            continue;
        }
        visited[current] = true;
        for (next, _) in graph.successors(current) {
            if !visited[next] {
                stack.push(next);
            }
        }
    }
    visited
}

/// Dijkstra's algorithm with decrease-key.
pub fn dijkstra<G: SearchGraph + ?Sized>(
    graph: &G,
    source: usize,
    target: usize,
) -> Option<SearchTree> {
    best_first(graph, source, target, |_, cost| cost, |_, cost| cost)
}

/// A* using the graph's scaled Euclidean heuristic.
pub fn a_star<G: SearchGraph + ?Sized>(
    graph: &G,
    source: usize,
    target: usize,
) -> Option<SearchTree> {
    best_first(
        graph,
        source,
        target,
        |vertex, cost| cost + graph.heuristic(vertex, target),
        |vertex, cost| cost + graph.heuristic(vertex, target),
    )
}

/// Shared relaxation loop of Dijkstra and A*.
///
/// `priority` orders the frontier. The loop ends once the target's label is
/// below `bound` of the vertex just taken off the frontier, or the target itself
/// is taken.
fn best_first<G, P, B>(
    graph: &G,
    source: usize,
    target: usize,
    priority: P,
    bound: B,
) -> Option<SearchTree>
where
    G: SearchGraph + ?Sized,
    P: Fn(usize, f64) -> f64,
    B: Fn(usize, f64) -> f64,
{
    let mut tree = SearchTree::new(source, target, graph.vertex_count());
    let mut frontier = MinHeap::new();
    frontier.insert(source, priority(source, 0.0));

    while let Some(entry) = frontier.extract_min() {
        let current = entry.item;
        let Some(cost) = tree.distance(current) else {
            continue;
        };
        if current == target {
            break;
        }
        if let Some(best) = tree.distance(target) {
            if best < bound(current, cost) {
                break;
            }
        }
        for (next, weight) in graph.successors(current) {
            let tentative = cost + weight;
            if tree.distance(next).is_none_or(|known| tentative < known) {
                tree.label(next, current, tentative);
                frontier.decrease_priority_or_insert(next, priority(next, tentative));
            }
        }
    }

    tree.distance(target).is_some().then_some(tree)
}

/// Greedy best-first search on the heuristic alone.
///
/// A vertex is labelled the first time it is discovered and never relaxed
/// afterwards, and the search stops the moment the target is discovered rather
/// than when it is expanded. The result is a path, not necessarily a shortest one.
pub fn greedy<G: SearchGraph + ?Sized>(
    graph: &G,
    source: usize,
    target: usize,
) -> Option<SearchTree> {
    let mut tree = SearchTree::new(source, target, graph.vertex_count());
    if source == target {
        return Some(tree);
    }
    let mut frontier = MinHeap::new();
    frontier.insert(source, graph.heuristic(source, target));

    while let Some(entry) = frontier.extract_min() {
        let current = entry.item;
        let cost = tree.distance(current).unwrap_or_default();
        for (next, weight) in graph.successors(current) {
            if tree.distance(next).is_some() {
                continue;
            }
            tree.label(next, current, cost + weight);
            if next == target {
                return Some(tree);
            }
            frontier.insert(next, graph.heuristic(next, target));
        }
    }
    None
}

/// Sum of the traversable weights along `path`.
///
/// Returns `None` if any consecutive pair is not joined by a traversable edge.
#[must_use]
pub fn path_cost<G: SearchGraph + ?Sized>(graph: &G, path: &[usize]) -> Option<f64> {
    path.windows(2)
        .map(|pair| graph.traversable_weight(pair[0], pair[1]))
        .sum()
}

/// Selectable search strategy.
///
/// Serialized as its selector name (`"BFS"`, `"Dijkstra"`, `"A*"`, `"Greedy"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SearchAlgorithm {
    Bfs,
    Dijkstra,
    AStar,
    Greedy,
}

impl SearchAlgorithm {
    pub const ALL: [Self; 4] = [Self::Bfs, Self::Dijkstra, Self::AStar, Self::Greedy];

    /// The selector name used in configuration.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bfs => "BFS",
            Self::Dijkstra => "Dijkstra",
            Self::AStar => "A*",
            Self::Greedy => "Greedy",
        }
    }

    /// Runs this strategy from `source` to `target`.
    pub fn shortest_path<G: SearchGraph + ?Sized>(
        self,
        graph: &G,
        source: usize,
        target: usize,
    ) -> Option<SearchTree> {
        match self {
            Self::Bfs => bfs(graph, source, target),
            Self::Dijkstra => dijkstra(graph, source, target),
            Self::AStar => a_star(graph, source, target),
            Self::Greedy => greedy(graph, source, target),
        }
    }
}

impl fmt::Display for SearchAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchAlgorithm {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == s)
            .ok_or_else(|| SearchError::InvalidSelector(s.to_owned()))
    }
}

impl TryFrom<String> for SearchAlgorithm {
    type Error = SearchError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<SearchAlgorithm> for String {
    fn from(algorithm: SearchAlgorithm) -> Self {
        algorithm.name().to_owned()
    }
}
