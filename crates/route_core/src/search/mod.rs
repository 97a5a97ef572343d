//! Path search strategies over an immutable [`Graph`].
//!
//! Every strategy implements [`PathSearch`]. A [`Router`] bundles a graph with
//! a cost model and a heuristic and hands out searchers by [`Strategy`].
use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::Serialize;

use crate::{
    constants::Weight,
    cost_model::CostModel,
    error::RoutingError,
    graph::{Coordinate, Graph, NodeIndex},
    heuristic::Heuristic,
    statistics::SearchStats,
};

use self::{
    astar::AStar,
    bidir_dijkstra::BidirDijkstra,
    greedy::Greedy,
    mode::{ModeSelector, Policy, Selection},
    ucs::UniformCost,
};

pub mod astar;
pub mod best_first;
pub mod bidir_dijkstra;
pub(crate) mod frontier;
pub mod greedy;
pub mod mode;
pub mod ucs;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Nodes from start to goal, `None` if the goal is unreachable
    pub path: Option<Vec<NodeIndex>>,
    /// Accumulated cost of `path`, infinite if the goal is unreachable
    pub cost: Weight,
    /// Number of nodes closed by the search
    pub expanded: usize,
}

impl SearchResult {
    pub fn found(path: Vec<NodeIndex>, cost: Weight, expanded: usize) -> Self {
        SearchResult {
            path: Some(path),
            cost,
            expanded,
        }
    }

    pub fn unreachable(expanded: usize) -> Self {
        SearchResult {
            path: None,
            cost: Weight::INFINITY,
            expanded,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.path.is_some()
    }

    /// External ids of the nodes on the path.
    pub fn node_ids<'g>(&self, g: &'g Graph) -> Option<Vec<&'g str>> {
        self.path
            .as_ref()
            .map(|path| path.iter().filter_map(|&node| g.node_id(node)).collect())
    }

    /// Positions along the path, e.g. to draw it on a map.
    pub fn coordinates(&self, g: &Graph) -> Option<Vec<Coordinate>> {
        self.path
            .as_ref()
            .map(|path| path.iter().map(|&node| g.coord(node)).collect())
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(
                f,
                "cost: {:.3}, hops: {}, expanded: {}",
                self.cost,
                path.len().saturating_sub(1),
                self.expanded
            ),
            None => write!(f, "unreachable, expanded: {}", self.expanded),
        }
    }
}

pub trait PathSearch {
    fn search(&mut self, source: NodeIndex, target: NodeIndex)
        -> Result<SearchResult, RoutingError>;

    fn stats(&self) -> &SearchStats;
}

/// Rejects queries for nodes outside of `g` before any search state exists.
pub(crate) fn check_nodes(
    g: &Graph,
    source: NodeIndex,
    target: NodeIndex,
) -> Result<(), RoutingError> {
    for node in [source, target] {
        if !g.contains(node) {
            return Err(RoutingError::NodeNotFound(node.to_string()));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Ucs,
    Greedy,
    AStar,
    Bidirectional,
}

impl Strategy {
    /// Every strategy in the order ties are resolved in.
    pub const ALL: [Strategy; 4] = [
        Strategy::Ucs,
        Strategy::Greedy,
        Strategy::AStar,
        Strategy::Bidirectional,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Strategy::Ucs => "ucs",
            Strategy::Greedy => "greedy",
            Strategy::AStar => "astar",
            Strategy::Bidirectional => "bidir",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Ucs => "Uniform Cost Search",
            Strategy::Greedy => "Greedy Best-First Search",
            Strategy::AStar => "A* Search",
            Strategy::Bidirectional => "Bidirectional Uniform Cost Search",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Strategy {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ucs" | "dijkstra" | "uniform_cost" => Ok(Strategy::Ucs),
            "greedy" | "gbfs" => Ok(Strategy::Greedy),
            "astar" | "a*" | "a_star" => Ok(Strategy::AStar),
            "bidir" | "bidirectional" | "bidir_ucs" => Ok(Strategy::Bidirectional),
            _ => Err(RoutingError::InvalidArgument(format!(
                "Unknown strategy '{}'",
                s
            ))),
        }
    }
}

/// A graph together with the cost model and heuristic every query on it uses.
#[derive(Clone, Copy)]
pub struct Router<'a> {
    g: &'a Graph,
    cost_model: CostModel,
    heuristic: Heuristic,
}

impl<'a> Router<'a> {
    pub fn new(g: &'a Graph) -> Self {
        Router {
            g,
            cost_model: CostModel::default(),
            heuristic: Heuristic::default(),
        }
    }

    pub fn cost_model(mut self, cost_model: CostModel) -> Self {
        self.cost_model = cost_model;
        self
    }

    pub fn heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn graph(&self) -> &'a Graph {
        self.g
    }

    pub fn searcher(&self, strategy: Strategy) -> Box<dyn PathSearch + 'a> {
        match strategy {
            Strategy::Ucs => Box::new(UniformCost::new(self.g, self.cost_model)),
            Strategy::Greedy => Box::new(Greedy::new(self.g, self.cost_model, self.heuristic)),
            Strategy::AStar => Box::new(AStar::new(self.g, self.cost_model, self.heuristic)),
            Strategy::Bidirectional => Box::new(BidirDijkstra::new(self.g, self.cost_model)),
        }
    }

    pub fn search(
        &self,
        strategy: Strategy,
        start: NodeIndex,
        goal: NodeIndex,
    ) -> Result<SearchResult, RoutingError> {
        self.searcher(strategy).search(start, goal)
    }

    pub fn select_preferred(
        &self,
        policy: Policy,
        start: NodeIndex,
        goal: NodeIndex,
    ) -> Result<Selection, RoutingError> {
        ModeSelector::new(*self).select(policy, start, goal)
    }

    /// Runs every strategy, see [`ModeSelector::run_all`].
    pub fn run_all(
        &self,
        start: NodeIndex,
        goal: NodeIndex,
    ) -> Result<BTreeMap<Strategy, SearchResult>, RoutingError> {
        ModeSelector::new(*self).run_all(start, goal)
    }
}

/// Runs `strategy` with the default cost model and heuristic.
pub fn search(
    strategy: Strategy,
    g: &Graph,
    start: NodeIndex,
    goal: NodeIndex,
) -> Result<SearchResult, RoutingError> {
    Router::new(g).search(strategy, start, goal)
}

/// Runs all strategies with the default cost model and heuristic and picks one
/// according to `policy`.
pub fn select_preferred(
    policy: Policy,
    g: &Graph,
    start: NodeIndex,
    goal: NodeIndex,
) -> Result<Selection, RoutingError> {
    Router::new(g).select_preferred(policy, start, goal)
}

#[cfg(test)]
pub(crate) fn assert_no_path(result: Result<SearchResult, RoutingError>) {
    let result = result.unwrap();
    assert_eq!(None, result.path);
    assert_eq!(Weight::INFINITY, result.cost);
}

#[cfg(test)]
pub(crate) fn assert_path(
    expected_path: Vec<usize>,
    expected_weight: Weight,
    result: Result<SearchResult, RoutingError>,
) {
    let result = result.unwrap();
    let expected_path: Vec<_> = expected_path
        .into_iter()
        .map(crate::graph::node_index)
        .collect();

    assert_eq!(Some(expected_path), result.path);
    approx::assert_relative_eq!(expected_weight, result.cost, epsilon = 1e-9);
}
