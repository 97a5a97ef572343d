//! Implementation of the A* search algorithm.
//!
//! The result is optimal when the [`Heuristic`] is admissible for the graph and
//! cost model in use, see [`Heuristic::calibrate`]. With an overestimating
//! heuristic the first route to the goal is returned as is.
use crate::{
    constants::Weight,
    cost_model::CostModel,
    error::RoutingError,
    graph::{Graph, NodeIndex},
    heuristic::Heuristic,
};

use super::{
    best_first::{BestFirst, PriorityKey},
    frontier::Revisit,
};

/// Orders by accumulated cost plus the estimated remaining cost.
#[derive(Debug, Clone, Copy)]
pub struct EstimatedTotalOrder {
    heuristic: Heuristic,
}

impl PriorityKey for EstimatedTotalOrder {
    const REVISIT: Revisit = Revisit::Lazy;
    const NAME: &'static str = "ASTAR";

    #[inline]
    fn key(&self, g: &Graph, node: NodeIndex, target: NodeIndex, cost: Weight) -> Weight {
        cost + self.heuristic.between(g, node, target)
    }

    fn validate(&self) -> Result<(), RoutingError> {
        self.heuristic.validate()
    }
}

pub type AStar<'a> = BestFirst<'a, EstimatedTotalOrder>;

impl<'a> BestFirst<'a, EstimatedTotalOrder> {
    pub fn new(g: &'a Graph, cost_model: CostModel, heuristic: Heuristic) -> Self {
        BestFirst::with_key(g, cost_model, EstimatedTotalOrder { heuristic })
    }
}
