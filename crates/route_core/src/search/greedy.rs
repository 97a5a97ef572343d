//! Greedy best-first search. Expands whatever looks closest to the goal and
//! returns the first route found, which need not be the cheapest one.
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

/// Orders by the estimated remaining cost only. A closed node is never
/// reopened.
#[derive(Debug, Clone, Copy)]
pub struct EstimateOrder {
    heuristic: Heuristic,
}

impl PriorityKey for EstimateOrder {
    const REVISIT: Revisit = Revisit::Eager;
    const NAME: &'static str = "GREEDY";

    #[inline]
    fn key(&self, g: &Graph, node: NodeIndex, target: NodeIndex, _: Weight) -> Weight {
        self.heuristic.between(g, node, target)
    }

    fn validate(&self) -> Result<(), RoutingError> {
        self.heuristic.validate()
    }
}

pub type Greedy<'a> = BestFirst<'a, EstimateOrder>;

impl<'a> BestFirst<'a, EstimateOrder> {
    pub fn new(g: &'a Graph, cost_model: CostModel, heuristic: Heuristic) -> Self {
        BestFirst::with_key(g, cost_model, EstimateOrder { heuristic })
    }
}
