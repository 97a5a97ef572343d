//! Uniform cost search (Dijkstra's algorithm with lazy deletion).
use crate::{
    constants::Weight,
    cost_model::CostModel,
    graph::{Graph, NodeIndex},
};

use super::{
    best_first::{BestFirst, PriorityKey},
    frontier::Revisit,
};

/// Orders by accumulated cost only.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostOrder;

impl PriorityKey for CostOrder {
    const REVISIT: Revisit = Revisit::Lazy;
    const NAME: &'static str = "UCS";

    #[inline]
    fn key(&self, _: &Graph, _: NodeIndex, _: NodeIndex, cost: Weight) -> Weight {
        cost
    }
}

pub type UniformCost<'a> = BestFirst<'a, CostOrder>;

impl<'a> BestFirst<'a, CostOrder> {
    pub fn new(g: &'a Graph, cost_model: CostModel) -> Self {
        BestFirst::with_key(g, cost_model, CostOrder)
    }
}
