//! Single-direction best-first traversal shared by uniform cost search, A* and
//! greedy best-first search. The strategies only differ in their
//! [`PriorityKey`].
use log::{debug, info};

use crate::{
    constants::Weight,
    cost_model::CostModel,
    error::RoutingError,
    graph::{Graph, NodeIndex},
    statistics::SearchStats,
};

use super::{
    check_nodes,
    frontier::{Candidate, Frontier, Revisit},
    PathSearch, SearchResult,
};

/// Orders the frontier of a [`BestFirst`] search.
pub trait PriorityKey {
    /// Handling of entries whose node is already closed
    const REVISIT: Revisit;
    const NAME: &'static str;

    /// Key of `node`, reached at accumulated `cost`, on the way to `target`.
    fn key(&self, g: &Graph, node: NodeIndex, target: NodeIndex, cost: Weight) -> Weight;

    fn validate(&self) -> Result<(), RoutingError> {
        Ok(())
    }
}

pub struct BestFirst<'a, K> {
    pub stats: SearchStats,
    g: &'a Graph,
    cost_model: CostModel,
    key: K,
}

impl<'a, K: PriorityKey> BestFirst<'a, K> {
    pub fn with_key(g: &'a Graph, cost_model: CostModel, key: K) -> Self {
        BestFirst {
            stats: SearchStats::default(),
            g,
            cost_model,
            key,
        }
    }

    pub fn search(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
    ) -> Result<SearchResult, RoutingError> {
        check_nodes(self.g, source, target)?;
        self.cost_model.validate()?;
        self.key.validate()?;

        info!("BEGIN {} SEARCH from {} to {}", K::NAME, source, target);
        self.stats.init();

        let mut frontier = Frontier::new(K::REVISIT);
        frontier.push(Candidate::root(
            self.key.key(self.g, source, target, 0.0),
            source,
        ));

        while let Some(settled) = frontier.settle_next() {
            self.stats.nodes_settled += 1;

            if settled.node == target {
                self.stats.finish();

                let path = frontier.path_to(settled.label);
                debug!("Path found: {:?}", path);
                info!("{}, cost: {}", self.stats, settled.cost);

                return Ok(SearchResult::found(
                    path,
                    settled.cost,
                    self.stats.nodes_settled,
                ));
            }

            for (neighbor, edge) in self.g.neighbors_outgoing(settled.node) {
                let cost = settled.cost + self.cost_model.edge_cost(edge);
                let key = self.key.key(self.g, neighbor, target, cost);

                frontier.push(Candidate::new(key, cost, neighbor, Some(settled.label)));
            }
        }

        self.stats.finish();
        info!(
            "No path found: {:?}/{} nodes settled",
            self.stats.duration, self.stats.nodes_settled
        );

        Ok(SearchResult::unreachable(self.stats.nodes_settled))
    }
}

impl<K: PriorityKey> PathSearch for BestFirst<'_, K> {
    fn search(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
    ) -> Result<SearchResult, RoutingError> {
        BestFirst::search(self, source, target)
    }

    fn stats(&self) -> &SearchStats {
        &self.stats
    }
}
