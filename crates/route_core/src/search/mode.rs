//! Runs every strategy on the same query and picks the result a [`Policy`]
//! prefers.
use std::{collections::BTreeMap, fmt};

use log::{debug, info, warn};
use serde::Serialize;

use crate::{constants::COST_EPSILON, error::RoutingError, graph::NodeIndex};

use super::{Router, SearchResult, Strategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Always the result of one strategy
    Manual(Strategy),
    /// Cheapest route, fewest expanded nodes among equally cheap ones
    Optimal,
    /// Fewest expanded nodes, whatever the cost
    Speed,
}

impl Policy {
    /// Parses "optimal", "speed" or a strategy key. Anything else falls back
    /// to A*.
    pub fn from_key(key: &str) -> Self {
        match key.to_ascii_lowercase().as_str() {
            "optimal" => Policy::Optimal,
            "speed" => Policy::Speed,
            other => match other.parse::<Strategy>() {
                Ok(strategy) => Policy::Manual(strategy),
                Err(_) => {
                    warn!("Unknown policy '{}', falling back to {}", key, Strategy::AStar);
                    Policy::Manual(Strategy::AStar)
                }
            },
        }
    }
}

impl Default for Policy {
    fn default() -> Self {
        Policy::Manual(Strategy::AStar)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Manual(strategy) => write!(f, "{}", strategy),
            Policy::Optimal => f.write_str("optimal"),
            Policy::Speed => f.write_str("speed"),
        }
    }
}

/// Results of all strategies for one query and the one the policy picked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub policy: Policy,
    pub preferred: Strategy,
    pub results: BTreeMap<Strategy, SearchResult>,
}

impl Selection {
    pub fn preferred_result(&self) -> &SearchResult {
        &self.results[&self.preferred]
    }
}

pub struct ModeSelector<'a> {
    router: Router<'a>,
}

impl<'a> ModeSelector<'a> {
    pub fn new(router: Router<'a>) -> Self {
        ModeSelector { router }
    }

    /// Runs the strategies one after another in [`Strategy::ALL`] order. The
    /// first failing strategy aborts the run.
    pub fn run_all(
        &self,
        start: NodeIndex,
        goal: NodeIndex,
    ) -> Result<BTreeMap<Strategy, SearchResult>, RoutingError> {
        let mut results = BTreeMap::new();
        for strategy in Strategy::ALL {
            let result = self.router.search(strategy, start, goal)?;
            debug!("{}: {}", strategy, result);
            results.insert(strategy, result);
        }
        Ok(results)
    }

    pub fn select(
        &self,
        policy: Policy,
        start: NodeIndex,
        goal: NodeIndex,
    ) -> Result<Selection, RoutingError> {
        let results = self.run_all(start, goal)?;
        let preferred = choose(policy, &results);
        info!("Policy {} selected {}", policy, preferred);

        Ok(Selection {
            policy,
            preferred,
            results,
        })
    }
}

/// Picks a strategy from `results`. Ties are resolved in [`Strategy::ALL`]
/// order.
pub(crate) fn choose(policy: Policy, results: &BTreeMap<Strategy, SearchResult>) -> Strategy {
    let in_order = || {
        Strategy::ALL
            .into_iter()
            .filter_map(|strategy| results.get(&strategy).map(|result| (strategy, result)))
    };

    // min_by_key keeps the first of equal elements
    let fewest_expanded = |candidates: Vec<(Strategy, &SearchResult)>| {
        candidates
            .into_iter()
            .min_by_key(|(_, result)| result.expanded)
            .map(|(strategy, _)| strategy)
    };

    let chosen = match policy {
        Policy::Manual(strategy) => Some(strategy),
        Policy::Optimal => {
            let min_cost = in_order()
                .map(|(_, result)| result.cost)
                .min_by(|a, b| a.total_cmp(b));

            min_cost.and_then(|min_cost| {
                fewest_expanded(
                    in_order()
                        .filter(|(_, result)| {
                            result.cost == min_cost || (result.cost - min_cost).abs() <= COST_EPSILON
                        })
                        .collect(),
                )
            })
        }
        Policy::Speed => fewest_expanded(in_order().collect()),
    };

    chosen.unwrap_or(Strategy::AStar)
}
