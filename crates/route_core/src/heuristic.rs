//! Remaining-cost estimate used by A* and greedy best-first search.
//!
//! Edge costs are travel times in minutes, the great-circle distance is in
//! kilometers. The heuristic converts between the two with an explicit
//! `minutes_per_km` factor. It is admissible for a graph as long as no edge is
//! cheaper than `minutes_per_km * length(edge)`, which
//! [`Heuristic::calibrate`] guarantees by construction.
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    constants::Weight,
    cost_model::CostModel,
    error::RoutingError,
    graph::{Coordinate, Graph, NodeIndex},
    road_type::RoadType,
    util::math::haversine_km,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Heuristic {
    /// Conversion from great-circle kilometers to cost units
    pub minutes_per_km: f64,
}

impl Heuristic {
    pub fn new(minutes_per_km: f64) -> Self {
        Heuristic { minutes_per_km }
    }

    /// Travel time over the straight line at `kmh`. Admissible whenever no
    /// road is driven faster than `kmh` and every road type factor is >= 1.
    pub fn for_max_speed(kmh: f64) -> Self {
        Heuristic::new(60.0 / kmh)
    }

    /// Plain kilometers added to minutes. Not admissible in general, only
    /// useful to compare against the scaled variants.
    pub fn raw() -> Self {
        Heuristic::new(1.0)
    }

    pub fn zero() -> Self {
        Heuristic::new(0.0)
    }

    /// Largest factor for which every edge of `g` costs at least
    /// `factor * length(edge)` under `cost_model`. By the triangle inequality
    /// the result is admissible and consistent on `g`.
    pub fn calibrate(g: &Graph, cost_model: &CostModel) -> Self {
        let factor = g
            .edges()
            .filter_map(|edge| {
                let length = haversine_km(&g.coord(edge.source), &g.coord(edge.target));
                (length > 0.0 && !edge.closed).then(|| cost_model.edge_cost(edge) / length)
            })
            .min_by(|a, b| a.total_cmp(b));

        match factor {
            // Shaved slightly so rounding never lets an estimate exceed a path cost
            Some(factor) => {
                debug!("Calibrated heuristic: {} min/km", factor);
                Heuristic::new(factor * (1.0 - 1e-9))
            }
            None => Heuristic::zero(),
        }
    }

    /// A scale that is negative or not finite would produce negative or NaN
    /// keys, e.g. `for_max_speed(0.0)`.
    pub fn validate(&self) -> Result<(), RoutingError> {
        if !self.minutes_per_km.is_finite() || self.minutes_per_km < 0.0 {
            return Err(RoutingError::InvalidArgument(format!(
                "Heuristic scale must be a non-negative number, got {} min/km",
                self.minutes_per_km
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn estimate(&self, a: &Coordinate, b: &Coordinate) -> Weight {
        if self.minutes_per_km == 0.0 {
            return 0.0;
        }
        haversine_km(a, b) * self.minutes_per_km
    }

    #[inline]
    pub(crate) fn between(&self, g: &Graph, node: NodeIndex, goal: NodeIndex) -> Weight {
        self.estimate(&g.coord(node), &g.coord(goal))
    }
}

impl Default for Heuristic {
    fn default() -> Self {
        Heuristic::for_max_speed(RoadType::MAX_VELOCITY)
    }
}
