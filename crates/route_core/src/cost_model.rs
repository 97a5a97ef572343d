//! Turns the static attributes of an edge into the cost a search pays for it.
use serde::{Deserialize, Serialize};

use crate::{
    constants::Weight,
    error::RoutingError,
    graph::{Edge, Graph, NodeIndex},
    road_type::RoadType,
};

/// Travel cost of an edge:
/// `base_cost * road_type_factor + intersection_penalty + delay`.
/// Closed edges cost `Weight::INFINITY` and are never traversed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CostModelConfig")]
pub struct CostModel {
    /// Delay charged for every traversed edge, in minutes
    pub intersection_penalty: Weight,
    /// Factor for edges without a known road type
    pub default_factor: f64,
}

impl CostModel {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn intersection_penalty(mut self, penalty: Weight) -> Self {
        self.intersection_penalty = penalty;
        self
    }

    pub fn default_factor(mut self, factor: f64) -> Self {
        self.default_factor = factor;
        self
    }

    /// Rejects settings that could make an edge cheaper than its base cost
    /// or negative. Searches refuse to run with such a model.
    pub fn validate(&self) -> Result<(), RoutingError> {
        if !self.intersection_penalty.is_finite() || self.intersection_penalty < 0.0 {
            return Err(RoutingError::InvalidArgument(format!(
                "Intersection penalty must be a non-negative number, got {}",
                self.intersection_penalty
            )));
        }
        if !self.default_factor.is_finite() || self.default_factor < 1.0 {
            return Err(RoutingError::InvalidArgument(format!(
                "Default road type factor must be at least 1, got {}",
                self.default_factor
            )));
        }
        Ok(())
    }

    pub fn road_type_factor(&self, road_type: Option<RoadType>) -> f64 {
        match road_type {
            Some(RoadType::Motorway) | Some(RoadType::Trunk) => 1.0,
            Some(RoadType::MotorwayLink) | Some(RoadType::TrunkLink) => 1.05,
            Some(RoadType::Primary) | Some(RoadType::PrimaryLink) => 1.1,
            Some(RoadType::Secondary) | Some(RoadType::SecondaryLink) => 1.15,
            Some(RoadType::Tertiary) => 1.2,
            Some(RoadType::Unclassified) | Some(RoadType::Road) => 1.25,
            Some(RoadType::Residential) => 1.3,
            Some(RoadType::Unsurfaced) => 1.4,
            Some(RoadType::LivingStreet) | Some(RoadType::Service) => 1.5,
            None => self.default_factor,
        }
    }

    #[inline]
    pub fn edge_cost(&self, edge: &Edge) -> Weight {
        if edge.closed {
            return Weight::INFINITY;
        }
        edge.base_cost * self.road_type_factor(edge.road_type)
            + self.intersection_penalty
            + edge.delay
    }

    /// Sums the cost of the cheapest open edge between each consecutive pair
    /// of `path`. Returns `None` if two consecutive nodes are not connected.
    pub fn path_cost(&self, g: &Graph, path: &[NodeIndex]) -> Option<Weight> {
        path.windows(2).try_fold(0.0, |total, pair| {
            g.neighbors_outgoing(pair[0])
                .filter(|(target, _)| *target == pair[1])
                .map(|(_, edge)| self.edge_cost(edge))
                .filter(|cost| cost.is_finite())
                .min_by(|a, b| a.total_cmp(b))
                .map(|cost| total + cost)
        })
    }
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel {
            intersection_penalty: 0.1,
            default_factor: 1.2,
        }
    }
}

/// Unchecked form of a [`CostModel`] as it is read from a config document.
#[derive(Deserialize)]
#[serde(default)]
struct CostModelConfig {
    intersection_penalty: Weight,
    default_factor: f64,
}

impl Default for CostModelConfig {
    fn default() -> Self {
        let CostModel {
            intersection_penalty,
            default_factor,
        } = CostModel::default();
        CostModelConfig {
            intersection_penalty,
            default_factor,
        }
    }
}

impl TryFrom<CostModelConfig> for CostModel {
    type Error = RoutingError;

    fn try_from(config: CostModelConfig) -> Result<Self, Self::Error> {
        let model = CostModel::new()
            .intersection_penalty(config.intersection_penalty)
            .default_factor(config.default_factor);
        model.validate()?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::graph::{node_index, Node};

    #[test]
    fn factors_apply() {
        let model = CostModel::new().intersection_penalty(0.5);
        let edge = Edge::new(node_index(0), node_index(1), 10.0);

        assert_relative_eq!(model.edge_cost(&edge), 12.5, epsilon = 1e-9);
        assert_relative_eq!(
            model.edge_cost(&edge.clone().road_type(RoadType::Motorway)),
            10.5,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            model.edge_cost(&edge.road_type(RoadType::Residential)),
            13.5,
            epsilon = 1e-9
        );
    }

    #[test]
    fn default_factor_is_configurable() {
        let model = CostModel::new().default_factor(2.0).intersection_penalty(0.0);
        let edge = Edge::new(node_index(0), node_index(1), 3.0);

        assert_relative_eq!(model.edge_cost(&edge), 6.0);
    }

    #[test]
    fn deserialize_partial_config() {
        let model: CostModel = serde_json::from_str(r#"{"intersection_penalty": 0.25}"#).unwrap();

        assert_eq!(model, CostModel::new().intersection_penalty(0.25));
    }

    #[test]
    fn invalid_settings_are_rejected() {
        assert!(CostModel::default().validate().is_ok());
        assert!(CostModel::new().intersection_penalty(0.0).validate().is_ok());

        for model in [
            CostModel::new().intersection_penalty(-1.0),
            CostModel::new().intersection_penalty(Weight::NAN),
            CostModel::new().default_factor(0.5),
            CostModel::new().default_factor(Weight::INFINITY),
        ] {
            assert!(matches!(
                model.validate(),
                Err(RoutingError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn deserialize_rejects_invalid_config() {
        assert!(serde_json::from_str::<CostModel>(r#"{"intersection_penalty": -0.5}"#).is_err());
        assert!(serde_json::from_str::<CostModel>(r#"{"default_factor": 0.9}"#).is_err());
        assert_eq!(
            serde_json::from_str::<CostModel>("{}").unwrap(),
            CostModel::default()
        );
    }

    #[test]
    fn delay_and_closed_edges() {
        let model = CostModel::new().intersection_penalty(0.1);
        let edge = Edge::new(node_index(0), node_index(1), 2.0).road_type(RoadType::Motorway);

        assert_relative_eq!(
            model.edge_cost(&edge.clone().delay(0.75)),
            2.0 + 0.1 + 0.75,
            epsilon = 1e-9
        );
        assert_eq!(model.edge_cost(&edge.closed(true)), Weight::INFINITY);
    }

    #[test]
    fn path_cost_uses_cheapest_parallel_edge() {
        let mut g = Graph::new();
        let a = g.add_node(Node::new("a", 0.0, 0.0));
        let b = g.add_node(Node::new("b", 0.0, 0.0));
        let c = g.add_node(Node::new("c", 0.0, 0.0));
        g.add_edge(Edge::new(a, b, 4.0).road_type(RoadType::Motorway));
        g.add_edge(Edge::new(a, b, 1.0).road_type(RoadType::Service));
        g.add_edge(Edge::new(b, c, 2.0).road_type(RoadType::Motorway));
        g.add_edge(Edge::new(b, c, 0.0).closed(true));

        let model = CostModel::new();
        assert_relative_eq!(
            model.path_cost(&g, &[a, b, c]).unwrap(),
            (1.5 + 0.1) + (2.0 + 0.1)
        );
        assert_eq!(model.path_cost(&g, &[a, c]), None);
        assert_eq!(model.path_cost(&g, &[a]), Some(0.0));
    }

    fn road_types() -> impl Strategy<Value = Option<RoadType>> {
        prop_oneof![
            Just(None),
            Just(Some(RoadType::Motorway)),
            Just(Some(RoadType::TrunkLink)),
            Just(Some(RoadType::Primary)),
            Just(Some(RoadType::Secondary)),
            Just(Some(RoadType::Tertiary)),
            Just(Some(RoadType::Road)),
            Just(Some(RoadType::Residential)),
            Just(Some(RoadType::Unsurfaced)),
            Just(Some(RoadType::LivingStreet)),
        ]
    }

    proptest! {
        #[test]
        fn cost_is_at_least_the_penalty(
            base in 0.0f64..1.0e4,
            penalty in 0.0f64..10.0,
            road_type in road_types(),
        ) {
            let model = CostModel::new().intersection_penalty(penalty);
            let mut edge = Edge::new(node_index(0), node_index(1), base);
            edge.road_type = road_type;

            prop_assert!(model.road_type_factor(road_type) >= 1.0);
            prop_assert!(model.edge_cost(&edge) >= penalty);
        }
    }
}
