//! Re-exports of the most commonly used items in `route_core`.
pub use crate::cost_model::CostModel;
pub use crate::error::RoutingError;
pub use crate::heuristic::Heuristic;
pub use crate::road_type::RoadType;

pub use crate::search;
pub use crate::search::mode::{Policy, Selection};
pub use crate::search::{search, select_preferred, PathSearch, Router, SearchResult, Strategy};

pub use crate::graph::node_index;
pub use crate::graph::{Graph, NodeIndex};
