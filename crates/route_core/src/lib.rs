//! Crate to route on road networks with interchangeable search strategies.
//!
//! # Basic usage
//! ```no_run
//! use std::path::Path;
//!
//! use route_core::prelude::*;
//!
//! // Graph document written by the graph builder
//! let g = Graph::from_json_file(Path::new("path/to/graph.json")).expect("Failed to read graph");
//!
//! let start = g.node_index("start").expect("Unknown start node");
//! let goal = g.node_index("goal").expect("Unknown goal node");
//!
//! // Run one strategy
//! let result = search(Strategy::AStar, &g, start, goal).unwrap();
//! println!("Costs: {}", result.cost);
//!
//! // Or run all of them and let a policy pick one
//! let router = Router::new(&g).heuristic(Heuristic::calibrate(&g, &CostModel::default()));
//! let selection = router.select_preferred(Policy::Optimal, start, goal).unwrap();
//! println!("{}: {}", selection.preferred, selection.preferred_result());
//!```
//! [`Graph`]: crate::graph::Graph
pub mod constants;
pub mod cost_model;
pub mod error;
pub mod graph;
pub mod heuristic;
pub mod prelude;
pub mod road_type;
pub mod search;
pub mod statistics;
pub mod util;
