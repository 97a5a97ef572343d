use std::path::PathBuf;

use clap::Parser;

use crate::{cost_model::CostModel, error::RoutingError, search::mode::Policy};

#[derive(Parser)]
#[command(author = "Daniel Holzner", version, about, long_about = None)]
struct Cli {
    /// Path to the graph document (.json), or to the node file of a csv graph
    graph_file: String,

    /// Id of the start node
    start: String,

    /// Id of the goal node
    goal: String,

    /// Edge file, reads the graph from csv if set
    #[arg(long, value_name = "path")]
    edges: Option<String>,

    /// "optimal", "speed" or one of "ucs", "greedy", "astar", "bidir"
    #[arg(short, long, default_value = "astar")]
    policy: String,

    /// Minutes added for every traversed edge
    #[arg(long, value_name = "minutes")]
    penalty: Option<f64>,

    /// Factor for edges without a known road type
    #[arg(long, value_name = "factor")]
    default_factor: Option<f64>,

    /// Fastest speed in km/h the heuristic assumes
    #[arg(long, value_name = "kmh")]
    max_speed: Option<f64>,

    /// Derive the heuristic scale from the graph's edges
    #[arg(short, long)]
    calibrate: bool,

    /// Print the selection as json
    #[arg(long)]
    json: bool,
}

/// Where the graph is read from.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphSource {
    Json(PathBuf),
    Csv { nodes: PathBuf, edges: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub enum HeuristicScale {
    MaxSpeed(f64),
    Calibrated,
}

#[derive(Debug, Clone)]
pub struct Cfg {
    pub source: GraphSource,
    pub start: String,
    pub goal: String,
    pub policy: Policy,
    pub cost_model: CostModel,
    pub heuristic: Option<HeuristicScale>,
    pub json: bool,
}

pub fn parse() -> Result<Cfg, RoutingError> {
    Cli::parse().try_into()
}

impl TryFrom<Cli> for Cfg {
    type Error = RoutingError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let source = match cli.edges {
            Some(edges) => GraphSource::Csv {
                nodes: PathBuf::from(cli.graph_file),
                edges: PathBuf::from(edges),
            },
            None => GraphSource::Json(PathBuf::from(cli.graph_file)),
        };

        let mut cost_model = CostModel::default();
        if let Some(penalty) = cli.penalty {
            cost_model = cost_model.intersection_penalty(penalty);
        }
        if let Some(factor) = cli.default_factor {
            cost_model = cost_model.default_factor(factor);
        }
        cost_model.validate()?;

        let heuristic = match (cli.calibrate, cli.max_speed) {
            (true, _) => Some(HeuristicScale::Calibrated),
            (false, Some(kmh)) if kmh.is_finite() && kmh > 0.0 => {
                Some(HeuristicScale::MaxSpeed(kmh))
            }
            (false, Some(kmh)) => {
                return Err(RoutingError::InvalidArgument(format!(
                    "Max speed must be a positive number of km/h, got {}",
                    kmh
                )))
            }
            (false, None) => None,
        };

        Ok(Cfg {
            source,
            start: cli.start,
            goal: cli.goal,
            policy: Policy::from_key(&cli.policy),
            cost_model,
            heuristic,
            json: cli.json,
        })
    }
}
