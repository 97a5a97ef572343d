use anyhow::Context;
use log::info;
use route_core::{
    graph::Graph,
    heuristic::Heuristic,
    search::Router,
    util::cli::{self, GraphSource, HeuristicScale},
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cfg = cli::parse()?;

    let g = match &cfg.source {
        GraphSource::Json(path) => Graph::from_json_file(path)?,
        GraphSource::Csv { nodes, edges } => Graph::from_csv(nodes, edges)?,
    };

    let heuristic = match cfg.heuristic {
        Some(HeuristicScale::MaxSpeed(kmh)) => Heuristic::for_max_speed(kmh),
        Some(HeuristicScale::Calibrated) => Heuristic::calibrate(&g, &cfg.cost_model),
        None => Heuristic::default(),
    };
    info!("Heuristic: {} min/km", heuristic.minutes_per_km);

    let start = g
        .node_index(&cfg.start)
        .context("Failed to resolve start node")?;
    let goal = g
        .node_index(&cfg.goal)
        .context("Failed to resolve goal node")?;

    let router = Router::new(&g)
        .cost_model(cfg.cost_model)
        .heuristic(heuristic);
    let selection = router.select_preferred(cfg.policy, start, goal)?;

    if cfg.json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
        return Ok(());
    }

    for (strategy, result) in &selection.results {
        let marker = if *strategy == selection.preferred { "*" } else { " " };
        println!("{} {:<34} {}", marker, strategy.name(), result);
    }

    let preferred = selection.preferred_result();
    match preferred.node_ids(&g) {
        Some(ids) => println!("Route ({}): {}", selection.preferred, ids.join(" -> ")),
        None => println!("No route from {} to {}", cfg.start, cfg.goal),
    }

    Ok(())
}
