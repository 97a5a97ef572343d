use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use route_core::{
    cost_model::CostModel,
    graph::{node_index, Edge, Graph, Node},
    heuristic::Heuristic,
    search::{mode::Policy, Router, Strategy},
    util::test_graphs::generate_grid_graph,
};

criterion_group!(benches, criterion_benchmark, mode_selection);
criterion_main!(benches);

fn gen_rand_graph(number_nodes: usize) -> Graph {
    let mut rng = rand::thread_rng();

    // 2.5 edges per node on average
    let number_edges: usize = (number_nodes as f32 * 2.5) as usize;

    let mut g = Graph::with_capacity(number_nodes, number_edges);

    for i in 0..number_nodes {
        g.add_node(Node::new(
            i.to_string(),
            rng.gen_range(48.0..48.5),
            rng.gen_range(11.0..11.5),
        ));
    }

    for _ in 0..number_edges {
        let source = rng.gen_range(0..number_nodes);
        let target = rng.gen_range(0..number_nodes);
        let weight = rng.gen_range(1..100) as f64;
        g.add_edge(Edge::new(node_index(source), node_index(target), weight));
    }

    g
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut graphs: Vec<Graph> = [30, 100, 200]
        .iter()
        .map(|size| generate_grid_graph(*size, *size))
        .collect();
    graphs.push(gen_rand_graph(50_000));

    let mut group = c.benchmark_group("strategies");
    let mut rng = rand::thread_rng();
    for graph in graphs {
        let cost_model = CostModel::default();
        let router = Router::new(&graph)
            .cost_model(cost_model)
            .heuristic(Heuristic::calibrate(&graph, &cost_model));

        for strategy in Strategy::ALL {
            group.bench_with_input(
                BenchmarkId::new(strategy.name(), graph.num_nodes()),
                &router,
                |b, router| {
                    let src = node_index(rng.gen_range(0..graph.num_nodes()));
                    let dst = node_index(rng.gen_range(0..graph.num_nodes()));
                    let mut searcher = router.searcher(strategy);
                    b.iter(|| searcher.search(black_box(src), black_box(dst)));
                },
            );
        }
    }
    group.finish();
}

fn mode_selection(c: &mut Criterion) {
    let g = generate_grid_graph(100, 100);
    let router = Router::new(&g);
    let src = g.node_index("0-0").unwrap();
    let dst = g.node_index("99-60").unwrap();

    c.bench_function("select_preferred optimal", |b| {
        b.iter(|| router.select_preferred(Policy::Optimal, black_box(src), black_box(dst)))
    });
}
