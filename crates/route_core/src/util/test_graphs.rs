use crate::{
    cost_model::CostModel,
    edge,
    graph::{Edge, Graph, Node},
    node,
    road_type::RoadType,
    util::math::haversine_km,
};

/// Cost model under which an edge costs exactly its base cost.
pub fn unit_cost_model() -> CostModel {
    CostModel::new().intersection_penalty(0.0).default_factor(1.0)
}

pub fn generate_complex_graph() -> Graph {
    let mut graph = Graph::new();

    let a = graph.add_node(node!("0", 6.0, 2.0));
    let b = graph.add_node(node!("1", 3.0, 3.0));
    let c = graph.add_node(node!("2", 4.0, 6.0));
    let d = graph.add_node(node!("3", 2.0, 7.0));
    let e = graph.add_node(node!("4", 3.0, 10.0));
    let f = graph.add_node(node!("5", 2.0, 13.0));
    let g = graph.add_node(node!("6", 7.0, 15.0));
    let h = graph.add_node(node!("7", 5.0, 12.0));
    let i = graph.add_node(node!("8", 7.0, 11.0));
    let j = graph.add_node(node!("9", 5.0, 9.0));
    let k = graph.add_node(node!("10", 7.0, 7.0));

    graph.add_edges(edge!(a, b, 3.0)); // A <=> B
    graph.add_edges(edge!(a, c, 5.0)); // A <=> C
    graph.add_edges(edge!(a, k, 3.0)); // A <=> K

    graph.add_edges(edge!(b, d, 5.0)); // B <=> D
    graph.add_edges(edge!(b, c, 3.0)); // B <=> C

    graph.add_edges(edge!(c, d, 2.0)); // C <=> D
    graph.add_edges(edge!(c, j, 2.0)); // C <=> J

    graph.add_edges(edge!(d, j, 4.0)); // D <=> J
    graph.add_edge(edge!(d => e, 7.0, RoadType::Motorway)); // D => E

    graph.add_edges(edge!(e, j, 3.0)); // E <=> J
    graph.add_edge(edge!(e => f, 6.0, RoadType::Service)); // E => F

    graph.add_edges(edge!(f, h, 2.0)); // F <=> H
    graph.add_edges(edge!(f, g, 4.0)); // F <=> G

    graph.add_edge(edge!(g => h, 3.0, RoadType::Residential)); // G => H
    graph.add_edges(edge!(g, i, 5.0)); // G <=> I

    graph.add_edges(edge!(h, i, 3.0)); // H <=> I
    graph.add_edge(edge!(h => j, 2.0, RoadType::Primary)); // H => J

    graph.add_edges(edge!(i, j, 4.0)); // I <=> J
    graph.add_edges(edge!(i, k, 6.0)); // I <=> K

    graph.add_edges(edge!(j, k, 3.0)); // J <=> K

    graph
}

pub fn generate_simple_graph() -> Graph {
    //           B
    //           |
    // E -> A -> C
    //      |  /
    //      D
    let mut g = Graph::new();

    let a = g.add_node(node!("A", 0.0, 0.0));
    let b = g.add_node(node!("B", 0.0, 0.0));
    let c = g.add_node(node!("C", 0.0, 0.0));
    let d = g.add_node(node!("D", 0.0, 0.0));
    let e = g.add_node(node!("E", 0.0, 0.0));

    g.add_edge(edge!(a => c, 1.0));
    g.add_edge(edge!(a => d, 1.0));
    g.add_edge(edge!(e => a, 1.0));
    g.add_edges(edge!(c, b, 1.0));
    g.add_edges(edge!(c, d, 1.0));

    g
}

/// Two routes from A to D. Through B over motorways with base cost 5.0 per
/// edge, through C over residential streets with base cost 1.0 per edge.
pub fn generate_diamond_graph() -> Graph {
    //      B
    //    /   \
    //  A       D
    //    \   /
    //      C
    let mut g = Graph::new();

    let a = g.add_node(node!("A", 48.0, 11.0));
    let b = g.add_node(node!("B", 48.01, 11.005));
    let c = g.add_node(node!("C", 47.995, 11.005));
    let d = g.add_node(node!("D", 48.0, 11.01));

    g.add_edge(edge!(a => b, 5.0, RoadType::Motorway));
    g.add_edge(edge!(b => d, 5.0, RoadType::Motorway));
    g.add_edge(edge!(a => c, 1.0, RoadType::Residential));
    g.add_edge(edge!(c => d, 1.0, RoadType::Residential));

    g
}

/// `cols` x `rows` street grid with node ids "x-y". Neighbours are connected
/// in both directions and base costs are travel times at the road type's
/// velocity, like the graph builder computes them.
pub fn generate_grid_graph(cols: usize, rows: usize) -> Graph {
    let mut g = Graph::with_capacity(cols * rows, 4 * cols * rows);

    for y in 0..rows {
        for x in 0..cols {
            g.add_node(Node::new(
                format!("{}-{}", x, y),
                48.0 + y as f64 * 0.005,
                11.0 + x as f64 * 0.0075,
            ));
        }
    }

    let index = |x: usize, y: usize| crate::graph::node_index(y * cols + x);

    let connect = |g: &mut Graph, from: (usize, usize), to: (usize, usize), road: RoadType| {
        let (a, b) = (index(from.0, from.1), index(to.0, to.1));
        let km = haversine_km(&g.nodes[a.index()].coord, &g.nodes[b.index()].coord);
        let minutes = km / road.velocity() * 60.0;

        g.add_edge(Edge::new(a, b, minutes).road_type(road));
        g.add_edge(Edge::new(b, a, minutes).road_type(road));
    };

    for y in 0..rows {
        for x in 0..cols {
            if x + 1 < cols {
                let road = match y % 4 {
                    0 => RoadType::Primary,
                    2 => RoadType::Tertiary,
                    _ => RoadType::Residential,
                };
                connect(&mut g, (x, y), (x + 1, y), road);
            }
            if y + 1 < rows {
                let road = if x % 3 == 0 {
                    RoadType::Secondary
                } else {
                    RoadType::LivingStreet
                };
                connect(&mut g, (x, y), (x, y + 1), road);
            }
        }
    }

    g
}
