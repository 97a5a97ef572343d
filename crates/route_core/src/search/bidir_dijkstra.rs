//! Implementation of the bidirectional uniform cost search.
//!
//! A forward search from the source and a backward search from the target over
//! the reverse adjacency index run side by side. Whenever one side closes a
//! node it checks whether the node, or the far end of one of its edges, is
//! already closed by the other side and records the cheapest such meeting.
//! The search only stops once the sum of both queue minimums reaches the best
//! meeting cost; no undiscovered route can be cheaper than that.
use log::{debug, info};

use crate::{
    constants::Weight,
    cost_model::CostModel,
    error::RoutingError,
    graph::{Direction, Graph, NodeIndex},
    statistics::SearchStats,
};

use super::{
    check_nodes,
    frontier::{Candidate, Frontier, LabelId, Revisit},
    PathSearch, SearchResult,
};

/// Labels of the cheapest route found so far on both sides. Both labels point
/// to the same node, or to the two ends of an edge. A route found by one side
/// alone only carries that side's label.
#[derive(Debug, Clone, Copy)]
struct Meeting {
    fwd: Option<LabelId>,
    bwd: Option<LabelId>,
}

pub struct BidirDijkstra<'a> {
    pub stats: SearchStats,
    pub best_weight: Weight,
    pub meeting_node: Option<NodeIndex>,
    g: &'a Graph,
    cost_model: CostModel,
}

impl<'a> BidirDijkstra<'a> {
    pub fn new(g: &'a Graph, cost_model: CostModel) -> Self {
        BidirDijkstra {
            stats: SearchStats::default(),
            best_weight: Weight::INFINITY,
            meeting_node: None,
            g,
            cost_model,
        }
    }

    fn init(&mut self) {
        self.best_weight = Weight::INFINITY;
        self.meeting_node = None;
        self.stats.init();
    }

    pub fn search(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
    ) -> Result<SearchResult, RoutingError> {
        check_nodes(self.g, source, target)?;
        self.cost_model.validate()?;
        self.init();

        info!(
            "BEGIN bidir. UCS SEARCH from {} to {}",
            source, target
        );

        if source == target {
            self.stats.nodes_settled += 1;
            self.stats.finish();
            self.best_weight = 0.0;
            self.meeting_node = Some(source);
            return Ok(SearchResult::found(vec![source], 0.0, 1));
        }

        let mut fwd = Frontier::new(Revisit::Lazy);
        let mut bwd = Frontier::new(Revisit::Lazy);
        fwd.push(Candidate::root(0.0, source));
        bwd.push(Candidate::root(0.0, target));

        let mut meeting: Option<Meeting> = None;

        loop {
            let (min_fwd, min_bwd) = match (fwd.min_key(), bwd.min_key()) {
                (Some(min_fwd), Some(min_bwd)) => (min_fwd, min_bwd),
                // One side has closed everything it can reach, so its cost
                // to the far end is exact. With zero cost edges that route
                // need not have been seen as a meeting yet.
                (None, _) => {
                    if let Some(route) = fwd.settled(target).map(|s| (s.cost, s.label)) {
                        self.finish_on_one_side(Direction::Forward, route, target, &mut meeting);
                    }
                    break;
                }
                (_, None) => {
                    if let Some(route) = bwd.settled(source).map(|s| (s.cost, s.label)) {
                        self.finish_on_one_side(Direction::Backward, route, source, &mut meeting);
                    }
                    break;
                }
            };

            if min_fwd + min_bwd >= self.best_weight {
                debug!(
                    "Stopping: {} + {} >= {}",
                    min_fwd, min_bwd, self.best_weight
                );
                break;
            }

            if min_fwd <= min_bwd {
                self.expand(Direction::Forward, &mut fwd, &bwd, &mut meeting);
            } else {
                self.expand(Direction::Backward, &mut bwd, &fwd, &mut meeting);
            }
        }

        self.stats.finish();

        match meeting {
            Some(meeting) => {
                let path = reconstruct_path(&fwd, &bwd, meeting);
                debug!("Path found: {:?}", path);
                info!("{}, cost: {}", self.stats, self.best_weight);
                Ok(SearchResult::found(
                    path,
                    self.best_weight,
                    self.stats.nodes_settled,
                ))
            }
            None => {
                info!(
                    "No path found: {:?}/{} nodes settled",
                    self.stats.duration, self.stats.nodes_settled
                );
                Ok(SearchResult::unreachable(self.stats.nodes_settled))
            }
        }
    }

    /// Closes the next node of `this` side and relaxes its edges.
    fn expand(
        &mut self,
        direction: Direction,
        this: &mut Frontier,
        other: &Frontier,
        meeting: &mut Option<Meeting>,
    ) {
        let Some(settled) = this.settle_next() else {
            return;
        };
        self.stats.nodes_settled += 1;

        if let Some(opposite) = other.settled(settled.node) {
            self.improve(
                direction,
                settled.cost + opposite.cost,
                (settled.label, opposite.label),
                opposite.node,
                meeting,
            );
        }

        let g = self.g;
        for (neighbor, edge) in g.neighbors(settled.node, direction) {
            let cost = settled.cost + self.cost_model.edge_cost(edge);

            if neighbor != settled.node {
                if let Some(opposite) = other.settled(neighbor) {
                    self.improve(
                        direction,
                        cost + opposite.cost,
                        (settled.label, opposite.label),
                        opposite.node,
                        meeting,
                    );
                }
            }

            this.push(Candidate::new(cost, cost, neighbor, Some(settled.label)));
        }
    }

    fn improve(
        &mut self,
        direction: Direction,
        weight: Weight,
        (this_label, other_label): (LabelId, LabelId),
        node: NodeIndex,
        meeting: &mut Option<Meeting>,
    ) {
        if weight >= self.best_weight {
            return;
        }

        debug!("{:?}: new best_weight: {} at {}", direction, weight, node);
        self.best_weight = weight;
        self.meeting_node = Some(node);
        *meeting = Some(match direction {
            Direction::Forward => Meeting {
                fwd: Some(this_label),
                bwd: Some(other_label),
            },
            Direction::Backward => Meeting {
                fwd: Some(other_label),
                bwd: Some(this_label),
            },
        });
    }

    /// Takes the route one side found to the other side's root, if it beats
    /// the best meeting.
    fn finish_on_one_side(
        &mut self,
        direction: Direction,
        (weight, label): (Weight, LabelId),
        node: NodeIndex,
        meeting: &mut Option<Meeting>,
    ) {
        if weight >= self.best_weight {
            return;
        }

        debug!("{:?} side exhausted, best_weight: {}", direction, weight);
        self.best_weight = weight;
        self.meeting_node = Some(node);
        *meeting = Some(match direction {
            Direction::Forward => Meeting {
                fwd: Some(label),
                bwd: None,
            },
            Direction::Backward => Meeting {
                fwd: None,
                bwd: Some(label),
            },
        });
    }
}

/// Source to meeting point on the forward side, then meeting point to target on
/// the backward side. A node shared by both halves is only kept once.
fn reconstruct_path(fwd: &Frontier, bwd: &Frontier, meeting: Meeting) -> Vec<NodeIndex> {
    let mut path = meeting.fwd.map(|label| fwd.path_to(label)).unwrap_or_default();
    let path_bwd = meeting.bwd.map(|label| bwd.trace(label)).unwrap_or_default();

    let skip = usize::from(path.last() == path_bwd.first());
    path.extend(path_bwd.into_iter().skip(skip));
    path
}

impl PathSearch for BidirDijkstra<'_> {
    fn search(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
    ) -> Result<SearchResult, RoutingError> {
        BidirDijkstra::search(self, source, target)
    }

    fn stats(&self) -> &SearchStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        graph::{node_index, Edge, Node},
        search::{assert_no_path, assert_path, ucs::UniformCost},
        util::test_graphs::{
            generate_complex_graph, generate_diamond_graph, unit_cost_model,
        },
    };

    use super::*;

    #[test]
    fn simple_path() {
        //      7 -> 8 -> 9
        //      |         |
        // 0 -> 5 -> 6 -  |
        // |         |  \ |
        // 1 -> 2 -> 3 -> 4
        let mut g = Graph::new();

        for i in 0..10 {
            g.add_node(Node::new(i.to_string(), 0.0, 0.0));
        }

        g.add_edge(Edge::new(node_index(0), node_index(1), 1.0));
        g.add_edge(Edge::new(node_index(1), node_index(2), 1.0));
        g.add_edge(Edge::new(node_index(2), node_index(3), 1.0));
        g.add_edge(Edge::new(node_index(3), node_index(4), 20.0));
        g.add_edge(Edge::new(node_index(0), node_index(5), 5.0));
        g.add_edge(Edge::new(node_index(5), node_index(6), 1.0));
        g.add_edge(Edge::new(node_index(6), node_index(4), 20.0));
        g.add_edge(Edge::new(node_index(6), node_index(3), 20.0));
        g.add_edge(Edge::new(node_index(5), node_index(7), 5.0));
        g.add_edge(Edge::new(node_index(7), node_index(8), 1.0));
        g.add_edge(Edge::new(node_index(8), node_index(9), 1.0));
        g.add_edge(Edge::new(node_index(9), node_index(4), 1.0));

        let mut d = BidirDijkstra::new(&g, unit_cost_model());

        assert_no_path(d.search(node_index(4), node_index(0))); // Cannot be reached
        assert_path(vec![0, 5, 7, 8, 9, 4], 13.0, d.search(0.into(), 4.into()));
        assert_path(vec![6, 3], 20.0, d.search(6.into(), 3.into()));
        assert_path(vec![4], 0.0, d.search(4.into(), 4.into()));
        assert_path(vec![1, 2, 3, 4], 22.0, d.search(1.into(), 4.into()));
    }

    #[test]
    fn disconnected_graph() {
        // 0 -> 1 -> 2
        // 3 -> 4 -> 5
        let mut g = Graph::new();
        for i in 0..6 {
            g.add_node(Node::new(i.to_string(), 0.0, 0.0));
        }

        g.add_edge(Edge::new(node_index(0), node_index(1), 1.0));
        g.add_edge(Edge::new(node_index(1), node_index(2), 1.0));
        g.add_edge(Edge::new(node_index(3), node_index(4), 3.0));
        g.add_edge(Edge::new(node_index(4), node_index(5), 1.0));

        let mut d = BidirDijkstra::new(&g, unit_cost_model());

        assert_no_path(d.search(0.into(), 3.into()));
        assert_no_path(d.search(3.into(), 0.into()));
        assert_path(vec![0, 1, 2], 2.0, d.search(0.into(), 2.into()));
        assert_path(vec![3, 4, 5], 4.0, d.search(3.into(), 5.into()));

        // Stops as soon as the forward side {0, 1, 2} is exhausted
        let result = d.search(0.into(), 5.into()).unwrap();
        assert_eq!(result.path, None);
        assert_eq!(result.cost, Weight::INFINITY);
        assert_eq!(result.expanded, 5);
    }

    #[test]
    fn go_around() {
        // 0 -> 1
        // |    |
        // 2 -> 3
        let mut g = Graph::new();
        let a = g.add_node(Node::new("0", 0.0, 0.0));
        let b = g.add_node(Node::new("1", 0.0, 0.0));
        let c = g.add_node(Node::new("2", 0.0, 0.0));
        let d = g.add_node(Node::new("3", 0.0, 0.0));

        g.add_edge(Edge::new(a, b, 10.0));
        g.add_edge(Edge::new(a, c, 1.0));
        g.add_edge(Edge::new(c, d, 1.0));
        g.add_edge(Edge::new(d, b, 1.0));

        let mut d = BidirDijkstra::new(&g, unit_cost_model());

        assert_path(vec![0, 2, 3, 1], 3.0, d.search(a, b));
    }

    #[test]
    fn first_meeting_is_not_final() {
        // s -> m -> t costs 6.5 and m is the first node both sides reach,
        // s -> a -> b -> t costs 6.0 and is only seen across the edge a -> b
        let mut g = Graph::new();
        let s = g.add_node(Node::new("s", 0.0, 0.0));
        let m = g.add_node(Node::new("m", 0.0, 0.0));
        let a = g.add_node(Node::new("a", 0.0, 0.0));
        let b = g.add_node(Node::new("b", 0.0, 0.0));
        let t = g.add_node(Node::new("t", 0.0, 0.0));

        g.add_edge(Edge::new(s, m, 3.25));
        g.add_edge(Edge::new(m, t, 3.25));
        g.add_edge(Edge::new(s, a, 2.5));
        g.add_edge(Edge::new(a, b, 1.0));
        g.add_edge(Edge::new(b, t, 2.5));

        let mut d = BidirDijkstra::new(&g, unit_cost_model());
        let result = d.search(s, t).unwrap();

        assert_eq!(result.path, Some(vec![s, a, b, t]));
        assert_eq!(result.cost, 6.0);
        assert_eq!(d.best_weight, 6.0);
        assert_ne!(d.meeting_node, Some(m));
        // s, t, a, b
        assert_eq!(result.expanded, 4);
    }

    #[test]
    fn zero_cost_edges() {
        // s -> t is free, the forward side reaches t before the backward
        // side closes anything
        let mut g = Graph::new();
        let s = g.add_node(Node::new("s", 0.0, 0.0));
        let t = g.add_node(Node::new("t", 0.0, 0.0));
        g.add_edge(Edge::new(s, t, 0.0));

        let mut d = BidirDijkstra::new(&g, unit_cost_model());
        let result = d.search(s, t).unwrap();

        assert_eq!(result.path, Some(vec![s, t]));
        assert_eq!(result.cost, 0.0);
        assert_eq!(result.expanded, 2);
        assert_eq!(d.meeting_node, Some(t));

        // 0 -> 1 -> 2 -> 3, all free
        let mut g = Graph::new();
        for i in 0..4 {
            g.add_node(Node::new(i.to_string(), 0.0, 0.0));
        }
        for i in 0..3 {
            g.add_edge(Edge::new(node_index(i), node_index(i + 1), 0.0));
        }

        let mut d = BidirDijkstra::new(&g, unit_cost_model());
        assert_path(vec![0, 1, 2, 3], 0.0, d.search(0.into(), 3.into()));
        assert_path(vec![1, 2], 0.0, d.search(1.into(), 2.into()));
        assert_no_path(d.search(3.into(), 0.into()));
    }

    #[test]
    fn closed_edges_are_not_used() {
        // s -> t is closed, s -> a -> t is open
        let mut g = Graph::new();
        let s = g.add_node(Node::new("s", 0.0, 0.0));
        let a = g.add_node(Node::new("a", 0.0, 0.0));
        let t = g.add_node(Node::new("t", 0.0, 0.0));
        g.add_edge(Edge::new(s, t, 1.0).closed(true));
        g.add_edge(Edge::new(s, a, 2.0));
        g.add_edge(Edge::new(a, t, 2.0));

        let mut d = BidirDijkstra::new(&g, unit_cost_model());
        assert_path(vec![0, 1, 2], 4.0, d.search(s, t));
        assert_no_path(d.search(t, s));
    }

    #[test]
    fn negative_penalty_is_rejected() {
        let g = generate_diamond_graph();
        let mut d = BidirDijkstra::new(&g, CostModel::new().intersection_penalty(-1.0));

        assert!(matches!(
            d.search(0.into(), 3.into()),
            Err(RoutingError::InvalidArgument(_))
        ));
    }

    #[test]
    fn diamond_prefers_residential_shortcut() {
        let g = generate_diamond_graph();
        let mut d = BidirDijkstra::new(&g, CostModel::new().intersection_penalty(0.1));

        assert_path(vec![0, 2, 3], 2.0 * 1.3 + 0.2, d.search(0.into(), 3.into()));
    }

    #[test]
    fn agrees_with_ucs_on_all_pairs() {
        let g = generate_complex_graph();
        let cost_model = CostModel::default();
        let mut ucs = UniformCost::new(&g, cost_model);
        let mut bidir = BidirDijkstra::new(&g, cost_model);

        for s in 0..g.num_nodes() {
            for t in 0..g.num_nodes() {
                let (s, t) = (node_index(s), node_index(t));
                let expected = ucs.search(s, t).unwrap();
                let result = bidir.search(s, t).unwrap();
                assert!(result.expanded <= g.num_nodes());

                let Some(path) = result.path else {
                    assert_eq!(expected.path, None, "{} -> {}", s, t);
                    continue;
                };
                assert!(
                    (expected.cost - result.cost).abs() < 1e-9,
                    "{} -> {}: {} != {}",
                    s,
                    t,
                    expected.cost,
                    result.cost
                );
                assert_eq!(path.first(), Some(&s));
                assert_eq!(path.last(), Some(&t));
            }
        }
    }
}
