//! Work queue shared by every search strategy.
//!
//! A [`Frontier`] owns the priority queue, the closed set and an append-only
//! arena of settled labels. Keys are never decreased in place: improved
//! entries are pushed again and superseded ones are dropped when they reach
//! the top of the queue.
use std::{cmp::Ordering, collections::BinaryHeap};

use rustc_hash::FxHashMap;

use crate::{constants::Weight, graph::NodeIndex};

/// Position of a settled label in the arena of a [`Frontier`].
pub(crate) type LabelId = usize;

/// How entries for nodes that are already closed are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revisit {
    /// Drop an entry only if its node was closed at a cost no higher than the
    /// entry's. Closed nodes may be reopened at a lower cost.
    Lazy,
    /// Drop every entry of a closed node.
    Eager,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    pub(crate) key: Weight,
    pub(crate) cost: Weight,
    pub(crate) node: NodeIndex,
    pub(crate) parent: Option<LabelId>,
}

impl Candidate {
    pub(crate) fn new(key: Weight, cost: Weight, node: NodeIndex, parent: Option<LabelId>) -> Self {
        Self {
            key,
            cost,
            node,
            parent,
        }
    }

    pub(crate) fn root(key: Weight, node: NodeIndex) -> Self {
        Self::new(key, 0.0, node, None)
    }
}

// Reversed so the smallest key is at the top of the max-heap. Ties go to the
// cheaper entry, then to the lower node index, which keeps runs deterministic.
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| other.cost.total_cmp(&self.cost))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// A node closed by a search together with the cost it was closed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Settled {
    pub(crate) node: NodeIndex,
    pub(crate) cost: Weight,
    pub(crate) label: LabelId,
}

#[derive(Debug)]
struct Label {
    node: NodeIndex,
    parent: Option<LabelId>,
}

pub(crate) struct Frontier {
    queue: BinaryHeap<Candidate>,
    closed: FxHashMap<NodeIndex, Settled>,
    // Best cost pushed so far per node, only tracked for lazy revisits
    tentative: FxHashMap<NodeIndex, Weight>,
    labels: Vec<Label>,
    revisit: Revisit,
}

impl Frontier {
    pub(crate) fn new(revisit: Revisit) -> Self {
        Frontier {
            queue: BinaryHeap::new(),
            closed: FxHashMap::default(),
            tentative: FxHashMap::default(),
            labels: Vec::new(),
            revisit,
        }
    }

    /// Queues `candidate` unless it could never be settled. Entries behind a
    /// closed edge have an infinite cost and are dropped here.
    pub(crate) fn push(&mut self, candidate: Candidate) {
        if !candidate.cost.is_finite() || self.is_stale(candidate.node, candidate.cost) {
            return;
        }

        if self.revisit == Revisit::Lazy {
            match self.tentative.get(&candidate.node) {
                Some(&best) if best <= candidate.cost => return,
                _ => {
                    self.tentative.insert(candidate.node, candidate.cost);
                }
            }
        }

        self.queue.push(candidate);
    }

    /// Smallest key in the queue. May belong to a stale entry, so it is a
    /// lower bound on the key of the next node to be settled.
    pub(crate) fn min_key(&self) -> Option<Weight> {
        self.queue.peek().map(|candidate| candidate.key)
    }

    fn is_stale(&self, node: NodeIndex, cost: Weight) -> bool {
        match (self.revisit, self.closed.get(&node)) {
            (_, None) => false,
            (Revisit::Lazy, Some(settled)) => settled.cost <= cost,
            (Revisit::Eager, Some(_)) => true,
        }
    }

    /// Pops entries until one is not stale and closes its node.
    pub(crate) fn settle_next(&mut self) -> Option<Settled> {
        while let Some(candidate) = self.queue.pop() {
            if self.is_stale(candidate.node, candidate.cost) {
                continue;
            }

            let label = self.labels.len();
            self.labels.push(Label {
                node: candidate.node,
                parent: candidate.parent,
            });

            let settled = Settled {
                node: candidate.node,
                cost: candidate.cost,
                label,
            };
            self.closed.insert(candidate.node, settled);

            return Some(settled);
        }
        None
    }

    pub(crate) fn settled(&self, node: NodeIndex) -> Option<&Settled> {
        self.closed.get(&node)
    }

    /// Nodes from `label` back to the root of the search.
    pub(crate) fn trace(&self, label: LabelId) -> Vec<NodeIndex> {
        let mut path = Vec::new();
        let mut next = Some(label);

        while let Some(label) = next {
            let Label { node, parent } = self.labels[label];
            path.push(node);
            next = parent;
        }

        path
    }

    /// Nodes from the root of the search to `label`.
    pub(crate) fn path_to(&self, label: LabelId) -> Vec<NodeIndex> {
        let mut path = self.trace(label);
        path.reverse();
        path
    }
}
