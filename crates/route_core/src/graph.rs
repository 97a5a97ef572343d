use std::{collections::BTreeMap, fmt, fs::File, io::BufReader, io::Read, path::Path};

use anyhow::Context;
use log::{debug, info};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{constants::Weight, error::RoutingError, road_type::RoadType};

/// Node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct NodeIndex(u32);

impl NodeIndex {
    #[inline]
    pub fn new(x: usize) -> Self {
        NodeIndex(x as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn end() -> Self {
        NodeIndex(u32::MAX)
    }
}

impl From<u32> for NodeIndex {
    fn from(ix: u32) -> Self {
        NodeIndex(ix)
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Short version of `NodeIndex::new`
pub fn node_index(index: usize) -> NodeIndex {
    NodeIndex::new(index)
}

/// Edge identifier.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, PartialOrd, Eq, Ord, Hash, Deserialize, Serialize,
)]
pub struct EdgeIndex(u32);

impl EdgeIndex {
    #[inline]
    pub fn new(x: usize) -> Self {
        EdgeIndex(x as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn end() -> Self {
        EdgeIndex(u32::MAX)
    }
}

/// WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Coordinate { lat, lng }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Node {
    /// Stable identifier assigned by the graph builder
    pub id: String,
    pub coord: Coordinate,
}

impl Node {
    pub fn new(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Node {
            id: id.into(),
            coord: Coordinate::new(lat, lng),
        }
    }
}

/// Identifier of the map feature an edge was cut from. The graph builder
/// passes through whatever the source data carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FeatureId {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Edge {
    pub source: NodeIndex,
    pub target: NodeIndex,
    /// Precomputed travel time in minutes
    pub base_cost: Weight,
    pub road_type: Option<RoadType>,
    pub name: Option<String>,
    pub source_feature_id: Option<FeatureId>,
    /// Fixed delay in minutes, e.g. waiting at a traffic light
    #[serde(default)]
    pub delay: Weight,
    /// Closed edges can not be traversed at any cost
    #[serde(default)]
    pub closed: bool,
}

impl Edge {
    pub fn new(source: NodeIndex, target: NodeIndex, base_cost: Weight) -> Self {
        Edge {
            source,
            target,
            base_cost,
            road_type: None,
            name: None,
            source_feature_id: None,
            delay: 0.0,
            closed: false,
        }
    }

    pub fn road_type(mut self, road_type: RoadType) -> Self {
        self.road_type = Some(road_type);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn source_feature_id(mut self, id: FeatureId) -> Self {
        self.source_feature_id = Some(id);
        self
    }

    pub fn delay(mut self, delay: Weight) -> Self {
        self.delay = delay;
        self
    }

    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }
}

/// Side of a search. Backward traversals walk edges against their direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Immutable road network. Built once, then shared by any number of queries.
///
/// `edges_in` is the reverse adjacency index used by backward searches. It is
/// maintained together with `edges_out` so it never has to be derived at query
/// time.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub edges_in: Vec<Vec<EdgeIndex>>,
    pub edges_out: Vec<Vec<EdgeIndex>>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    node_ids: FxHashMap<String, NodeIndex>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(num_nodes: usize, num_edges: usize) -> Self {
        Self {
            edges_in: Vec::with_capacity(num_nodes),
            edges_out: Vec::with_capacity(num_nodes),
            nodes: Vec::with_capacity(num_nodes),
            edges: Vec::with_capacity(num_edges),
            node_ids: FxHashMap::with_capacity_and_hasher(num_nodes, Default::default()),
        }
    }

    /// Adds a new node to the graph
    ///
    /// **Panics** if a node with the same id already exists
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        let node_idx = NodeIndex::new(self.nodes.len());

        assert!(
            NodeIndex::end() != node_idx,
            "Maximum number of nodes exceeded"
        );
        assert!(
            !self.node_ids.contains_key(&node.id),
            "Node id {} already exists",
            node.id
        );

        // Create new entry in adjacency list for new node
        self.edges_in.push(Vec::new());
        self.edges_out.push(Vec::new());

        self.node_ids.insert(node.id.clone(), node_idx);
        self.nodes.push(node);

        node_idx
    }

    /// Add a new `edge` to the graph, rejecting edges whose endpoints do not
    /// exist or whose base cost or delay is negative or not finite.
    pub fn try_add_edge(&mut self, edge: Edge) -> Result<EdgeIndex, RoutingError> {
        if !self.contains(edge.source) || !self.contains(edge.target) {
            return Err(RoutingError::GraphIntegrity {
                source_node: self.describe(edge.source),
                target_node: self.describe(edge.target),
            });
        }
        if !edge.base_cost.is_finite() || edge.base_cost < 0.0 {
            return Err(RoutingError::InvalidArgument(format!(
                "Edge {} -> {} has invalid cost {}",
                self.describe(edge.source),
                self.describe(edge.target),
                edge.base_cost
            )));
        }
        if !edge.delay.is_finite() || edge.delay < 0.0 {
            return Err(RoutingError::InvalidArgument(format!(
                "Edge {} -> {} has invalid delay {}",
                self.describe(edge.source),
                self.describe(edge.target),
                edge.delay
            )));
        }

        let edge_idx = EdgeIndex::new(self.edges.len());
        assert!(
            EdgeIndex::end() != edge_idx,
            "Maximum number of edges exceeded"
        );

        self.edges_out[edge.source.index()].push(edge_idx);
        self.edges_in[edge.target.index()].push(edge_idx);
        self.edges.push(edge);

        Ok(edge_idx)
    }

    /// Add a new `edge` to the graph.
    ///
    /// **Panics** if the source or target node does not exist or the cost is
    /// invalid. Use [`Graph::try_add_edge`] for untrusted input.
    pub fn add_edge(&mut self, edge: Edge) -> EdgeIndex {
        match self.try_add_edge(edge) {
            Ok(edge_idx) => edge_idx,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn add_edges(&mut self, edges: Vec<Edge>) {
        for edge in edges {
            self.add_edge(edge);
        }
    }

    pub fn contains(&self, node_idx: NodeIndex) -> bool {
        node_idx.index() < self.nodes.len()
    }

    pub fn node(&self, node_idx: NodeIndex) -> Option<&Node> {
        self.nodes.get(node_idx.index())
    }

    /// Resolves an external node id
    pub fn node_index(&self, id: &str) -> Result<NodeIndex, RoutingError> {
        self.node_ids
            .get(id)
            .copied()
            .ok_or_else(|| RoutingError::NodeNotFound(id.to_string()))
    }

    pub fn node_id(&self, node_idx: NodeIndex) -> Option<&str> {
        self.node(node_idx).map(|node| node.id.as_str())
    }

    /// Coordinate of a node known to exist.
    pub(crate) fn coord(&self, node_idx: NodeIndex) -> Coordinate {
        self.nodes[node_idx.index()].coord
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns an iterator over all nodes of the graph
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Returns an iterator over all edges of the graph
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Outgoing edges of `node_idx` together with the node each one leads to.
    pub fn neighbors_outgoing(
        &self,
        node_idx: NodeIndex,
    ) -> impl Iterator<Item = (NodeIndex, &Edge)> + '_ {
        self.edges_out[node_idx.index()].iter().map(move |edge_idx| {
            let edge = &self.edges[edge_idx.index()];
            (edge.target, edge)
        })
    }

    /// Incoming edges of `node_idx`, re-expressed as leaving `node_idx` towards
    /// their original source. The edge itself is returned untouched so its
    /// cost and road type stay the same.
    pub fn neighbors_incoming(
        &self,
        node_idx: NodeIndex,
    ) -> impl Iterator<Item = (NodeIndex, &Edge)> + '_ {
        self.edges_in[node_idx.index()].iter().map(move |edge_idx| {
            let edge = &self.edges[edge_idx.index()];
            (edge.source, edge)
        })
    }

    pub fn neighbors(
        &self,
        node_idx: NodeIndex,
        direction: Direction,
    ) -> Box<dyn Iterator<Item = (NodeIndex, &Edge)> + '_> {
        match direction {
            Direction::Forward => Box::new(self.neighbors_outgoing(node_idx)),
            Direction::Backward => Box::new(self.neighbors_incoming(node_idx)),
        }
    }

    fn describe(&self, node_idx: NodeIndex) -> String {
        self.node_id(node_idx)
            .map(str::to_string)
            .unwrap_or_else(|| node_idx.to_string())
    }

    /// Reads the graph document written by the graph builder.
    ///
    /// Nodes are numbered in the sorted order of their ids so the same document
    /// always yields the same indices.
    pub fn from_json_reader<R: Read>(reader: R) -> anyhow::Result<Self> {
        let doc: GraphDocument =
            serde_json::from_reader(reader).context("Failed to parse graph document")?;

        let num_edges = doc.edges.values().map(Vec::len).sum();
        let mut g = Graph::with_capacity(doc.nodes.len(), num_edges);

        for (id, coord) in doc.nodes {
            g.add_node(Node { id, coord });
        }

        for (source_id, edges) in doc.edges {
            let source = g
                .node_index(&source_id)
                .map_err(|_| RoutingError::UnknownEdgeSource(source_id.clone()))?;

            for doc_edge in edges {
                let target = g.node_index(&doc_edge.to).map_err(|_| {
                    RoutingError::GraphIntegrity {
                        source_node: source_id.clone(),
                        target_node: doc_edge.to.clone(),
                    }
                })?;

                let mut edge = Edge::new(source, target, doc_edge.cost);
                edge.road_type = parse_road_type(doc_edge.road_type.as_deref());
                edge.name = doc_edge.name;
                edge.source_feature_id = doc_edge.osm_id;
                edge.delay = doc_edge.delay;
                edge.closed = doc_edge.closed;
                g.try_add_edge(edge)?;
            }
        }

        info!("{}", g);
        Ok(g)
    }

    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        info!("Reading graph document: {:?}", path);
        let file =
            File::open(path).with_context(|| format!("Could not open {}", path.display()))?;
        Self::from_json_reader(BufReader::new(file))
    }

    /// Reads a graph from a node file (`id,lat,lng`) and an edge file
    /// (`source,target,cost,road_type,name`).
    pub fn from_csv(path_to_nodes: &Path, path_to_edges: &Path) -> anyhow::Result<Self> {
        let mut g = Graph::new();

        let mut reader = csv::Reader::from_path(path_to_nodes)?;
        for result in reader.deserialize() {
            let record: NodeRecord = result.context("Failed to parse Node")?;
            if g.node_index(&record.id).is_ok() {
                return Err(RoutingError::InvalidArgument(format!(
                    "Duplicate node id {}",
                    record.id
                ))
                .into());
            }
            g.add_node(Node::new(record.id, record.lat, record.lng));
        }

        let mut reader = csv::Reader::from_path(path_to_edges)?;
        for result in reader.deserialize() {
            let record: EdgeRecord = result.context("Failed to parse Edge")?;
            let integrity_error = || RoutingError::GraphIntegrity {
                source_node: record.source.clone(),
                target_node: record.target.clone(),
            };
            let source = g.node_index(&record.source).map_err(|_| integrity_error())?;
            let target = g.node_index(&record.target).map_err(|_| integrity_error())?;

            let mut edge = Edge::new(source, target, record.cost);
            edge.road_type = parse_road_type(record.road_type.as_deref());
            edge.name = record.name.filter(|name| !name.is_empty());
            g.try_add_edge(edge)?;
        }

        info!("{}", g);
        Ok(g)
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Graph:\t#Nodes: {}, #Edges: {}",
            self.nodes.len(),
            self.edges.len()
        )
    }
}

/// Unknown road types are kept as `None`, the cost model prices them with its
/// default factor.
fn parse_road_type(value: Option<&str>) -> Option<RoadType> {
    let value = value.filter(|v| !v.is_empty())?;
    match value.parse() {
        Ok(road_type) => Some(road_type),
        Err(_) => {
            debug!("Unknown road type '{}'", value);
            None
        }
    }
}

#[derive(Deserialize)]
struct GraphDocument {
    nodes: BTreeMap<String, Coordinate>,
    #[serde(default)]
    edges: BTreeMap<String, Vec<EdgeDocument>>,
}

#[derive(Deserialize)]
struct EdgeDocument {
    to: String,
    cost: Weight,
    #[serde(default)]
    road_type: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "source_feature_id")]
    osm_id: Option<FeatureId>,
    #[serde(default, alias = "traffic_light_delay")]
    delay: Weight,
    #[serde(default)]
    closed: bool,
}

#[derive(Deserialize)]
struct NodeRecord {
    id: String,
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    source: String,
    target: String,
    cost: Weight,
    #[serde(default)]
    road_type: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Macro to create a edge from source to target with a base cost
///
/// edge!(0 , 1, 3.0) Returns edge in both directions
///
/// edge!(0 => 1, 3.0) Returns directed edge
///
/// edge!(0 => 1, 3.0, RoadType::Motorway) Returns directed edge with a road type
#[macro_export]
macro_rules! edge {
    ($source:expr => $target:expr, $cost:expr, $road_type:expr) => {
        $crate::graph::Edge::new($source.into(), $target.into(), $cost).road_type($road_type)
    };
    ($source:expr => $target:expr, $cost:expr) => {
        $crate::graph::Edge::new($source.into(), $target.into(), $cost)
    };
    ($source:expr , $target:expr, $cost:expr) => {
        vec![
            $crate::graph::Edge::new($source.into(), $target.into(), $cost),
            $crate::graph::Edge::new($target.into(), $source.into(), $cost),
        ]
    };
}

/// Macro to create a node with a given id, lat, lng
/// node!("a", 1.0, 1.0)
#[macro_export]
macro_rules! node {
    ($id:expr, $lat:expr, $lng:expr) => {
        $crate::graph::Node::new($id.to_string(), $lat, $lng)
    };
}
