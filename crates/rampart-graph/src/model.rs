//! In-memory multigraph representation.
//!
//! Compact adjacency lists over dense node indices, with a `node id → index`
//! map for lookups. Parallel edges between the same node pair are allowed and
//! carry distinct semantic reasons, so this is a multigraph rather than a
//! simple graph.

use std::collections::HashMap;

use rampart_core::types::Zone;
use serde::{Deserialize, Serialize};

/// Id of the attacker entry-point node.
pub const INTERNET_ID: &str = "Internet";

/// Node id for a zone (`Zone:dmz`, `Zone:internal`, ...).
pub fn zone_node_id(zone: Zone) -> String {
    format!("Zone:{zone}")
}

/// Node id for an asset (`Asset:<id>`).
pub fn asset_node_id(asset_id: &str) -> String {
    format!("Asset:{asset_id}")
}

/// Node id for a service (`Service:<id>`).
pub fn service_node_id(service_id: &str) -> String {
    format!("Service:{service_id}")
}

/// Traversal cost of an edge: `-ln(clamp(p, 0.01, 1.0))`.
///
/// The clamp guarantees a finite, non-negative cost even for degenerate
/// probabilities, so additive shortest-path search is always well-defined.
pub fn edge_cost(probability: f64) -> f64 {
    -probability.clamp(0.01, 1.0).ln()
}

/// Round to 4 decimal places, the precision of every exported score.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// What a node represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Internet,
    Zone,
    Asset,
    Service,
}

/// Why an edge exists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
    InternetExposure,
    LateralMovement,
    ZoneAccess,
    ServiceExposure,
}

/// Node metadata stored in the in-memory graph.
#[derive(Debug, Clone)]
pub struct GraphNode {
    /// Dense index (0..N-1) for O(1) adjacency lookup.
    pub index: usize,
    /// Stable string id: `Internet`, `Zone:<zone>`, `Asset:<id>`, `Service:<id>`.
    pub id: String,
    /// Display label (asset name, service name, upper-cased zone).
    pub label: String,
    pub kind: NodeKind,
    pub zone: Option<Zone>,
    /// Business criticality 1-10; zero for structural nodes.
    pub criticality: i64,
    /// True iff criticality >= 9.
    pub crown_jewel: bool,
    /// Max exploitability over the asset's findings. Informational; not
    /// wired into edge probabilities.
    pub vuln_score: f64,
}

/// A directed edge in the adjacency list.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    /// Target node index.
    pub target: usize,
    pub kind: EdgeKind,
    /// Success probability of the traversal, (0, 1].
    pub probability: f64,
    /// `-ln(clamp(probability, 0.01, 1.0))`; finite and non-negative.
    pub cost: f64,
    /// Human-readable explanation ("Direct internet exposure", ...).
    pub reason: String,
    /// Mitigating controls on this edge. Currently always empty.
    pub controls: Vec<String>,
}

impl GraphEdge {
    pub fn new(target: usize, kind: EdgeKind, probability: f64, reason: impl Into<String>) -> Self {
        Self {
            target,
            kind,
            probability,
            cost: edge_cost(probability),
            reason: reason.into(),
            controls: Vec::new(),
        }
    }
}

/// The directed weighted attack multigraph.
#[derive(Debug, Clone, Default)]
pub struct AttackGraph {
    /// All nodes, indexed by dense index.
    pub nodes: Vec<GraphNode>,
    /// `adjacency[i]` = outgoing edges from node `i`, in insertion order.
    pub adjacency: Vec<Vec<GraphEdge>>,
    /// Map from node id → dense index.
    pub node_index: HashMap<String, usize>,
}

impl AttackGraph {
    /// Insert a node, returning its dense index. Idempotent: inserting an id
    /// twice returns the original index and keeps the original metadata.
    pub fn add_node(&mut self, mut node: GraphNode) -> usize {
        if let Some(&existing) = self.node_index.get(&node.id) {
            return existing;
        }
        let index = self.nodes.len();
        node.index = index;
        self.node_index.insert(node.id.clone(), index);
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        index
    }

    /// Append an outgoing edge. Parallel edges to the same target are kept.
    pub fn add_edge(&mut self, source: usize, edge: GraphEdge) {
        self.adjacency[source].push(edge);
    }

    pub fn index_of(&self, node_id: &str) -> Option<usize> {
        self.node_index.get(node_id).copied()
    }

    pub fn node(&self, node_id: &str) -> Option<&GraphNode> {
        self.index_of(node_id).map(|i| &self.nodes[i])
    }

    /// Outgoing edges of a node.
    pub fn outgoing(&self, index: usize) -> &[GraphEdge] {
        &self.adjacency[index]
    }

    /// Ids of all crown-jewel nodes, in insertion order.
    pub fn crown_jewel_ids(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|n| n.crown_jewel)
            .map(|n| n.id.clone())
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|edges| edges.len()).sum()
    }
}
