//! Transport-neutral projection of the attack graph.
//!
//! Pure transform with no behavior of its own; used both for the serialized
//! graph cache and for any display layer. This node/edge shape is the only
//! interchange contract the core honors.

use rampart_core::types::Zone;
use serde::{Deserialize, Serialize};

use crate::model::{round4, AttackGraph, NodeKind};

/// Serialized node/edge view of an [`AttackGraph`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<NodeExport>,
    pub edges: Vec<EdgeExport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeExport {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub zone: Option<Zone>,
    pub criticality: i64,
    pub crown_jewel: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeExport {
    pub source: String,
    pub target: String,
    /// Rounded to 4 decimal places.
    pub probability: f64,
    pub reason: String,
    pub controls: Vec<String>,
}

impl AttackGraph {
    /// Project the graph to its serialized shape. Nodes and edges appear in
    /// insertion order, so identical graphs serialize identically.
    pub fn to_export(&self) -> GraphExport {
        let nodes = self
            .nodes
            .iter()
            .map(|n| NodeExport {
                id: n.id.clone(),
                label: n.label.clone(),
                kind: n.kind,
                zone: n.zone,
                criticality: n.criticality,
                crown_jewel: n.crown_jewel,
            })
            .collect();

        let edges = self
            .nodes
            .iter()
            .flat_map(|n| {
                self.adjacency[n.index].iter().map(|e| EdgeExport {
                    source: n.id.clone(),
                    target: self.nodes[e.target].id.clone(),
                    probability: round4(e.probability),
                    reason: e.reason.clone(),
                    controls: e.controls.clone(),
                })
            })
            .collect();

        GraphExport { nodes, edges }
    }
}
