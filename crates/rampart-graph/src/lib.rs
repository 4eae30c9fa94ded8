//! rampart-graph: The probabilistic attack multigraph.
//!
//! Turns asset/service/finding records into a weighted directed multigraph
//! (adjacency lists keyed by dense node index, parallel edges allowed) and
//! projects it to a transport-neutral node/edge shape. The graph is
//! transient: built fresh for every evaluation, never mutated afterward.

pub mod builder;
pub mod error;
pub mod export;
pub mod model;

pub use builder::build_attack_graph;
pub use error::GraphError;
pub use export::{EdgeExport, GraphExport, NodeExport};
pub use model::{
    asset_node_id, edge_cost, round4, service_node_id, zone_node_id, AttackGraph, EdgeKind,
    GraphEdge, GraphNode, NodeKind, INTERNET_ID,
};
