//! Request and report types for scenario evaluation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rampart_core::events::RampartEvent;
use rampart_core::types::{ActionRecord, AssetRecord, FindingRecord, ServiceRecord};
use rampart_graph::GraphExport;

/// Everything needed to evaluate one scenario. Entity loading happens
/// upstream; this is the handoff shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub scenario_id: String,
    pub assets: Vec<AssetRecord>,
    #[serde(default)]
    pub services: Vec<ServiceRecord>,
    #[serde(default)]
    pub findings: Vec<FindingRecord>,
    #[serde(default)]
    pub actions: Vec<ActionRecord>,
    /// Paths to enumerate per crown-jewel target. None uses the engine default.
    #[serde(default)]
    pub k: Option<usize>,
    /// Remediation budget. None uses the engine default.
    #[serde(default)]
    pub max_actions: Option<usize>,
}

/// One enumerated loopless attack path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttackPath {
    /// Product of the edge probabilities along the path (`exp(-cost)`).
    pub probability: f64,
    /// Node ids from source to target.
    pub nodes: Vec<String>,
    /// One step per edge traversed. Steps carry the exact edge taken, which
    /// matters in a multigraph where a node pair can have parallel edges.
    pub steps: Vec<PathStep>,
}

/// A single hop along an attack path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathStep {
    /// Node reached by this hop.
    pub node_id: String,
    pub label: String,
    /// Probability of this edge alone.
    pub probability: f64,
    pub reason: String,
}

/// A remediation action chosen by the planner, with its effect annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedAction {
    #[serde(flatten)]
    pub action: ActionRecord,
    /// Sum of the probabilities of the paths this action eliminates.
    pub impact: f64,
    /// impact / max(cost + 5 x downtime_risk, 0.1).
    pub score: f64,
    /// How many previously uncovered paths this action cut.
    pub cuts_paths: usize,
}

/// The remediation plan for a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    pub actions: Vec<PlannedAction>,
    pub risk_before: f64,
    /// Coarse estimate: risk_before scaled by the fraction of paths cut.
    pub risk_after: f64,
    pub paths_eliminated: usize,
}

/// Size summary of the built graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub crown_jewel_count: usize,
}

/// Complete result of one scenario evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub scenario_id: String,
    pub evaluation_id: Uuid,
    pub graph: GraphExport,
    pub stats: GraphStats,
    /// Aggregate breach probability across all enumerated paths, [0, 1].
    pub risk_score: f64,
    pub paths: Vec<AttackPath>,
    pub plan: PlanReport,
    /// For the hosting layer to broadcast; the engine never does.
    pub events: Vec<RampartEvent>,
    pub computed_at: DateTime<Utc>,
    pub duration_ms: u64,
}
