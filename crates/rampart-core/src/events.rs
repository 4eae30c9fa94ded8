//! Event types emitted by the risk engine.
//!
//! The engine returns these alongside its reports; broadcasting them
//! (WebSocket, message bus, ...) is the hosting layer's responsibility.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

/// An event produced during scenario evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RampartEvent {
    pub id: EventId,
    pub scenario_id: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    pub payload: EventPayload,
}

impl RampartEvent {
    pub fn new(scenario_id: impl Into<String>, severity: Severity, payload: EventPayload) -> Self {
        Self {
            id: EventId::new(),
            scenario_id: scenario_id.into(),
            severity,
            timestamp: Utc::now(),
            payload,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// The event payload, tagged by type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type")]
pub enum EventPayload {
    /// The attack graph was (re)built for a scenario.
    GraphBuilt {
        node_count: usize,
        edge_count: usize,
        risk_score: f64,
    },
    /// Attack paths were enumerated to the scenario's crown jewels.
    PathsComputed {
        target_count: usize,
        path_count: usize,
    },
    /// A remediation plan was generated.
    PlanGenerated {
        action_count: usize,
        risk_before: f64,
        risk_after: f64,
    },
    /// A full evaluation (build, paths, risk, plan) finished.
    EvaluationCompleted {
        evaluation_id: Uuid,
        risk_score: f64,
        duration_ms: u64,
    },
}
