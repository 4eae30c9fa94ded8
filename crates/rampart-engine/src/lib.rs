//! rampart-engine: Breach-risk evaluation for the Rampart attack graph.
//!
//! Builds the scenario's attack multigraph, enumerates the most probable
//! loopless paths from the internet to every crown jewel, folds them into a
//! single breach-risk score, and greedily selects a budget-bounded
//! remediation plan. Each evaluation is synchronous and self-contained;
//! concurrent scenarios simply get their own engine call.

pub mod cache;
pub mod error;
pub mod paths;
pub mod plan;
pub mod risk;
pub mod types;

pub use error::EngineError;
pub use types::{EvaluationReport, EvaluationRequest};

use std::time::Instant;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use rampart_core::events::{EventPayload, RampartEvent, Severity};
use rampart_core::EngineSettings;
use rampart_graph::{build_attack_graph, round4, INTERNET_ID};

use crate::cache::{CachedEvaluation, GraphCacheStore};
use crate::types::{GraphStats, PlanReport};

/// Fraction of risk assumed removed per fraction of paths cut, for the
/// coarse post-remediation estimate.
const REMEDIATION_EFFECT: f64 = 0.8;

/// The scenario evaluation engine.
pub struct RiskEngine {
    settings: EngineSettings,
}

impl RiskEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    /// Evaluate one scenario: build → enumerate paths → aggregate risk →
    /// plan remediation. Pure compute except for the optional cache write at
    /// the end; nothing here blocks on I/O mid-computation.
    pub fn evaluate(&self, request: &EvaluationRequest) -> error::Result<EvaluationReport> {
        let start = Instant::now();

        let graph = build_attack_graph(
            &request.assets,
            &request.services,
            &request.findings,
            &request.actions,
        )?;
        let export = graph.to_export();
        let stats = GraphStats {
            total_nodes: graph.node_count(),
            total_edges: graph.edge_count(),
            crown_jewel_count: graph.crown_jewel_ids().len(),
        };

        let k = request.k.unwrap_or(self.settings.default_k);
        let max_actions = request
            .max_actions
            .unwrap_or(self.settings.default_max_actions);

        let targets = graph.crown_jewel_ids();
        let mut attack_paths = Vec::new();
        for target in &targets {
            attack_paths.extend(paths::k_shortest_paths(&graph, INTERNET_ID, target, k));
        }

        let risk_score = risk::aggregate_risk(&attack_paths);
        let selected = plan::plan(&attack_paths, &request.actions, max_actions);

        let paths_eliminated: usize = selected.iter().map(|a| a.cuts_paths).sum();
        let cut_fraction = paths_eliminated as f64 / attack_paths.len().max(1) as f64;
        let risk_after = round4((risk_score * (1.0 - cut_fraction * REMEDIATION_EFFECT)).max(0.0));

        let evaluation_id = Uuid::new_v4();
        let duration_ms = start.elapsed().as_millis() as u64;

        let events = vec![
            RampartEvent::new(
                &request.scenario_id,
                Severity::Medium,
                EventPayload::GraphBuilt {
                    node_count: stats.total_nodes,
                    edge_count: stats.total_edges,
                    risk_score,
                },
            ),
            RampartEvent::new(
                &request.scenario_id,
                Severity::Low,
                EventPayload::PathsComputed {
                    target_count: targets.len(),
                    path_count: attack_paths.len(),
                },
            ),
            RampartEvent::new(
                &request.scenario_id,
                Severity::Low,
                EventPayload::PlanGenerated {
                    action_count: selected.len(),
                    risk_before: risk_score,
                    risk_after,
                },
            ),
            RampartEvent::new(
                &request.scenario_id,
                Severity::Low,
                EventPayload::EvaluationCompleted {
                    evaluation_id,
                    risk_score,
                    duration_ms,
                },
            ),
        ];

        let report = EvaluationReport {
            scenario_id: request.scenario_id.clone(),
            evaluation_id,
            graph: export,
            stats,
            risk_score,
            paths: attack_paths,
            plan: PlanReport {
                actions: selected,
                risk_before: risk_score,
                risk_after,
                paths_eliminated,
            },
            events,
            computed_at: Utc::now(),
            duration_ms,
        };

        if let Some(dir) = &self.settings.cache_dir {
            let store = GraphCacheStore::new(dir)?;
            store.save(&CachedEvaluation {
                scenario_id: report.scenario_id.clone(),
                graph: report.graph.clone(),
                risk_score: report.risk_score,
                built_at: report.computed_at,
            })?;
        }

        info!(
            scenario_id = %report.scenario_id,
            risk_score = report.risk_score,
            paths = report.paths.len(),
            actions = report.plan.actions.len(),
            duration_ms = report.duration_ms,
            "Scenario evaluated"
        );

        Ok(report)
    }
}
