//! Serialized-graph cache.
//!
//! One JSON file per scenario under a configurable root. Saving overwrites
//! whatever was there: every rebuild is a complete, self-consistent
//! replacement, so last-writer-wins needs no merge logic.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rampart_graph::GraphExport;

/// Errors from cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("No cached graph for scenario {0}")]
    NotFound(String),

    #[error("Invalid scenario id for caching: {0:?}")]
    InvalidScenarioId(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A cached evaluation: the serialized graph and its risk score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedEvaluation {
    pub scenario_id: String,
    pub graph: GraphExport,
    pub risk_score: f64,
    pub built_at: DateTime<Utc>,
}

/// File-system backed cache, keyed by scenario id.
pub struct GraphCacheStore {
    root: PathBuf,
}

impl GraphCacheStore {
    /// Create a store rooted at the given directory, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Save an entry, replacing any previous one for the same scenario.
    pub fn save(&self, entry: &CachedEvaluation) -> Result<(), CacheError> {
        let path = self.entry_path(&entry.scenario_id)?;
        let json = serde_json::to_string_pretty(entry)?;
        fs::write(&path, json)?;

        tracing::debug!(
            scenario_id = %entry.scenario_id,
            path = %path.display(),
            "Graph cache entry saved"
        );

        Ok(())
    }

    /// Load the entry for a scenario.
    pub fn load(&self, scenario_id: &str) -> Result<CachedEvaluation, CacheError> {
        let path = self.entry_path(scenario_id)?;
        if !path.exists() {
            return Err(CacheError::NotFound(scenario_id.to_string()));
        }
        let json = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Scenario ids become file names; anything that could escape the root
    /// is rejected.
    fn entry_path(&self, scenario_id: &str) -> Result<PathBuf, CacheError> {
        let valid = !scenario_id.is_empty()
            && !scenario_id.starts_with('.')
            && scenario_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(CacheError::InvalidScenarioId(scenario_id.to_string()));
        }
        Ok(self.root.join(format!("{scenario_id}.json")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(scenario_id: &str, risk_score: f64) -> CachedEvaluation {
        CachedEvaluation {
            scenario_id: scenario_id.to_string(),
            graph: GraphExport {
                nodes: vec![],
                edges: vec![],
            },
            risk_score,
            built_at: Utc::now(),
        }
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = GraphCacheStore::new(dir.path()).unwrap();

        store.save(&entry("cloud-webapp", 0.486)).unwrap();
        let loaded = store.load("cloud-webapp").unwrap();

        assert_eq!(loaded.scenario_id, "cloud-webapp");
        assert!((loaded.risk_score - 0.486).abs() < f64::EPSILON);
    }

    #[test]
    fn last_writer_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = GraphCacheStore::new(dir.path()).unwrap();

        store.save(&entry("factory-ot", 0.2)).unwrap();
        store.save(&entry("factory-ot", 0.9)).unwrap();

        let loaded = store.load("factory-ot").unwrap();
        assert!((loaded.risk_score - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_entry_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = GraphCacheStore::new(dir.path()).unwrap();

        assert!(matches!(
            store.load("never-built"),
            Err(CacheError::NotFound(_))
        ));
    }

    #[test]
    fn traversal_ids_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = GraphCacheStore::new(dir.path()).unwrap();

        for bad in ["../evil", "a/b", "", ".hidden"] {
            assert!(
                matches!(store.load(bad), Err(CacheError::InvalidScenarioId(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
