//! Entity records consumed from the external store.
//!
//! These are the read-only shapes the risk engine is fed: the inventory of
//! assets, the services they run, known weaknesses, and the candidate
//! remediation actions. Loading and persistence live outside this crate.

use serde::{Deserialize, Serialize};

// ── Zones ─────────────────────────────────────────────────────────

/// Network zone an asset lives in.
///
/// The set is fixed; anything else is a data error at deserialization time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Internet,
    Dmz,
    Internal,
    Cloud,
    Ot,
}

impl Zone {
    /// All zones in canonical order. Iteration over this array (rather than
    /// over a hash set of observed zones) keeps graph builds deterministic.
    pub const ALL: [Zone; 5] = [Zone::Internet, Zone::Dmz, Zone::Internal, Zone::Cloud, Zone::Ot];

    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Internet => "internet",
            Zone::Dmz => "dmz",
            Zone::Internal => "internal",
            Zone::Cloud => "cloud",
            Zone::Ot => "ot",
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Entity Records ────────────────────────────────────────────────

/// An inventoried asset (server, workstation, firewall, cloud service, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub zone: Zone,
    /// Business criticality, 1-10. Assets at 9+ are crown jewels.
    #[serde(default = "default_criticality")]
    pub criticality: i64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A network service running on an asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: String,
    pub asset_id: String,
    pub name: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub exposed: bool,
    /// Recognized values: none | basic | mfa | mtls. Anything else (or a
    /// missing value) gets a conservative middle-of-the-road auth factor.
    #[serde(default)]
    pub auth_type: Option<String>,
}

/// A known weakness on an asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindingRecord {
    pub id: String,
    pub asset_id: String,
    pub kind: FindingKind,
    pub title: String,
    #[serde(default = "default_cvss")]
    pub cvss: f64,
    /// How readily the weakness can be exploited, 0.0-1.0.
    #[serde(default = "default_exploitability")]
    pub exploitability: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    Vuln,
    Misconfig,
}

/// A candidate remediation action (patch, close port, restrict IAM, segment).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub action_type: String,
    pub description: String,
    #[serde(default = "default_cost")]
    pub cost: f64,
    #[serde(default = "default_downtime_risk")]
    pub downtime_risk: f64,
}

fn default_criticality() -> i64 {
    5
}

fn default_cvss() -> f64 {
    5.0
}

fn default_exploitability() -> f64 {
    0.5
}

fn default_cost() -> f64 {
    1.0
}

fn default_downtime_risk() -> f64 {
    0.1
}
