//! Breach-risk aggregation.
//!
//! Each enumerated path is treated as an independent attack opportunity:
//! overall compromise probability is `1 - PRODUCT(1 - min(p, 0.99))`. The
//! 0.99 cap keeps one near-certain path from pinning the aggregate at
//! exactly 1.0, so the score stays a continuous signal.

use rampart_graph::round4;

use crate::types::AttackPath;

/// Per-path probability ceiling inside the survival product.
const PATH_PROBABILITY_CAP: f64 = 0.99;

/// Fold a path set into a single breach probability in [0, 1], rounded to
/// 4 decimal places. Empty input scores 0.0.
pub fn aggregate_risk(paths: &[AttackPath]) -> f64 {
    if paths.is_empty() {
        return 0.0;
    }

    let survival: f64 = paths
        .iter()
        .map(|p| 1.0 - p.probability.min(PATH_PROBABILITY_CAP))
        .product();

    round4(1.0 - survival)
}
