//! Error types for the rampart-graph crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("No assets in scenario: cannot build an attack graph")]
    NoAssets,
}
