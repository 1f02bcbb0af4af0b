use super::config::ConfigError;
use crate::core::radii::RadiiLoadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load radius table: {0}")]
    Radii(#[from] RadiiLoadError),

    #[error("Required input is empty: {0}")]
    EmptyInput(&'static str),

    #[error("Lattice bounds must be finite (min: {min:?}, max: {max:?})")]
    NonFiniteBounds { min: [f64; 3], max: [f64; 3] },

    #[error("Lattice of {dims:?} ({cells} cells) exceeds the limit of {limit} cells")]
    LatticeTooLarge {
        dims: [usize; 3],
        cells: u128,
        limit: usize,
    },

    #[error("Clustering lost track of points: {found} clustered out of {expected}")]
    ClusterCountMismatch { expected: usize, found: usize },
}
