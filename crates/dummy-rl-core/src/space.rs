//! Serializable space descriptors for introspection by external harnesses

use serde::{Deserialize, Serialize};

/// Description of an action or observation space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpaceSpec {
    /// Continuous box with per-element bounds
    Box {
        /// Lower bounds, one per element
        low: Vec<f64>,
        /// Upper bounds, one per element
        high: Vec<f64>,
        /// Shape of a single value
        shape: Vec<usize>,
    },
    /// Every element takes an integer value in `0..n`
    Discrete {
        /// Number of distinct values per element
        n: usize,
        /// Shape of a single value
        shape: Vec<usize>,
    },
}

impl SpaceSpec {
    /// Shape of a single value in the space
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Box { shape, .. } | Self::Discrete { shape, .. } => shape,
        }
    }

    /// Number of distinct values per element, for discrete spaces
    #[must_use]
    pub fn cardinality(&self) -> Option<usize> {
        match self {
            Self::Discrete { n, .. } => Some(*n),
            Self::Box { .. } => None,
        }
    }
}
