//! Action representations and action spaces

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

use crate::{RLError, SpaceSpec};

/// Trait for actions in an RL environment
pub trait Action: Clone + Debug + Send + Sync {
    /// Convert action to a vector representation
    fn to_vec(&self) -> Vec<f64>;
}

/// Trait for defining action spaces
pub trait ActionSpace: Send + Sync {
    /// The type of actions in this space
    type Action: Action;

    /// Sample an action using the supplied generator
    fn sample_with(&self, rng: &mut dyn RngCore) -> Self::Action;

    /// Sample a random action from the space
    fn sample(&self) -> Self::Action {
        self.sample_with(&mut rand::thread_rng())
    }

    /// Check if an action is valid within this space
    fn contains(&self, action: &Self::Action) -> bool;

    /// Get the dimensionality of the action space
    fn dim(&self) -> Option<usize>;

    /// Serializable description of the space
    fn spec(&self) -> SpaceSpec;
}

/// Discrete action (index into a discrete action space)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscreteAction(pub usize);

impl Action for DiscreteAction {
    fn to_vec(&self) -> Vec<f64> {
        #[allow(clippy::cast_precision_loss)]
        vec![self.0 as f64]
    }
}

impl From<usize> for DiscreteAction {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl fmt::Display for DiscreteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discrete action space `{0, 1, ..., n - 1}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscreteSpace {
    /// Number of discrete actions
    pub n: usize,
}

impl DiscreteSpace {
    /// Create a new discrete action space
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    /// Reject actions outside the space
    pub fn check(&self, action: DiscreteAction) -> crate::Result<()> {
        if self.contains(&action) {
            Ok(())
        } else {
            Err(RLError::InvalidAction(format!(
                "{action} is not in Discrete({})",
                self.n
            )))
        }
    }
}

impl ActionSpace for DiscreteSpace {
    type Action = DiscreteAction;

    fn sample_with(&self, rng: &mut dyn RngCore) -> Self::Action {
        DiscreteAction(rng.gen_range(0..self.n))
    }

    fn contains(&self, action: &Self::Action) -> bool {
        action.0 < self.n
    }

    fn dim(&self) -> Option<usize> {
        Some(1)
    }

    fn spec(&self) -> SpaceSpec {
        SpaceSpec::Discrete {
            n: self.n,
            shape: Vec::new(),
        }
    }
}
