//! Policy abstractions for action selection

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::marker::PhantomData;

use crate::{Action, ActionSpace, DiscreteAction, Observation, VectorObservation};

/// Core policy trait for selecting actions
pub trait Policy: Send + Sync {
    /// Observation type
    type Observation: Observation;
    /// Action type
    type Action: Action;

    /// Select an action given an observation
    fn act(&mut self, observation: &Self::Observation) -> crate::Result<Self::Action>;

    /// Short name for logs and reports
    fn name(&self) -> &str;
}

/// Random policy that always selects uniformly random actions
pub struct RandomPolicy<A, O = VectorObservation> {
    /// Action space
    pub action_space: A,
    rng: StdRng,
    _observation: PhantomData<fn() -> O>,
}

impl<A, O> RandomPolicy<A, O> {
    /// Create a new random policy seeded from entropy
    pub fn new(action_space: A) -> Self {
        Self {
            action_space,
            rng: StdRng::from_entropy(),
            _observation: PhantomData,
        }
    }

    /// Create a new random policy with a reproducible action sequence
    pub fn with_seed(action_space: A, seed: u64) -> Self {
        Self {
            action_space,
            rng: StdRng::seed_from_u64(seed),
            _observation: PhantomData,
        }
    }
}

impl<A, O> Policy for RandomPolicy<A, O>
where
    O: Observation,
    A: ActionSpace,
{
    type Observation = O;
    type Action = A::Action;

    fn act(&mut self, _observation: &Self::Observation) -> crate::Result<Self::Action> {
        Ok(self.action_space.sample_with(&mut self.rng))
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// Policy that ignores observations and always picks the same action
#[derive(Debug, Clone, Copy)]
pub struct ConstantPolicy {
    /// The action to take
    pub action: DiscreteAction,
}

impl ConstantPolicy {
    /// Create a new constant policy
    #[must_use]
    pub fn new(action: DiscreteAction) -> Self {
        Self { action }
    }
}

impl Policy for ConstantPolicy {
    type Observation = VectorObservation;
    type Action = DiscreteAction;

    fn act(&mut self, _observation: &Self::Observation) -> crate::Result<Self::Action> {
        Ok(self.action)
    }

    fn name(&self) -> &str {
        "constant"
    }
}
