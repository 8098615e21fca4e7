//! Core reinforcement learning traits and types for toy test environments
//!
//! This crate provides the reset/step contract, action and observation
//! spaces, rewards and the small policy/value abstractions that the
//! environments in `dummy-rl-env` are built on.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod environment;
pub mod error;
pub mod observation;
pub mod policy;
pub mod reward;
pub mod space;
pub mod value;

// Re-export core traits and types
pub use action::{Action, ActionSpace, DiscreteAction, DiscreteSpace};
pub use environment::{
    DynEnvironment, Environment, EnvironmentConfig, Episode, Step, StepInfo, TrackedEnvironment,
};
pub use error::{RLError, Result};
pub use observation::{
    BoxObservationSpace, DiscreteObservationSpace, Observation, ObservationSpace,
    VectorObservation,
};
pub use policy::{ConstantPolicy, Policy, RandomPolicy};
pub use reward::{Reward, RewardFunction};
pub use space::SpaceSpec;
pub use value::{ActionValueFunction, TabularQFunction};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Action, ActionSpace, DiscreteAction, Environment, Observation, ObservationSpace, Policy,
        Result, Reward, Step, VectorObservation,
    };
}
