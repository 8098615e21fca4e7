//! Minimal deterministic environments for sanity-checking RL agents
//!
//! Every environment has a two-action space and a reward rule simple enough
//! that a working agent must learn it quickly:
//! - [`GreaterThanZeroEnv`]: is the scalar observation positive?
//! - [`NotXorEnv`]: are the two observed bits equal?
//! - [`TwoInARowEnv`]: will the next observation repeat the last one?
//!
//! Environments are discoverable by name through the [`registry`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod greater_than_zero;
pub mod not_xor;
pub mod registry;
pub mod sampler;
pub mod two_in_a_row;
pub mod wrappers;

// Re-export environments
pub use greater_than_zero::{GreaterThanZeroEnv, GreaterThanZeroRule};
pub use not_xor::{NotXorEnv, NotXorRule};
pub use registry::{env_spec, list_envs, make_env, EnvRegistry, EnvSpec};
pub use sampler::{BinarySampler, GaussianSampler, ObservationSampler, ScriptedSampler};
pub use two_in_a_row::{TwoInARowEnv, TwoInARowRule};
pub use wrappers::TimeLimit;

// Re-export core types
pub use dummy_rl_core::{
    DiscreteAction, DynEnvironment, Environment, EnvironmentConfig, Reward, Step, StepInfo,
    VectorObservation,
};

use dummy_rl_core::{DiscreteSpace, RLError};

/// Action space shared by every environment in this crate
pub(crate) const BINARY_ACTIONS: DiscreteSpace = DiscreteSpace { n: 2 };

/// Reject sampled observations of the wrong length
pub(crate) fn expect_len(
    obs: VectorObservation,
    expected: usize,
) -> dummy_rl_core::Result<VectorObservation> {
    if obs.data.len() == expected {
        Ok(obs)
    } else {
        Err(RLError::DimensionMismatch {
            expected,
            actual: obs.data.len(),
        })
    }
}

/// Info attached to every reset and step
pub(crate) fn episode_info(episode: usize, step: usize) -> StepInfo {
    StepInfo::default().with("episode", episode).with("step", step)
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        make_env, EnvRegistry, GreaterThanZeroEnv, NotXorEnv, TimeLimit, TwoInARowEnv,
    };
    pub use dummy_rl_core::prelude::*;
}
