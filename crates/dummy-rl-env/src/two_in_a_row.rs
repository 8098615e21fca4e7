//! TwoInARow: the reward depends on two consecutive observations
//!
//! Each step draws a new observation (a fair bit by default) and compares it
//! with the previous one: action 1 is correct when the two are equal, action
//! 0 when they differ. On the first step after a reset, the reset
//! observation is the previous value.

use tracing::{debug, info, warn};

use dummy_rl_core::{
    ActionSpace, ActionValueFunction, DiscreteAction, DiscreteObservationSpace, Environment,
    EnvironmentConfig, ObservationSpace, RLError, Result, Reward, RewardFunction, Step,
    StepInfo, VectorObservation,
};

use crate::sampler::{BinarySampler, ObservationSampler};
use crate::{episode_info, expect_len, BINARY_ACTIONS};

/// Registered name
pub const ID: &str = "TwoInARow-v0";
/// Environment version
pub const VERSION: &str = "0.0.2";
/// One-line description for registries
pub const DESCRIPTION: &str =
    "Take action 1 when the last two observations are equal, action 0 otherwise";

/// Observation sequences listed by [`TwoInARowEnv::q_value_table`]
const TABLE_SEQUENCES: [[f64; 2]; 4] = [[0.0, 0.0], [1.0, 1.0], [0.0, 1.0], [1.0, 0.0]];

/// Observation space of [`TwoInARowEnv`]
#[must_use]
pub fn observation_space() -> DiscreteObservationSpace {
    DiscreteObservationSpace::new(2, vec![1])
}

/// Reward rule comparing the previous observation with the next one
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoInARowRule;

impl RewardFunction for TwoInARowRule {
    type Observation = VectorObservation;
    type Action = DiscreteAction;

    fn reward(
        &self,
        previous: &Self::Observation,
        action: &Self::Action,
        next: &Self::Observation,
    ) -> Reward {
        Reward::judge(*action == self.correct_action(previous, next))
    }

    fn correct_action(
        &self,
        previous: &Self::Observation,
        next: &Self::Observation,
    ) -> DiscreteAction {
        DiscreteAction(usize::from(previous == next))
    }
}

/// Environment rewarding agents that detect a repeated observation
pub struct TwoInARowEnv {
    sampler: Box<dyn ObservationSampler>,
    rule: TwoInARowRule,
    previous: Option<VectorObservation>,
    episode: Option<usize>,
    steps: usize,
}

impl TwoInARowEnv {
    /// Create a new environment drawing fair bits
    pub fn new(config: EnvironmentConfig) -> Result<Self> {
        Ok(Self::with_sampler(BinarySampler::new(1, config.seed)))
    }

    /// Create a new environment drawing observations from `sampler`
    pub fn with_sampler(sampler: impl ObservationSampler + 'static) -> Self {
        info!(env = ID, version = VERSION, "environment created");
        Self {
            sampler: Box::new(sampler),
            rule: TwoInARowRule,
            previous: None,
            episode: None,
            steps: 0,
        }
    }

    /// Number of the current episode, `None` before the first reset
    #[must_use]
    pub fn episode(&self) -> Option<usize> {
        self.episode
    }

    /// Steps taken in the current episode
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The observation the next draw will be compared with
    #[must_use]
    pub fn previous_observation(&self) -> Option<&VectorObservation> {
        self.previous.as_ref()
    }

    /// Render a model's action values for every two-step observation sequence
    ///
    /// The model sees each sequence stacked as `[previous, current]`.
    pub fn q_value_table(
        model: &dyn ActionValueFunction<Observation = VectorObservation, Action = DiscreteAction>,
    ) -> Result<String> {
        let mut table = String::from("\nObs. Seq  Action 0  Action 1\n");
        table.push_str("--------  --------  --------\n");
        for sequence in TABLE_SEQUENCES {
            let values = model.all_q_values(&VectorObservation::new(sequence.to_vec()))?;
            let [q0, q1] = values[..] else {
                return Err(RLError::DimensionMismatch {
                    expected: BINARY_ACTIONS.n,
                    actual: values.len(),
                });
            };
            let label = format!("{},{}", sequence[0], sequence[1]);
            table.push_str(&format!("{label:<8}  {q0:>8.3}  {q1:>8.3}\n"));
        }
        Ok(table)
    }
}

impl Environment for TwoInARowEnv {
    type Observation = VectorObservation;
    type Action = DiscreteAction;

    fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = Self::Observation>> {
        Box::new(observation_space())
    }

    fn action_space(&self) -> Box<dyn ActionSpace<Action = Self::Action>> {
        Box::new(BINARY_ACTIONS)
    }

    fn reset(&mut self) -> Result<(Self::Observation, StepInfo)> {
        let observation = expect_len(self.sampler.sample()?, 1)?;
        let episode = self.episode.map_or(0, |e| e + 1);

        self.previous = Some(observation.clone());
        self.episode = Some(episode);
        self.steps = 0;

        debug!(env = ID, episode, observation = ?observation.data, "reset");
        Ok((observation, episode_info(episode, 0)))
    }

    fn step(&mut self, action: Self::Action) -> Result<Step<Self::Observation>> {
        let (Some(previous), Some(episode)) = (self.previous.as_ref(), self.episode) else {
            return Err(RLError::InvalidState("step called before reset".to_string()));
        };
        if let Err(e) = BINARY_ACTIONS.check(action) {
            warn!(env = ID, %action, "rejected action");
            return Err(e);
        }

        let next = expect_len(self.sampler.sample()?, 1)?;
        let reward = self.rule.reward(previous, &action, &next);

        self.previous = Some(next.clone());
        self.steps += 1;

        debug!(env = ID, episode, step = self.steps, %action, reward = reward.0, "step");
        Ok(Step {
            observation: next,
            reward,
            done: false,
            truncated: false,
            info: episode_info(episode, self.steps),
        })
    }
}
