//! NotXOR: two bits per observation, the action reports whether they differ

use tracing::{debug, info, warn};

use dummy_rl_core::{
    ActionSpace, DiscreteAction, DiscreteObservationSpace, Environment, EnvironmentConfig,
    ObservationSpace, RLError, Result, Reward, RewardFunction, Step, StepInfo,
    VectorObservation,
};

use crate::sampler::{BinarySampler, ObservationSampler};
use crate::{episode_info, expect_len, BINARY_ACTIONS};

/// Registered name
pub const ID: &str = "NotXOR-v0";
/// Environment version
pub const VERSION: &str = "0.0.2";
/// One-line description for registries
pub const DESCRIPTION: &str = "Take action 0 when the two observed bits are equal, action 1 otherwise";

/// Observation space of [`NotXorEnv`]
#[must_use]
pub fn observation_space() -> DiscreteObservationSpace {
    DiscreteObservationSpace::new(2, vec![2])
}

/// Reward rule over the bit pair the agent saw
///
/// NOT-XOR holds for `(0, 0)` and `(1, 1)`; action 0 is the "holds" answer
/// and action 1 the "does not hold" answer. Nonzero elements count as set.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotXorRule;

impl NotXorRule {
    /// Whether NOT(b1 XOR b2) holds for the observation
    #[must_use]
    pub fn holds(observation: &VectorObservation) -> bool {
        let bit = |i: usize| observation.data.get(i).is_some_and(|x| *x != 0.0);
        bit(0) == bit(1)
    }
}

impl RewardFunction for NotXorRule {
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
        _next: &Self::Observation,
    ) -> DiscreteAction {
        DiscreteAction(usize::from(!Self::holds(previous)))
    }
}

/// Environment rewarding agents that compute NOT-XOR of two observed bits
pub struct NotXorEnv {
    sampler: Box<dyn ObservationSampler>,
    rule: NotXorRule,
    current: Option<VectorObservation>,
    episode: Option<usize>,
    steps: usize,
}

impl NotXorEnv {
    /// Create a new environment drawing fair bits
    pub fn new(config: EnvironmentConfig) -> Result<Self> {
        Ok(Self::with_sampler(BinarySampler::new(2, config.seed)))
    }

    /// Create a new environment drawing observations from `sampler`
    pub fn with_sampler(sampler: impl ObservationSampler + 'static) -> Self {
        info!(env = ID, version = VERSION, "environment created");
        Self {
            sampler: Box::new(sampler),
            rule: NotXorRule,
            current: None,
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

    /// The observation the next action will be scored against
    #[must_use]
    pub fn current_observation(&self) -> Option<&VectorObservation> {
        self.current.as_ref()
    }
}

impl Environment for NotXorEnv {
    type Observation = VectorObservation;
    type Action = DiscreteAction;

    fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = Self::Observation>> {
        Box::new(observation_space())
    }

    fn action_space(&self) -> Box<dyn ActionSpace<Action = Self::Action>> {
        Box::new(BINARY_ACTIONS)
    }

    fn reset(&mut self) -> Result<(Self::Observation, StepInfo)> {
        let observation = expect_len(self.sampler.sample()?, 2)?;
        let episode = self.episode.map_or(0, |e| e + 1);

        self.current = Some(observation.clone());
        self.episode = Some(episode);
        self.steps = 0;

        debug!(env = ID, episode, observation = ?observation.data, "reset");
        Ok((observation, episode_info(episode, 0)))
    }

    fn step(&mut self, action: Self::Action) -> Result<Step<Self::Observation>> {
        let (Some(previous), Some(episode)) = (self.current.as_ref(), self.episode) else {
            return Err(RLError::InvalidState("step called before reset".to_string()));
        };
        if let Err(e) = BINARY_ACTIONS.check(action) {
            warn!(env = ID, %action, "rejected action");
            return Err(e);
        }

        let next = expect_len(self.sampler.sample()?, 2)?;
        let reward = self.rule.reward(previous, &action, &next);

        self.current = Some(next.clone());
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
