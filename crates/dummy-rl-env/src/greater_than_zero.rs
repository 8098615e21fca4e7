//! GreaterThanZero: a single observation is enough to pick the right action
//!
//! Each observation is one scalar drawn from N(0, `std_dev`) and clamped to
//! `[-OBSERVATION_BOUND, OBSERVATION_BOUND]`. Action 1 is correct when the
//! observation the agent acted on is positive, action 0 otherwise (zero
//! counts as not positive).

use tracing::{debug, info, warn};

use dummy_rl_core::{
    ActionSpace, BoxObservationSpace, DiscreteAction, Environment, EnvironmentConfig,
    ObservationSpace, RLError, Result, Reward, RewardFunction, Step, StepInfo,
    VectorObservation,
};

use crate::sampler::{GaussianSampler, ObservationSampler};
use crate::{episode_info, expect_len, BINARY_ACTIONS};

/// Registered name
pub const ID: &str = "GreaterThanZero-v0";
/// Environment version
pub const VERSION: &str = "0.0.2";
/// One-line description for registries
pub const DESCRIPTION: &str = "Take action 1 when the last observation is > 0, action 0 otherwise";
/// Observations are clamped to this magnitude
pub const OBSERVATION_BOUND: f64 = 5.0;

/// Observation space of [`GreaterThanZeroEnv`]
#[must_use]
pub fn observation_space() -> BoxObservationSpace {
    BoxObservationSpace {
        low: vec![-OBSERVATION_BOUND],
        high: vec![OBSERVATION_BOUND],
        shape: vec![1],
    }
}

/// Reward rule: the sign of the observation the agent saw decides the action
#[derive(Debug, Clone, Copy, Default)]
pub struct GreaterThanZeroRule;

impl RewardFunction for GreaterThanZeroRule {
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
        DiscreteAction(usize::from(previous.first().is_some_and(|x| x > 0.0)))
    }
}

/// Environment rewarding agents that report whether the observation is positive
pub struct GreaterThanZeroEnv {
    sampler: Box<dyn ObservationSampler>,
    rule: GreaterThanZeroRule,
    current: Option<VectorObservation>,
    episode: Option<usize>,
    steps: usize,
}

impl GreaterThanZeroEnv {
    /// Create a new environment drawing from a standard normal distribution
    ///
    /// Recognized parameters: `std_dev` (default `1.0`).
    pub fn new(config: EnvironmentConfig) -> Result<Self> {
        let std_dev = config.param::<f64>("std_dev")?.unwrap_or(1.0);
        let sampler = GaussianSampler::new(0.0, std_dev, OBSERVATION_BOUND, config.seed)?;
        Ok(Self::with_sampler(sampler))
    }

    /// Create a new environment drawing observations from `sampler`
    pub fn with_sampler(sampler: impl ObservationSampler + 'static) -> Self {
        info!(env = ID, version = VERSION, "environment created");
        Self {
            sampler: Box::new(sampler),
            rule: GreaterThanZeroRule,
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

impl Environment for GreaterThanZeroEnv {
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

        let next = expect_len(self.sampler.sample()?, 1)?;
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
