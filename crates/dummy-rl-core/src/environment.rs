//! Environment traits and types

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{
    ActionSpace, DiscreteAction, Observation, ObservationSpace, Reward, VectorObservation,
};

/// Result of a single environment step
#[derive(Debug, Clone)]
pub struct Step<O> {
    /// Observation from the environment
    pub observation: O,
    /// Reward signal
    pub reward: Reward,
    /// Whether the episode is done
    pub done: bool,
    /// Whether the episode was truncated (e.g., time limit)
    pub truncated: bool,
    /// Additional info from the environment
    pub info: StepInfo,
}

/// Additional information from a step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Custom fields
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl StepInfo {
    /// Insert a field, replacing any previous value under the same key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Builder form of [`StepInfo::insert`]
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a field
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }
}

/// Episode information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    /// Episode ID
    pub id: String,
    /// Total reward
    pub total_reward: f64,
    /// Number of steps
    pub steps: usize,
    /// Whether episode was truncated
    pub truncated: bool,
    /// Start time
    pub start_time: chrono::DateTime<chrono::Utc>,
    /// End time
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
}

/// Configuration for environments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Random seed; entropy is used when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Maximum episode steps, imposed by a `TimeLimit` wrapper
    #[serde(default)]
    pub max_steps: Option<usize>,
    /// Additional parameters
    #[serde(flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl EnvironmentConfig {
    /// Set the random seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the step budget
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Read a typed parameter, `None` when it is not set
    pub fn param<T: DeserializeOwned>(&self, key: &str) -> crate::Result<Option<T>> {
        self.params
            .get(key)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
            .map_err(Into::into)
    }
}

/// Core environment trait
///
/// `step` is only valid after `reset`; implementations report
/// [`RLError::InvalidState`](crate::RLError::InvalidState) otherwise and
/// reject actions outside their action space with
/// [`RLError::InvalidAction`](crate::RLError::InvalidAction) without changing
/// state.
pub trait Environment: Send + Sync {
    /// Observation type
    type Observation: Observation;
    /// Action type
    type Action: crate::Action;

    /// Get the observation space
    fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = Self::Observation>>;

    /// Get the action space
    fn action_space(&self) -> Box<dyn ActionSpace<Action = Self::Action>>;

    /// Reset the environment
    fn reset(&mut self) -> crate::Result<(Self::Observation, StepInfo)>;

    /// Take a step in the environment
    fn step(&mut self, action: Self::Action) -> crate::Result<Step<Self::Observation>>;

    /// Render the environment (optional)
    fn render(&self) -> crate::Result<()> {
        Ok(())
    }

    /// Close the environment
    fn close(&mut self) -> crate::Result<()> {
        Ok(())
    }

    /// Get current episode info
    fn episode_info(&self) -> Option<Episode> {
        None
    }
}

/// Type-erased environment with vector observations and discrete actions
pub type DynEnvironment =
    Box<dyn Environment<Observation = VectorObservation, Action = DiscreteAction>>;

impl<E> Environment for Box<E>
where
    E: Environment + ?Sized,
{
    type Observation = E::Observation;
    type Action = E::Action;

    fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = Self::Observation>> {
        (**self).observation_space()
    }

    fn action_space(&self) -> Box<dyn ActionSpace<Action = Self::Action>> {
        (**self).action_space()
    }

    fn reset(&mut self) -> crate::Result<(Self::Observation, StepInfo)> {
        (**self).reset()
    }

    fn step(&mut self, action: Self::Action) -> crate::Result<Step<Self::Observation>> {
        (**self).step(action)
    }

    fn render(&self) -> crate::Result<()> {
        (**self).render()
    }

    fn close(&mut self) -> crate::Result<()> {
        (**self).close()
    }

    fn episode_info(&self) -> Option<Episode> {
        (**self).episode_info()
    }
}

/// Wrapper for environments that tracks episodes
pub struct TrackedEnvironment<E> {
    /// Inner environment
    pub env: E,
    /// Current episode
    pub episode: Option<Episode>,
    /// Step counter
    pub step_count: usize,
}

impl<E> TrackedEnvironment<E> {
    /// Create a new tracked environment
    pub fn new(env: E) -> Self {
        Self {
            env,
            episode: None,
            step_count: 0,
        }
    }

    /// Unwrap the inner environment
    pub fn into_inner(self) -> E {
        self.env
    }
}

impl<E> Environment for TrackedEnvironment<E>
where
    E: Environment,
{
    type Observation = E::Observation;
    type Action = E::Action;

    fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = Self::Observation>> {
        self.env.observation_space()
    }

    fn action_space(&self) -> Box<dyn ActionSpace<Action = Self::Action>> {
        self.env.action_space()
    }

    fn reset(&mut self) -> crate::Result<(Self::Observation, StepInfo)> {
        let reset = self.env.reset()?;

        // End current episode if exists
        if let Some(ref mut episode) = self.episode {
            if episode.end_time.is_none() {
                episode.end_time = Some(chrono::Utc::now());
            }
            tracing::debug!(
                episode = %episode.id,
                steps = episode.steps,
                total_reward = episode.total_reward,
                "episode finished"
            );
        }

        self.episode = Some(Episode {
            id: uuid::Uuid::new_v4().to_string(),
            total_reward: 0.0,
            steps: 0,
            truncated: false,
            start_time: chrono::Utc::now(),
            end_time: None,
        });
        self.step_count = 0;

        Ok(reset)
    }

    fn step(&mut self, action: Self::Action) -> crate::Result<Step<Self::Observation>> {
        let step = self.env.step(action)?;

        self.step_count += 1;
        if let Some(ref mut episode) = self.episode {
            episode.total_reward += step.reward.0;
            episode.steps = self.step_count;

            if step.done || step.truncated {
                episode.truncated = step.truncated;
                episode.end_time = Some(chrono::Utc::now());
            }
        }

        Ok(step)
    }

    fn render(&self) -> crate::Result<()> {
        self.env.render()
    }

    fn close(&mut self) -> crate::Result<()> {
        self.env.close()
    }

    fn episode_info(&self) -> Option<Episode> {
        self.episode.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiscreteObservationSpace, DiscreteSpace, RLError};
    use approx::assert_relative_eq;
    use serde_json::json;

    /// Rewards action 1 every step; observation counts steps.
    struct Counter {
        steps: Option<usize>,
    }

    #[allow(clippy::cast_precision_loss)]
    impl Environment for Counter {
        type Observation = VectorObservation;
        type Action = DiscreteAction;

        fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = Self::Observation>> {
            Box::new(DiscreteObservationSpace::new(usize::MAX, vec![1]))
        }

        fn action_space(&self) -> Box<dyn ActionSpace<Action = Self::Action>> {
            Box::new(DiscreteSpace::new(2))
        }

        fn reset(&mut self) -> crate::Result<(Self::Observation, StepInfo)> {
            self.steps = Some(0);
            Ok((VectorObservation::scalar(0.0), StepInfo::default()))
        }

        fn step(&mut self, action: Self::Action) -> crate::Result<Step<Self::Observation>> {
            let steps = self
                .steps
                .as_mut()
                .ok_or_else(|| RLError::InvalidState("reset first".into()))?;
            *steps += 1;
            Ok(Step {
                observation: VectorObservation::scalar(*steps as f64),
                reward: Reward::judge(action.0 == 1),
                done: false,
                truncated: false,
                info: StepInfo::default(),
            })
        }
    }

    #[test]
    fn test_tracked_environment_accumulates() {
        let mut env = TrackedEnvironment::new(Counter { steps: None });
        assert!(env.episode_info().is_none());

        env.reset().unwrap();
        env.step(DiscreteAction(1)).unwrap();
        env.step(DiscreteAction(1)).unwrap();
        env.step(DiscreteAction(0)).unwrap();

        let episode = env.episode_info().unwrap();
        assert_eq!(episode.steps, 3);
        assert_relative_eq!(episode.total_reward, 1.0);
        assert!(episode.end_time.is_none());

        let first_id = episode.id;
        env.reset().unwrap();
        let episode = env.episode_info().unwrap();
        assert_ne!(episode.id, first_id);
        assert_eq!(episode.steps, 0);
    }

    #[test]
    fn test_boxed_environment_forwards() {
        let mut env: DynEnvironment = Box::new(Counter { steps: None });
        assert!(env.step(DiscreteAction(1)).unwrap_err().is_invalid_state());
        env.reset().unwrap();
        let step = env.step(DiscreteAction(1)).unwrap();
        assert_eq!(step.observation.data, vec![1.0]);
    }

    #[test]
    fn test_config_params() {
        let config: EnvironmentConfig =
            serde_json::from_value(json!({ "seed": 3, "std_dev": 0.5 })).unwrap();
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.max_steps, None);
        assert_eq!(config.param::<f64>("std_dev").unwrap(), Some(0.5));
        assert_eq!(config.param::<f64>("missing").unwrap(), None);
        assert!(config.param::<String>("std_dev").is_err());
    }

    #[test]
    fn test_step_info_fields() {
        let info = StepInfo::default().with("episode", 2).with("step", 5);
        assert_eq!(info.get("step"), Some(&json!(5)));
        assert_eq!(serde_json::to_value(&info).unwrap(), json!({ "episode": 2, "step": 5 }));
    }
}
