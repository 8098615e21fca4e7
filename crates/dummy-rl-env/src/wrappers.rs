//! Environment wrappers

use dummy_rl_core::{ActionSpace, Environment, Episode, ObservationSpace, RLError, Step, StepInfo};

/// Time limit wrapper
///
/// The toy environments never end an episode themselves; this wrapper ends
/// it after `max_steps` steps by reporting `done` and `truncated`. Stepping
/// again before the next reset fails with [`RLError::InvalidState`].
pub struct TimeLimit<E> {
    /// Inner environment
    pub env: E,
    /// Maximum steps
    pub max_steps: usize,
    /// Current step count
    pub steps: usize,
    finished: bool,
}

impl<E> TimeLimit<E> {
    /// Create a new time limit wrapper
    pub fn new(env: E, max_steps: usize) -> Self {
        Self {
            env,
            max_steps,
            steps: 0,
            finished: false,
        }
    }

    /// Whether the current episode has used up its budget
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl<E> Environment for TimeLimit<E>
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

    fn reset(&mut self) -> dummy_rl_core::Result<(Self::Observation, StepInfo)> {
        let reset = self.env.reset()?;
        self.steps = 0;
        self.finished = false;
        Ok(reset)
    }

    fn step(&mut self, action: Self::Action) -> dummy_rl_core::Result<Step<Self::Observation>> {
        if self.finished {
            return Err(RLError::InvalidState(format!(
                "episode is done after {} steps, call reset",
                self.steps
            )));
        }

        let mut step = self.env.step(action)?;
        self.steps += 1;

        if self.steps >= self.max_steps && !step.done {
            tracing::debug!(max_steps = self.max_steps, "time limit reached");
            step.truncated = true;
            step.done = true;
        }
        self.finished = step.done;

        Ok(step)
    }

    fn render(&self) -> dummy_rl_core::Result<()> {
        self.env.render()
    }

    fn close(&mut self) -> dummy_rl_core::Result<()> {
        self.env.close()
    }

    fn episode_info(&self) -> Option<Episode> {
        self.env.episode_info()
    }
}
