//! Value functions for inspecting what an agent has learned

use std::collections::HashMap;

use crate::{Action, DiscreteAction, Observation, VectorObservation};

/// Action value function Q(s, a)
pub trait ActionValueFunction: Send + Sync {
    /// Observation type
    type Observation: Observation;
    /// Action type
    type Action: Action;

    /// Estimate the value of taking an action given an observation
    fn q_value(&self, observation: &Self::Observation, action: &Self::Action)
        -> crate::Result<f64>;

    /// Get Q-values for all actions
    fn all_q_values(&self, observation: &Self::Observation) -> crate::Result<Vec<f64>>;
}

/// Tabular Q-function (for discrete observation and action spaces)
#[derive(Debug, Clone)]
pub struct TabularQFunction {
    /// Q-value table, keyed by the serialized observation
    pub q_values: HashMap<String, Vec<f64>>,
    /// Number of actions
    pub num_actions: usize,
    /// Default Q-value
    pub default_q_value: f64,
}

impl TabularQFunction {
    /// Create a new tabular Q-function
    #[must_use]
    pub fn new(num_actions: usize, default_q_value: f64) -> Self {
        Self {
            q_values: HashMap::new(),
            num_actions,
            default_q_value,
        }
    }

    fn key(observation: &VectorObservation) -> crate::Result<String> {
        Ok(serde_json::to_string(observation)?)
    }

    /// Update Q-value for an observation-action pair
    pub fn update(
        &mut self,
        observation: &VectorObservation,
        action: DiscreteAction,
        value: f64,
    ) -> crate::Result<()> {
        if action.0 >= self.num_actions {
            return Err(crate::RLError::InvalidAction(format!(
                "{action} is not in Discrete({})",
                self.num_actions
            )));
        }
        let (num_actions, default) = (self.num_actions, self.default_q_value);
        let values = self
            .q_values
            .entry(Self::key(observation)?)
            .or_insert_with(|| vec![default; num_actions]);
        values[action.0] = value;
        Ok(())
    }
}

impl ActionValueFunction for TabularQFunction {
    type Observation = VectorObservation;
    type Action = DiscreteAction;

    fn q_value(
        &self,
        observation: &Self::Observation,
        action: &Self::Action,
    ) -> crate::Result<f64> {
        let values = self.q_values.get(&Self::key(observation)?);

        Ok(values
            .and_then(|v| v.get(action.0))
            .copied()
            .unwrap_or(self.default_q_value))
    }

    fn all_q_values(&self, observation: &Self::Observation) -> crate::Result<Vec<f64>> {
        Ok(self
            .q_values
            .get(&Self::key(observation)?)
            .cloned()
            .unwrap_or_else(|| vec![self.default_q_value; self.num_actions]))
    }
}
