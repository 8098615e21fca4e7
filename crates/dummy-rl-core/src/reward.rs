//! Reward signals and reward functions

use serde::{Deserialize, Serialize};

/// Reward signal from the environment
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Reward(pub f64);

impl Reward {
    /// Reward for choosing the correct action
    pub const CORRECT: Self = Self(1.0);
    /// Reward for choosing the wrong action
    pub const WRONG: Self = Self(-1.0);

    /// Create a new reward
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// `CORRECT` when `correct` holds, `WRONG` otherwise
    #[must_use]
    pub fn judge(correct: bool) -> Self {
        if correct {
            Self::CORRECT
        } else {
            Self::WRONG
        }
    }

    /// Get the reward value
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<f64> for Reward {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<Reward> for f64 {
    fn from(reward: Reward) -> Self {
        reward.0
    }
}

impl std::ops::Add for Reward {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self(self.0 + other.0)
    }
}

impl std::ops::Mul<f64> for Reward {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self::Output {
        Self(self.0 * scalar)
    }
}

/// Trait for reward functions
///
/// `previous` is the observation the agent acted on and `next` the one the
/// environment produced in response. Rules that only look at what the agent
/// saw ignore `next`.
pub trait RewardFunction: Send + Sync {
    /// Observation type
    type Observation;
    /// Action type
    type Action;

    /// Compute reward for a previous-observation, action, next-observation transition
    fn reward(
        &self,
        previous: &Self::Observation,
        action: &Self::Action,
        next: &Self::Observation,
    ) -> Reward;

    /// The action this rule rewards for the transition
    fn correct_action(&self, previous: &Self::Observation, next: &Self::Observation)
        -> Self::Action;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_judge() {
        assert_relative_eq!(Reward::judge(true).value(), 1.0);
        assert_relative_eq!(Reward::judge(false).value(), -1.0);
    }

    #[test]
    fn test_arithmetic() {
        let total = Reward::CORRECT + Reward::WRONG + Reward::CORRECT;
        assert_relative_eq!(total.value(), 1.0);
        assert_relative_eq!((Reward::CORRECT * 0.5).value(), 0.5);
        assert_relative_eq!(f64::from(Reward::from(2.0)), 2.0);
    }
}
