//! Observation sources for the toy environments
//!
//! Environments draw every observation through an [`ObservationSampler`], so
//! the random draw is independent of the reward rule and can be replaced by a
//! fixed sequence when an agent has to be checked against known inputs.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use dummy_rl_core::{RLError, Result, VectorObservation};

/// Source of observations for an environment
pub trait ObservationSampler: Send + Sync {
    /// Draw the next observation
    fn sample(&mut self) -> Result<VectorObservation>;
}

/// Seeded generator, or one seeded from entropy when no seed is given
pub(crate) fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Draws a single value from a normal distribution, clamped to `[-bound, bound]`
pub struct GaussianSampler {
    normal: Normal<f64>,
    bound: f64,
    rng: StdRng,
}

impl GaussianSampler {
    /// Create a new gaussian sampler
    pub fn new(mean: f64, std_dev: f64, bound: f64, seed: Option<u64>) -> Result<Self> {
        if !(bound.is_finite() && bound > 0.0) {
            return Err(RLError::Environment(format!(
                "observation bound must be positive and finite, got {bound}"
            )));
        }
        let normal = Normal::new(mean, std_dev).map_err(|e| {
            RLError::Environment(format!("invalid normal distribution N({mean}, {std_dev}): {e}"))
        })?;
        Ok(Self {
            normal,
            bound,
            rng: rng_from_seed(seed),
        })
    }

    /// Clamp bound
    #[must_use]
    pub fn bound(&self) -> f64 {
        self.bound
    }
}

impl ObservationSampler for GaussianSampler {
    fn sample(&mut self) -> Result<VectorObservation> {
        let value = self.normal.sample(&mut self.rng);
        Ok(VectorObservation::scalar(value.clamp(-self.bound, self.bound)))
    }
}

/// Draws `width` independent fair bits, each `0.0` or `1.0`
pub struct BinarySampler {
    width: usize,
    rng: StdRng,
}

impl BinarySampler {
    /// Create a new binary sampler
    #[must_use]
    pub fn new(width: usize, seed: Option<u64>) -> Self {
        Self {
            width,
            rng: rng_from_seed(seed),
        }
    }
}

impl ObservationSampler for BinarySampler {
    fn sample(&mut self) -> Result<VectorObservation> {
        let data = (0..self.width)
            .map(|_| if self.rng.gen::<bool>() { 1.0 } else { 0.0 })
            .collect();
        Ok(VectorObservation::new(data))
    }
}

/// Replays a fixed sequence of observations
#[derive(Debug, Clone, Default)]
pub struct ScriptedSampler {
    remaining: VecDeque<VectorObservation>,
}

impl ScriptedSampler {
    /// Replay the given observations in order
    pub fn new<I>(observations: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<VectorObservation>,
    {
        Self {
            remaining: observations.into_iter().map(Into::into).collect(),
        }
    }

    /// Replay single-element observations
    pub fn scalars(values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(values.into_iter().map(VectorObservation::scalar))
    }

    /// Number of observations left to replay
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }
}

impl ObservationSampler for ScriptedSampler {
    fn sample(&mut self) -> Result<VectorObservation> {
        self.remaining
            .pop_front()
            .ok_or_else(|| RLError::InvalidState("scripted observations exhausted".to_string()))
    }
}
