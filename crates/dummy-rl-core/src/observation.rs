//! Observation representations and observation spaces

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::{RLError, SpaceSpec};

/// Trait for observations from an environment
pub trait Observation: Clone + Debug + Send + Sync {
    /// Convert observation to a feature vector
    fn to_vec(&self) -> Vec<f64>;

    /// Get the shape of the observation
    fn shape(&self) -> Vec<usize>;
}

/// Trait for defining observation spaces
pub trait ObservationSpace: Send + Sync {
    /// The type of observations in this space
    type Observation: Observation;

    /// Sample an observation using the supplied generator
    fn sample_with(&self, rng: &mut dyn RngCore) -> Self::Observation;

    /// Sample a random observation from the space
    fn sample(&self) -> Self::Observation {
        self.sample_with(&mut rand::thread_rng())
    }

    /// Check if an observation is valid within this space
    fn contains(&self, obs: &Self::Observation) -> bool;

    /// Get the shape of observations in this space
    fn shape(&self) -> Vec<usize>;

    /// Serializable description of the space
    fn spec(&self) -> SpaceSpec;
}

/// Vector observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorObservation {
    /// The observation data
    pub data: Vec<f64>,
}

impl VectorObservation {
    /// Create a new vector observation
    #[must_use]
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Single-element observation
    #[must_use]
    pub fn scalar(value: f64) -> Self {
        Self { data: vec![value] }
    }

    /// First element, if any
    #[must_use]
    pub fn first(&self) -> Option<f64> {
        self.data.first().copied()
    }
}

impl Observation for VectorObservation {
    fn to_vec(&self) -> Vec<f64> {
        self.data.clone()
    }

    fn shape(&self) -> Vec<usize> {
        vec![self.data.len()]
    }
}

impl From<Vec<f64>> for VectorObservation {
    fn from(data: Vec<f64>) -> Self {
        Self { data }
    }
}

/// Box observation space
#[derive(Debug, Clone)]
pub struct BoxObservationSpace {
    /// Lower bounds
    pub low: Vec<f64>,
    /// Upper bounds
    pub high: Vec<f64>,
    /// Shape of observations
    pub shape: Vec<usize>,
}

impl BoxObservationSpace {
    /// Create a new box observation space
    pub fn new(low: Vec<f64>, high: Vec<f64>, shape: Vec<usize>) -> crate::Result<Self> {
        let total_size: usize = shape.iter().product();
        if low.len() != total_size {
            return Err(RLError::DimensionMismatch {
                expected: total_size,
                actual: low.len(),
            });
        }
        if high.len() != total_size {
            return Err(RLError::DimensionMismatch {
                expected: total_size,
                actual: high.len(),
            });
        }
        if let Some((i, (l, h))) = low
            .iter()
            .zip(&high)
            .enumerate()
            .find(|(_, (l, h))| !l.is_finite() || !h.is_finite() || l > h)
        {
            return Err(RLError::Environment(format!(
                "invalid bounds at index {i}: [{l}, {h}]"
            )));
        }
        Ok(Self { low, high, shape })
    }
}

impl ObservationSpace for BoxObservationSpace {
    type Observation = VectorObservation;

    fn sample_with(&self, rng: &mut dyn RngCore) -> Self::Observation {
        let data: Vec<f64> = self
            .low
            .iter()
            .zip(&self.high)
            .map(|(l, h)| rng.gen_range(*l..=*h))
            .collect();

        VectorObservation { data }
    }

    fn contains(&self, obs: &Self::Observation) -> bool {
        obs.data.len() == self.low.len()
            && obs
                .data
                .iter()
                .zip(&self.low)
                .zip(&self.high)
                .all(|((x, l), h)| x >= l && x <= h)
    }

    fn shape(&self) -> Vec<usize> {
        self.shape.clone()
    }

    fn spec(&self) -> SpaceSpec {
        SpaceSpec::Box {
            low: self.low.clone(),
            high: self.high.clone(),
            shape: self.shape.clone(),
        }
    }
}

/// Observation space whose elements each take an integer value in `0..n`
#[derive(Debug, Clone)]
pub struct DiscreteObservationSpace {
    /// Number of distinct values per element
    pub n: usize,
    /// Shape of observations
    pub shape: Vec<usize>,
}

impl DiscreteObservationSpace {
    /// Create a new discrete observation space
    #[must_use]
    pub fn new(n: usize, shape: Vec<usize>) -> Self {
        Self { n, shape }
    }

    fn len(&self) -> usize {
        self.shape.iter().product()
    }
}

impl ObservationSpace for DiscreteObservationSpace {
    type Observation = VectorObservation;

    #[allow(clippy::cast_precision_loss)]
    fn sample_with(&self, rng: &mut dyn RngCore) -> Self::Observation {
        let data = (0..self.len())
            .map(|_| rng.gen_range(0..self.n) as f64)
            .collect();
        VectorObservation { data }
    }

    #[allow(clippy::cast_precision_loss)]
    fn contains(&self, obs: &Self::Observation) -> bool {
        obs.data.len() == self.len()
            && obs
                .data
                .iter()
                .all(|x| x.fract() == 0.0 && *x >= 0.0 && *x < self.n as f64)
    }

    fn shape(&self) -> Vec<usize> {
        self.shape.clone()
    }

    fn spec(&self) -> SpaceSpec {
        SpaceSpec::Discrete {
            n: self.n,
            shape: self.shape.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_box_space_dimension_check() {
        let err = BoxObservationSpace::new(vec![-1.0], vec![1.0, 1.0], vec![1]).unwrap_err();
        assert!(matches!(
            err,
            RLError::DimensionMismatch { expected: 1, actual: 2 }
        ));
    }

    #[test]
    fn test_box_space_rejects_bad_bounds() {
        let inverted = BoxObservationSpace::new(vec![1.0], vec![-1.0], vec![1]).unwrap_err();
        assert!(matches!(inverted, RLError::Environment(ref msg) if msg.contains("index 0")));

        for (low, high) in [(f64::NAN, 1.0), (-1.0, f64::INFINITY), (f64::NEG_INFINITY, 0.0)] {
            let err = BoxObservationSpace::new(vec![0.0, low], vec![1.0, high], vec![2]);
            assert!(matches!(err, Err(RLError::Environment(_))));
        }
    }

    #[test]
    fn test_box_space_degenerate_bounds_sample() {
        let space = BoxObservationSpace::new(vec![2.0], vec![2.0], vec![1]).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(space.sample_with(&mut rng).data, vec![2.0]);
    }

    #[test]
    fn test_box_space_contains() {
        let space = BoxObservationSpace::new(vec![-5.0], vec![5.0], vec![1]).unwrap();
        assert!(space.contains(&VectorObservation::scalar(-3.5)));
        assert!(space.contains(&VectorObservation::scalar(5.0)));
        assert!(!space.contains(&VectorObservation::scalar(5.1)));
        assert!(!space.contains(&VectorObservation::new(vec![0.0, 0.0])));
    }

    #[test]
    fn test_discrete_space_sampling() {
        let space = DiscreteObservationSpace::new(2, vec![2]);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let obs = space.sample_with(&mut rng);
            assert_eq!(obs.data.len(), 2);
            assert!(space.contains(&obs));
        }
        assert!(!space.contains(&VectorObservation::new(vec![0.5, 1.0])));
        assert!(!space.contains(&VectorObservation::new(vec![2.0, 1.0])));
    }

    #[test]
    fn test_specs() {
        let space = DiscreteObservationSpace::new(2, vec![1]);
        assert_eq!(space.spec(), SpaceSpec::Discrete { n: 2, shape: vec![1] });

        let space = BoxObservationSpace::new(vec![-5.0], vec![5.0], vec![1]).unwrap();
        assert_eq!(
            space.spec(),
            SpaceSpec::Box {
                low: vec![-5.0],
                high: vec![5.0],
                shape: vec![1]
            }
        );
    }
}
