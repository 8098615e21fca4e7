//! Environment registry for creating environments by name

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use dummy_rl_core::{
    ActionSpace, DynEnvironment, EnvironmentConfig, ObservationSpace, RLError, Result, SpaceSpec,
};

use crate::{
    greater_than_zero, not_xor, two_in_a_row, GreaterThanZeroEnv, NotXorEnv, TimeLimit,
    TwoInARowEnv, BINARY_ACTIONS,
};

/// Constructor stored for each registered environment
pub type EnvConstructor = Box<dyn Fn(EnvironmentConfig) -> Result<DynEnvironment> + Send + Sync>;

lazy_static::lazy_static! {
    static ref REGISTRY: EnvRegistry = EnvRegistry::with_builtin();
}

/// Metadata an external harness can inspect before creating an environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvSpec {
    /// Stable registered name
    pub id: String,
    /// What the agent is expected to learn
    pub description: String,
    /// Environment version
    pub version: String,
    /// Observation space descriptor
    pub observation_space: SpaceSpec,
    /// Action space descriptor
    pub action_space: SpaceSpec,
}

impl EnvSpec {
    /// Create a new environment spec
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
        observation_space: SpaceSpec,
        action_space: SpaceSpec,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            version: version.into(),
            observation_space,
            action_space,
        }
    }
}

struct Entry {
    spec: EnvSpec,
    constructor: EnvConstructor,
}

/// Mapping from environment name to constructor
#[derive(Default)]
pub struct EnvRegistry {
    /// Registered environments
    envs: BTreeMap<String, Entry>,
}

impl EnvRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in environments
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();

        registry.register(
            EnvSpec::new(
                greater_than_zero::ID,
                greater_than_zero::DESCRIPTION,
                greater_than_zero::VERSION,
                greater_than_zero::observation_space().spec(),
                BINARY_ACTIONS.spec(),
            ),
            |config| Ok(Box::new(GreaterThanZeroEnv::new(config)?) as DynEnvironment),
        );
        registry.register(
            EnvSpec::new(
                not_xor::ID,
                not_xor::DESCRIPTION,
                not_xor::VERSION,
                not_xor::observation_space().spec(),
                BINARY_ACTIONS.spec(),
            ),
            |config| Ok(Box::new(NotXorEnv::new(config)?) as DynEnvironment),
        );
        registry.register(
            EnvSpec::new(
                two_in_a_row::ID,
                two_in_a_row::DESCRIPTION,
                two_in_a_row::VERSION,
                two_in_a_row::observation_space().spec(),
                BINARY_ACTIONS.spec(),
            ),
            |config| Ok(Box::new(TwoInARowEnv::new(config)?) as DynEnvironment),
        );

        registry
    }

    /// Register an environment, returning the spec it replaced, if any
    pub fn register<F>(&mut self, spec: EnvSpec, constructor: F) -> Option<EnvSpec>
    where
        F: Fn(EnvironmentConfig) -> Result<DynEnvironment> + Send + Sync + 'static,
    {
        let entry = Entry {
            spec: spec.clone(),
            constructor: Box::new(constructor),
        };
        self.envs.insert(spec.id, entry).map(|old| old.spec)
    }

    /// Create an environment by name
    ///
    /// When `config.max_steps` is set the environment is wrapped in a
    /// [`TimeLimit`].
    pub fn make(&self, name: &str, config: EnvironmentConfig) -> Result<DynEnvironment> {
        let entry = self.entry(name)?;
        let max_steps = config.max_steps;
        if max_steps == Some(0) {
            return Err(RLError::Environment("max_steps must be at least 1".to_string()));
        }

        let env = (entry.constructor)(config)?;
        tracing::debug!(env = name, ?max_steps, "environment made");
        Ok(match max_steps {
            Some(max_steps) => Box::new(TimeLimit::new(env, max_steps)) as DynEnvironment,
            None => env,
        })
    }

    /// Look up the metadata of a registered environment
    pub fn spec(&self, name: &str) -> Result<&EnvSpec> {
        self.entry(name).map(|entry| &entry.spec)
    }

    /// List registered environments, sorted by name
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        self.envs.keys().cloned().collect()
    }

    /// Iterate over the metadata of every registered environment
    pub fn specs(&self) -> impl Iterator<Item = &EnvSpec> {
        self.envs.values().map(|entry| &entry.spec)
    }

    fn entry(&self, name: &str) -> Result<&Entry> {
        self.envs
            .get(name)
            .ok_or_else(|| RLError::Environment(format!("Unknown environment: {name}")))
    }
}

/// Create a built-in environment by name
pub fn make_env(name: &str, config: EnvironmentConfig) -> Result<DynEnvironment> {
    REGISTRY.make(name, config)
}

/// Metadata of a built-in environment
pub fn env_spec(name: &str) -> Result<EnvSpec> {
    REGISTRY.spec(name).cloned()
}

/// List all built-in environments
#[must_use]
pub fn list_envs() -> Vec<String> {
    REGISTRY.list()
}
