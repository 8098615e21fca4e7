// Rollout command for dummyctl

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::path::PathBuf;

use dummy_rl_core::{
    ConstantPolicy, DiscreteAction, DiscreteSpace, Environment, EnvironmentConfig, Policy,
    RandomPolicy, TrackedEnvironment, VectorObservation,
};

/// Episode budget when neither the config file nor the flags set one
const DEFAULT_MAX_STEPS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyKind {
    /// Uniformly random actions
    Random,
    /// Always action 0
    Zero,
    /// Always action 1
    One,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub env_id: String,
    pub episodes: usize,
    pub max_steps: Option<usize>,
    pub seed: Option<u64>,
    pub policy: PolicyKind,
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub total_reward: f64,
    pub steps: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub env_id: String,
    pub policy: String,
    pub episodes: Vec<EpisodeSummary>,
    pub mean_reward: f64,
}

type BoxedPolicy = Box<dyn Policy<Observation = VectorObservation, Action = DiscreteAction>>;

fn load_config(options: &RunOptions) -> Result<EnvironmentConfig> {
    let mut config = match &options.config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str::<EnvironmentConfig>(&content)
                .with_context(|| format!("Invalid environment config {}", path.display()))?
        }
        None => EnvironmentConfig::default(),
    };

    if let Some(seed) = options.seed {
        config.seed = Some(seed);
    }
    if let Some(max_steps) = options.max_steps {
        config.max_steps = Some(max_steps);
    }
    config.max_steps.get_or_insert(DEFAULT_MAX_STEPS);

    Ok(config)
}

fn make_policy(kind: PolicyKind, seed: Option<u64>) -> BoxedPolicy {
    match kind {
        PolicyKind::Random => {
            let space = DiscreteSpace::new(2);
            match seed {
                Some(seed) => Box::new(RandomPolicy::<_, VectorObservation>::with_seed(
                    space, seed,
                )),
                None => Box::new(RandomPolicy::<_, VectorObservation>::new(space)),
            }
        }
        PolicyKind::Zero => Box::new(ConstantPolicy::new(DiscreteAction(0))),
        PolicyKind::One => Box::new(ConstantPolicy::new(DiscreteAction(1))),
    }
}

pub fn run_episodes(options: &RunOptions) -> Result<RunSummary> {
    let config = load_config(options)?;
    let seed = config.seed;
    let env = dummy_rl_env::make_env(&options.env_id, config)
        .with_context(|| format!("Failed to create {}", options.env_id))?;
    let mut env = TrackedEnvironment::new(env);
    let mut policy = make_policy(options.policy, seed);

    tracing::info!(
        env = %options.env_id,
        policy = ?options.policy,
        episodes = options.episodes,
        "starting rollouts"
    );

    let mut episodes = Vec::with_capacity(options.episodes);
    for episode in 0..options.episodes {
        let (mut observation, _info) = env.reset()?;

        loop {
            let action = policy.act(&observation)?;
            let step = env.step(action)?;
            if step.done || step.truncated {
                break;
            }
            observation = step.observation;
        }

        let info = env
            .episode_info()
            .context("Tracked environment lost its episode")?;
        episodes.push(EpisodeSummary {
            episode: episode + 1,
            total_reward: info.total_reward,
            steps: info.steps,
        });
    }
    env.close()?;

    #[allow(clippy::cast_precision_loss)]
    let mean_reward = if episodes.is_empty() {
        0.0
    } else {
        episodes.iter().map(|e| e.total_reward).sum::<f64>() / episodes.len() as f64
    };

    Ok(RunSummary {
        env_id: options.env_id.clone(),
        policy: format!("{:?}", options.policy).to_lowercase(),
        episodes,
        mean_reward,
    })
}

pub fn print_summary(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!("Environment: {}", summary.env_id);
    println!("Policy: {}", summary.policy);
    for episode in &summary.episodes {
        println!(
            "Episode {}: Total Reward = {:.2}, Steps = {}",
            episode.episode, episode.total_reward, episode.steps
        );
    }
    println!(
        "\nAverage Reward over {} episodes: {:.2}",
        summary.episodes.len(),
        summary.mean_reward
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn options(env_id: &str) -> RunOptions {
        RunOptions {
            env_id: env_id.to_string(),
            episodes: 3,
            max_steps: Some(20),
            seed: Some(7),
            policy: PolicyKind::Random,
            config_path: None,
        }
    }

    #[test]
    fn test_run_respects_budget() {
        let summary = run_episodes(&options("TwoInARow-v0")).unwrap();
        assert_eq!(summary.episodes.len(), 3);
        assert!(summary.episodes.iter().all(|e| e.steps == 20));
        assert!(summary
            .episodes
            .iter()
            .all(|e| e.total_reward.abs() <= 20.0));
        assert_eq!(summary.policy, "random");
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let a = run_episodes(&options("GreaterThanZero-v0")).unwrap();
        let b = run_episodes(&options("GreaterThanZero-v0")).unwrap();
        let rewards =
            |s: &RunSummary| s.episodes.iter().map(|e| e.total_reward).collect::<Vec<_>>();
        assert_eq!(rewards(&a), rewards(&b));
    }

    #[test]
    fn test_unknown_environment() {
        let err = run_episodes(&options("Pong-v5")).unwrap_err();
        assert!(err.to_string().contains("Pong-v5"));
    }

    #[test]
    fn test_default_budget() {
        let mut opts = options("NotXOR-v0");
        opts.max_steps = None;
        opts.episodes = 1;
        let summary = run_episodes(&opts).unwrap();
        assert_eq!(summary.episodes[0].steps, DEFAULT_MAX_STEPS);
    }

    #[test]
    fn test_config_file_with_flag_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"seed": 1, "max_steps": 4, "std_dev": 2.0}}"#).unwrap();

        let mut opts = options("GreaterThanZero-v0");
        opts.config_path = Some(file.path().to_path_buf());
        opts.max_steps = None;
        opts.seed = None;

        let config = load_config(&opts).unwrap();
        assert_eq!(config.seed, Some(1));
        assert_eq!(config.max_steps, Some(4));
        assert_eq!(config.param::<f64>("std_dev").unwrap(), Some(2.0));

        opts.max_steps = Some(6);
        let summary = run_episodes(&opts).unwrap();
        assert!(summary.episodes.iter().all(|e| e.steps == 6));
    }

    #[test]
    fn test_invalid_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let mut opts = options("NotXOR-v0");
        opts.config_path = Some(file.path().to_path_buf());
        let err = run_episodes(&opts).unwrap_err();
        assert!(err.to_string().contains("Invalid environment config"));
    }

    #[test]
    fn test_constant_policy_name() {
        let mut opts = options("NotXOR-v0");
        opts.policy = PolicyKind::One;
        let summary = run_episodes(&opts).unwrap();
        assert_eq!(summary.policy, "one");
    }
}
