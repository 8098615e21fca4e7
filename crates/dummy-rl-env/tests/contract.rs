//! Reset/step contract checks run against every registered environment

use approx::{assert_abs_diff_eq, assert_relative_eq};
use dummy_rl_core::{
    ConstantPolicy, DiscreteSpace, Policy, RLError, RandomPolicy, TrackedEnvironment,
};
use dummy_rl_env::prelude::*;
use dummy_rl_env::{list_envs, DynEnvironment, EnvironmentConfig};

fn make(name: &str, config: EnvironmentConfig) -> DynEnvironment {
    match make_env(name, config) {
        Ok(env) => env,
        Err(e) => panic!("failed to make {name}: {e}"),
    }
}

fn mean_reward(
    env: &mut DynEnvironment,
    policy: &mut dyn Policy<Observation = VectorObservation, Action = DiscreteAction>,
    steps: usize,
) -> f64 {
    let (mut obs, _) = env.reset().unwrap();
    let mut total = 0.0;
    for _ in 0..steps {
        let step = env.step(policy.act(&obs).unwrap()).unwrap();
        total += step.reward.0;
        obs = step.observation;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = total / steps as f64;
    mean
}

#[test]
fn test_step_before_reset_fails() {
    for name in list_envs() {
        let mut env = make(&name, EnvironmentConfig::default());
        let err = env.step(DiscreteAction(0)).unwrap_err();
        assert!(matches!(err, RLError::InvalidState(_)), "{name}: {err}");
    }
}

#[test]
fn test_invalid_action_fails_fast() {
    for name in list_envs() {
        let mut env = make(&name, EnvironmentConfig::default().with_seed(17));
        let mut twin = make(&name, EnvironmentConfig::default().with_seed(17));
        env.reset().unwrap();
        twin.reset().unwrap();

        let err = env.step(DiscreteAction(2)).unwrap_err();
        assert!(err.is_invalid_action(), "{name}: {err}");

        // A rejected action must not advance the environment.
        let left = env.step(DiscreteAction(1)).unwrap();
        let right = twin.step(DiscreteAction(1)).unwrap();
        assert_eq!(left.observation, right.observation, "{name}");
        assert_eq!(left.reward, right.reward, "{name}");
    }
}

#[test]
fn test_spaces_match_observations() {
    for name in list_envs() {
        let mut env = make(&name, EnvironmentConfig::default().with_seed(3));
        let observation_space = env.observation_space();
        let action_space = env.action_space();
        assert_eq!(action_space.spec().cardinality(), Some(2), "{name}");

        let (obs, _) = env.reset().unwrap();
        assert!(observation_space.contains(&obs), "{name}: {obs:?}");
        for _ in 0..50 {
            let action = action_space.sample();
            let step = env.step(action).unwrap();
            assert!(observation_space.contains(&step.observation), "{name}");
            assert!(!step.done && !step.truncated, "{name}");
        }
    }
}

#[test]
fn test_seeded_runs_repeat() {
    for name in list_envs() {
        let mut a = make(&name, EnvironmentConfig::default().with_seed(99));
        let mut b = make(&name, EnvironmentConfig::default().with_seed(99));
        assert_eq!(a.reset().unwrap().0, b.reset().unwrap().0, "{name}");
        for i in 0..20 {
            let action = DiscreteAction(i % 2);
            let left = a.step(action).unwrap();
            let right = b.step(action).unwrap();
            assert_eq!(left.observation, right.observation, "{name}");
            assert_eq!(left.reward, right.reward, "{name}");
        }
    }
}

#[test]
fn test_reset_ignores_previous_episode() {
    // Resetting twice must look like resetting once: the mean of reset
    // observations is the same whether or not steps happened in between.
    let mut fresh = make("GreaterThanZero-v0", EnvironmentConfig::default().with_seed(5));
    let mut used = make("GreaterThanZero-v0", EnvironmentConfig::default().with_seed(6));
    let n: u32 = 2000;
    let (mut fresh_sum, mut used_sum) = (0.0, 0.0);
    for _ in 0..n {
        fresh_sum += fresh.reset().unwrap().0.data[0];
        used.reset().unwrap();
        used.step(DiscreteAction(1)).unwrap();
        used_sum += used.reset().unwrap().0.data[0];
    }
    let (fresh_mean, used_mean) = (fresh_sum / f64::from(n), used_sum / f64::from(n));
    assert_abs_diff_eq!(fresh_mean, 0.0, epsilon = 0.1);
    assert_abs_diff_eq!(used_mean, 0.0, epsilon = 0.1);
}

#[test]
fn test_random_policy_scores_near_zero() {
    for name in list_envs() {
        let mut env = make(&name, EnvironmentConfig::default().with_seed(21));
        let mut policy: RandomPolicy<_> = RandomPolicy::with_seed(DiscreteSpace::new(2), 21);
        let mean = mean_reward(&mut env, &mut policy, 4000);
        assert!(mean.abs() < 0.1, "{name}: {mean}");
    }
}

#[test]
fn test_constant_policy_is_not_optimal() {
    for name in list_envs() {
        for action in [0, 1] {
            let mut env = make(&name, EnvironmentConfig::default().with_seed(8));
            let mut policy = ConstantPolicy::new(DiscreteAction(action));
            let mean = mean_reward(&mut env, &mut policy, 4000);
            assert!(mean < 0.5, "{name} always {action}: {mean}");
        }
    }
}

#[test]
fn test_step_budget_from_config() {
    for name in list_envs() {
        let mut env = make(&name, EnvironmentConfig::default().with_seed(1).with_max_steps(5));
        env.reset().unwrap();
        for _ in 0..4 {
            assert!(!env.step(DiscreteAction(0)).unwrap().done);
        }
        let last = env.step(DiscreteAction(0)).unwrap();
        assert!(last.done && last.truncated, "{name}");
        assert!(env.step(DiscreteAction(0)).unwrap_err().is_invalid_state());
    }
}

#[test]
fn test_tracked_registry_environment() {
    let env = make("NotXOR-v0", EnvironmentConfig::default().with_seed(4).with_max_steps(10));
    let mut env = TrackedEnvironment::new(env);
    let mut policy = ConstantPolicy::new(DiscreteAction(0));

    let (mut obs, _) = env.reset().unwrap();
    let mut total = 0.0;
    loop {
        let step = env.step(policy.act(&obs).unwrap()).unwrap();
        total += step.reward.0;
        if step.done {
            break;
        }
        obs = step.observation;
    }

    let episode = env.episode_info().unwrap();
    assert_eq!(episode.steps, 10);
    assert!(episode.truncated);
    assert!(episode.end_time.is_some());
    assert_relative_eq!(episode.total_reward, total);
}
