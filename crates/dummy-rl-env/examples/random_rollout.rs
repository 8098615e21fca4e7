//! Example: Random agent on every registered environment

use dummy_rl_core::{DiscreteSpace, Policy, RandomPolicy, TrackedEnvironment};
use dummy_rl_env::prelude::*;
use dummy_rl_env::{list_envs, EnvironmentConfig};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let num_episodes = 5;

    for name in list_envs() {
        let config = EnvironmentConfig::default().with_seed(0).with_max_steps(100);
        let mut env = TrackedEnvironment::new(make_env(&name, config)?);
        let mut agent: RandomPolicy<_> = RandomPolicy::with_seed(DiscreteSpace::new(2), 0);

        println!("{name}");
        for episode in 0..num_episodes {
            let (mut observation, _info) = env.reset()?;

            loop {
                let step = env.step(agent.act(&observation)?)?;
                if step.done || step.truncated {
                    break;
                }
                observation = step.observation;
            }

            if let Some(info) = env.episode_info() {
                println!(
                    "  Episode {}: Total Reward = {:.1}, Steps = {}",
                    episode + 1,
                    info.total_reward,
                    info.steps
                );
            }
        }
    }

    Ok(())
}
