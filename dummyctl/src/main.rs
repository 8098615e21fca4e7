// dummy-rl Control CLI
// Inspect the registered toy environments and run baseline rollouts

use anyhow::Result;
use clap::{Parser, Subcommand};
use dummy_rl_env::EnvSpec;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod run;

use run::{PolicyKind, RunOptions};

#[derive(Parser)]
#[command(name = "dummyctl")]
#[command(about = "Toy RL environment control CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered environments
    List,

    /// Print an environment's metadata as JSON
    Describe {
        /// Registered environment id
        id: String,
    },

    /// Run episodes with a baseline policy and report rewards
    Run {
        /// Registered environment id
        id: String,

        /// Number of episodes
        #[arg(short, long, default_value = "5")]
        episodes: usize,

        /// Steps per episode (default 100)
        #[arg(long)]
        max_steps: Option<usize>,

        /// Random seed for the environment and the policy
        #[arg(long)]
        seed: Option<u64>,

        /// Policy to run
        #[arg(short, long, value_enum, default_value = "random")]
        policy: PolicyKind,

        /// JSON environment config; flags take precedence
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Specs of every environment in the process-wide registry, sorted by id
fn registered_specs() -> Result<Vec<EnvSpec>> {
    dummy_rl_env::list_envs()
        .iter()
        .map(|id| dummy_rl_env::env_spec(id).map_err(Into::into))
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            for spec in registered_specs()? {
                println!("{:<20} {}", spec.id, spec.description);
            }
        }

        Commands::Describe { id } => {
            let spec = dummy_rl_env::env_spec(&id)?;
            println!("{}", serde_json::to_string_pretty(&spec)?);
        }

        Commands::Run {
            id,
            episodes,
            max_steps,
            seed,
            policy,
            config,
            json,
        } => {
            let options = RunOptions {
                env_id: id,
                episodes,
                max_steps,
                seed,
                policy,
                config_path: config,
            };
            let summary = run::run_episodes(&options)?;
            run::print_summary(&summary, json)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_matches_describe() {
        let specs = registered_specs().unwrap();
        let ids: Vec<_> = specs.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, dummy_rl_env::list_envs());

        for spec in &specs {
            assert_eq!(&dummy_rl_env::env_spec(&spec.id).unwrap(), spec);
        }
    }

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::try_parse_from(["dummyctl", "run", "NotXOR-v0", "--seed", "3"]).unwrap();
        match cli.command {
            Commands::Run { id, episodes, seed, policy, .. } => {
                assert_eq!(id, "NotXOR-v0");
                assert_eq!(episodes, 5);
                assert_eq!(seed, Some(3));
                assert_eq!(policy, PolicyKind::Random);
            }
            _ => panic!("expected run"),
        }
    }
}
