mod cli;

use std::io;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use lightpath_core::config::SimulationConfig;
use lightpath_core::graph::Network;
use lightpath_data::{export_file, load_config, load_scenario, load_topology, write_csv};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

/// A directory is a scenario; anything else is a bare topology file.
fn load_input(input: &Path) -> anyhow::Result<(Network, SimulationConfig)> {
    if input.is_dir() {
        let scenario = load_scenario(input)
            .with_context(|| format!("loading scenario {}", input.display()))?;
        Ok((scenario.network, scenario.config))
    } else {
        let network = load_topology(input)
            .with_context(|| format!("loading topology {}", input.display()))?;
        Ok((network, SimulationConfig::default()))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so CSV on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Simulate {
            input,
            output,
            config,
            power,
            from,
            to,
        } => {
            let (network, mut sim_config) = load_input(&input)?;
            if let Some(path) = config {
                sim_config = load_config(&path)
                    .with_context(|| format!("loading config {}", path.display()))?;
            }
            if let Some(power) = power {
                sim_config.input_power = power;
            }
            if let (Some(from), Some(to)) = (from, to) {
                sim_config.pairs = Some(vec![(from, to)]);
            }

            let metrics = network.simulate_all(&sim_config)?;
            info!(paths = metrics.len(), "simulated");

            match output {
                Some(path) => export_file(&path, &metrics)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => write_csv(io::stdout().lock(), &metrics)?,
            }
        }

        Command::Paths { input, from, to } => {
            let (network, _) = load_input(&input)?;
            let paths = network.find_paths(&from, &to)?;
            for path in &paths {
                println!("{}", path.join("->"));
            }
            info!(count = paths.len(), "paths listed");
        }
    }

    Ok(())
}
