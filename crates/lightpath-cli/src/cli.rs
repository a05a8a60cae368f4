use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "lightpath",
    about = "Enumerate network paths and report latency, noise and SNR"
)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Simulate every path of every node pair and write the weighted-path table
    Simulate {
        /// Topology file (.json/.ron/.toml) or a scenario directory holding
        /// `topology.*` and optionally `simulation.*`
        input: PathBuf,
        /// Output file (.csv or .json). Prints CSV to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Simulation config file, overriding the scenario's own
        #[arg(long)]
        config: Option<PathBuf>,
        /// Launch power in watts, overriding any config
        #[arg(long)]
        power: Option<f64>,
        /// Restrict to paths starting at this node (requires --to)
        #[arg(long, requires = "to")]
        from: Option<String>,
        /// Restrict to paths ending at this node (requires --from)
        #[arg(long, requires = "from")]
        to: Option<String>,
    },
    /// List the simple paths between two nodes
    Paths {
        /// Topology file (.json/.ron/.toml)
        input: PathBuf,
        /// Source node label
        from: String,
        /// Destination node label
        to: String,
    },
}
