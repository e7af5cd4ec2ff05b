use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sdminer_core::{MinerConfig, ParentBookkeeping, Strategy, Threshold};

/// Mine node sets whose induced subgraph stays stable across a temporal graph.
#[derive(Parser, Debug)]
#[command(name = "sdminer", version, about)]
pub struct CliArgs {
    /// TOML config file (default: SDMINER_* environment variables)
    #[arg(long, global = true, env = "SDMINER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print timestamps, order, min/max edges per timestamp and size
    Summary {
        /// TSV edge list (timestamp, node1, node2)
        input: Option<PathBuf>,

        /// Emit JSON instead of a tab-separated line
        #[arg(long)]
        json: bool,
    },

    /// Run one levelwise search and report the resulting node sets
    Mine {
        #[command(flatten)]
        search: SearchArgs,

        /// Bound on scaled divergence
        #[arg(long, conflicts_with = "phi")]
        sigma: Option<f64>,

        /// Bound on raw divergence
        #[arg(long)]
        phi: Option<f64>,

        /// Report every accepted node set, not only the maximal ones
        #[arg(long)]
        all: bool,

        /// Write the TSV report here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Emit JSON rows instead of TSV
        #[arg(long)]
        json: bool,
    },

    /// Mine maximal node sets for several sigmas and write ranked reports
    Sweep {
        #[command(flatten)]
        search: SearchArgs,

        /// Comma-separated sigma values
        #[arg(long, value_delimiter = ',', default_values_t = vec![0.01, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6])]
        sigmas: Vec<f64>,

        /// Directory receiving per-sigma and top-k files
        #[arg(long, default_value = "results")]
        out_dir: PathBuf,

        /// Write top-k files for k = 2^0 .. 2^(n-1)
        #[arg(long, default_value_t = 16)]
        top_k_exp: u32,
    },
}

/// Flags shared by every searching subcommand. Unset flags keep the
/// config-file or environment value.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// TSV edge list (timestamp, node1, node2)
    pub input: Option<PathBuf>,

    /// Candidate generation: am (anti-monotone) or lam (loosely anti-monotone)
    #[arg(long)]
    pub strategy: Option<Strategy>,

    /// Largest node-set size to explore
    #[arg(long)]
    pub max_level: Option<usize>,

    /// Wall-clock budget per search, in seconds
    #[arg(long)]
    pub deadline_secs: Option<u64>,

    /// Worker threads (0 = all cores)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Parents recorded by the lam generator: all or first
    #[arg(long)]
    pub parents: Option<ParentBookkeeping>,

    /// Smallest node-set size written to reports
    #[arg(long)]
    pub min_size: Option<usize>,

    /// Fail instead of reporting partial results when a limit is hit
    #[arg(long)]
    pub strict: bool,
}

impl SearchArgs {
    /// Overlay explicitly given flags onto `config`.
    pub fn apply(&self, config: &mut MinerConfig) {
        if let Some(ref input) = self.input {
            config.universe_source = input.clone();
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if self.max_level.is_some() {
            config.max_level = self.max_level;
        }
        if self.deadline_secs.is_some() {
            config.deadline_secs = self.deadline_secs;
        }
        if let Some(workers) = self.workers {
            config.worker_threads = workers;
        }
        if let Some(parents) = self.parents {
            config.parent_bookkeeping = parents;
        }
        if let Some(min_size) = self.min_size {
            config.min_report_size = min_size;
        }
    }
}

/// `--sigma` and `--phi` are mutually exclusive; neither keeps the
/// configured threshold.
pub fn threshold_override(sigma: Option<f64>, phi: Option<f64>) -> Option<Threshold> {
    match (sigma, phi) {
        (_, Some(phi)) => Some(Threshold::Raw(phi)),
        (Some(sigma), None) => Some(Threshold::Scaled(sigma)),
        (None, None) => None,
    }
}
