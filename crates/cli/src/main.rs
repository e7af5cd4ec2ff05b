mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use sdminer_core::config::load_dotenv;
use sdminer_core::MinerConfig;

use crate::cli::{threshold_override, CliArgs, Command};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    load_dotenv();
    let args = CliArgs::parse();

    let mut config = match args.config.as_deref() {
        Some(path) => MinerConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => MinerConfig::from_env(),
    };

    match args.command {
        Command::Summary { input, json } => {
            if let Some(input) = input {
                config.universe_source = input;
            }
            commands::summary(&config, json)
        }
        Command::Mine {
            search,
            sigma,
            phi,
            all,
            output,
            json,
        } => {
            search.apply(&mut config);
            if let Some(threshold) = threshold_override(sigma, phi) {
                config.threshold = threshold;
            }
            if all {
                config.maximal = false;
            }
            commands::mine(config, output.as_deref(), json, search.strict)
        }
        Command::Sweep {
            search,
            sigmas,
            out_dir,
            top_k_exp,
        } => {
            search.apply(&mut config);
            config.maximal = true;
            commands::sweep(config, &sigmas, &out_dir, top_k_exp, search.strict)
        }
    }
}
