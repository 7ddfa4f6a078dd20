//! Battery Guardian CLI
//!
//! A terminal dashboard for the simulated battery optimization advisor:
//! browse app profiles, inspect synthetic usage, compare baseline and
//! optimized battery curves, and ask for tips.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{assist, catalog, simulate, usage, Scenario, ScenarioArgs};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Battery Guardian CLI
#[derive(Parser)]
#[command(name = "bguard")]
#[command(author, version, about = "Battery Guardian - simulated battery optimization advisor", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the built-in app profiles
    Catalog,

    /// Show the synthetic usage trace
    Usage {
        #[command(flatten)]
        scenario: ScenarioArgs,
    },

    /// Simulate baseline and optimized battery curves
    Simulate {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Show the per-hour actions table
        #[arg(long)]
        actions: bool,

        /// Print Prometheus metrics to stderr after the run
        #[arg(long)]
        metrics: bool,
    },

    /// Context-aware battery saving tips for the current hour
    Tips {
        #[command(flatten)]
        scenario: ScenarioArgs,
    },

    /// Ask the battery assistant a question
    Chat {
        /// Your message
        message: String,

        #[command(flatten)]
        scenario: ScenarioArgs,
    },
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let config = config::GuardianConfig::load()?;
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Catalog => catalog::show_catalog(cli.format)?,
        Commands::Usage { scenario } => {
            usage::show_usage(Scenario::resolve(&scenario, &config)?, cli.format)?;
        }
        Commands::Simulate {
            scenario,
            actions,
            metrics,
        } => {
            let scenario = Scenario::resolve(&scenario, &config)?;
            simulate::show_simulation(scenario, actions, metrics, cli.format)?;
        }
        Commands::Tips { scenario } => {
            assist::show_tips(Scenario::resolve(&scenario, &config)?, cli.format)?;
        }
        Commands::Chat { message, scenario } => {
            assist::chat(Scenario::resolve(&scenario, &config)?, &message, cli.format)?;
        }
    }

    Ok(())
}
