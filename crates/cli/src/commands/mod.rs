//! CLI subcommands and the shared scenario runner

pub mod assist;
pub mod catalog;
pub mod simulate;
pub mod usage;

use anyhow::{bail, Context, Result};
use clap::Args;
use guardian_lib::{
    analyze_savings, find_profile, fit_model, generate, simulate as run_simulation, AppProfile,
    DrainModel, SavingsMetrics, SimulationConfig, SimulationResult, UsageConfig, UsageTrace,
};

use crate::config::GuardianConfig;

/// Upper bound on simulated hours
pub const MAX_HOURS: usize = 24;

/// Scenario selection shared by simulation commands
#[derive(Args, Debug, Clone, Default)]
pub struct ScenarioArgs {
    /// App profile name (see `bguard catalog`; can also be set via BGUARD_APP)
    #[arg(long, short, env = "BGUARD_APP")]
    pub app: Option<String>,

    /// Total simulated hours (1-24)
    #[arg(long)]
    pub hours: Option<usize>,

    /// Optimization aggressiveness in (0, 1]
    #[arg(long)]
    pub aggressiveness: Option<f64>,

    /// Random seed for usage generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Relative usage noise
    #[arg(long)]
    pub noise: Option<f64>,

    /// Current hour in real-time mode; defaults to the last hour
    #[arg(long)]
    pub tick: Option<usize>,

    /// Battery level at hour 0
    #[arg(long)]
    pub start_battery: Option<f64>,
}

/// Fully resolved scenario: flags override configuration
#[derive(Debug, Clone)]
pub struct Scenario {
    pub profile: AppProfile,
    pub usage: UsageConfig,
    pub tick: usize,
    pub aggressiveness: f64,
    pub start_battery: f64,
}

impl Scenario {
    pub fn resolve(args: &ScenarioArgs, config: &GuardianConfig) -> Result<Self> {
        let app = args.app.as_deref().unwrap_or(&config.app);
        let profile = find_profile(app).with_context(|| format!("Cannot load profile '{}'", app))?;

        let hours = args.hours.unwrap_or(config.hours);
        if !(1..=MAX_HOURS).contains(&hours) {
            bail!("hours must be between 1 and {}, got {}", MAX_HOURS, hours);
        }

        let aggressiveness = args.aggressiveness.unwrap_or(config.aggressiveness);
        if !(aggressiveness > 0.0 && aggressiveness <= 1.0) {
            bail!("aggressiveness must be in (0, 1], got {}", aggressiveness);
        }

        let tick = args.tick.unwrap_or(hours).clamp(1, hours);

        let usage = UsageConfig::new()
            .with_hours(hours)
            .with_seed(args.seed.unwrap_or(config.seed))
            .with_noise(args.noise.unwrap_or(config.noise));

        Ok(Self {
            profile,
            usage,
            tick,
            aggressiveness,
            start_battery: args.start_battery.unwrap_or(config.start_battery),
        })
    }
}

/// Everything a command needs to render one scenario
pub struct ScenarioRun {
    pub scenario: Scenario,
    pub trace: UsageTrace,
    pub model: DrainModel,
    pub results: Vec<SimulationResult>,
    pub savings: SavingsMetrics,
}

impl ScenarioRun {
    /// Generate usage, fit on the full trace, and simulate up to the tick
    pub fn execute(scenario: Scenario) -> Result<Self> {
        let trace = generate(&scenario.profile, &scenario.usage)
            .context("Failed to generate synthetic usage")?;
        let model = fit_model(&trace);

        let config = SimulationConfig::default()
            .with_start_battery(scenario.start_battery)
            .with_hours(scenario.tick)
            .with_aggressiveness(scenario.aggressiveness);
        let results = run_simulation(&model, &trace, &config);
        let savings = analyze_savings(&results);

        tracing::debug!(
            app = %scenario.profile.name,
            model_kind = %guardian_lib::predictor::Regressor::kind(&model),
            tick = scenario.tick,
            "Scenario executed"
        );

        Ok(Self {
            scenario,
            trace,
            model,
            results,
            savings,
        })
    }

    /// Usage rows up to and including the current tick
    pub fn current_usage(&self) -> &[guardian_lib::UsageSample] {
        &self.trace[..self.results.len()]
    }

    /// Optimized battery level at the current tick
    pub fn current_battery(&self) -> f64 {
        self.results
            .last()
            .map(|r| r.optimized_battery_pct)
            .unwrap_or(self.scenario.start_battery)
    }
}
