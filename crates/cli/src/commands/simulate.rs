//! Battery curve dashboard

use anyhow::Result;
use colored::Colorize;
use guardian_lib::predictor::Regressor;
use guardian_lib::{ActionExplanation, SavingsMetrics, SimulationMetrics, SimulationResult};
use serde::Serialize;
use tabled::Tabled;

use super::{Scenario, ScenarioRun};
use crate::output::{
    color_battery, format_drain, print_heading, print_info, print_json, print_table, OutputFormat,
};

/// Row for the curves table
#[derive(Tabled)]
struct CurveRow {
    #[tabled(rename = "Hour")]
    hour: usize,
    #[tabled(rename = "Baseline Drain")]
    baseline_drain: String,
    #[tabled(rename = "Optimized Drain")]
    optimized_drain: String,
    #[tabled(rename = "Baseline Battery")]
    baseline_battery: String,
    #[tabled(rename = "Optimized Battery")]
    optimized_battery: String,
    #[tabled(rename = "Actions")]
    actions: usize,
}

/// Row for the applied-optimizations table
#[derive(Tabled)]
struct ActionRow {
    #[tabled(rename = "Hour")]
    hour: usize,
    #[tabled(rename = "Agent")]
    agent: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Est. Saving %")]
    est_saving_pct: String,
}

/// JSON view of a run
#[derive(Serialize)]
struct SimulationReport<'a> {
    app: &'a str,
    model_kind: &'static str,
    generated_at: String,
    current_hour: usize,
    current_battery_pct: f64,
    savings: SavingsMetrics,
    results: &'a [SimulationResult],
    explanations: Vec<HourExplanation>,
}

#[derive(Serialize)]
struct HourExplanation {
    hour: usize,
    actions: Vec<ActionExplanation>,
}

/// Run a scenario and render curves, impact metrics and optionally actions
pub fn show_simulation(
    scenario: Scenario,
    show_actions: bool,
    show_metrics: bool,
    format: OutputFormat,
) -> Result<()> {
    let run = ScenarioRun::execute(scenario)?;

    match format {
        OutputFormat::Json => {
            let report = SimulationReport {
                app: &run.scenario.profile.name,
                model_kind: run.model.kind(),
                generated_at: chrono::Utc::now().to_rfc3339(),
                current_hour: run.scenario.tick,
                current_battery_pct: run.current_battery(),
                savings: run.savings,
                results: &run.results,
                explanations: run
                    .results
                    .iter()
                    .map(|r| HourExplanation {
                        hour: r.hour,
                        actions: r.explain(),
                    })
                    .collect(),
            };
            print_json(&report)?;
        }
        OutputFormat::Table => {
            print_heading(&format!(
                "Battery over time: {} (hour {} / {})",
                run.scenario.profile.name, run.scenario.tick, run.scenario.usage.hours
            ));
            let rows: Vec<CurveRow> = run
                .results
                .iter()
                .map(|r| CurveRow {
                    hour: r.hour,
                    baseline_drain: format_drain(r.baseline_drain_pct_per_h),
                    optimized_drain: format_drain(r.optimized_drain_pct_per_h),
                    baseline_battery: color_battery(r.baseline_battery_pct),
                    optimized_battery: color_battery(r.optimized_battery_pct),
                    actions: r.actions.len(),
                })
                .collect();
            print_table(rows, "No hours simulated");
            println!();

            print_impact(&run);

            if show_actions {
                println!();
                println!("{}", "Applied Optimizations".bold());
                print_table(action_rows(&run.results), "No actions");
            }
        }
    }

    if show_metrics {
        eprintln!("{}", SimulationMetrics::new().render());
    }

    Ok(())
}

fn print_impact(run: &ScenarioRun) {
    println!("{}", "Impact Metrics".bold());
    println!("{}", "-".repeat(50));
    println!(
        "Battery saved so far:       {}",
        format!("{}%", run.savings.battery_saved_pct).green()
    );
    println!(
        "Extra hours above 20%:      {}",
        format!("{} hrs", run.savings.extra_hours_above_20pct).green()
    );
    println!(
        "Current battery (optimized): {}",
        color_battery(run.current_battery())
    );
    print_info(&format!("Drain model: {}", run.model.kind()));
}

/// One row per action; hours without actions get a placeholder row
fn action_rows(results: &[SimulationResult]) -> Vec<ActionRow> {
    results
        .iter()
        .flat_map(|r| {
            let explained = r.explain();
            if explained.is_empty() {
                vec![ActionRow {
                    hour: r.hour,
                    agent: "-".to_string(),
                    description: "No action".to_string(),
                    est_saving_pct: "0.00".to_string(),
                }]
            } else {
                explained
                    .into_iter()
                    .map(|a| ActionRow {
                        hour: r.hour,
                        agent: a.agent.to_string(),
                        description: a.description,
                        est_saving_pct: format!("{:.2}", a.est_saving_pct),
                    })
                    .collect()
            }
        })
        .collect()
}
