//! Synthetic usage inspection

use anyhow::Result;
use tabled::Tabled;

use super::{Scenario, ScenarioRun};
use crate::output::{print_heading, print_json, print_table, OutputFormat};

/// Row for the usage table
#[derive(Tabled)]
struct UsageRow {
    #[tabled(rename = "Hour")]
    hour: usize,
    #[tabled(rename = "CPU %")]
    cpu: String,
    #[tabled(rename = "Net MB")]
    net: String,
    #[tabled(rename = "Screen min")]
    screen: String,
    #[tabled(rename = "Sensors")]
    sensors: String,
    #[tabled(rename = "Intent")]
    intent: String,
}

/// Show the synthetic usage inputs up to the current hour
pub fn show_usage(scenario: Scenario, format: OutputFormat) -> Result<()> {
    let run = ScenarioRun::execute(scenario)?;
    let usage = run.current_usage();

    match format {
        OutputFormat::Json => print_json(usage)?,
        OutputFormat::Table => {
            print_heading(&format!(
                "Synthetic usage: {} (seed {})",
                run.scenario.profile.name, run.scenario.usage.seed
            ));
            let rows: Vec<UsageRow> = usage
                .iter()
                .map(|s| UsageRow {
                    hour: s.hour,
                    cpu: format!("{:.1}", s.cpu_pct),
                    net: format!("{:.1}", s.net_mb),
                    screen: format!("{:.1}", s.screen_min),
                    sensors: format!("{:.2}", s.sensors_util),
                    intent: s.intent.to_string(),
                })
                .collect();
            print_table(rows, "No usage samples");
        }
    }

    Ok(())
}
