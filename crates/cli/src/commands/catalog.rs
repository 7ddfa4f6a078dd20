//! App catalog listing

use anyhow::Result;
use guardian_lib::sample_catalog;
use tabled::Tabled;

use crate::output::{color_intent, print_json, print_table, OutputFormat};

/// Row for the catalog table
#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "App")]
    name: String,
    #[tabled(rename = "CPU %")]
    cpu: String,
    #[tabled(rename = "Net MB/h")]
    net: String,
    #[tabled(rename = "Screen min/h")]
    screen: String,
    #[tabled(rename = "Sensors")]
    sensors: String,
    #[tabled(rename = "Intent")]
    intent: String,
}

/// List the built-in app profiles
pub fn show_catalog(format: OutputFormat) -> Result<()> {
    let catalog = sample_catalog();

    match format {
        OutputFormat::Json => print_json(&catalog)?,
        OutputFormat::Table => {
            let rows: Vec<ProfileRow> = catalog
                .iter()
                .map(|p| ProfileRow {
                    name: p.name.clone(),
                    cpu: format!("{:.0}", p.base_cpu),
                    net: format!("{:.0}", p.base_net),
                    screen: format!("{:.0}", p.base_screen),
                    sensors: format!("{:.1}", p.base_sensors),
                    intent: color_intent(&p.intent.to_string()),
                })
                .collect();
            print_table(rows, "No profiles found");
        }
    }

    Ok(())
}
