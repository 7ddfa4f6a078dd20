//! Tips and assistant chat

use anyhow::{Context, Result};
use colored::Colorize;
use guardian_lib::assistant::{chatbot_reply, generate_tips, ChatContext, Tip};
use serde::Serialize;

use super::{Scenario, ScenarioRun};
use crate::output::{print_heading, print_info, print_json, print_success, OutputFormat};

/// Tips for the most recent simulated hour
pub fn show_tips(scenario: Scenario, format: OutputFormat) -> Result<()> {
    let run = ScenarioRun::execute(scenario)?;
    let tips = current_tips(&run)?;

    match format {
        OutputFormat::Json => print_json(&tips)?,
        OutputFormat::Table => {
            print_heading(&format!(
                "Battery saving tips: {} (hour {})",
                run.scenario.profile.name, run.scenario.tick
            ));
            if tips.is_empty() {
                print_info("No tips right now, usage looks efficient.");
            }
            for tip in &tips {
                println!("{}", tip.title.bold());
                println!("  {}", tip.reason);
                println!("  Estimated extra time: {}", tip.est_gain.to_string().green());
                println!();
            }
        }
    }

    Ok(())
}

fn current_tips(run: &ScenarioRun) -> Result<Vec<Tip>> {
    let sample = run
        .current_usage()
        .last()
        .context("No usage sample for the current hour")?;
    let last = run
        .results
        .last()
        .context("No simulated hour to derive tips from")?;

    Ok(generate_tips(
        sample,
        last.baseline_drain_pct_per_h,
        last.optimized_drain_pct_per_h,
        run.current_battery(),
    ))
}

#[derive(Serialize)]
struct ChatExchange<'a> {
    message: &'a str,
    context: ChatContext,
    reply: String,
}

/// Answer a free-text question using the scenario as context
pub fn chat(scenario: Scenario, message: &str, format: OutputFormat) -> Result<()> {
    let run = ScenarioRun::execute(scenario)?;
    let context = ChatContext {
        app: run.scenario.profile.name.clone(),
        battery: run.current_battery(),
        extra_hours: run.savings.extra_hours_above_20pct,
    };
    let reply = chatbot_reply(message, &context);

    match format {
        OutputFormat::Json => print_json(&ChatExchange {
            message,
            context,
            reply,
        })?,
        OutputFormat::Table => print_success(&reply),
    }

    Ok(())
}
