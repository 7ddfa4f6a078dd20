//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a rounded table, or a warning when there is nothing to show
pub fn print_table<T: Tabled>(rows: Vec<T>, empty_message: &str) {
    if rows.is_empty() {
        print_warning(empty_message);
        return;
    }
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a section heading
pub fn print_heading(title: &str) {
    println!("{}", title.bold());
    println!("{}", "=".repeat(50));
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a battery or usage percentage
pub fn format_pct(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Format a drain rate in percent per hour
pub fn format_drain(value: f64) -> String {
    format!("{:.2}%/h", value)
}

/// Color a battery level by how close it is to empty
pub fn color_battery(level: f64) -> String {
    let formatted = format_pct(level);
    if level > 50.0 {
        formatted.green().to_string()
    } else if level > 20.0 {
        formatted.yellow().to_string()
    } else {
        formatted.red().to_string()
    }
}

/// Color an intent label
pub fn color_intent(intent: &str) -> String {
    match intent {
        "performance" => intent.magenta().to_string(),
        "eco" => intent.green().to_string(),
        _ => intent.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pct() {
        assert_eq!(format_pct(87.456), "87.5%");
        assert_eq!(format_pct(0.0), "0.0%");
    }

    #[test]
    fn test_format_drain() {
        assert_eq!(format_drain(4.0), "4.00%/h");
    }

    #[test]
    fn test_color_battery_keeps_value() {
        colored::control::set_override(false);
        assert_eq!(color_battery(15.0), "15.0%");
        assert_eq!(color_battery(75.24), "75.2%");
    }
}
