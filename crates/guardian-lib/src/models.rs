//! Core data models for the battery guardian

use serde::{Deserialize, Serialize};
use std::fmt;

/// Usage pattern classification of an app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Responsiveness matters more than battery
    Performance,
    /// Power-saving oriented
    Eco,
}

impl Intent {
    pub fn is_performance(&self) -> bool {
        matches!(self, Intent::Performance)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Performance => write!(f, "performance"),
            Intent::Eco => write!(f, "eco"),
        }
    }
}

/// Static resource appetite of an application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppProfile {
    pub name: String,
    /// CPU utilisation in percent
    pub base_cpu: f64,
    /// Network throughput in MB per hour
    pub base_net: f64,
    /// Screen-on minutes per hour
    pub base_screen: f64,
    /// GPS/IMU utilisation, 0..1
    pub base_sensors: f64,
    pub intent: Intent,
}

impl AppProfile {
    pub fn new(
        name: impl Into<String>,
        base_cpu: f64,
        base_net: f64,
        base_screen: f64,
        base_sensors: f64,
        intent: Intent,
    ) -> Self {
        Self {
            name: name.into(),
            base_cpu,
            base_net,
            base_screen,
            base_sensors,
            intent,
        }
    }
}

/// One hour of synthetic usage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSample {
    pub hour: usize,
    pub cpu_pct: f64,
    pub net_mb: f64,
    pub screen_min: f64,
    pub sensors_util: f64,
    pub intent: Intent,
    /// Ground-truth drain rate, used as the training target when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured_drain_pct_per_h: Option<f64>,
}

/// Ordered per-hour usage samples for a single profile
pub type UsageTrace = Vec<UsageSample>;

/// Optimization agent responsible for an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Agent {
    #[serde(rename = "CPU")]
    Cpu,
    Display,
    Network,
    Sensors,
    System,
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Agent::Cpu => "CPU",
            Agent::Display => "Display",
            Agent::Network => "Network",
            Agent::Sensors => "Sensors",
            Agent::System => "System",
        };
        f.write_str(name)
    }
}

/// A single optimization recommendation for one hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub agent: Agent,
    pub description: String,
    /// Proportional saving on the drain rate, e.g. 0.05 = 5%
    pub est_saving: f64,
}

impl Action {
    pub fn new(agent: Agent, description: impl Into<String>, est_saving: f64) -> Self {
        Self {
            agent,
            description: description.into(),
            est_saving,
        }
    }
}

/// Rendered view of an action for explanation tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionExplanation {
    pub agent: Agent,
    pub description: String,
    /// Saving in percent, rounded to two decimals
    pub est_saving_pct: f64,
}

/// Per-hour output of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub hour: usize,
    pub baseline_drain_pct_per_h: f64,
    pub optimized_drain_pct_per_h: f64,
    pub baseline_battery_pct: f64,
    pub optimized_battery_pct: f64,
    pub actions: Vec<Action>,
}

/// Summary of how much the optimized curve gains over baseline
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SavingsMetrics {
    /// Percentage points saved at the final hour
    pub battery_saved_pct: f64,
    /// Extra rows the optimized curve spends above 20%
    pub extra_hours_above_20pct: u32,
}
