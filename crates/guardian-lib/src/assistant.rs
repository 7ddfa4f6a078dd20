//! Context-aware battery tips and keyword assistant
//!
//! Tips carry their estimated gain as whole minutes alongside the display
//! form, so ranking never has to parse formatted durations.

use crate::models::{Agent, UsageSample};
use crate::optimizer::MIN_DRAIN_PCT_PER_H;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;

/// Maximum number of tips returned
pub const MAX_TIPS: usize = 5;

/// Battery level at or below which the emergency tip appears
pub const EMERGENCY_BATTERY_PCT: f64 = 20.0;

/// Estimated extra runtime from a drain reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeGain {
    /// Drain rates were not positive, so no estimate exists
    NotApplicable,
    Minutes(u32),
}

impl TimeGain {
    /// Minutes used for ranking; `NotApplicable` ranks as zero
    pub fn minutes(&self) -> u32 {
        match self {
            TimeGain::NotApplicable => 0,
            TimeGain::Minutes(m) => *m,
        }
    }
}

impl fmt::Display for TimeGain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TimeGain::NotApplicable => write!(f, "N/A"),
            TimeGain::Minutes(m) if m < 60 => write!(f, "{} min", m),
            TimeGain::Minutes(m) if m % 60 == 0 => write!(f, "{}h", m / 60),
            TimeGain::Minutes(m) => write!(f, "{}h {}m", m / 60, m % 60),
        }
    }
}

/// Rough extra time at the current battery level if drain drops
pub fn estimate_time_gain(drain_before: f64, drain_after: f64, battery_pct: f64) -> TimeGain {
    if drain_before <= 0.0 || drain_after <= 0.0 {
        return TimeGain::NotApplicable;
    }
    let hours_before = battery_pct / drain_before;
    let hours_after = battery_pct / drain_after;
    let gain_h = (hours_after - hours_before).max(0.0);
    TimeGain::Minutes((gain_h * 60.0).round() as u32)
}

/// A ranked battery-saving suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tip {
    pub title: String,
    pub reason: String,
    pub est_gain: TimeGain,
    pub kind: Agent,
    /// Lower is more urgent
    pub priority: u8,
}

struct TipBuilder {
    drain_before: f64,
    drain_after: f64,
    battery_pct: f64,
    tips: Vec<Tip>,
}

impl TipBuilder {
    fn push(&mut self, kind: Agent, priority: u8, factor: f64, title: &str, reason: &str) {
        let adjusted = (self.drain_after * factor).max(MIN_DRAIN_PCT_PER_H);
        self.tips.push(Tip {
            title: title.to_string(),
            reason: reason.to_string(),
            est_gain: estimate_time_gain(self.drain_before, adjusted, self.battery_pct),
            kind,
            priority,
        });
    }
}

/// Up to five tips for the current hour, most urgent and valuable first
pub fn generate_tips(
    sample: &UsageSample,
    drain_before: f64,
    drain_after: f64,
    battery_pct: f64,
) -> Vec<Tip> {
    let mut b = TipBuilder {
        drain_before,
        drain_after,
        battery_pct,
        tips: Vec::new(),
    };

    if sample.screen_min > 35.0 {
        b.push(
            Agent::Display,
            1,
            0.93,
            "Reduce brightness 15–25%",
            "High screen time detected; display is a major power draw.",
        );
        b.push(
            Agent::Display,
            2,
            0.96,
            "Lower refresh rate to 60Hz",
            "High-motion content consumes extra display power.",
        );
    }

    if sample.cpu_pct > 40.0 {
        b.push(
            Agent::Cpu,
            1,
            0.95,
            "Limit background CPU tasks",
            "Background computations above 40% detected.",
        );
    }
    if sample.cpu_pct > 60.0 && !sample.intent.is_performance() {
        b.push(
            Agent::Cpu,
            2,
            0.92,
            "Cap peak CPU to 85%",
            "Sustained high CPU usage; capping prevents spikes.",
        );
    }

    if sample.net_mb > 150.0 {
        b.push(
            Agent::Network,
            1,
            0.95,
            "Defer background sync & prefetch",
            "Heavy network transfers drain radio & CPU.",
        );
    }

    if sample.sensors_util > 0.6 {
        b.push(
            Agent::Sensors,
            1,
            0.92,
            "Disable GPS when in background",
            "High sensor usage detected (likely GPS).",
        );
    }

    if battery_pct <= EMERGENCY_BATTERY_PCT {
        b.push(
            Agent::System,
            0,
            0.85,
            "Enable Ultra Battery Saver",
            "Battery under 20%; aggressive savings recommended.",
        );
    }

    let mut tips = b.tips;
    tips.sort_by_key(|t| (t.priority, Reverse(t.est_gain.minutes())));
    tips.truncate(MAX_TIPS);
    tips
}

/// Context the assistant uses to personalise replies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatContext {
    pub app: String,
    pub battery: f64,
    pub extra_hours: u32,
}

impl Default for ChatContext {
    fn default() -> Self {
        Self {
            app: "the app".to_string(),
            battery: 50.0,
            extra_hours: 0,
        }
    }
}

/// Canned reply chosen by keyword matching, first match wins
pub fn chatbot_reply(message: &str, context: &ChatContext) -> String {
    let message = message.trim().to_lowercase();
    let mentions = |words: &[&str]| mentions_any(&message, words);

    if mentions(&["save", "battery", "tips"]) {
        format!(
            "Right now, {} can gain about {} extra hour(s) above 20% if you apply my \
             recommended optimizations. Start with brightness and background CPU limits.",
            context.app, context.extra_hours
        )
    } else if mentions(&["brightness"]) {
        "Lowering brightness by 20% typically saves 5–10% drain per hour for screen-heavy \
         apps. Try it when your screen time is high."
            .to_string()
    } else if mentions(&["network", "wifi", "data"]) {
        "Heavy background sync can drain quickly. Defer sync and disable auto-play to reduce \
         radio usage."
            .to_string()
    } else if mentions(&["gps", "location", "sensors"]) {
        "If you don't need continuous navigation, disable GPS in background to cut sensor \
         drain."
            .to_string()
    } else if mentions(&["cpu", "performance"]) {
        "Capping peak CPU to ~85% can smooth spikes with minimal impact on perceived \
         performance in most apps."
            .to_string()
    } else if mentions(&["hello", "hi"]) {
        "Hi! Ask me how to save battery, or what to optimize right now.".to_string()
    } else {
        "You can ask: 'How can I save battery now?', 'Should I lower brightness?', \
         'Is background sync draining power?'"
            .to_string()
    }
}

fn mentions_any(message: &str, words: &[&str]) -> bool {
    words.iter().any(|w| message.contains(w))
}
