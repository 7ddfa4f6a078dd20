//! Rule-based optimization agents
//!
//! Each hour is evaluated on its own: a fixed table of threshold rules
//! proposes actions, performance-intent apps get damped savings, and the
//! clamped savings are compounded multiplicatively onto the drain rate.

use crate::models::{Action, ActionExplanation, Agent, UsageSample};

/// Upper bound on a single action's proportional saving
pub const MAX_ACTION_SAVING: f64 = 0.4;

/// Floor on any drain rate, in %/h
pub const MIN_DRAIN_PCT_PER_H: f64 = 0.1;

/// Saving multiplier for performance-intent apps
pub const PERFORMANCE_DAMPING: f64 = 0.6;

/// Default optimization aggressiveness
pub const DEFAULT_AGGRESSIVENESS: f64 = 0.6;

#[derive(Clone, Copy)]
enum Signal {
    Cpu,
    Screen,
    Network,
    Sensors,
}

impl Signal {
    fn read(self, sample: &UsageSample) -> f64 {
        match self {
            Signal::Cpu => sample.cpu_pct,
            Signal::Screen => sample.screen_min,
            Signal::Network => sample.net_mb,
            Signal::Sensors => sample.sensors_util,
        }
    }
}

struct Rule {
    agent: Agent,
    description: &'static str,
    base_saving: f64,
    signal: Signal,
    /// Triggers when the signal is strictly above this value
    threshold: f64,
}

impl Rule {
    fn triggers(&self, sample: &UsageSample) -> bool {
        self.signal.read(sample) > self.threshold
    }
}

/// Rules in reporting order
const RULES: &[Rule] = &[
    Rule {
        agent: Agent::Cpu,
        description: "Throttle background tasks by 20%",
        base_saving: 0.05,
        signal: Signal::Cpu,
        threshold: 30.0,
    },
    Rule {
        agent: Agent::Cpu,
        description: "Limit peak CPU to 85%",
        base_saving: 0.06,
        signal: Signal::Cpu,
        threshold: 50.0,
    },
    Rule {
        agent: Agent::Display,
        description: "Lower brightness by 20%",
        base_saving: 0.07,
        signal: Signal::Screen,
        threshold: 40.0,
    },
    Rule {
        agent: Agent::Display,
        description: "Reduce refresh rate to 60Hz",
        base_saving: 0.04,
        signal: Signal::Screen,
        threshold: 40.0,
    },
    Rule {
        agent: Agent::Network,
        description: "Defer background sync",
        base_saving: 0.05,
        signal: Signal::Network,
        threshold: 150.0,
    },
    Rule {
        agent: Agent::Sensors,
        description: "Disable GPS in background",
        base_saving: 0.08,
        signal: Signal::Sensors,
        threshold: 0.6,
    },
];

/// Actions triggered by a single hour of usage
///
/// `aggressiveness` is expected in (0, 1] and is not clamped here.
pub fn optimize_row(sample: &UsageSample, aggressiveness: f64) -> Vec<Action> {
    let mut actions: Vec<Action> = RULES
        .iter()
        .filter(|rule| rule.triggers(sample))
        .map(|rule| Action::new(rule.agent, rule.description, rule.base_saving * aggressiveness))
        .collect();

    if sample.intent.is_performance() {
        for action in actions.iter_mut() {
            action.est_saving *= PERFORMANCE_DAMPING;
        }
    }

    actions
}

/// Compound clamped action savings onto a drain rate
pub fn apply_to_drain(base_drain: f64, actions: &[Action]) -> f64 {
    let drain = actions.iter().fold(base_drain, |drain, action| {
        drain * (1.0 - action.est_saving.clamp(0.0, MAX_ACTION_SAVING))
    });
    drain.max(MIN_DRAIN_PCT_PER_H)
}

/// Render actions for display, savings as percentages
pub fn explain(actions: &[Action]) -> Vec<ActionExplanation> {
    actions
        .iter()
        .map(|a| ActionExplanation {
            agent: a.agent,
            description: a.description.clone(),
            est_saving_pct: round2(a.est_saving * 100.0),
        })
        .collect()
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Intent;

    fn sample(cpu: f64, net: f64, screen: f64, sensors: f64, intent: Intent) -> UsageSample {
        UsageSample {
            hour: 0,
            cpu_pct: cpu,
            net_mb: net,
            screen_min: screen,
            sensors_util: sensors,
            intent,
            measured_drain_pct_per_h: None,
        }
    }

    #[test]
    fn test_all_rules_trigger_with_performance_damping() {
        let s = sample(80.0, 200.0, 50.0, 0.8, Intent::Performance);
        let actions = optimize_row(&s, 1.0);

        let agents: Vec<Agent> = actions.iter().map(|a| a.agent).collect();
        assert_eq!(
            agents,
            vec![
                Agent::Cpu,
                Agent::Cpu,
                Agent::Display,
                Agent::Display,
                Agent::Network,
                Agent::Sensors
            ]
        );

        let expected = [0.05, 0.06, 0.07, 0.04, 0.05, 0.08];
        for (a, e) in actions.iter().zip(expected.iter()) {
            assert!((a.est_saving - e * 0.6).abs() < 1e-12);
        }

        let drain = apply_to_drain(10.0, &actions);
        let product: f64 = expected.iter().map(|e| 1.0 - e * 0.6).product();
        assert!((drain - 10.0 * product).abs() < 1e-9);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let s = sample(30.0, 150.0, 40.0, 0.6, Intent::Eco);
        assert!(optimize_row(&s, 1.0).is_empty());

        let s = sample(30.1, 0.0, 0.0, 0.0, Intent::Eco);
        let actions = optimize_row(&s, 1.0);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].description, "Throttle background tasks by 20%");
    }

    #[test]
    fn test_eco_savings_scale_with_aggressiveness() {
        let s = sample(0.0, 0.0, 0.0, 0.9, Intent::Eco);
        let actions = optimize_row(&s, 0.5);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].agent, Agent::Sensors);
        assert!((actions[0].est_saving - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_savings_clamped_before_application() {
        let huge = vec![Action::new(Agent::System, "test", 0.9)];
        assert!((apply_to_drain(10.0, &huge) - 6.0).abs() < 1e-12);

        let negative = vec![Action::new(Agent::System, "test", -0.5)];
        assert_eq!(apply_to_drain(10.0, &negative), 10.0);
    }

    #[test]
    fn test_drain_floor() {
        let actions = vec![Action::new(Agent::Cpu, "a", 0.4); 10];
        assert_eq!(apply_to_drain(1.0, &actions), MIN_DRAIN_PCT_PER_H);
        assert_eq!(apply_to_drain(-3.0, &[]), MIN_DRAIN_PCT_PER_H);
    }

    #[test]
    fn test_no_actions_leaves_drain_unchanged() {
        assert_eq!(apply_to_drain(7.25, &[]), 7.25);
    }

    #[test]
    fn test_explain_rounds_percent() {
        let actions = vec![Action::new(Agent::Display, "Lower brightness by 20%", 0.0252)];
        let explained = explain(&actions);
        assert_eq!(explained.len(), 1);
        assert_eq!(explained[0].agent, Agent::Display);
        assert_eq!(explained[0].est_saving_pct, 2.52);
    }

    #[test]
    fn test_explanation_serializes_agent_name() {
        let explained = explain(&[Action::new(Agent::Cpu, "Limit peak CPU to 85%", 0.036)]);
        let json = serde_json::to_string(&explained).unwrap();
        assert!(json.contains("\"agent\":\"CPU\""));
        assert!(json.contains("3.6"));
    }
}
