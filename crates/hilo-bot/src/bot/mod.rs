mod engine;
mod lookahead;
mod profit;
mod rollout;

pub use engine::{DecisionEngine, DecisionInputs, midpoint_action};
pub use lookahead::{LookaheadResolver, expected_edge};
pub use profit::{Advisory, CASH_OUT_BASELINE, ProfitModel};
pub use rollout::{MonteCarloSimulator, RolloutConfig};

use core::fmt;
use hilo_core::model::action::Action;
use hilo_core::model::odds::Odds;
use serde::{Deserialize, Serialize};

/// Which stage of the pipeline settled the recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    MaxPwin,
    Lookahead,
    Montecarlo,
    Fallback,
    Midpoint,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::MaxPwin => "max-pwin",
            Method::Lookahead => "lookahead",
            Method::Montecarlo => "montecarlo",
            Method::Fallback => "fallback",
            Method::Midpoint => "midpoint",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-action scores reported by lookahead or Monte Carlo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionScores {
    pub high: f64,
    pub low: f64,
}

impl ActionScores {
    pub fn get(&self, action: Action) -> f64 {
        match action {
            Action::High => self.high,
            Action::Low => self.low,
        }
    }

    /// Strictly better action, if any.
    pub fn leader(&self) -> Option<Action> {
        if self.high > self.low {
            Some(Action::High)
        } else if self.low > self.high {
            Some(Action::Low)
        } else {
            None
        }
    }
}

/// Guess produced at a decision point. Never mutated once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: Action,
    pub p_high: f64,
    pub p_low: f64,
    pub p_tie: f64,
    pub edge: f64,
    pub method: Method,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<ActionScores>,
}

impl Recommendation {
    pub(crate) fn new(action: Action, odds: Odds, method: Method) -> Self {
        Self {
            action,
            p_high: odds.p_high,
            p_low: odds.p_low,
            p_tie: odds.p_tie,
            edge: odds.edge(),
            method,
            scores: None,
        }
    }

    pub(crate) fn with_scores(mut self, scores: ActionScores) -> Self {
        self.scores = Some(scores);
        self
    }

    pub fn odds(&self) -> Odds {
        Odds {
            p_high: self.p_high,
            p_low: self.p_low,
            p_tie: self.p_tie,
        }
    }

    /// Immediate win chance of the recommended action.
    pub fn p_win(&self) -> f64 {
        self.odds().p_win(self.action)
    }

    /// One-line overlay text, e.g. `HIGH 47.1/47.1/5.9 (lookahead)`.
    pub fn summary(&self) -> String {
        format!(
            "{} {:.1}/{:.1}/{:.1} ({})",
            self.action,
            self.p_high * 100.0,
            self.p_low * 100.0,
            self.p_tie * 100.0,
            self.method
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_formats_percentages() {
        let odds = Odds {
            p_high: 24.0 / 51.0,
            p_low: 24.0 / 51.0,
            p_tie: 3.0 / 51.0,
        };
        let rec = Recommendation::new(Action::High, odds, Method::Lookahead);
        assert_eq!(rec.summary(), "HIGH 47.1/47.1/5.9 (lookahead)");
        assert_eq!(rec.edge, 0.0);
    }

    #[test]
    fn scores_leader_requires_strict_gap() {
        assert_eq!(ActionScores { high: 0.4, low: 0.4 }.leader(), None);
        assert_eq!(
            ActionScores { high: 0.2, low: 0.4 }.leader(),
            Some(Action::Low)
        );
    }
}
