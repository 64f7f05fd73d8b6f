use std::fs;
use std::path::Path;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::config::{AgentKind, BenchmarkConfig};
use crate::harness::{GameEnding, GameRecord};

/// Two-sided coverage of the reported intervals.
const CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("agent '{0}' recorded a game but is missing from configuration")]
    UnknownAgent(String),
    #[error("invalid reference distribution: {0}")]
    Distribution(String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

pub struct AnalyticsCollector {
    agents: Vec<AgentAccumulator>,
    z: f64,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig) -> Result<Self, AnalyticsError> {
        let normal =
            Normal::new(0.0, 1.0).map_err(|err| AnalyticsError::Distribution(err.to_string()))?;
        let z = normal.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0);
        let agents = config
            .agents
            .iter()
            .map(|agent| AgentAccumulator::new(agent.name.clone(), agent.kind))
            .collect();
        Ok(Self { agents, z })
    }

    pub fn record_game(&mut self, record: &GameRecord) -> Result<(), AnalyticsError> {
        let acc = self
            .agents
            .iter_mut()
            .find(|acc| acc.name == record.agent)
            .ok_or_else(|| AnalyticsError::UnknownAgent(record.agent.clone()))?;
        acc.record(record);
        Ok(())
    }

    pub fn finalize(self) -> AnalyticsSummary {
        let z = self.z;
        AnalyticsSummary {
            confidence: CONFIDENCE_LEVEL,
            agents: self
                .agents
                .into_iter()
                .map(|acc| acc.into_report(z))
                .collect(),
        }
    }
}

struct AgentAccumulator {
    name: String,
    kind: AgentKind,
    guesses: u64,
    correct: u64,
    cash_outs: usize,
    streaks: Vec<f64>,
    pot_factors: Vec<f64>,
}

impl AgentAccumulator {
    fn new(name: String, kind: AgentKind) -> Self {
        Self {
            name,
            kind,
            guesses: 0,
            correct: 0,
            cash_outs: 0,
            streaks: Vec::new(),
            pot_factors: Vec::new(),
        }
    }

    fn record(&mut self, record: &GameRecord) {
        self.guesses += record.guesses as u64;
        self.correct += record.correct as u64;
        if record.ending == GameEnding::CashOut {
            self.cash_outs += 1;
        }
        self.streaks.push(record.streak as f64);
        self.pot_factors.push(record.pot_factor);
    }

    fn into_report(self, z: f64) -> AgentReport {
        let accuracy = if self.guesses == 0 {
            0.0
        } else {
            self.correct as f64 / self.guesses as f64
        };
        let accuracy_margin = if self.guesses == 0 {
            0.0
        } else {
            z * (accuracy * (1.0 - accuracy) / self.guesses as f64).sqrt()
        };

        AgentReport {
            name: self.name,
            kind: self.kind,
            games: self.streaks.len(),
            guesses: self.guesses,
            accuracy,
            accuracy_ci: (
                (accuracy - accuracy_margin).max(0.0),
                (accuracy + accuracy_margin).min(1.0),
            ),
            mean_streak: mean(&self.streaks),
            streak_ci: confidence_interval(&self.streaks, z),
            mean_pot_factor: mean(&self.pot_factors),
            pot_factor_ci: confidence_interval(&self.pot_factors, z),
            cash_outs: self.cash_outs,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub name: String,
    pub kind: AgentKind,
    pub games: usize,
    pub guesses: u64,
    pub accuracy: f64,
    pub accuracy_ci: (f64, f64),
    pub mean_streak: f64,
    pub streak_ci: (f64, f64),
    pub mean_pot_factor: f64,
    pub pot_factor_ci: (f64, f64),
    pub cash_outs: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub confidence: f64,
    pub agents: Vec<AgentReport>,
}

impl AnalyticsSummary {
    pub fn agent(&self, name: &str) -> Option<&AgentReport> {
        self.agents.iter().find(|agent| agent.name == name)
    }

    pub fn to_markdown(&self) -> String {
        let pct = self.confidence * 100.0;
        let mut rows = String::new();
        rows.push_str("# High-Low Benchmark Summary\n\n");
        rows.push_str(&format!(
            "Intervals use a normal approximation at {pct:.0}% confidence.\n\n"
        ));
        rows.push_str(&format!(
            "| Agent | Kind | Games | Guesses | Accuracy | {pct:.0}% CI | Mean streak | {pct:.0}% CI | Mean pot | {pct:.0}% CI | Cash-outs |\n"
        ));
        rows.push_str("|-------|------|-------|---------|----------|--------|-------------|--------|----------|--------|-----------|\n");

        for agent in &self.agents {
            rows.push_str(&format!(
                "| {name} | {kind:?} | {games} | {guesses} | {acc:.1}% | [{acc_lo:.1}, {acc_hi:.1}] | {streak:.2} | [{streak_lo:.2}, {streak_hi:.2}] | {pot:.3} | [{pot_lo:.3}, {pot_hi:.3}] | {cash_outs} |\n",
                name = agent.name,
                kind = agent.kind,
                games = agent.games,
                guesses = agent.guesses,
                acc = agent.accuracy * 100.0,
                acc_lo = agent.accuracy_ci.0 * 100.0,
                acc_hi = agent.accuracy_ci.1 * 100.0,
                streak = agent.mean_streak,
                streak_lo = agent.streak_ci.0,
                streak_hi = agent.streak_ci.1,
                pot = agent.mean_pot_factor,
                pot_lo = agent.pot_factor_ci.0,
                pot_hi = agent.pot_factor_ci.1,
                cash_outs = agent.cash_outs,
            ));
        }
        rows
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        fs::write(path.as_ref(), self.to_markdown()).map_err(|source| AnalyticsError::Io {
            context: "writing summary markdown",
            source,
        })
    }
}

fn mean(points: &[f64]) -> f64 {
    if points.is_empty() {
        0.0
    } else {
        points.iter().sum::<f64>() / points.len() as f64
    }
}

fn confidence_interval(points: &[f64], z: f64) -> (f64, f64) {
    let mean = mean(points);
    if points.len() < 2 {
        return (mean, mean);
    }
    let variance = points
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (points.len() as f64 - 1.0);
    let margin = z * (variance / points.len() as f64).sqrt();
    (mean - margin, mean + margin)
}
