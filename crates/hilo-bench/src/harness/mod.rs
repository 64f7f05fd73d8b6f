mod shoe;

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use hilo_bot::bot::CASH_OUT_BASELINE;
use hilo_bot::policy::{EnginePolicy, MidpointPolicy, Policy};
use hilo_bot::session::{Session, TableReadout};
use hilo_core::game::events::GameEvent;
use hilo_core::game::round::Outcome;
use hilo_core::game::settings::Settings;
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::analytics::{AnalyticsCollector, AnalyticsError, AnalyticsSummary};
use crate::config::{AgentConfig, AgentKind, BenchmarkConfig, ResolvedOutputs, ValidationError};
use crate::logging::telemetry_dir;

use shoe::Shoe;

/// Plays every configured agent through the same sequence of seeded shoes.
pub struct BenchRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub games_per_agent: usize,
    pub agents: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
    pub analytics: AnalyticsSummary,
}

/// How a simulated game finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEnding {
    Loss,
    CashOut,
    MaxRounds,
}

/// One JSONL row per agent and game.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub run_id: String,
    pub agent: String,
    pub game_index: usize,
    pub rounds: u32,
    pub guesses: u32,
    pub correct: u32,
    pub ties: u32,
    pub streak: u32,
    pub pot_factor: f64,
    pub ending: GameEnding,
    pub shuffles: u32,
    pub desyncs: u32,
    pub methods: BTreeMap<&'static str, u32>,
}

impl BenchRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let agents = config
            .agents
            .iter()
            .map(AgentBlueprint::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            agents,
        })
    }

    /// Execute the benchmark, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut analytics = AnalyticsCollector::new(&self.config)?;
        let seed = self.config.shoes.seed.unwrap_or(0);
        let mut rows_written = 0usize;

        for agent in &self.agents {
            let mut table = Table::new(agent, &self.config, seed);
            for game_index in 0..self.config.shoes.count {
                let record = table.play_game(&self.config, game_index)?;
                analytics.record_game(&record)?;

                if self.logging_enabled && tracing::enabled!(Level::INFO) {
                    event!(
                        target: "hilo_bench::game",
                        Level::INFO,
                        run_id = %record.run_id,
                        agent = %record.agent,
                        game_index = record.game_index as u64,
                        rounds = record.rounds,
                        streak = record.streak,
                        pot_factor = record.pot_factor,
                        ending = ?record.ending,
                        "game finished"
                    );
                }

                serde_json::to_writer(&mut writer, &record)?;
                writer.write_all(b"\n")?;
                rows_written += 1;
            }
        }
        writer.flush()?;

        let summary = analytics.finalize();
        summary.write_markdown(&self.outputs.summary_md)?;

        let telemetry_path = self
            .logging_enabled
            .then(|| telemetry_dir(&self.outputs).join("telemetry.jsonl"));

        Ok(RunSummary {
            games_per_agent: self.config.shoes.count,
            agents: self.agents.len(),
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
            analytics: summary,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Per-agent table: the shoe and the agent's session persist across games.
///
/// Every card, shuffle and loss is fed to the session as the table would show it,
/// so tie inference and card-limit resets run exactly as they do live.
struct Table<'a> {
    agent: &'a AgentBlueprint,
    session: Session,
    shoe: Shoe,
}

impl<'a> Table<'a> {
    fn new(agent: &'a AgentBlueprint, config: &BenchmarkConfig, seed: u64) -> Self {
        Self {
            session: Session::with_policy(&agent.settings, agent.spawn_policy(seed)),
            shoe: Shoe::new(seed, config.shoes.reshuffle_after),
            agent,
        }
    }

    fn play_game(
        &mut self,
        config: &BenchmarkConfig,
        game_index: usize,
    ) -> Result<GameRecord, RunnerError> {
        let rules = &config.shoes;
        let agent: &'a AgentBlueprint = self.agent;
        let settings = &agent.settings;
        let mut record = GameRecord {
            run_id: config.run_id.clone(),
            agent: agent.name.clone(),
            game_index,
            rounds: 0,
            guesses: 0,
            correct: 0,
            ties: 0,
            streak: 0,
            pot_factor: 0.0,
            ending: GameEnding::MaxRounds,
            shuffles: 0,
            desyncs: 0,
            methods: BTreeMap::new(),
        };
        let mut pot = 1.0;

        loop {
            if record.rounds >= rules.max_rounds {
                record.pot_factor = pot;
                record.ending = GameEnding::MaxRounds;
                break;
            }

            if self.shoe.prepare_round() {
                self.session.handle(GameEvent::ShuffleDetected, settings);
                record.shuffles += 1;
            }
            self.session.observe_table(TableReadout {
                modifier: Some(rules.modifier),
                pot: Some(pot),
            });
            let dealer = self.shoe.deal().ok_or(RunnerError::ShoeExhausted)?;
            let shown = self
                .session
                .handle(GameEvent::DealerCardObserved(dealer), settings);
            if shown.desync.is_some() {
                record.desyncs += 1;
            }
            let recommendation = shown.recommendation.ok_or(RunnerError::Ungraded)?;
            *record
                .methods
                .entry(recommendation.method.as_str())
                .or_insert(0) += 1;

            if shown.advisory.is_some_and(|advisory| advisory.cash_out) {
                record.pot_factor = pot * CASH_OUT_BASELINE;
                record.ending = GameEnding::CashOut;
                break;
            }

            let player = self.shoe.deal().ok_or(RunnerError::ShoeExhausted)?;
            let resolved = self
                .session
                .handle(GameEvent::PlayerCardObserved(player), settings);
            if resolved.desync.is_some() {
                record.desyncs += 1;
            }
            record.guesses += 1;
            record.rounds += 1;

            let outcome = resolved
                .outcome
                .and_then(|graded| graded.outcome)
                .ok_or(RunnerError::Ungraded)?;
            if outcome == Outcome::Tie {
                record.ties += 1;
            }

            match outcome {
                Outcome::Win => {
                    record.correct += 1;
                    record.streak += 1;
                    pot *= 1.0 + rules.modifier;
                }
                Outcome::Tie if rules.tie_is_push => {}
                Outcome::Tie | Outcome::Loss => {
                    self.session.handle(GameEvent::RoundEndedAsLoss, settings);
                    record.pot_factor = 0.0;
                    record.ending = GameEnding::Loss;
                    break;
                }
            }
        }

        self.session.handle(GameEvent::GameEnded, settings);
        Ok(record)
    }
}

struct AgentBlueprint {
    name: String,
    kind: AgentKind,
    settings: Settings,
}

impl AgentBlueprint {
    fn from_config(config: &AgentConfig) -> Result<Self, RunnerError> {
        Ok(Self {
            name: config.name.clone(),
            kind: config.kind,
            settings: config.decision_settings()?,
        })
    }

    fn spawn_policy(&self, seed: u64) -> Box<dyn Policy> {
        match self.kind {
            AgentKind::Engine => Box::new(EnginePolicy::new(self.name.clone(), seed)),
            AgentKind::Midpoint => Box::new(MidpointPolicy::new(self.name.clone())),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid agent configuration: {0}")]
    Agent(#[from] ValidationError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("shoe ran out of cards mid-round")]
    ShoeExhausted,
    #[error("session left a dealt round without a graded guess")]
    Ungraded,
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(agents: &str) -> BenchmarkConfig {
        let yaml = format!(
            r#"
run_id: "unit"
shoes:
  seed: 11
  count: 12
  reshuffle_after: 20
  max_rounds: 6
  modifier: 0.25
agents:
{agents}
outputs:
  jsonl: "unused.jsonl"
  summary_md: "unused.md"
"#
        );
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
        cfg.validate().expect("config validates");
        cfg
    }

    fn play(cfg: &BenchmarkConfig) -> Vec<GameRecord> {
        let agent = AgentBlueprint::from_config(&cfg.agents[0]).expect("agent");
        let mut table = Table::new(&agent, cfg, 11);
        (0..cfg.shoes.count)
            .map(|index| table.play_game(cfg, index).expect("game completes"))
            .collect()
    }

    #[test]
    fn games_respect_round_cap_and_pot_rules() {
        let cfg = config("  - name: \"midpoint\"\n    kind: \"midpoint\"");
        for record in play(&cfg) {
            assert!(record.rounds <= 6);
            assert!(record.correct <= record.guesses);
            match record.ending {
                GameEnding::Loss => assert_eq!(record.pot_factor, 0.0),
                GameEnding::MaxRounds => {
                    let expected = 1.25f64.powi(record.correct as i32);
                    assert!((record.pot_factor - expected).abs() < 1e-9);
                }
                GameEnding::CashOut => panic!("midpoint never cashes out"),
            }
        }
    }

    #[test]
    fn tracker_conserves_cards_across_games() {
        let cfg = config("  - name: \"midpoint\"\n    kind: \"midpoint\"");
        let agent = AgentBlueprint::from_config(&cfg.agents[0]).expect("agent");
        let mut table = Table::new(&agent, &cfg, 3);
        for index in 0..cfg.shoes.count {
            table.play_game(&cfg, index).expect("game completes");
            let tracker = table.session.tracker();
            assert_eq!(
                tracker.remaining() + tracker.cards_seen(),
                hilo_core::model::deck::DECK_SIZE
            );
            assert_eq!(table.session.round(), None);
        }
    }

    #[test]
    fn losing_ties_are_learned_by_the_session() {
        let mut cfg = config("  - name: \"midpoint\"\n    kind: \"midpoint\"");
        cfg.shoes.tie_is_push = false;
        let agent = AgentBlueprint::from_config(&cfg.agents[0]).expect("agent");
        let mut table = Table::new(&agent, &cfg, 5);
        assert!(table.session.tie_is_push());

        let tied = (0..500).find_map(|index| {
            let record = table.play_game(&cfg, index).expect("game completes");
            (record.ties > 0).then_some(record)
        });
        let record = tied.expect("a tie within 500 games");
        assert_eq!(record.ending, GameEnding::Loss);
        assert!(!table.session.tie_is_push());
    }

    #[test]
    fn engine_runs_are_reproducible() {
        let cfg = config(
            "  - name: \"engine\"\n    kind: \"engine\"\n    settings:\n      mcRollouts: 40",
        );
        let first: Vec<_> = play(&cfg).into_iter().map(|r| (r.rounds, r.ending)).collect();
        let second: Vec<_> = play(&cfg).into_iter().map(|r| (r.rounds, r.ending)).collect();
        assert_eq!(first, second);
    }
}
