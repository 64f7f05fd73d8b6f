use hilo_core::game::settings::Settings;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_RESHUFFLE_AFTER: usize = 32;
const DEFAULT_MAX_ROUNDS: u32 = 20;
const DEFAULT_MODIFIER: f64 = 0.2;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root benchmark configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub shoes: ShoeConfig,
    pub agents: Vec<AgentConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let mut cfg: BenchmarkConfig = serde_yaml::from_reader(BufReader::new(file))
            .map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.shoes.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        validate_agents(&mut self.agents)?;
        Ok(())
    }

    /// Resolve `{run_id}` placeholders into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }
}

/// Table rules and shoe sampling.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ShoeConfig {
    pub seed: Option<u64>,
    /// Games played per agent.
    pub count: usize,
    #[serde(default = "default_reshuffle_after")]
    pub reshuffle_after: usize,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
    #[serde(default = "default_modifier")]
    pub modifier: f64,
    #[serde(default = "default_tie_is_push")]
    pub tie_is_push: bool,
}

impl ShoeConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.count == 0 {
            return Err(ValidationError::InvalidField {
                field: "shoes.count".to_string(),
                message: "number of games must be greater than zero".to_string(),
            });
        }

        if !(2..=52).contains(&self.reshuffle_after) {
            return Err(ValidationError::InvalidField {
                field: "shoes.reshuffle_after".to_string(),
                message: "reshuffle point must be between 2 and 52 cards".to_string(),
            });
        }

        if self.max_rounds == 0 {
            return Err(ValidationError::InvalidField {
                field: "shoes.max_rounds".to_string(),
                message: "max rounds must be at least 1".to_string(),
            });
        }

        if !self.modifier.is_finite() || self.modifier <= -1.0 {
            return Err(ValidationError::InvalidField {
                field: "shoes.modifier".to_string(),
                message: "modifier must be a finite number above -1".to_string(),
            });
        }

        Ok(())
    }
}

fn default_reshuffle_after() -> usize {
    DEFAULT_RESHUFFLE_AFTER
}

fn default_max_rounds() -> u32 {
    DEFAULT_MAX_ROUNDS
}

fn default_modifier() -> f64 {
    DEFAULT_MODIFIER
}

fn default_tie_is_push() -> bool {
    true
}

/// One benchmarked guessing policy.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    pub kind: AgentKind,
    /// Overrides merged over the default decision settings (camelCase keys).
    #[serde(default)]
    pub settings: serde_yaml::Value,
}

impl AgentConfig {
    pub fn decision_settings(&self) -> Result<Settings, ValidationError> {
        if self.settings.is_null() {
            return Ok(Settings::default());
        }
        serde_yaml::from_value::<Settings>(self.settings.clone())
            .map(Settings::normalized)
            .map_err(|err| ValidationError::InvalidField {
                field: format!("agents[{}].settings", self.name),
                message: err.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Engine,
    Midpoint,
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            if resolve_template(run_id, value).components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_agents(agents: &mut [AgentConfig]) -> Result<(), ValidationError> {
    if agents.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "agents".to_string(),
            message: "at least one agent must be specified".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for agent in agents.iter_mut() {
        if agent.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "agents.name".to_string(),
                message: "agent name must not be empty".to_string(),
            });
        }

        if !agent.name.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
            return Err(ValidationError::InvalidField {
                field: format!("agents[{}].name", agent.name),
                message: "agent name contains invalid characters".to_string(),
            });
        }

        if !seen.insert(agent.name.clone()) {
            return Err(ValidationError::InvalidField {
                field: "agents".to_string(),
                message: format!("agent name '{}' defined more than once", agent.name),
            });
        }

        if agent.kind == AgentKind::Midpoint && !agent.settings.is_null() {
            return Err(ValidationError::InvalidField {
                field: format!("agents[{}].settings", agent.name),
                message: "midpoint agents take no settings".to_string(),
            });
        }

        agent.decision_settings()?;
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use hilo_core::game::settings::Mode;

    const BASIC_YAML: &str = r#"
run_id: "stage0_smoke"
shoes:
  seed: 123
  count: 16
agents:
  - name: "engine"
    kind: "engine"
  - name: "merit"
    kind: "engine"
    settings:
      mode: "merit"
      mcRollouts: 300
  - name: "midpoint"
    kind: "midpoint"
outputs:
  jsonl: "bench/out/{run_id}/games.jsonl"
  summary_md: "bench/out/{run_id}/summary.md"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert_eq!(cfg.shoes.reshuffle_after, DEFAULT_RESHUFFLE_AFTER);
        assert_eq!(cfg.shoes.max_rounds, DEFAULT_MAX_ROUNDS);
        assert!(cfg.shoes.tie_is_push);
        assert!(cfg.logging.enable_structured);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.jsonl,
            PathBuf::from("bench/out/stage0_smoke/games.jsonl")
        );
    }

    #[test]
    fn agent_settings_merge_over_defaults() {
        let cfg: BenchmarkConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        let merit = cfg.agents[1].decision_settings().expect("settings decode");
        assert_eq!(merit.mode, Mode::Merit);
        assert_eq!(merit.mc_rollouts, 300);
        assert!(merit.lookahead_tie_breaker);
        assert_eq!(cfg.agents[0].decision_settings().expect("defaults"), Settings::default());
    }

    #[test]
    fn rejects_duplicate_agents() {
        let yaml = BASIC_YAML.replace("name: \"merit\"", "name: \"engine\"");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("duplicate agents should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "agents"
        ));
    }

    #[test]
    fn rejects_invalid_run_id() {
        let yaml = BASIC_YAML.replace("stage0_smoke", "stage 0 smoke");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("invalid run id");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "run_id"
        ));
    }

    #[test]
    fn rejects_out_of_range_reshuffle_point() {
        let yaml = BASIC_YAML.replace("count: 16", "count: 16\n  reshuffle_after: 60");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("reshuffle beyond the deck");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "shoes.reshuffle_after"
        ));
    }

    #[test]
    fn rejects_malformed_agent_settings() {
        let yaml = BASIC_YAML.replace("mcRollouts: 300", "mcRollouts: \"many\"");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("rollouts must be numeric");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "agents[merit].settings"
        ));
    }
}
