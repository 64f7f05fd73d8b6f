use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CARD_LIMIT: u32 = 32;
pub const DEFAULT_MC_ROLLOUTS: u32 = 1_200;
pub const DEFAULT_MC_HORIZON: u32 = 4;
pub const DEFAULT_MC_TRIGGER_EDGE: f64 = 0.03;

/// Objective optimised by the decision engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Maximise expected pot growth.
    #[default]
    Profit,
    /// Maximise the chance of staying alive.
    Merit,
}

impl Mode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Profit => "profit",
            Mode::Merit => "merit",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "profit" => Ok(Mode::Profit),
            "merit" => Ok(Mode::Merit),
            other => Err(format!("unknown mode '{other}'")),
        }
    }
}

/// Decision settings injected into every core call.
///
/// Missing fields fall back to their defaults when decoding, so older
/// persisted documents keep loading after new switches are added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub mode: Mode,
    /// Only read by presentation layers.
    pub hide_worst_enabled: bool,
    pub auto_reset_on_card_limit: bool,
    pub card_limit: u32,
    pub lookahead_tie_breaker: bool,
    pub monte_carlo_enabled: bool,
    pub mc_rollouts: u32,
    pub mc_horizon: u32,
    pub mc_trigger_edge: f64,
    /// Starting assumption for ties; sessions refine it from observed outcomes.
    pub tie_is_push: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Profit,
            hide_worst_enabled: true,
            auto_reset_on_card_limit: true,
            card_limit: DEFAULT_CARD_LIMIT,
            lookahead_tie_breaker: true,
            monte_carlo_enabled: true,
            mc_rollouts: DEFAULT_MC_ROLLOUTS,
            mc_horizon: DEFAULT_MC_HORIZON,
            mc_trigger_edge: DEFAULT_MC_TRIGGER_EDGE,
            tie_is_push: true,
        }
    }
}

impl Settings {
    /// Decodes persisted settings, falling back to defaults on malformed input.
    pub fn from_json_or_default(json: &str) -> Self {
        serde_json::from_str::<Settings>(json)
            .map(Settings::normalized)
            .unwrap_or_default()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Clamps values into their documented ranges.
    pub fn normalized(mut self) -> Self {
        if !self.mc_trigger_edge.is_finite() {
            self.mc_trigger_edge = DEFAULT_MC_TRIGGER_EDGE;
        }
        self.mc_trigger_edge = self.mc_trigger_edge.clamp(0.0, 1.0);
        self
    }
}
