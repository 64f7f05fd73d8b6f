use super::{
    ActionScores, LookaheadResolver, Method, MonteCarloSimulator, Recommendation, RolloutConfig,
};
use hilo_core::game::round::Round;
use hilo_core::game::settings::Settings;
use hilo_core::model::action::Action;
use hilo_core::model::deck::RankCounts;
use hilo_core::model::odds::Odds;
use hilo_core::model::rank::Rank;
use rand::Rng;
use tracing::{Level, event};

/// Highest dealer rank for which the midpoint rule says HIGH.
const MIDPOINT_RANK: Rank = Rank::Eight;

/// Everything a single decision reads.
#[derive(Debug, Clone, Copy)]
pub struct DecisionInputs<'a> {
    pub counts: &'a RankCounts,
    pub round: &'a Round,
    pub settings: &'a Settings,
    pub tie_is_push: bool,
    /// Observed payout modifier for this round; rollouts assume a flat pot when unknown.
    pub modifier: Option<f64>,
}

/// Probability model, then lookahead on exact ties, then Monte Carlo on close calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionEngine;

impl DecisionEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn decide<R: Rng + ?Sized>(&self, inputs: DecisionInputs<'_>, rng: &mut R) -> Recommendation {
        let dealer = inputs.round.dealer();
        let settings = inputs.settings;
        let partition = inputs.counts.partition_relative_to(dealer);
        if partition.total == 0 {
            return Recommendation::new(Action::High, Odds::ZERO, Method::Fallback);
        }
        let odds = Odds::evaluate(partition);

        let mut recommendation = match odds.favoured() {
            Some(action) => Recommendation::new(action, odds, Method::MaxPwin),
            None if settings.lookahead_tie_breaker => {
                let (action, scores) = LookaheadResolver::resolve(inputs.counts, dealer);
                Recommendation::new(action, odds, Method::Lookahead).with_scores(scores)
            }
            None => Recommendation::new(midpoint_action(dealer), odds, Method::Midpoint),
        };

        if settings.monte_carlo_enabled && odds.edge() < settings.mc_trigger_edge {
            let config = RolloutConfig::from_settings(
                settings,
                inputs.modifier.unwrap_or(0.0),
                inputs.tie_is_push,
            );
            // Both openings replay the same per-rollout draws.
            let base_seed = rng.next_u64();
            let scores = ActionScores {
                high: MonteCarloSimulator::score_seeded(
                    inputs.counts,
                    dealer,
                    Action::High,
                    &config,
                    base_seed,
                ),
                low: MonteCarloSimulator::score_seeded(
                    inputs.counts,
                    dealer,
                    Action::Low,
                    &config,
                    base_seed,
                ),
            };
            let action = scores.leader().unwrap_or(recommendation.action);
            if tracing::enabled!(Level::DEBUG) {
                event!(
                    target: "hilo_bot::decision",
                    Level::DEBUG,
                    dealer = %dealer,
                    edge = odds.edge(),
                    high = scores.high,
                    low = scores.low,
                    prior = %recommendation.method,
                    chosen = %action,
                    "monte carlo override"
                );
            }
            recommendation = Recommendation::new(action, odds, Method::Montecarlo).with_scores(scores);
        }

        recommendation
    }
}

/// Fixed rule for exact ties when lookahead is switched off.
pub fn midpoint_action(dealer: Rank) -> Action {
    if dealer <= MIDPOINT_RANK {
        Action::High
    } else {
        Action::Low
    }
}
