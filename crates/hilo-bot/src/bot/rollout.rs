//! Bounded-horizon Monte Carlo rollouts for close decisions.
//!
//! Every rollout plays on its own copy of the remaining counts with its own
//! generator, seeded from a base seed plus the rollout index. Rollouts run on
//! the rayon pool; results are gathered in index order before averaging so the
//! score for a given base seed does not depend on scheduling.

use hilo_core::game::settings::{Mode, Settings};
use hilo_core::model::action::Action;
use hilo_core::model::deck::RankCounts;
use hilo_core::model::odds::Odds;
use hilo_core::model::rank::Rank;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Parameters shared by every rollout of one score call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RolloutConfig {
    pub horizon: u32,
    pub rollouts: u32,
    pub mode: Mode,
    /// Payout multiplier added to 1 on each correct guess.
    pub modifier: f64,
    pub tie_is_push: bool,
}

impl RolloutConfig {
    pub fn from_settings(settings: &Settings, modifier: f64, tie_is_push: bool) -> Self {
        Self {
            horizon: settings.mc_horizon,
            rollouts: settings.mc_rollouts,
            mode: settings.mode,
            modifier,
            tie_is_push,
        }
    }

    fn growth(&self) -> f64 {
        (1.0 + self.modifier).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MonteCarloSimulator;

impl MonteCarloSimulator {
    /// Mean rollout value of opening with `first` against `dealer`.
    ///
    /// Merit mode scores survival (1 or 0) and stays within `[0, 1]`; profit mode
    /// scores the final pot factor and is never negative.
    pub fn score<R: Rng + ?Sized>(
        counts: &RankCounts,
        dealer: Rank,
        first: Action,
        config: &RolloutConfig,
        rng: &mut R,
    ) -> f64 {
        Self::score_seeded(counts, dealer, first, config, rng.next_u64())
    }

    /// Same as [`MonteCarloSimulator::score`] with an explicit base seed.
    pub fn score_seeded(
        counts: &RankCounts,
        dealer: Rank,
        first: Action,
        config: &RolloutConfig,
        base_seed: u64,
    ) -> f64 {
        if config.rollouts == 0 {
            return 0.0;
        }
        let snapshot = *counts;
        let outcomes: Vec<f64> = (0..config.rollouts)
            .into_par_iter()
            .map(|index| {
                let seed = base_seed.wrapping_add((index as u64).wrapping_mul(SEED_STRIDE));
                let mut rng = SmallRng::seed_from_u64(seed);
                rollout(snapshot, dealer, first, config, &mut rng)
            })
            .collect();
        outcomes.iter().sum::<f64>() / config.rollouts as f64
    }
}

fn rollout<R: Rng + ?Sized>(
    mut deck: RankCounts,
    mut dealer: Rank,
    first: Action,
    config: &RolloutConfig,
    rng: &mut R,
) -> f64 {
    let mut pot = 1.0;
    for step in 0..config.horizon {
        let action = if step == 0 {
            first
        } else {
            greedy_action(&deck, dealer, config)
        };
        let Some(drawn) = deck.draw(rng) else {
            break;
        };
        if drawn == dealer {
            if !config.tie_is_push {
                return 0.0;
            }
            continue;
        }
        if !action.wins(dealer, drawn) {
            return 0.0;
        }
        if config.mode == Mode::Profit {
            pot *= config.growth();
        }
        dealer = drawn;
    }
    match config.mode {
        Mode::Profit => pot,
        Mode::Merit => 1.0,
    }
}

/// Myopic choice used after the first step; ties go to HIGH.
fn greedy_action(deck: &RankCounts, dealer: Rank, config: &RolloutConfig) -> Action {
    let odds = Odds::evaluate(deck.partition_relative_to(dealer));
    let value = |action: Action| match config.mode {
        Mode::Merit => odds.p_win(action),
        Mode::Profit => {
            let push = if config.tie_is_push { odds.p_tie } else { 0.0 };
            odds.p_win(action) * (1.0 + config.modifier) + push
        }
    };
    if value(Action::Low) > value(Action::High) {
        Action::Low
    } else {
        Action::High
    }
}
