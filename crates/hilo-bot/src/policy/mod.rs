mod engine;
mod midpoint;

pub use engine::EnginePolicy;
pub use midpoint::MidpointPolicy;

use crate::bot::{Advisory, ProfitModel, Recommendation};
use hilo_core::game::round::Round;
use hilo_core::game::settings::Settings;
use hilo_core::model::deck::DeckTracker;

/// Context provided to policies at each decision point
pub struct PolicyContext<'a> {
    pub tracker: &'a DeckTracker,
    pub round: &'a Round,
    pub settings: &'a Settings,
    pub tie_is_push: bool,
    pub modifier: Option<f64>,
    pub pot: Option<f64>,
}

/// Unified interface for HIGH/LOW guessing strategies
pub trait Policy: Send {
    fn name(&self) -> &str;

    /// Choose a guess for the dealer card in `ctx.round`
    fn recommend(&mut self, ctx: &PolicyContext) -> Recommendation;

    /// Optional: bank half the pot instead of playing this hand.
    /// Default implementation follows the profit advisory when one is available.
    fn advise(&mut self, ctx: &PolicyContext, recommendation: &Recommendation) -> Option<Advisory> {
        ProfitModel::hint(
            recommendation.p_win(),
            recommendation.p_tie,
            ctx.modifier,
            ctx.pot,
            ctx.tie_is_push,
            ctx.settings.mode,
        )
    }
}
