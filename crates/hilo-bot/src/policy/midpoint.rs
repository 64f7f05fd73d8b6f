use super::{Policy, PolicyContext};
use crate::bot::{Advisory, Method, Recommendation, midpoint_action};
use hilo_core::model::action::Action;
use hilo_core::model::odds::Odds;

/// Baseline: follow the larger side of the deck, midpoint rule on exact ties.
///
/// Never runs lookahead or rollouts and never cashes out.
#[derive(Debug, Clone)]
pub struct MidpointPolicy {
    name: String,
}

impl MidpointPolicy {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Policy for MidpointPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn recommend(&mut self, ctx: &PolicyContext) -> Recommendation {
        let dealer = ctx.round.dealer();
        let partition = ctx.tracker.partition_relative_to(dealer);
        if partition.total == 0 {
            return Recommendation::new(Action::High, Odds::ZERO, Method::Fallback);
        }
        let odds = Odds::evaluate(partition);
        match odds.favoured() {
            Some(action) => Recommendation::new(action, odds, Method::MaxPwin),
            None => Recommendation::new(midpoint_action(dealer), odds, Method::Midpoint),
        }
    }

    fn advise(&mut self, _ctx: &PolicyContext, _recommendation: &Recommendation) -> Option<Advisory> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hilo_core::game::round::Round;
    use hilo_core::game::settings::Settings;
    use hilo_core::model::deck::{DECK_SIZE, DeckTracker, RankCounts};
    use hilo_core::model::rank::Rank;

    #[test]
    fn follows_counts_then_midpoint() {
        let mut tracker = DeckTracker::new();
        tracker.consume(Rank::Eight).unwrap();
        let settings = Settings::default();
        let round = Round::new(Rank::Eight);
        let ctx = PolicyContext {
            tracker: &tracker,
            round: &round,
            settings: &settings,
            tie_is_push: true,
            modifier: Some(0.3),
            pot: Some(100.0),
        };
        let mut policy = MidpointPolicy::new("midpoint");
        let rec = policy.recommend(&ctx);
        assert_eq!(rec.method, Method::Midpoint);
        assert_eq!(rec.action, Action::High);
        assert!(policy.advise(&ctx, &rec).is_none());
        assert_eq!(policy.name(), "midpoint");
    }

    #[test]
    fn empty_deck_falls_back_to_high() {
        let tracker = DeckTracker::restore(RankCounts::from_array([0; 13]).unwrap(), DECK_SIZE, true);
        let settings = Settings::default();
        let round = Round::new(Rank::Queen);
        let ctx = PolicyContext {
            tracker: &tracker,
            round: &round,
            settings: &settings,
            tie_is_push: true,
            modifier: None,
            pot: None,
        };
        let rec = MidpointPolicy::new("midpoint").recommend(&ctx);
        assert_eq!(rec.method, Method::Fallback);
        assert_eq!(rec.action, Action::High);
        assert_eq!((rec.p_high, rec.p_low, rec.p_tie), (0.0, 0.0, 0.0));
    }
}
