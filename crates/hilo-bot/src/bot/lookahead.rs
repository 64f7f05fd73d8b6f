//! One-ply tie breaker for exactly balanced decisions.

use super::ActionScores;
use hilo_core::model::action::Action;
use hilo_core::model::deck::RankCounts;
use hilo_core::model::odds::Odds;
use hilo_core::model::rank::Rank;

/// Expectations within this distance count as equal.
const SCORE_EPSILON: f64 = 1e-12;

/// Resolves exact HIGH/LOW ties by looking at the hand after a win.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookaheadResolver;

impl LookaheadResolver {
    /// Picks the action whose winning cards leave the better next hand.
    ///
    /// Deterministic for a given deck; equal expectations go to HIGH.
    pub fn resolve(counts: &RankCounts, dealer: Rank) -> (Action, ActionScores) {
        let scores = ActionScores {
            high: expected_edge(counts, dealer, Action::High),
            low: expected_edge(counts, dealer, Action::Low),
        };
        let action = if scores.low - scores.high > SCORE_EPSILON {
            Action::Low
        } else {
            Action::High
        };
        (action, scores)
    }
}

/// Average best immediate win chance on the next hand, given `action` wins now.
///
/// Each winning rank becomes the next dealer card and is removed from the deck;
/// ranks are weighted by their share of the winning cards.
pub fn expected_edge(counts: &RankCounts, dealer: Rank, action: Action) -> f64 {
    let winners: Vec<(Rank, u8)> = counts
        .iter_present()
        .filter(|(rank, _)| action.wins(dealer, *rank))
        .collect();
    let win_total: u32 = winners.iter().map(|(_, count)| *count as u32).sum();
    if win_total == 0 {
        return 0.0;
    }

    winners
        .into_iter()
        .filter_map(|(rank, count)| {
            let next = counts.without(rank)?;
            let best = Odds::evaluate(next.partition_relative_to(rank)).best();
            Some(count as f64 / win_total as f64 * best)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hilo_core::model::deck::DeckTracker;

    fn after_dealer(rank: Rank) -> RankCounts {
        let mut tracker = DeckTracker::new();
        tracker.consume(rank).unwrap();
        tracker.counts()
    }

    #[test]
    fn balanced_deck_resolves_deterministically() {
        let counts = after_dealer(Rank::Eight);
        let first = LookaheadResolver::resolve(&counts, Rank::Eight);
        for _ in 0..5 {
            assert_eq!(LookaheadResolver::resolve(&counts, Rank::Eight), first);
        }
        assert!(first.1.high > 0.0 && first.1.low > 0.0);
    }

    #[test]
    fn symmetric_fresh_deck_scores_match() {
        // After an eight, ranks 2..7 mirror 9..A so both sides score the same.
        let counts = after_dealer(Rank::Eight);
        let (action, scores) = LookaheadResolver::resolve(&counts, Rank::Eight);
        assert!((scores.high - scores.low).abs() < 1e-12);
        assert_eq!(action, Action::High);
    }

    #[test]
    fn no_winning_cards_scores_zero() {
        let counts = after_dealer(Rank::Ace);
        assert_eq!(expected_edge(&counts, Rank::Ace, Action::High), 0.0);
        assert!(expected_edge(&counts, Rank::Ace, Action::Low) > 0.5);
    }

    #[test]
    fn single_winning_rank_uses_its_next_hand() {
        let mut raw = [0u8; 13];
        raw[Rank::Two.index()] = 1;
        raw[Rank::Ace.index()] = 1;
        raw[Rank::Five.index()] = 2;
        let counts = RankCounts::from_array(raw).unwrap();
        // Winning LOW draws the two; remaining {5,5,A} are all above it.
        assert_eq!(expected_edge(&counts, Rank::Five, Action::Low), 1.0);
        // Winning HIGH draws the ace; remaining {2,5,5} are all below it.
        assert_eq!(expected_edge(&counts, Rank::Five, Action::High), 1.0);
    }

    #[test]
    fn skewed_tie_prefers_richer_follow_up() {
        let mut raw = [0u8; 13];
        raw[Rank::Six.index()] = 2;
        raw[Rank::Seven.index()] = 1;
        raw[Rank::Ten.index()] = 1;
        raw[Rank::Ace.index()] = 1;
        let counts = RankCounts::from_array(raw).unwrap();
        // Dealer 7: LOW wins on {6,6}, HIGH wins on {10,A}.
        let (action, scores) = LookaheadResolver::resolve(&counts, Rank::Seven);
        // After a 6 the deck is {6,7,10,A}: best = 3/4 higher.
        assert!((scores.low - 0.75).abs() < 1e-12);
        // After a 10: {6,6,7,A} best 3/4 lower; after an A: {6,6,7,10} best 4/4 lower.
        assert!((scores.high - 0.875).abs() < 1e-12);
        assert_eq!(action, Action::High);
    }
}
