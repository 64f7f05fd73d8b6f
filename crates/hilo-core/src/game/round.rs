use crate::model::action::Action;
use crate::model::rank::Rank;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Where the current round sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    WaitingDealer,
    DealerShown,
    Resolved,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RoundPhase::WaitingDealer => "waiting-dealer",
            RoundPhase::DealerShown => "dealer-shown",
            RoundPhase::Resolved => "resolved",
        })
    }
}

/// One dealer/player comparison. Superseded by the next dealer card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Round {
    dealer: Rank,
    player: Option<Rank>,
    resolved: bool,
}

impl Round {
    pub const fn new(dealer: Rank) -> Self {
        Self {
            dealer,
            player: None,
            resolved: false,
        }
    }

    pub const fn dealer(&self) -> Rank {
        self.dealer
    }

    pub const fn player(&self) -> Option<Rank> {
        self.player
    }

    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn phase(&self) -> RoundPhase {
        if self.resolved {
            RoundPhase::Resolved
        } else {
            RoundPhase::DealerShown
        }
    }

    /// Records the player card. Returns `false` if the round was already resolved.
    pub fn resolve(&mut self, player: Rank) -> bool {
        if self.resolved {
            return false;
        }
        self.player = Some(player);
        self.resolved = true;
        true
    }

    pub fn is_tie(&self) -> bool {
        self.player == Some(self.dealer)
    }

    /// Grades `guess` against the revealed player card.
    pub fn outcome_for(&self, guess: Action) -> Option<Outcome> {
        let player = self.player?;
        Some(if player == self.dealer {
            Outcome::Tie
        } else if guess.wins(self.dealer, player) {
            Outcome::Win
        } else {
            Outcome::Loss
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}
