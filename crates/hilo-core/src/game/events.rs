use crate::model::rank::{ParseRankError, Rank};

/// Observations pushed in by whatever watches the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    DealerCardObserved(Rank),
    PlayerCardObserved(Rank),
    ShuffleDetected,
    /// Best-effort signal that the latest round counted against the player.
    RoundEndedAsLoss,
    /// The table left the playing screen; the shoe itself is untouched.
    GameEnded,
    ManualReset,
}

impl GameEvent {
    /// Builds a dealer observation from card-face text, rejecting unknown faces.
    pub fn dealer_from_text(text: &str) -> Result<Self, ParseRankError> {
        text.parse().map(GameEvent::DealerCardObserved)
    }

    /// Builds a player observation from card-face text, rejecting unknown faces.
    pub fn player_from_text(text: &str) -> Result<Self, ParseRankError> {
        text.parse().map(GameEvent::PlayerCardObserved)
    }
}

#[cfg(test)]
mod tests {
    use super::GameEvent;
    use crate::model::rank::Rank;

    #[test]
    fn text_observations_parse_at_the_boundary() {
        assert_eq!(
            GameEvent::dealer_from_text("Q"),
            Ok(GameEvent::DealerCardObserved(Rank::Queen))
        );
        assert_eq!(
            GameEvent::player_from_text(" 10 "),
            Ok(GameEvent::PlayerCardObserved(Rank::Ten))
        );
        assert!(GameEvent::dealer_from_text("?").is_err());
    }
}
