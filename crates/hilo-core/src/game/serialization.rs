use crate::model::deck::{DECK_SIZE, DeckTracker, RankCounts, ResetReason};
use crate::model::rank::{RANK_COUNT, Rank};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Persisted shape of the tracker and session bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeckSnapshot {
    pub counts: [u8; RANK_COUNT],
    pub cards_seen_since_reset: u32,
    pub deck_known: bool,
    pub tie_is_push: bool,
    pub last_dealer_rank: Option<u8>,
    pub last_player_rank: Option<u8>,
}

/// Structural problems found in a decoded snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    Decode(String),
    CountOutOfRange { index: usize, value: u8 },
    RankOutOfRange(u8),
    Conservation { remaining: u32, seen: u32 },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Decode(message) => write!(f, "snapshot could not be decoded: {message}"),
            SnapshotError::CountOutOfRange { index, value } => {
                write!(f, "count {value} at index {index} exceeds four copies")
            }
            SnapshotError::RankOutOfRange(value) => write!(f, "rank {value} is not in 2..=14"),
            SnapshotError::Conservation { remaining, seen } => write!(
                f,
                "{remaining} remaining plus {seen} seen does not account for {DECK_SIZE} cards"
            ),
        }
    }
}

impl std::error::Error for SnapshotError {}

/// Live state rebuilt from a snapshot.
#[derive(Debug, Clone)]
pub struct RestoredDeck {
    pub tracker: DeckTracker,
    pub tie_is_push: bool,
    pub last_dealer: Option<Rank>,
    pub last_player: Option<Rank>,
    /// Set when the snapshot was rejected and a fresh, unknown deck was substituted.
    pub fell_back: Option<SnapshotError>,
}

impl DeckSnapshot {
    pub fn capture(
        tracker: &DeckTracker,
        tie_is_push: bool,
        last_dealer: Option<Rank>,
        last_player: Option<Rank>,
    ) -> Self {
        Self {
            counts: tracker.counts().as_array(),
            cards_seen_since_reset: tracker.cards_seen(),
            deck_known: tracker.is_known(),
            tie_is_push,
            last_dealer_rank: last_dealer.map(Rank::value),
            last_player_rank: last_player.map(Rank::value),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(|err| SnapshotError::Decode(err.to_string()))
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        let counts = RankCounts::from_array(self.counts).ok_or_else(|| {
            let (index, value) = self
                .counts
                .iter()
                .copied()
                .enumerate()
                .find(|(_, value)| *value > 4)
                .unwrap_or((0, 0));
            SnapshotError::CountOutOfRange { index, value }
        })?;
        for value in [self.last_dealer_rank, self.last_player_rank]
            .into_iter()
            .flatten()
        {
            if Rank::from_value(value).is_none() {
                return Err(SnapshotError::RankOutOfRange(value));
            }
        }
        let remaining = counts.total();
        if remaining.checked_add(self.cards_seen_since_reset) != Some(DECK_SIZE) {
            return Err(SnapshotError::Conservation {
                remaining,
                seen: self.cards_seen_since_reset,
            });
        }
        Ok(())
    }

    /// Rebuilds live state, substituting a fresh unknown deck for anything inconsistent.
    pub fn restore(&self) -> RestoredDeck {
        match self.validate() {
            Ok(()) => RestoredDeck {
                tracker: DeckTracker::restore(
                    RankCounts::from_array(self.counts).unwrap_or_default(),
                    self.cards_seen_since_reset,
                    self.deck_known,
                ),
                tie_is_push: self.tie_is_push,
                last_dealer: self.last_dealer_rank.and_then(Rank::from_value),
                last_player: self.last_player_rank.and_then(Rank::from_value),
                fell_back: None,
            },
            Err(err) => RestoredDeck::rejected(self.tie_is_push, err),
        }
    }

    /// Decodes and restores in one step; undecodable text also falls back.
    pub fn restore_from_json(json: &str, tie_is_push: bool) -> RestoredDeck {
        match Self::from_json(json) {
            Ok(snapshot) => snapshot.restore(),
            Err(err) => RestoredDeck::rejected(tie_is_push, err),
        }
    }
}

impl RestoredDeck {
    /// Fresh unknown deck standing in for a snapshot that could not be used.
    pub fn rejected(tie_is_push: bool, err: SnapshotError) -> Self {
        let mut tracker = DeckTracker::new();
        tracker.reset(ResetReason::SnapshotInvalid);
        tracker.invalidate();
        Self {
            tracker,
            tie_is_push,
            last_dealer: None,
            last_player: None,
            fell_back: Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played_tracker() -> DeckTracker {
        let mut tracker = DeckTracker::new();
        tracker.consume(Rank::Ace).unwrap();
        tracker.consume(Rank::Three).unwrap();
        tracker
    }

    #[test]
    fn snapshot_serializes_with_camel_case_fields() {
        let snapshot =
            DeckSnapshot::capture(&played_tracker(), true, Some(Rank::Ace), Some(Rank::Three));
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"cardsSeenSinceReset\": 2"));
        assert!(json.contains("\"lastDealerRank\": 14"));
        assert!(json.contains("\"deckKnown\": true"));
    }

    #[test]
    fn capture_restore_preserves_tracker() {
        let tracker = played_tracker();
        let snapshot = DeckSnapshot::capture(&tracker, false, Some(Rank::Ace), None);
        let json = snapshot.to_json().unwrap();
        let restored = DeckSnapshot::restore_from_json(&json, true);
        assert!(restored.fell_back.is_none());
        assert_eq!(restored.tracker.counts(), tracker.counts());
        assert_eq!(restored.tracker.cards_seen(), 2);
        assert!(!restored.tie_is_push);
        assert_eq!(restored.last_dealer, Some(Rank::Ace));
        assert_eq!(restored.last_player, None);
    }

    #[test]
    fn wrong_length_counts_fall_back_to_unknown_deck() {
        let json = r#"{
            "counts": [4, 4, 4],
            "cardsSeenSinceReset": 0,
            "deckKnown": true,
            "tieIsPush": true,
            "lastDealerRank": null,
            "lastPlayerRank": null
        }"#;
        let restored = DeckSnapshot::restore_from_json(json, true);
        assert!(matches!(restored.fell_back, Some(SnapshotError::Decode(_))));
        assert_eq!(restored.tracker.remaining(), DECK_SIZE);
        assert_eq!(restored.tracker.cards_seen(), 0);
        assert!(!restored.tracker.is_known());
    }

    #[test]
    fn out_of_range_values_fall_back() {
        let mut snapshot = DeckSnapshot::capture(&DeckTracker::new(), true, None, None);
        snapshot.counts[5] = 9;
        let restored = snapshot.restore();
        assert_eq!(
            restored.fell_back,
            Some(SnapshotError::CountOutOfRange { index: 5, value: 9 })
        );
        assert!(!restored.tracker.is_known());

        let mut snapshot = DeckSnapshot::capture(&DeckTracker::new(), true, None, None);
        snapshot.last_dealer_rank = Some(1);
        assert_eq!(snapshot.validate(), Err(SnapshotError::RankOutOfRange(1)));
    }

    #[test]
    fn conservation_violation_falls_back() {
        let mut snapshot = DeckSnapshot::capture(&played_tracker(), true, None, None);
        snapshot.cards_seen_since_reset = 7;
        assert!(matches!(
            snapshot.restore().fell_back,
            Some(SnapshotError::Conservation { remaining: 50, seen: 7 })
        ));
    }

    #[test]
    fn garbage_text_never_panics() {
        for text in ["", "null", "[1,2,3]", "{\"counts\": \"x\"}", "{\"counts\": [400]}"] {
            let restored = DeckSnapshot::restore_from_json(text, false);
            assert!(restored.fell_back.is_some(), "{text} should fall back");
            assert!(!restored.tracker.is_known());
            assert!(!restored.tie_is_push);
        }
    }
}
