//! Remaining-card bookkeeping for a single shoe.

use crate::model::odds::Partition;
use crate::model::rank::{RANK_COUNT, Rank};
use core::fmt;
use rand::Rng;

/// Copies of each rank in a fresh deck.
pub const COPIES_PER_RANK: u8 = 4;
/// Cards in a fresh deck.
pub const DECK_SIZE: u32 = RANK_COUNT as u32 * COPIES_PER_RANK as u32;

/// Remaining copies per rank, indexed by [`Rank::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RankCounts([u8; RANK_COUNT]);

impl RankCounts {
    pub const fn full() -> Self {
        Self([COPIES_PER_RANK; RANK_COUNT])
    }

    pub const fn empty() -> Self {
        Self([0; RANK_COUNT])
    }

    /// Wraps raw counts, rejecting any entry above [`COPIES_PER_RANK`].
    pub fn from_array(counts: [u8; RANK_COUNT]) -> Option<Self> {
        if counts.iter().all(|&count| count <= COPIES_PER_RANK) {
            Some(Self(counts))
        } else {
            None
        }
    }

    pub const fn as_array(&self) -> [u8; RANK_COUNT] {
        self.0
    }

    pub fn get(&self, rank: Rank) -> u8 {
        self.0[rank.index()]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().map(|&count| count as u32).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&count| count == 0)
    }

    /// Removes one copy of `rank`. Returns `false` (and changes nothing) when none remain.
    pub fn remove(&mut self, rank: Rank) -> bool {
        let slot = &mut self.0[rank.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Copy of these counts with one `rank` removed, if one is available.
    pub fn without(&self, rank: Rank) -> Option<Self> {
        let mut next = *self;
        next.remove(rank).then_some(next)
    }

    pub fn partition_relative_to(&self, reference: Rank) -> Partition {
        let mut lower = 0u32;
        let mut higher = 0u32;
        let mut equal = 0u32;
        for rank in Rank::ORDERED {
            let count = self.get(rank) as u32;
            if rank < reference {
                lower += count;
            } else if rank > reference {
                higher += count;
            } else {
                equal += count;
            }
        }
        Partition::new(lower, higher, equal)
    }

    /// Ranks with at least one copy left, paired with their counts.
    pub fn iter_present(&self) -> impl Iterator<Item = (Rank, u8)> + '_ {
        Rank::ORDERED
            .iter()
            .copied()
            .map(|rank| (rank, self.get(rank)))
            .filter(|(_, count)| *count > 0)
    }

    /// Draws a rank with probability proportional to its remaining count, without removing it.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Rank> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let mut roll = rng.gen_range(0..total);
        for (rank, count) in self.iter_present() {
            let count = count as u32;
            if roll < count {
                return Some(rank);
            }
            roll -= count;
        }
        None
    }

    /// Samples a rank and removes it from the counts.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Rank> {
        let rank = self.sample(rng)?;
        self.remove(rank);
        Some(rank)
    }
}

impl Default for RankCounts {
    fn default() -> Self {
        Self::full()
    }
}

/// Why the tracker was returned to a full deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetReason {
    Manual,
    Shuffle,
    CardLimit,
    GameStart,
    SnapshotInvalid,
}

impl ResetReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            ResetReason::Manual => "manual",
            ResetReason::Shuffle => "shuffle",
            ResetReason::CardLimit => "card-limit",
            ResetReason::GameStart => "game-start",
            ResetReason::SnapshotInvalid => "snapshot-invalid",
        }
    }
}

impl fmt::Display for ResetReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An observed card whose rank was already exhausted in the tracked deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesyncError {
    pub rank: Rank,
    pub cards_seen: u32,
}

impl fmt::Display for DesyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "observed {} but no copies remain after {} cards",
            self.rank, self.cards_seen
        )
    }
}

impl std::error::Error for DesyncError {}

/// Tracks undrawn ranks since the last shuffle.
///
/// Counts never go negative: consuming an exhausted rank flags the tracker as
/// unknown and leaves the counts untouched until the next [`DeckTracker::reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckTracker {
    counts: RankCounts,
    cards_seen: u32,
    known: bool,
    last_reset: ResetReason,
}

impl DeckTracker {
    pub fn new() -> Self {
        Self {
            counts: RankCounts::full(),
            cards_seen: 0,
            known: true,
            last_reset: ResetReason::GameStart,
        }
    }

    /// Rebuilds a tracker from previously captured state.
    pub fn restore(counts: RankCounts, cards_seen: u32, known: bool) -> Self {
        Self {
            counts,
            cards_seen,
            known,
            last_reset: ResetReason::Manual,
        }
    }

    pub fn reset(&mut self, reason: ResetReason) {
        self.counts = RankCounts::full();
        self.cards_seen = 0;
        self.known = true;
        self.last_reset = reason;
    }

    /// Marks the counts as untrustworthy until the next reset.
    pub fn invalidate(&mut self) {
        self.known = false;
    }

    pub fn consume(&mut self, rank: Rank) -> Result<(), DesyncError> {
        if !self.counts.remove(rank) {
            self.known = false;
            return Err(DesyncError {
                rank,
                cards_seen: self.cards_seen,
            });
        }
        self.cards_seen += 1;
        Ok(())
    }

    pub fn should_auto_reset(&self, card_limit: u32) -> bool {
        self.cards_seen >= card_limit
    }

    pub fn partition_relative_to(&self, reference: Rank) -> Partition {
        self.counts.partition_relative_to(reference)
    }

    pub fn counts(&self) -> RankCounts {
        self.counts
    }

    pub fn count(&self, rank: Rank) -> u8 {
        self.counts.get(rank)
    }

    pub fn remaining(&self) -> u32 {
        self.counts.total()
    }

    pub fn cards_seen(&self) -> u32 {
        self.cards_seen
    }

    pub fn is_known(&self) -> bool {
        self.known
    }

    pub fn last_reset(&self) -> ResetReason {
        self.last_reset
    }
}

impl Default for DeckTracker {
    fn default() -> Self {
        Self::new()
    }
}
