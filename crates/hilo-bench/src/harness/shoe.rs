use hilo_core::model::deck::COPIES_PER_RANK;
use hilo_core::model::rank::Rank;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Shuffled 52-card shoe that is reshuffled once `reshuffle_after` cards are out.
pub(super) struct Shoe {
    cards: Vec<Rank>,
    dealt: usize,
    reshuffle_after: usize,
    rng: StdRng,
}

impl Shoe {
    pub(super) fn new(seed: u64, reshuffle_after: usize) -> Self {
        let mut shoe = Self {
            cards: Vec::with_capacity(Rank::ORDERED.len() * COPIES_PER_RANK as usize),
            dealt: 0,
            reshuffle_after,
            rng: StdRng::seed_from_u64(seed),
        };
        shoe.refill();
        shoe
    }

    /// Reshuffles before a round when the cut card is reached or two cards are not left.
    /// Returns whether the table would show a shuffle.
    pub(super) fn prepare_round(&mut self) -> bool {
        if self.dealt >= self.reshuffle_after || self.cards.len() < 2 {
            self.refill();
            return true;
        }
        false
    }

    pub(super) fn deal(&mut self) -> Option<Rank> {
        let card = self.cards.pop()?;
        self.dealt += 1;
        Some(card)
    }

    fn refill(&mut self) {
        self.cards.clear();
        for rank in Rank::ORDERED {
            for _ in 0..COPIES_PER_RANK {
                self.cards.push(rank);
            }
        }
        self.cards.shuffle(&mut self.rng);
        self.dealt = 0;
    }
}
