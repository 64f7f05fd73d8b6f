use hilo_core::game::serialization::DeckSnapshot;
use hilo_core::model::deck::{DECK_SIZE, DeckTracker, RankCounts, ResetReason};
use hilo_core::model::odds::Odds;
use hilo_core::model::rank::Rank;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn random_rank(rng: &mut SmallRng) -> Rank {
    Rank::ORDERED[rng.gen_range(0..Rank::ORDERED.len())]
}

#[test]
fn random_observation_streams_conserve_the_deck() {
    let mut rng = SmallRng::seed_from_u64(20251017);
    let mut tracker = DeckTracker::new();
    let mut desyncs = 0;

    for step in 0..2_000 {
        if step % 97 == 0 {
            tracker.reset(ResetReason::Shuffle);
        }
        let rank = random_rank(&mut rng);
        let before = tracker.counts();
        match tracker.consume(rank) {
            Ok(()) => assert_eq!(tracker.count(rank) + 1, before.get(rank)),
            Err(err) => {
                desyncs += 1;
                assert_eq!(err.rank, rank);
                assert_eq!(tracker.counts(), before);
                assert!(!tracker.is_known());
            }
        }
        assert_eq!(tracker.remaining() + tracker.cards_seen(), DECK_SIZE);
        assert!(Rank::ORDERED.iter().all(|r| tracker.count(*r) <= 4));
    }
    assert!(desyncs > 0, "stream long enough to exhaust some rank");
}

#[test]
fn partitions_cover_every_remaining_card() {
    let mut rng = SmallRng::seed_from_u64(9);
    for _ in 0..200 {
        let mut counts = RankCounts::full();
        let removals = rng.gen_range(0..52);
        for _ in 0..removals {
            counts.remove(random_rank(&mut rng));
        }
        for dealer in Rank::ORDERED {
            let partition = counts.partition_relative_to(dealer);
            assert_eq!(partition.lower + partition.higher + partition.equal, counts.total());
            assert_eq!(partition.total, counts.total());
            let odds = Odds::evaluate(partition);
            if partition.total > 0 {
                assert!((odds.p_high + odds.p_low + odds.p_tie - 1.0).abs() < 1e-9);
            } else {
                assert_eq!(odds, Odds::ZERO);
            }
        }
    }
}

#[test]
fn snapshots_of_live_trackers_restore_exactly() {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut tracker = DeckTracker::new();
    for _ in 0..30 {
        let _ = tracker.consume(random_rank(&mut rng));
    }
    let snapshot = DeckSnapshot::capture(&tracker, false, Some(Rank::Jack), Some(Rank::Four));
    let json = snapshot.to_json().expect("snapshot encodes");
    let restored = DeckSnapshot::restore_from_json(&json, true);

    assert!(restored.fell_back.is_none());
    assert_eq!(restored.tracker.counts(), tracker.counts());
    assert_eq!(restored.tracker.cards_seen(), tracker.cards_seen());
    assert_eq!(restored.tracker.is_known(), tracker.is_known());
    assert!(!restored.tie_is_push);
    assert_eq!(restored.last_dealer, Some(Rank::Jack));
    assert_eq!(restored.last_player, Some(Rank::Four));
}
