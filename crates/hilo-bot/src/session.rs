//! Per-round state machine driven by table observations.
//!
//! `WaitingDealer -> DealerShown -> Resolved -> WaitingDealer`. The session owns
//! the deck tracker (single writer) and applies events strictly in arrival order.

use crate::bot::{Advisory, Recommendation};
use crate::policy::{EnginePolicy, Policy, PolicyContext};
use hilo_core::game::events::GameEvent;
use hilo_core::game::round::{Outcome, Round, RoundPhase};
use hilo_core::game::serialization::{DeckSnapshot, RestoredDeck};
use hilo_core::game::settings::Settings;
use hilo_core::game::store::{SnapshotStore, StoreError};
use hilo_core::model::deck::{DeckTracker, DesyncError, ResetReason};
use hilo_core::model::rank::Rank;
use tracing::{Level, event};

/// Pot and modifier read off the table for the current round.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TableReadout {
    pub modifier: Option<f64>,
    pub pot: Option<f64>,
}

/// Grading of a resolved round against the guess that was recommended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundOutcome {
    pub dealer: Rank,
    pub player: Rank,
    pub recommended: Option<Recommendation>,
    pub outcome: Option<Outcome>,
    pub streak: u32,
}

/// What happened while applying one event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub recommendation: Option<Recommendation>,
    pub advisory: Option<Advisory>,
    pub outcome: Option<RoundOutcome>,
    pub desync: Option<DesyncError>,
    pub reset: Option<ResetReason>,
}

pub struct Session {
    tracker: DeckTracker,
    policy: Box<dyn Policy>,
    round: Option<Round>,
    recommendation: Option<Recommendation>,
    table: TableReadout,
    tie_is_push: bool,
    loss_signalled: bool,
    last_dealer: Option<Rank>,
    last_player: Option<Rank>,
    streak: u32,
}

impl Session {
    /// Fresh deck, deciding with the full engine seeded by `seed`.
    pub fn new(settings: &Settings, seed: u64) -> Self {
        Self::with_policy(settings, engine_policy(seed))
    }

    pub fn with_policy(settings: &Settings, policy: Box<dyn Policy>) -> Self {
        Self {
            tracker: DeckTracker::new(),
            policy,
            round: None,
            recommendation: None,
            table: TableReadout::default(),
            tie_is_push: settings.tie_is_push,
            loss_signalled: false,
            last_dealer: None,
            last_player: None,
            streak: 0,
        }
    }

    /// Resumes from a snapshot. Inconsistent snapshots yield a fresh, unknown deck.
    pub fn restore(snapshot: &DeckSnapshot, seed: u64) -> Self {
        Self::from_restored(snapshot.restore(), engine_policy(seed))
    }

    /// Resumes from whatever the store holds. Only an empty store starts a known fresh deck;
    /// a stored document that cannot be decoded restores as an unknown deck.
    pub fn load_from<S: SnapshotStore + ?Sized>(store: &S, settings: &Settings, seed: u64) -> Self {
        match store.load() {
            Some(Ok(snapshot)) => Self::restore(&snapshot, seed),
            Some(Err(err)) => Self::from_restored(
                RestoredDeck::rejected(settings.tie_is_push, err),
                engine_policy(seed),
            ),
            None => Self::new(settings, seed),
        }
    }

    fn from_restored(restored: RestoredDeck, policy: Box<dyn Policy>) -> Self {
        if let Some(err) = restored.fell_back.as_ref() {
            event!(
                target: "hilo_bot::session",
                Level::WARN,
                error = %err,
                "snapshot rejected; starting from an unknown full deck"
            );
        }
        let round = restored.last_dealer.map(|dealer| {
            let mut round = Round::new(dealer);
            if let Some(player) = restored.last_player {
                round.resolve(player);
            }
            round
        });
        Self {
            tracker: restored.tracker,
            policy,
            round,
            recommendation: None,
            table: TableReadout::default(),
            tie_is_push: restored.tie_is_push,
            loss_signalled: false,
            last_dealer: restored.last_dealer,
            last_player: restored.last_player,
            streak: 0,
        }
    }

    pub fn snapshot(&self) -> DeckSnapshot {
        DeckSnapshot::capture(
            &self.tracker,
            self.tie_is_push,
            self.last_dealer,
            self.last_player,
        )
    }

    pub fn save_to<S: SnapshotStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        store.save(&self.snapshot())
    }

    pub fn phase(&self) -> RoundPhase {
        match self.round {
            Some(round) if !round.is_resolved() => RoundPhase::DealerShown,
            _ => RoundPhase::WaitingDealer,
        }
    }

    pub fn tracker(&self) -> &DeckTracker {
        &self.tracker
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        self.recommendation.as_ref()
    }

    pub fn tie_is_push(&self) -> bool {
        self.tie_is_push
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Records pot and modifier values observed for the current round.
    pub fn observe_table(&mut self, table: TableReadout) {
        self.table = table;
    }

    pub fn handle(&mut self, event: GameEvent, settings: &Settings) -> StepReport {
        match event {
            GameEvent::DealerCardObserved(rank) => self.on_dealer(rank, settings),
            GameEvent::PlayerCardObserved(rank) => self.on_player(rank, settings),
            GameEvent::RoundEndedAsLoss => {
                self.on_loss_signal();
                StepReport::default()
            }
            GameEvent::ShuffleDetected => self.reset(ResetReason::Shuffle),
            GameEvent::ManualReset => self.reset(ResetReason::Manual),
            GameEvent::GameEnded => {
                self.clear_round();
                self.streak = 0;
                StepReport::default()
            }
        }
    }

    /// Recomputes the guess for the shown dealer card, e.g. after settings or table values change.
    pub fn refresh(&mut self, settings: &Settings) -> StepReport {
        if self.phase() != RoundPhase::DealerShown {
            return StepReport::default();
        }
        let mut report = StepReport::default();
        self.decide_into(&mut report, settings);
        report
    }

    fn on_dealer(&mut self, rank: Rank, settings: &Settings) -> StepReport {
        let mut report = StepReport {
            desync: self.consume(rank),
            ..StepReport::default()
        };
        self.round = Some(Round::new(rank));
        self.last_dealer = Some(rank);
        self.last_player = None;
        self.loss_signalled = false;
        self.decide_into(&mut report, settings);
        report
    }

    fn decide_into(&mut self, report: &mut StepReport, settings: &Settings) {
        let Some(round) = self.round else {
            return;
        };
        let ctx = PolicyContext {
            tracker: &self.tracker,
            round: &round,
            settings,
            tie_is_push: self.tie_is_push,
            modifier: self.table.modifier,
            pot: self.table.pot,
        };
        let recommendation = self.policy.recommend(&ctx);
        let advisory = self.policy.advise(&ctx, &recommendation);

        if tracing::enabled!(Level::INFO) {
            event!(
                target: "hilo_bot::decision",
                Level::INFO,
                policy = self.policy.name(),
                dealer = %round.dealer(),
                action = %recommendation.action,
                method = %recommendation.method,
                p_high = recommendation.p_high,
                p_low = recommendation.p_low,
                p_tie = recommendation.p_tie,
                remaining = self.tracker.remaining(),
                deck_known = self.tracker.is_known(),
                cash_out = advisory.as_ref().map(|a| a.cash_out),
                "recommendation"
            );
        }

        self.recommendation = Some(recommendation);
        report.recommendation = Some(recommendation);
        report.advisory = advisory;
    }

    fn on_player(&mut self, rank: Rank, settings: &Settings) -> StepReport {
        let mut report = StepReport {
            desync: self.consume(rank),
            ..StepReport::default()
        };
        self.last_player = Some(rank);

        let Some(round) = self.round.as_mut().filter(|round| !round.is_resolved()) else {
            event!(
                target: "hilo_bot::session",
                Level::WARN,
                rank = %rank,
                "player card observed without a dealer card"
            );
            return report;
        };
        round.resolve(rank);
        let round = *round;

        if round.is_tie() {
            // Best effort: only an explicit loss signal marks ties as losses.
            self.tie_is_push = !self.loss_signalled;
            event!(
                target: "hilo_bot::session",
                Level::DEBUG,
                rank = %rank,
                tie_is_push = self.tie_is_push,
                "tie observed"
            );
        }

        let outcome = self
            .recommendation
            .and_then(|rec| round.outcome_for(rec.action));
        self.streak = match outcome {
            Some(Outcome::Win) => self.streak + 1,
            Some(Outcome::Tie) if self.tie_is_push => self.streak,
            _ => 0,
        };
        report.outcome = Some(RoundOutcome {
            dealer: round.dealer(),
            player: rank,
            recommended: self.recommendation,
            outcome,
            streak: self.streak,
        });

        if settings.auto_reset_on_card_limit && self.tracker.should_auto_reset(settings.card_limit) {
            self.tracker.reset(ResetReason::CardLimit);
            report.reset = Some(ResetReason::CardLimit);
            event!(
                target: "hilo_bot::session",
                Level::INFO,
                card_limit = settings.card_limit,
                "card limit reached; deck reset"
            );
        }
        report
    }

    fn on_loss_signal(&mut self) {
        self.loss_signalled = true;
        let resolved_tie = self
            .round
            .filter(|round| round.is_resolved() && round.is_tie());
        if resolved_tie.is_some() && self.tie_is_push {
            self.tie_is_push = false;
            self.streak = 0;
            event!(
                target: "hilo_bot::session",
                Level::DEBUG,
                "tie followed by loss signal; ties now treated as losses"
            );
        }
    }

    fn consume(&mut self, rank: Rank) -> Option<DesyncError> {
        let err = self.tracker.consume(rank).err()?;
        event!(
            target: "hilo_bot::session",
            Level::WARN,
            rank = %err.rank,
            cards_seen = err.cards_seen,
            "deck desync: rank already exhausted"
        );
        Some(err)
    }

    fn reset(&mut self, reason: ResetReason) -> StepReport {
        self.tracker.reset(reason);
        self.clear_round();
        event!(
            target: "hilo_bot::session",
            Level::INFO,
            reason = %reason,
            "deck reset"
        );
        StepReport {
            reset: Some(reason),
            ..StepReport::default()
        }
    }

    fn clear_round(&mut self) {
        self.round = None;
        self.recommendation = None;
        self.last_dealer = None;
        self.last_player = None;
        self.loss_signalled = false;
    }
}

fn engine_policy(seed: u64) -> Box<dyn Policy> {
    Box::new(EnginePolicy::new("engine", seed))
}
