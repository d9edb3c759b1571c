//! Live round ownership.
//!
//! A `Session` is the single writer of one player's round. It:
//! - publishes each new snapshot on a `watch` channel for rendering
//! - schedules the delayed un-flip of mismatched pairs as a tokio task
//! - invalidates those tasks on reset, both by aborting them and through
//!   the round generation, so a late timer never touches a newer deal
//! - cancels them once the round is complete
//! - drives score submission to a `ScoreLedger`
//!
//! Sessions must be created inside a tokio runtime.

mod submit;

pub use submit::{SubmitRequest, SubmissionStatus};

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cards::SymbolSet;
use crate::core::{Address, CardId, GameRng, GameRngState, MatchConfig};
use crate::error::{MatchError, Result};
use crate::round::{is_submittable, FlipOutcome, PendingUnflip, Round};

/// Owner of one live round.
pub struct Session {
    config: MatchConfig,
    rng: GameRng,
    snapshot: Arc<watch::Sender<Round>>,
    runtime: Handle,
    unflips: Vec<JoinHandle<()>>,
    status: SubmissionStatus,
}

impl Session {
    /// Start a session and deal its first round.
    ///
    /// Fails with `NoRuntime` outside a tokio runtime.
    pub fn new(config: MatchConfig) -> Result<Self> {
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        Self::start(config, rng)
    }

    /// Start a session whose shuffles continue from a captured RNG state.
    ///
    /// The first deal matches the one the capturing session would have
    /// made next. `config.seed` is ignored.
    pub fn with_rng_state(config: MatchConfig, state: &GameRngState) -> Result<Self> {
        Self::start(config, GameRng::from_state(state))
    }

    fn start(config: MatchConfig, mut rng: GameRng) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| MatchError::NoRuntime)?;
        let round = Round::deal(&config.symbols, &mut rng);
        let (sender, _) = watch::channel(round);

        info!(seed = rng.seed(), pairs = config.symbols.len(), "session started");

        Ok(Self {
            config,
            rng,
            snapshot: Arc::new(sender),
            runtime,
            unflips: Vec::new(),
            status: SubmissionStatus::NotSubmitted,
        })
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn symbols(&self) -> &SymbolSet {
        &self.config.symbols
    }

    /// Latest snapshot.
    #[must_use]
    pub fn round(&self) -> Round {
        self.snapshot.borrow().clone()
    }

    /// Receive every future snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Round> {
        self.snapshot.subscribe()
    }

    #[must_use]
    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    /// Shuffle state for the next deal.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// Flip a card on the live round.
    ///
    /// A mismatch schedules its un-flip after `config.unflip_delay()`.
    pub fn flip(&mut self, card_id: CardId) -> Result<FlipOutcome> {
        // Flip under the channel lock so a concurrent un-flip is never lost.
        // The closure always runs, so the placeholder is always replaced.
        let mut result = Err(MatchError::InvalidCardId { card_id, deck_size: 0 });
        let mut completed = None;
        self.snapshot.send_if_modified(|round| match round.flip(card_id) {
            Ok((next, outcome)) => {
                if !round.is_complete() && next.is_complete() {
                    completed = Some(next.move_count());
                }
                *round = next;
                result = Ok(outcome);
                true
            }
            Err(err) => {
                result = Err(err);
                false
            }
        });

        let outcome = result?;
        if let Some(moves) = completed {
            info!(moves, "round complete");
            self.cancel_unflips();
            return Ok(outcome);
        }
        if let FlipOutcome::Mismatch(pending) = &outcome {
            if !pending.is_empty() {
                self.schedule_unflip(pending.clone());
            }
        }
        Ok(outcome)
    }

    fn cancel_unflips(&mut self) {
        for task in self.unflips.drain(..) {
            task.abort();
        }
    }

    fn schedule_unflip(&mut self, pending: PendingUnflip) {
        let snapshot = Arc::clone(&self.snapshot);
        let delay = self.config.unflip_delay();

        debug!(cards = ?pending.cards, ?delay, "scheduling un-flip");
        self.unflips.retain(|task| !task.is_finished());
        self.unflips.push(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            snapshot.send_if_modified(|round| {
                if !round.accepts(&pending) {
                    debug!(generation = pending.generation, "un-flip superseded");
                    return false;
                }
                *round = round.apply_unflip(&pending);
                true
            });
        }));
    }

    /// Number of un-flip tasks that have not run yet.
    #[must_use]
    pub fn pending_unflips(&self) -> usize {
        self.unflips.iter().filter(|task| !task.is_finished()).count()
    }

    /// Deal a new round, discarding the current one.
    ///
    /// Outstanding un-flips are cancelled and the submission status is
    /// cleared.
    pub fn reset(&mut self) -> Round {
        self.cancel_unflips();

        let symbols = &self.config.symbols;
        let rng = &mut self.rng;
        self.snapshot.send_modify(|round| *round = round.reset(symbols, rng));
        self.status = SubmissionStatus::NotSubmitted;
        self.round()
    }

    /// Whether `current_account` may submit the live round.
    #[must_use]
    pub fn is_submittable(&self, participants: &[Address], current_account: Option<&Address>) -> bool {
        is_submittable(&self.snapshot.borrow(), participants, current_account)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel_unflips();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn session() -> Session {
        Session::new(MatchConfig::default().with_seed(42)).unwrap()
    }

    #[test]
    fn test_requires_runtime() {
        assert!(matches!(
            Session::new(MatchConfig::default()),
            Err(MatchError::NoRuntime)
        ));
    }

    #[tokio::test]
    async fn test_flip_publishes_snapshot() {
        let mut session = session();
        let mut rx = session.subscribe();

        session.flip(CardId::new(0)).unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().move_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_flip_leaves_state() {
        let mut session = session();
        let rx = session.subscribe();
        let before = session.round();

        let err = session.flip(CardId::new(99)).unwrap_err();
        assert_eq!(
            err,
            MatchError::InvalidCardId {
                card_id: CardId::new(99),
                deck_size: 12
            }
        );
        assert_eq!(session.round(), before);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_match_schedules_nothing() {
        let mut session = session();

        session.flip(CardId::new(0)).unwrap();
        session.flip(CardId::new(6)).unwrap();

        assert_eq!(session.pending_unflips(), 0);
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert!(session.round().card(CardId::new(0)).unwrap().is_flipped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_unflip() {
        let mut session = session();

        session.flip(CardId::new(0)).unwrap();
        session.flip(CardId::new(1)).unwrap();
        assert_eq!(session.pending_unflips(), 1);

        let fresh = session.reset();
        assert_eq!(fresh.generation(), 1);
        assert_eq!(session.pending_unflips(), 0);

        session.flip(CardId::new(0)).unwrap();
        tokio::time::sleep(Duration::from_millis(1_500)).await;

        // The cancelled un-flip never hid the new round's card
        assert!(session.round().card(CardId::new(0)).unwrap().is_flipped);
    }

    #[tokio::test]
    async fn test_rng_state_replays_next_deal() {
        let mut original = session();
        original.flip(CardId::new(3)).unwrap();
        let state = original.rng_state();

        let next = original.reset();
        let replay = Session::with_rng_state(MatchConfig::default(), &state).unwrap();

        let ids = |round: &Round| round.deck().map(|card| card.id).collect::<Vec<_>>();
        assert_eq!(ids(&replay.round()), ids(&next));
        assert_eq!(replay.round().move_count(), 0);
        assert_eq!(replay.rng_state(), original.rng_state());
    }
}
