//! Flip transitions.
//!
//! A flip runs these steps in order:
//! 1. turn the target face up (already face-up cards stay as they are)
//! 2. recompute completion
//! 3. count the move
//! 4. append the target to the open cards
//! 5. with two open cards, either keep a matched pair revealed or report
//!    a `PendingUnflip` for the caller to apply after its delay
//!
//! The un-flip is never applied here. Scheduling it is the session's job.
//! `apply_unflip` refuses pending work from an older generation or against
//! a complete round, and skips cards that were matched in the meantime.

use im::OrdSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use super::state::{OpenCard, Round};
use crate::core::CardId;
use crate::error::{MatchError, Result};

/// Cards to turn face down once the mismatch delay elapses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingUnflip {
    /// Generation of the round the mismatch happened in.
    pub generation: u64,
    /// Cards revealed by the mismatched turn.
    pub cards: SmallVec<[CardId; 2]>,
}

impl PendingUnflip {
    /// Nothing to hide (both cards were already face up).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// What a flip did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipOutcome {
    /// First card of a turn is now open.
    Opened(CardId),
    /// The two open cards are a pair and stay revealed.
    Matched(CardId, CardId),
    /// The two open cards differ; hide them after the delay.
    Mismatch(PendingUnflip),
}

impl Round {
    /// Flip the card with `card_id`, returning the next snapshot.
    ///
    /// Fails with `InvalidCardId` if no such card exists; `self` is never
    /// modified.
    pub fn flip(&self, card_id: CardId) -> Result<(Round, FlipOutcome)> {
        let position = self.position_of(card_id).ok_or(MatchError::InvalidCardId {
            card_id,
            deck_size: self.deck.len(),
        })?;

        let mut next = self.clone();

        let card = &mut next.deck[position];
        let revealed = !card.is_flipped;
        card.is_flipped = true;
        let card = card.clone();

        next.recompute_complete();
        next.move_count += 1;
        next.open.push(OpenCard { card, revealed });

        let outcome = match next.open.as_slice() {
            [first, second] if first.card.pairs_with(&second.card) => {
                debug!(first = %first.card.id, second = %second.card.id, "pair matched");
                FlipOutcome::Matched(first.card.id, second.card.id)
            }
            [first, second] => {
                debug!(first = %first.card.id, second = %second.card.id, "pair mismatched");
                FlipOutcome::Mismatch(PendingUnflip {
                    generation: next.generation,
                    cards: next
                        .open
                        .iter()
                        .filter(|open| open.revealed)
                        .map(|open| open.card.id)
                        .collect(),
                })
            }
            _ => {
                debug!(card = %card_id, moves = next.move_count, "card opened");
                FlipOutcome::Opened(card_id)
            }
        };

        match &outcome {
            FlipOutcome::Matched(first, second) => {
                next.hiding.remove(first);
                next.hiding.remove(second);
            }
            FlipOutcome::Mismatch(pending) => {
                for &id in &pending.cards {
                    next.hiding.insert(id);
                }
            }
            FlipOutcome::Opened(_) => {}
        }
        if next.is_complete {
            next.hiding = OrdSet::new();
        }
        if next.open.len() == 2 {
            next.open.clear();
        }

        Ok((next, outcome))
    }

    /// Whether `pending` was scheduled against this round's generation.
    #[must_use]
    pub fn accepts(&self, pending: &PendingUnflip) -> bool {
        pending.generation == self.generation
    }

    /// Turn the pending cards face down.
    ///
    /// Cards matched since the mismatch stay revealed. A no-op returning an
    /// identical snapshot when `pending` belongs to a superseded round or
    /// the round is already complete.
    #[must_use]
    pub fn apply_unflip(&self, pending: &PendingUnflip) -> Round {
        if !self.accepts(pending) {
            debug!(
                pending = pending.generation,
                current = self.generation,
                "dropping stale un-flip"
            );
            return self.clone();
        }
        if self.is_complete {
            debug!(generation = self.generation, "round complete, un-flip dropped");
            return self.clone();
        }

        let hide: SmallVec<[CardId; 2]> = pending
            .cards
            .iter()
            .copied()
            .filter(|id| self.hiding.contains(id))
            .collect();

        let mut next = self.clone();
        for card in next.deck.iter_mut() {
            if hide.contains(&card.id) {
                card.is_flipped = false;
            }
        }
        for id in &hide {
            next.hiding.remove(id);
        }
        next.open.retain(|open| !hide.contains(&open.card.id));
        next.recompute_complete();
        next
    }
}
