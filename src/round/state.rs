//! Round snapshot.
//!
//! ## Round
//!
//! One playthrough of the board:
//! - the shuffled deck of `2N` cards
//! - up to two open cards awaiting match evaluation
//! - the cards a mismatch has queued to turn face down
//! - the move counter (one per flip, the submitted score)
//! - completion (every card face up)
//! - the generation, identifying which deal inside a session this is
//!
//! Uses `im` persistent vectors so every operation can hand back a new
//! snapshot in O(1) without touching the previous one.

use im::{OrdSet, Vector};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::info;

use crate::cards::{Card, SymbolSet};
use crate::core::{CardId, GameRng};

/// Where a round stands between flips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No card open; at least one card still face down.
    InProgress,
    /// Exactly one card open, waiting for its partner flip.
    AwaitingMatch,
    /// Every card face up. Only a reset leaves this state.
    Complete,
}

/// An entry in the open-card list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub(crate) struct OpenCard {
    pub(crate) card: Card,
    /// The flip that opened this card turned it face up.
    pub(crate) revealed: bool,
}

/// Immutable snapshot of one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub(crate) deck: Vector<Card>,
    pub(crate) open: SmallVec<[OpenCard; 2]>,
    /// Mismatched cards not yet hidden. A later match takes its cards out.
    pub(crate) hiding: OrdSet<CardId>,
    pub(crate) move_count: u32,
    pub(crate) is_complete: bool,
    pub(crate) generation: u64,
}

impl Round {
    /// Deal a new round with generation 0.
    #[must_use]
    pub fn deal(symbols: &SymbolSet, rng: &mut GameRng) -> Self {
        Self::deal_generation(symbols, rng, 0)
    }

    /// Deal a fresh round that supersedes this one.
    ///
    /// The generation advances so un-flips scheduled against this round
    /// no longer apply.
    #[must_use]
    pub fn reset(&self, symbols: &SymbolSet, rng: &mut GameRng) -> Self {
        Self::deal_generation(symbols, rng, self.generation.wrapping_add(1))
    }

    fn deal_generation(symbols: &SymbolSet, rng: &mut GameRng, generation: u64) -> Self {
        let pairs = symbols.len();

        // Card i and card i + N show the same symbol.
        let mut cards: Vec<Card> = (0..2 * pairs as u32)
            .map(|id| {
                let id = CardId::new(id);
                Card::new(id, id.symbol(pairs))
            })
            .collect();
        rng.shuffle(&mut cards);

        info!(pairs, generation, "dealt round");

        Self {
            deck: Vector::from(cards),
            open: SmallVec::new(),
            hiding: OrdSet::new(),
            move_count: 0,
            is_complete: false,
            generation,
        }
    }

    // === Accessors ===

    /// Cards in board order.
    pub fn deck(&self) -> impl ExactSizeIterator<Item = &Card> + '_ {
        self.deck.iter()
    }

    /// Number of cards on the board (`2N`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.deck.len()
    }

    /// Never true for a dealt round.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    /// Number of symbol pairs (`N`).
    #[must_use]
    pub fn pairs(&self) -> usize {
        self.deck.len() / 2
    }

    /// Look up a card by id.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.deck.iter().find(|card| card.id == id)
    }

    pub(crate) fn position_of(&self, id: CardId) -> Option<usize> {
        self.deck.iter().position(|card| card.id == id)
    }

    /// Cards revealed and pending match evaluation (0 or 1 between flips).
    pub fn open_cards(&self) -> impl ExactSizeIterator<Item = &Card> + '_ {
        self.open.iter().map(|open| &open.card)
    }

    /// Whether a pending un-flip will still turn `id` face down.
    #[must_use]
    pub fn is_hiding(&self, id: CardId) -> bool {
        self.hiding.contains(&id)
    }

    /// Flips made this round.
    #[must_use]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// True iff every card is face up.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// Deal counter within the owning session.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current state-machine phase.
    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        if self.is_complete {
            RoundPhase::Complete
        } else if self.open.len() == 1 {
            RoundPhase::AwaitingMatch
        } else {
            RoundPhase::InProgress
        }
    }

    /// Number of cards currently face up.
    #[must_use]
    pub fn flipped_count(&self) -> usize {
        self.deck.iter().filter(|card| card.is_flipped).count()
    }

    /// Occurrences of each symbol in the deck, indexed by `SymbolId`.
    #[must_use]
    pub fn symbol_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.pairs()];
        for card in &self.deck {
            if let Some(count) = counts.get_mut(card.symbol_id.index()) {
                *count += 1;
            }
        }
        counts
    }

    pub(crate) fn recompute_complete(&mut self) {
        self.is_complete = self.deck.iter().all(|card| card.is_flipped);
    }
}
