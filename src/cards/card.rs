//! Card state within a round.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, SymbolId};

/// A single card on the board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Unique within a round, `0..2N`.
    pub id: CardId,

    /// Symbol on the card face. Shared with exactly one other card.
    pub symbol_id: SymbolId,

    /// Face up and not yet hidden again.
    pub is_flipped: bool,
}

impl Card {
    /// Create a face-down card.
    #[must_use]
    pub const fn new(id: CardId, symbol_id: SymbolId) -> Self {
        Self {
            id,
            symbol_id,
            is_flipped: false,
        }
    }

    /// Check whether `other` is this card's pair.
    ///
    /// A card is never its own pair.
    #[must_use]
    pub fn pairs_with(&self, other: &Card) -> bool {
        self.id != other.id && self.symbol_id == other.symbol_id
    }
}
