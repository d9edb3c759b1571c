//! Card match engine.
//!
//! A `Round` is an immutable snapshot; every operation returns the next
//! one and leaves its input untouched:
//! - `new_round` / `Round::deal`: build and shuffle `2N` cards
//! - `Round::flip`: apply one flip, possibly reporting a `PendingUnflip`
//! - `Round::apply_unflip`: hide a mismatched pair (generation-checked)
//! - `Round::reset`: deal a superseding round
//! - `is_submittable`: gate for score submission
//!
//! ## State machine
//!
//! `InProgress -> AwaitingMatch -> InProgress | Complete`. `Complete` is
//! terminal until a reset.

mod flip;
mod state;

pub use flip::{FlipOutcome, PendingUnflip};
pub use state::{Round, RoundPhase};

use crate::cards::{Symbol, SymbolSet};
use crate::core::{Address, GameRng};
use crate::error::Result;

/// Validate `symbols` and deal a round from them.
///
/// Fails with `InvalidSymbolSet` for an empty or duplicate list.
pub fn new_round(symbols: &[Symbol], rng: &mut GameRng) -> Result<Round> {
    let set = SymbolSet::new(symbols.to_vec())?;
    Ok(Round::deal(&set, rng))
}

/// True iff `current_account` is one of `participants` and the round is
/// complete.
///
/// ```
/// use card_match::core::{Address, GameRng};
/// use card_match::cards::SymbolSet;
/// use card_match::round::{is_submittable, Round};
///
/// let round = Round::deal(&SymbolSet::classic(), &mut GameRng::new(1));
/// let players = [Address::new("0xaa")];
///
/// // Incomplete round
/// assert!(!is_submittable(&round, &players, Some(&Address::new("0xAA"))));
/// // No wallet
/// assert!(!is_submittable(&round, &players, None));
/// ```
#[must_use]
pub fn is_submittable(
    round: &Round,
    participants: &[Address],
    current_account: Option<&Address>,
) -> bool {
    let Some(account) = current_account else {
        return false;
    };
    round.is_complete() && participants.contains(account)
}
