//! Ledger-side records.
//!
//! These mirror what the external ledger stores. The engine reads them to
//! decide whether a score may be submitted and to rank results; it never
//! writes them except through `ScoreLedger::save_score`.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::{Address, GameId, TxId};

/// A score to record for one participant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub game_id: GameId,
    /// Participant slot in the game's score list.
    pub participant_index: u32,
    /// Flips used to clear the board.
    pub move_count: u32,
}

/// Confirmation of an accepted score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub tx: TxId,
    pub submission: ScoreSubmission,
}

/// A game as listed on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    pub id: GameId,
    pub title: String,
    pub description: String,
    pub owner: Address,
    /// Participant slots.
    pub participants: u32,
    /// How many top scores share the prize.
    pub number_of_winners: u32,
    /// Unix millis.
    pub start_date: u64,
    /// Unix millis.
    pub end_date: u64,
    pub deleted: bool,
    pub paid_out: bool,
}

impl GameInfo {
    /// Check whether `now` (unix millis) is before the start.
    #[must_use]
    pub fn not_started(&self, now: u64) -> bool {
        now < self.start_date
    }

    /// Check whether `now` (unix millis) is past the end.
    #[must_use]
    pub fn has_ended(&self, now: u64) -> bool {
        now > self.end_date
    }
}

/// One participant's score slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Participant index within the game.
    pub id: u32,
    pub game_id: GameId,
    pub player: Address,
    /// Flips used. Meaningful only once `played`.
    pub score: u32,
    pub played: bool,
}

impl ScoreRecord {
    /// Ranking order: played before unplayed, then fewer flips first,
    /// then participant index.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .played
            .cmp(&self.played)
            .then(self.score.cmp(&other.score))
            .then(self.id.cmp(&other.id))
    }
}

/// Sort score records best first.
///
/// ```
/// use card_match::core::{Address, GameId};
/// use card_match::ledger::{leaderboard, ScoreRecord};
///
/// let record = |id, score, played| ScoreRecord {
///     id,
///     game_id: GameId::new(1),
///     player: Address::new(format!("0x{id}")),
///     score,
///     played,
/// };
///
/// let ranked = leaderboard(vec![record(0, 20, true), record(1, 0, false), record(2, 14, true)]);
/// let order: Vec<_> = ranked.iter().map(|r| r.id).collect();
/// assert_eq!(order, vec![2, 0, 1]);
/// ```
#[must_use]
pub fn leaderboard(mut scores: Vec<ScoreRecord>) -> Vec<ScoreRecord> {
    scores.sort_by(ScoreRecord::rank_cmp);
    scores
}

/// The top `game.number_of_winners` played records.
#[must_use]
pub fn winners<'a>(game: &GameInfo, ranked: &'a [ScoreRecord]) -> Vec<&'a ScoreRecord> {
    ranked
        .iter()
        .filter(|record| record.played)
        .take(game.number_of_winners as usize)
        .collect()
}

/// Find the score slot belonging to `account`.
#[must_use]
pub fn find_participant<'a>(scores: &'a [ScoreRecord], account: &Address) -> Option<&'a ScoreRecord> {
    scores.iter().find(|record| &record.player == account)
}
