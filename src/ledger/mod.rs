//! Score ledger boundary.
//!
//! The ledger durably records games and scores. The engine talks to it only
//! through `ScoreLedger`, and learns whether a submission landed from the
//! returned future:
//! - `Ok(Receipt)`: the score is recorded
//! - `Err(LedgerRejection)`: declined, see `LedgerRejection::is_retriable`
//!
//! `InMemoryLedger` is an in-process implementation for tests and the
//! terminal binary.

mod memory;
mod rejection;
mod types;

pub use memory::{GameParams, InMemoryLedger};
pub use rejection::LedgerRejection;
pub use types::{
    find_participant, leaderboard, winners, GameInfo, Receipt, ScoreRecord, ScoreSubmission,
};

use std::future::Future;

use crate::core::GameId;

/// External collaborator that records scores.
///
/// Implementations own retries, transaction signing and confirmation.
pub trait ScoreLedger {
    /// Record a score and wait for confirmation.
    fn save_score(
        &self,
        submission: ScoreSubmission,
    ) -> impl Future<Output = Result<Receipt, LedgerRejection>> + Send;

    /// All score slots of a game, best first.
    fn scores(
        &self,
        game_id: GameId,
    ) -> impl Future<Output = Result<Vec<ScoreRecord>, LedgerRejection>> + Send;

    /// Look up a game. `None` if it does not exist.
    fn game(
        &self,
        game_id: GameId,
    ) -> impl Future<Output = Result<Option<GameInfo>, LedgerRejection>> + Send;
}
