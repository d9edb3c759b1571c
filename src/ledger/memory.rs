//! In-process ledger.

use std::future::{ready, Future};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    leaderboard, GameInfo, LedgerRejection, Receipt, ScoreLedger, ScoreRecord, ScoreSubmission,
};
use crate::core::{Address, GameId, TxId};

/// Parameters for creating a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameParams {
    pub title: String,
    pub description: String,
    pub owner: Address,
    pub participants: u32,
    pub number_of_winners: u32,
    pub start_date: u64,
    pub end_date: u64,
}

struct GameEntry {
    info: GameInfo,
    scores: Vec<ScoreRecord>,
}

#[derive(Default)]
struct LedgerState {
    games: FxHashMap<GameId, GameEntry>,
    next_game_id: u64,
    next_tx: u64,
    /// Rejection returned by the next `save_score`, if scripted.
    fail_next: Option<LedgerRejection>,
    /// Fixed clock in unix millis. `None` reads the system clock.
    now: Option<u64>,
}

/// A `ScoreLedger` backed by process memory.
///
/// Enforces the same rules a deployed ledger does for scores: one score per
/// participant, only inside the game window, only for known slots.
///
/// ```
/// use card_match::core::Address;
/// use card_match::ledger::{GameParams, InMemoryLedger};
///
/// let ledger = InMemoryLedger::new();
/// ledger.set_now(500);
/// let game = ledger.create_game(GameParams {
///     title: "Memory".into(),
///     description: String::new(),
///     owner: Address::new("0xowner"),
///     participants: 2,
///     number_of_winners: 1,
///     start_date: 0,
///     end_date: 1_000,
/// });
///
/// assert_eq!(ledger.join(game, Address::new("0xA")).unwrap(), 0);
/// assert_eq!(ledger.join(game, Address::new("0xB")).unwrap(), 1);
/// assert!(ledger.join(game, Address::new("0xC")).is_err());
/// ```
#[derive(Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pin the ledger clock (unix millis).
    pub fn set_now(&self, now: u64) {
        self.lock().now = Some(now);
    }

    /// Make the next `save_score` fail with `rejection`.
    pub fn fail_next(&self, rejection: LedgerRejection) {
        self.lock().fail_next = Some(rejection);
    }

    /// Create a game with no participants yet.
    pub fn create_game(&self, params: GameParams) -> GameId {
        let mut state = self.lock();
        state.next_game_id += 1;
        let id = GameId::new(state.next_game_id);

        let info = GameInfo {
            id,
            title: params.title,
            description: params.description,
            owner: params.owner,
            participants: params.participants,
            number_of_winners: params.number_of_winners,
            start_date: params.start_date,
            end_date: params.end_date,
            deleted: false,
            paid_out: false,
        };
        state.games.insert(id, GameEntry { info, scores: Vec::new() });
        id
    }

    /// Mark a game deleted. It stays readable but takes no more joins or
    /// scores.
    pub fn delete_game(&self, game_id: GameId) -> Result<(), LedgerRejection> {
        let mut state = self.lock();
        let entry = state
            .games
            .get_mut(&game_id)
            .filter(|entry| !entry.info.deleted)
            .ok_or(LedgerRejection::GameNotFound)?;
        entry.info.deleted = true;
        debug!(game = %game_id, "game deleted");
        Ok(())
    }

    /// Add `player` to a game, returning its participant index.
    pub fn join(&self, game_id: GameId, player: Address) -> Result<u32, LedgerRejection> {
        let mut state = self.lock();
        let entry = state
            .games
            .get_mut(&game_id)
            .filter(|entry| !entry.info.deleted)
            .ok_or(LedgerRejection::GameNotFound)?;

        if entry.scores.iter().any(|record| record.player == player) {
            return Err(LedgerRejection::Other(format!("{player} already joined")));
        }
        if entry.scores.len() >= entry.info.participants as usize {
            return Err(LedgerRejection::Other("game is full".to_string()));
        }

        let id = entry.scores.len() as u32;
        entry.scores.push(ScoreRecord {
            id,
            game_id,
            player,
            score: 0,
            played: false,
        });
        Ok(id)
    }

    fn record(&self, submission: ScoreSubmission) -> Result<Receipt, LedgerRejection> {
        let mut state = self.lock();
        if let Some(rejection) = state.fail_next.take() {
            return Err(rejection);
        }

        let now = state.now.unwrap_or_else(system_millis);
        let entry = state
            .games
            .get_mut(&submission.game_id)
            .filter(|entry| !entry.info.deleted)
            .ok_or(LedgerRejection::GameNotFound)?;
        let record = entry
            .scores
            .get_mut(submission.participant_index as usize)
            .ok_or(LedgerRejection::NotParticipant)?;

        if record.played {
            return Err(LedgerRejection::AlreadyPlayed);
        }
        if entry.info.has_ended(now) {
            return Err(LedgerRejection::GameEnded);
        }
        if entry.info.not_started(now) {
            return Err(LedgerRejection::GameNotStarted);
        }

        record.score = submission.move_count;
        record.played = true;
        state.next_tx += 1;
        let tx = TxId(state.next_tx);
        debug!(game = %submission.game_id, index = submission.participant_index, %tx, "score recorded");

        Ok(Receipt { tx, submission })
    }
}

fn system_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

impl ScoreLedger for InMemoryLedger {
    fn save_score(
        &self,
        submission: ScoreSubmission,
    ) -> impl Future<Output = Result<Receipt, LedgerRejection>> + Send {
        ready(self.record(submission))
    }

    fn scores(
        &self,
        game_id: GameId,
    ) -> impl Future<Output = Result<Vec<ScoreRecord>, LedgerRejection>> + Send {
        let result = self
            .lock()
            .games
            .get(&game_id)
            .map(|entry| leaderboard(entry.scores.clone()))
            .ok_or(LedgerRejection::GameNotFound);
        ready(result)
    }

    fn game(
        &self,
        game_id: GameId,
    ) -> impl Future<Output = Result<Option<GameInfo>, LedgerRejection>> + Send {
        ready(Ok(self.lock().games.get(&game_id).map(|entry| entry.info.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with_game() -> (InMemoryLedger, GameId) {
        let ledger = InMemoryLedger::new();
        ledger.set_now(1_500);
        let game = ledger.create_game(GameParams {
            title: "Memory".to_string(),
            description: "flip fast".to_string(),
            owner: Address::new("0xowner"),
            participants: 2,
            number_of_winners: 1,
            start_date: 1_000,
            end_date: 2_000,
        });
        ledger.join(game, Address::new("0xA")).unwrap();
        ledger.join(game, Address::new("0xB")).unwrap();
        (ledger, game)
    }

    fn submission(game_id: GameId, participant_index: u32, move_count: u32) -> ScoreSubmission {
        ScoreSubmission {
            game_id,
            participant_index,
            move_count,
        }
    }

    #[tokio::test]
    async fn test_save_and_rank() {
        let (ledger, game) = ledger_with_game();

        ledger.save_score(submission(game, 0, 20)).await.unwrap();
        let receipt = ledger.save_score(submission(game, 1, 14)).await.unwrap();
        assert_eq!(receipt.submission.move_count, 14);

        let scores = ledger.scores(game).await.unwrap();
        let order: Vec<_> = scores.iter().map(|r| (r.id, r.score)).collect();
        assert_eq!(order, vec![(1, 14), (0, 20)]);
    }

    #[tokio::test]
    async fn test_second_score_rejected() {
        let (ledger, game) = ledger_with_game();

        ledger.save_score(submission(game, 0, 12)).await.unwrap();
        assert_eq!(
            ledger.save_score(submission(game, 0, 12)).await,
            Err(LedgerRejection::AlreadyPlayed)
        );
    }

    #[tokio::test]
    async fn test_window_enforced() {
        let (ledger, game) = ledger_with_game();

        ledger.set_now(999);
        assert_eq!(
            ledger.save_score(submission(game, 0, 12)).await,
            Err(LedgerRejection::GameNotStarted)
        );

        ledger.set_now(2_001);
        assert_eq!(
            ledger.save_score(submission(game, 0, 12)).await,
            Err(LedgerRejection::GameEnded)
        );
    }

    #[tokio::test]
    async fn test_unknown_game_and_participant() {
        let (ledger, game) = ledger_with_game();

        assert_eq!(
            ledger.save_score(submission(GameId::new(99), 0, 12)).await,
            Err(LedgerRejection::GameNotFound)
        );
        assert_eq!(
            ledger.save_score(submission(game, 5, 12)).await,
            Err(LedgerRejection::NotParticipant)
        );
        assert_eq!(ledger.game(GameId::new(99)).await, Ok(None));
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot() {
        let (ledger, game) = ledger_with_game();

        ledger.fail_next(LedgerRejection::UserCancelled);
        assert_eq!(
            ledger.save_score(submission(game, 0, 12)).await,
            Err(LedgerRejection::UserCancelled)
        );
        assert!(ledger.save_score(submission(game, 0, 12)).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejections_use_no_tx() {
        let (ledger, game) = ledger_with_game();

        ledger.set_now(999);
        assert!(ledger.save_score(submission(game, 0, 12)).await.is_err());
        assert!(ledger.save_score(submission(game, 7, 12)).await.is_err());

        ledger.set_now(1_500);
        let receipt = ledger.save_score(submission(game, 0, 12)).await.unwrap();
        assert_eq!(receipt.tx, TxId(1));
    }

    #[tokio::test]
    async fn test_deleted_game_refuses_scores() {
        let (ledger, game) = ledger_with_game();

        ledger.delete_game(game).unwrap();
        assert!(ledger.game(game).await.unwrap().unwrap().deleted);
        assert_eq!(
            ledger.save_score(submission(game, 0, 12)).await,
            Err(LedgerRejection::GameNotFound)
        );
        assert_eq!(ledger.delete_game(game), Err(LedgerRejection::GameNotFound));
        assert_eq!(
            ledger.join(game, Address::new("0xC")),
            Err(LedgerRejection::GameNotFound)
        );
    }

    #[test]
    fn test_join_rejects_duplicate() {
        let (ledger, game) = ledger_with_game();
        assert!(matches!(
            ledger.join(game, Address::new("0xa")),
            Err(LedgerRejection::Other(_))
        ));
        assert_eq!(
            ledger.join(GameId::new(42), Address::new("0xz")),
            Err(LedgerRejection::GameNotFound)
        );
    }
}
