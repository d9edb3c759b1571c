//! Score submission.
//!
//! Checks run before the ledger is contacted, in this order:
//! 1. the round was not already submitted or terminally rejected
//! 2. the game exists and was not deleted
//! 3. a wallet account is connected
//! 4. the account owns a score slot in the game
//! 5. the round is complete
//! 6. the slot has not been played
//! 7. the game window is open
//!
//! Only then is `(game_id, participant_index, move_count)` sent.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::Session;
use crate::core::{Address, GameId};
use crate::error::{MatchError, Result};
use crate::ledger::{
    find_participant, GameInfo, LedgerRejection, Receipt, ScoreLedger, ScoreRecord,
    ScoreSubmission,
};

/// Submission state of the live round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    /// Not yet accepted. Retriable rejections leave the round here.
    NotSubmitted,
    /// Accepted by the ledger.
    Submitted(Receipt),
    /// Terminally rejected; only a reset clears this.
    Rejected(LedgerRejection),
}

/// What the caller knows about the game when submitting.
#[derive(Clone, Copy, Debug)]
pub struct SubmitRequest<'a> {
    pub game: &'a GameInfo,
    pub scores: &'a [ScoreRecord],
    /// Connected wallet account, if any.
    pub account: Option<&'a Address>,
    /// Unix millis.
    pub now: u64,
}

impl SubmitRequest<'_> {
    /// Addresses holding a score slot.
    #[must_use]
    pub fn participants(&self) -> Vec<Address> {
        self.scores.iter().map(|record| record.player.clone()).collect()
    }
}

impl Session {
    /// Submit the live round's move count.
    ///
    /// On success the round is replaced by a fresh deal unless the config
    /// keeps submitted rounds. Retriable rejections (cancellation, funds,
    /// not started) leave the round submittable; all others lock it until
    /// reset.
    pub async fn submit<L: ScoreLedger>(
        &mut self,
        ledger: &L,
        request: SubmitRequest<'_>,
    ) -> Result<Receipt> {
        match &self.status {
            SubmissionStatus::Submitted(_) => return Err(MatchError::AlreadySubmitted),
            SubmissionStatus::Rejected(rejection) => {
                return Err(MatchError::SubmissionRejected(rejection.clone()))
            }
            SubmissionStatus::NotSubmitted => {}
        }

        if request.game.deleted {
            return Err(self.rejected(LedgerRejection::GameNotFound));
        }

        let account = request.account.ok_or(MatchError::WalletNotConnected)?;
        let record = find_participant(request.scores, account).ok_or(MatchError::ParticipantNotFound)?;

        // Participation is settled above, so only completion can fail here.
        let round = self.round();
        if !self.is_submittable(&request.participants(), Some(account)) {
            return Err(MatchError::RoundIncomplete);
        }

        if record.played {
            return Err(self.rejected(LedgerRejection::AlreadyPlayed));
        }
        if request.game.has_ended(request.now) {
            return Err(self.rejected(LedgerRejection::GameEnded));
        }
        if request.game.not_started(request.now) {
            return Err(self.rejected(LedgerRejection::GameNotStarted));
        }

        let submission = ScoreSubmission {
            game_id: request.game.id,
            participant_index: record.id,
            move_count: round.move_count(),
        };
        match ledger.save_score(submission).await {
            Ok(receipt) => {
                info!(
                    game = %receipt.submission.game_id,
                    index = receipt.submission.participant_index,
                    moves = receipt.submission.move_count,
                    tx = %receipt.tx,
                    "score saved"
                );
                if self.config.reset_after_submit {
                    self.reset();
                } else {
                    self.status = SubmissionStatus::Submitted(receipt.clone());
                }
                Ok(receipt)
            }
            Err(rejection) => Err(self.rejected(rejection)),
        }
    }

    /// Fetch the game and its scores from `ledger`, then submit.
    pub async fn submit_to<L: ScoreLedger>(
        &mut self,
        ledger: &L,
        game_id: GameId,
        account: Option<&Address>,
        now: u64,
    ) -> Result<Receipt> {
        let game = ledger
            .game(game_id)
            .await?
            .ok_or(LedgerRejection::GameNotFound)?;
        let scores = ledger.scores(game_id).await?;

        self.submit(
            ledger,
            SubmitRequest {
                game: &game,
                scores: &scores,
                account,
                now,
            },
        )
        .await
    }

    fn rejected(&mut self, rejection: LedgerRejection) -> MatchError {
        if rejection.is_cancellation() {
            info!("submission cancelled by user");
        } else if rejection.is_retriable() {
            warn!(%rejection, "submission rejected, retry allowed");
        } else {
            warn!(%rejection, "submission rejected");
            self.status = SubmissionStatus::Rejected(rejection.clone());
        }
        MatchError::SubmissionRejected(rejection)
    }
}
