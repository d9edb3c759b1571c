//! Ledger rejection reasons.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why the ledger declined a call.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerRejection {
    #[error("transaction cancelled by user")]
    UserCancelled,
    #[error("insufficient funds for gas fees")]
    InsufficientFunds,
    #[error("the game has already ended")]
    GameEnded,
    #[error("the game has not started yet")]
    GameNotStarted,
    #[error("you are not a participant in this game")]
    NotParticipant,
    #[error("you have already submitted your score for this game")]
    AlreadyPlayed,
    #[error("game not found")]
    GameNotFound,
    #[error("{0}")]
    Other(String),
}

impl LedgerRejection {
    /// Map a raw collaborator error message to a rejection kind.
    ///
    /// ```
    /// use card_match::ledger::LedgerRejection;
    ///
    /// assert_eq!(
    ///     LedgerRejection::classify("execution reverted: game has ended"),
    ///     LedgerRejection::GameEnded
    /// );
    /// assert_eq!(
    ///     LedgerRejection::classify("MetaMask: User rejected the request"),
    ///     LedgerRejection::UserCancelled
    /// );
    /// ```
    #[must_use]
    pub fn classify(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        let patterns: [(&[&str], LedgerRejection); 7] = [
            (&["user rejected", "user denied"], Self::UserCancelled),
            (&["insufficient funds", "insufficient_funds"], Self::InsufficientFunds),
            (&["game has ended", "game ended"], Self::GameEnded),
            (&["not started"], Self::GameNotStarted),
            (&["not a participant"], Self::NotParticipant),
            (&["already played", "already submitted"], Self::AlreadyPlayed),
            (&["game not found", "game does not exist"], Self::GameNotFound),
        ];

        patterns
            .into_iter()
            .find(|(needles, _)| needles.iter().any(|needle| lower.contains(needle)))
            .map(|(_, kind)| kind)
            .unwrap_or_else(|| Self::Other(message.to_string()))
    }

    /// Whether submitting the same round again could succeed.
    ///
    /// Cancellation, funding and an early start are transient. Every other
    /// rejection is final for the round.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::UserCancelled | Self::InsufficientFunds | Self::GameNotStarted
        )
    }

    /// User cancellation is a choice, not a failure.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::UserCancelled)
    }
}
