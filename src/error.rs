//! Engine error type.

use thiserror::Error;

use crate::core::CardId;
use crate::ledger::LedgerRejection;

/// Error type for engine and session operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("no card with id {card_id} in a deck of {deck_size}")]
    InvalidCardId { card_id: CardId, deck_size: usize },
    #[error("invalid symbol set: {0}")]
    InvalidSymbolSet(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("session requires a tokio runtime")]
    NoRuntime,
    #[error("connect a wallet first")]
    WalletNotConnected,
    #[error("participant not found for this game")]
    ParticipantNotFound,
    #[error("finish the round before submitting")]
    RoundIncomplete,
    #[error("this round has already been submitted")]
    AlreadySubmitted,
    #[error("submission rejected: {0}")]
    SubmissionRejected(#[from] LedgerRejection),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, MatchError>;
