//! # card-match
//!
//! Memory-matching round engine with score submission to an external ledger.
//!
//! ## Design Principles
//!
//! 1. **Immutable Snapshots**: every operation returns a new `Round`; the UI
//!    re-renders from the latest one. O(1) cloning via `im-rs`.
//!
//! 2. **Deterministic Deals**: shuffles come from a seeded ChaCha8 `GameRng`,
//!    so a seed reproduces a session's boards.
//!
//! 3. **Generation-Checked Timers**: the delayed un-flip of a mismatched
//!    pair carries the round generation and is dropped if the round has been
//!    reset since.
//!
//! ## Modules
//!
//! - `core`: identifiers, RNG, configuration
//! - `cards`: symbols and cards
//! - `round`: the card match engine (deal, flip, un-flip, reset)
//! - `session`: single-owner live round, timers, submission
//! - `ledger`: the `ScoreLedger` boundary and an in-memory implementation

pub mod cards;
pub mod core;
pub mod error;
pub mod ledger;
pub mod round;
pub mod session;

// Re-export commonly used types
pub use crate::core::{Address, CardId, GameId, GameRng, GameRngState, MatchConfig, SymbolId, TxId};

pub use crate::cards::{Card, Symbol, SymbolSet};

pub use crate::error::{MatchError, Result};

pub use crate::round::{is_submittable, new_round, FlipOutcome, PendingUnflip, Round, RoundPhase};

pub use crate::session::{Session, SubmissionStatus, SubmitRequest};

pub use crate::ledger::{
    GameInfo, GameParams, InMemoryLedger, LedgerRejection, Receipt, ScoreLedger, ScoreRecord,
    ScoreSubmission,
};
