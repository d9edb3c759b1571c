//! Core engine types: identifiers, RNG, configuration.
//!
//! These are shared by the round engine, the session and the ledger
//! boundary, and carry no game rules themselves.

pub mod config;
pub mod ids;
pub mod rng;

pub use config::{MatchConfig, DEFAULT_UNFLIP_DELAY_MS};
pub use ids::{Address, CardId, GameId, SymbolId, TxId};
pub use rng::{GameRng, GameRngState};
