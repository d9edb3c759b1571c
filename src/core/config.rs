//! Session configuration.
//!
//! `MatchConfig` controls how a session deals and paces its rounds:
//! - which symbols are on the board
//! - how long a mismatched pair stays visible
//! - which seed drives the shuffles
//! - whether a successful submission starts a fresh round
//!
//! ```
//! use card_match::core::MatchConfig;
//!
//! let config = MatchConfig::from_json(r#"{ "unflip_delay_ms": 250, "seed": 9 }"#).unwrap();
//! assert_eq!(config.unflip_delay_ms, 250);
//! assert_eq!(config.seed, Some(9));
//! assert_eq!(config.symbols.len(), 6);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cards::SymbolSet;
use crate::error::{MatchError, Result};

/// Default time a mismatched pair stays face up.
pub const DEFAULT_UNFLIP_DELAY_MS: u64 = 1000;

/// Configuration for a `Session`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Delay before a mismatched pair is turned face down again.
    pub unflip_delay_ms: u64,

    /// Shuffle seed. `None` draws one from OS entropy.
    pub seed: Option<u64>,

    /// Symbols dealt into each round (two cards per symbol).
    pub symbols: SymbolSet,

    /// Deal a new round once a score has been accepted by the ledger.
    pub reset_after_submit: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            unflip_delay_ms: DEFAULT_UNFLIP_DELAY_MS,
            seed: None,
            symbols: SymbolSet::classic(),
            reset_after_submit: true,
        }
    }
}

impl MatchConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| MatchError::InvalidConfig(e.to_string()))
    }

    /// Set the shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the mismatch delay in milliseconds.
    #[must_use]
    pub fn with_unflip_delay_ms(mut self, delay_ms: u64) -> Self {
        self.unflip_delay_ms = delay_ms;
        self
    }

    /// Set the symbols dealt into each round.
    #[must_use]
    pub fn with_symbols(mut self, symbols: SymbolSet) -> Self {
        self.symbols = symbols;
        self
    }

    /// Keep a submitted round on the board instead of dealing a new one.
    #[must_use]
    pub fn keep_after_submit(mut self) -> Self {
        self.reset_after_submit = false;
        self
    }

    #[must_use]
    pub fn unflip_delay(&self) -> Duration {
        Duration::from_millis(self.unflip_delay_ms)
    }
}
