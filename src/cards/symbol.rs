//! Symbol descriptors and validated symbol sets.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::SymbolId;
use crate::error::{MatchError, Result};

/// Glyphs of the classic twelve-card board.
pub const CLASSIC_GLYPHS: [&str; 6] = ["Helmet", "Beech", "Shield", "Swords", "Wings", "Arrow"];

/// A visual glyph shown on the face of a card.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    /// Glyph name. Unique within a set.
    pub name: String,
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Non-empty, duplicate-free ordered list of symbols.
///
/// A symbol's position in the set is its `SymbolId`.
///
/// ```
/// use card_match::cards::{Symbol, SymbolSet};
///
/// let set = SymbolSet::new(vec![Symbol::new("Sun"), Symbol::new("Moon")]).unwrap();
/// assert_eq!(set.len(), 2);
///
/// assert!(SymbolSet::new(vec![]).is_err());
/// assert!(SymbolSet::new(vec![Symbol::new("Sun"), Symbol::new("Sun")]).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Symbol>", into = "Vec<Symbol>")]
pub struct SymbolSet {
    symbols: Vec<Symbol>,
}

impl SymbolSet {
    /// Validate and build a symbol set.
    ///
    /// Fails with `InvalidSymbolSet` when `symbols` is empty or two
    /// symbols share a name.
    pub fn new(symbols: Vec<Symbol>) -> Result<Self> {
        if symbols.is_empty() {
            return Err(MatchError::InvalidSymbolSet("no symbols".to_string()));
        }

        let mut seen = FxHashSet::default();
        for symbol in &symbols {
            if !seen.insert(symbol.name.as_str()) {
                return Err(MatchError::InvalidSymbolSet(format!(
                    "duplicate symbol '{}'",
                    symbol.name
                )));
            }
        }

        Ok(Self { symbols })
    }

    /// The six glyphs of the classic board.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            symbols: CLASSIC_GLYPHS.iter().map(|&name| Symbol::new(name)).collect(),
        }
    }

    /// Keep the first `pairs` symbols.
    pub fn truncated(&self, pairs: usize) -> Result<Self> {
        if pairs == 0 || pairs > self.len() {
            return Err(MatchError::InvalidSymbolSet(format!(
                "cannot take {} of {} symbols",
                pairs,
                self.len()
            )));
        }
        Ok(Self {
            symbols: self.symbols[..pairs].to_vec(),
        })
    }

    /// Number of symbols (pairs in a round).
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false for a validated set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, symbol)| (SymbolId::new(i as u32), symbol))
    }
}

impl Default for SymbolSet {
    fn default() -> Self {
        Self::classic()
    }
}

impl TryFrom<Vec<Symbol>> for SymbolSet {
    type Error = MatchError;

    fn try_from(symbols: Vec<Symbol>) -> Result<Self> {
        Self::new(symbols)
    }
}

impl From<SymbolSet> for Vec<Symbol> {
    fn from(set: SymbolSet) -> Self {
        set.symbols
    }
}
