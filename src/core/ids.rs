//! Identifier newtypes.
//!
//! ## ID Layout
//!
//! For a round built from `N` symbols:
//! - `SymbolId` ranges over `0..N`, one per symbol in set order
//! - `CardId` ranges over `0..2N`; card `i` and card `i + N` show symbol `i`
//!
//! ```
//! use card_match::core::{CardId, SymbolId};
//!
//! let pairs = 6;
//! let card = CardId::new(8);
//!
//! assert_eq!(card.symbol(pairs), SymbolId::new(2));
//! assert_eq!(card.partner(pairs), CardId::new(2));
//! ```
//!
//! `GameId` and `TxId` identify things owned by the external ledger and are
//! opaque to the engine.

use serde::{Deserialize, Serialize};

/// Identifier of a card within one round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Symbol shown on this card in a round with `pairs` symbols.
    #[must_use]
    pub const fn symbol(self, pairs: usize) -> SymbolId {
        SymbolId(self.0 % pairs as u32)
    }

    /// The other card carrying the same symbol.
    ///
    /// ```
    /// use card_match::core::CardId;
    ///
    /// assert_eq!(CardId::new(0).partner(6), CardId::new(6));
    /// assert_eq!(CardId::new(6).partner(6), CardId::new(0));
    /// ```
    #[must_use]
    pub const fn partner(self, pairs: usize) -> Self {
        let pairs = pairs as u32;
        if self.0 < pairs {
            Self(self.0 + pairs)
        } else {
            Self(self.0 - pairs)
        }
    }
}

impl From<u32> for CardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Identifier of a symbol, equal to its position in the symbol set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

impl SymbolId {
    /// Create a new symbol ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Symbol position as an index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Ledger-side game identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameId(pub u64);

impl GameId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Game({})", self.0)
    }
}

/// Ledger transaction identifier returned on confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId(pub u64);

impl std::fmt::Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

/// Account address of a participant.
///
/// Hex account addresses are case-insensitive, so the value is stored
/// trimmed and lowercased. Two addresses that differ only in checksum
/// casing compare equal.
///
/// ```
/// use card_match::core::Address;
///
/// let a = Address::new("0xAbC123");
/// let b = Address::new(" 0xabc123 ");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "0xabc123");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Address(String);

impl Address {
    #[must_use]
    pub fn new(address: impl AsRef<str>) -> Self {
        Self(address.as_ref().trim().to_ascii_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Address {
    fn from(address: String) -> Self {
        Self::new(address)
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
