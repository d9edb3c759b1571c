//! Cards and the symbols printed on them.
//!
//! ## Symbols vs Cards
//!
//! - `Symbol` / `SymbolSet`: the glyphs a round is built from (one per pair)
//! - `Card`: a face on the board, with its current flip state

pub mod card;
pub mod symbol;

pub use card::Card;
pub use symbol::{Symbol, SymbolSet, CLASSIC_GLYPHS};
