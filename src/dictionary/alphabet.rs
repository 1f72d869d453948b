//! Alphabet mapping between input characters and dense symbol codes.
//!
//! Every dictionary in this crate operates over the 26 Latin letters. Letters
//! are case-insensitive and map to the codes `1..=26`; code `0` is reserved so
//! that a slot offset of zero never names a real transition.

use smallvec::SmallVec;
use std::fmt;

/// Number of distinct symbols.
pub const ALPHABET_SIZE: usize = 26;

/// A single alphabet symbol with code in `1..=26`.
///
/// The inner code is never zero, which lets `base + code` address a child slot
/// strictly after the base offset itself.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Symbol(u8);

impl Symbol {
    /// Smallest symbol (`A`).
    pub const MIN: Symbol = Symbol(1);
    /// Largest symbol (`Z`).
    pub const MAX: Symbol = Symbol(ALPHABET_SIZE as u8);

    /// Create a symbol from its code, returning `None` outside `1..=26`.
    #[inline]
    pub const fn new(code: u8) -> Option<Self> {
        if code >= 1 && code as usize <= ALPHABET_SIZE {
            Some(Symbol(code))
        } else {
            None
        }
    }

    /// Map an ASCII letter (either case) to its symbol.
    #[inline]
    pub fn from_char(ch: char) -> Option<Self> {
        if ch.is_ascii_alphabetic() {
            Some(Symbol(ch.to_ascii_uppercase() as u8 - b'A' + 1))
        } else {
            None
        }
    }

    /// Numeric code, suitable for slot arithmetic.
    #[inline]
    pub const fn code(self) -> u32 {
        self.0 as u32
    }

    /// Uppercase letter for this symbol.
    #[inline]
    pub const fn to_char(self) -> char {
        (b'A' + self.0 - 1) as char
    }

    /// Iterate all symbols in ascending code order.
    pub fn all() -> impl Iterator<Item = Symbol> + Clone {
        (1..=ALPHABET_SIZE as u8).map(Symbol)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.to_char())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// An encoded word. Most dictionary words fit inline.
pub type Word = SmallVec<[Symbol; 16]>;

/// Rejection raised at the alphabet boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlphabetError {
    /// The word contains a character outside `A-Z`/`a-z`.
    #[error("invalid character {ch:?} at position {position} in {word:?}")]
    InvalidCharacter {
        /// The offending input word
        word: String,
        /// The rejected character
        ch: char,
        /// Character index of `ch` within `word`
        position: usize,
    },
}

/// Encode a string into symbols.
///
/// The empty string encodes to the empty word, which names the root state.
pub fn encode(word: &str) -> Result<Word, AlphabetError> {
    word.chars()
        .enumerate()
        .map(|(position, ch)| {
            Symbol::from_char(ch).ok_or_else(|| AlphabetError::InvalidCharacter {
                word: word.to_string(),
                ch,
                position,
            })
        })
        .collect()
}

/// Decode symbols back into an uppercase string.
pub fn decode(symbols: &[Symbol]) -> String {
    symbols.iter().map(|s| s.to_char()).collect()
}
