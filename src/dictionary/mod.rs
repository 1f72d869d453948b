//! Dictionary abstractions and backends.
//!
//! All backends store words over the 26-letter [`alphabet`] and expose the
//! same traversal interface through [`Dictionary`] and [`DictionaryNode`]:
//!
//! - [`DoubleArrayTrie`](double_array_trie::DoubleArrayTrie): mutable
//!   `base`/`check` trie with incremental insertion.
//! - [`ExplicitTrie`](explicit_trie::ExplicitTrie): map-of-children trie used
//!   as the input of reduction.
//! - [`MinimalAutomaton`](reduce::MinimalAutomaton): the explicit trie with
//!   equivalent subtrees merged.
//! - [`LinkedDoubleArray`](linked_double_array::LinkedDoubleArray) and
//!   [`FlatTable`](flat_table::FlatTable): read-only projections of a
//!   minimal automaton.

pub mod alphabet;
pub mod double_array;
pub mod double_array_trie;
pub mod explicit_trie;
pub mod factory;
pub mod flat_table;
pub mod linked_double_array;
pub mod reduce;

pub(crate) mod traversal;

use alphabet::{AlphabetError, Symbol};
use double_array::DoubleArrayError;
use flat_table::FlatTableError;

/// Index of a state in any backend.
pub type StateId = u32;

/// The start state of every backend.
pub const ROOT: StateId = 0;

/// Outcome of walking a word through a dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    /// The full path exists and ends in a terminal state.
    Word,
    /// The full path exists but its last state is not terminal.
    NotTerminal,
    /// The path breaks before the word is consumed.
    NoLink,
}

impl Lookup {
    /// `true` only for [`Lookup::Word`].
    #[inline]
    pub fn is_word(self) -> bool {
        self == Lookup::Word
    }

    /// `true` when every symbol of the word could be followed.
    #[inline]
    pub fn has_path(self) -> bool {
        self != Lookup::NoLink
    }
}

impl std::fmt::Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lookup::Word => write!(f, "word"),
            Lookup::NotTerminal => write!(f, "not-terminal"),
            Lookup::NoLink => write!(f, "no-link"),
        }
    }
}

/// A collection of words that can be traversed symbol by symbol.
pub trait Dictionary {
    /// Node handle used for traversal.
    type Node<'a>: DictionaryNode
    where
        Self: 'a;

    /// The start node.
    fn root(&self) -> Self::Node<'_>;

    /// Number of words, if known without a traversal.
    fn len(&self) -> Option<usize>;

    /// Whether the dictionary holds no words.
    fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Walk `word` and report how far it got.
    fn lookup(&self, word: &[Symbol]) -> Lookup {
        let mut node = self.root();
        for &symbol in word {
            match node.transition(symbol) {
                Some(next) => node = next,
                None => return Lookup::NoLink,
            }
        }
        if node.is_final() {
            Lookup::Word
        } else {
            Lookup::NotTerminal
        }
    }

    /// Boolean membership. Both [`Lookup::NotTerminal`] and
    /// [`Lookup::NoLink`] count as absent.
    fn is_word(&self, word: &[Symbol]) -> bool {
        self.lookup(word).is_word()
    }

    /// Membership for a raw string; words outside the alphabet are absent.
    fn contains(&self, term: &str) -> bool {
        alphabet::encode(term).is_ok_and(|word| self.is_word(&word))
    }
}

/// A state reached while traversing a [`Dictionary`].
pub trait DictionaryNode: Sized {
    /// Whether a word ends here.
    fn is_final(&self) -> bool;

    /// Follow the edge labelled `symbol`.
    fn transition(&self, symbol: Symbol) -> Option<Self>;

    /// Outgoing edges in ascending symbol order.
    fn edges(&self) -> Box<dyn Iterator<Item = (Symbol, Self)> + '_>;

    /// Whether an edge labelled `symbol` exists.
    fn has_edge(&self, symbol: Symbol) -> bool {
        self.transition(symbol).is_some()
    }

    /// Number of outgoing edges.
    fn edge_count(&self) -> usize {
        self.edges().count()
    }
}

/// Errors raised while building a dictionary from input words.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DictionaryError {
    /// A word contained characters outside the alphabet.
    #[error(transparent)]
    Alphabet(#[from] AlphabetError),
    /// The double array could not grow.
    #[error(transparent)]
    DoubleArray(#[from] DoubleArrayError),
    /// The automaton does not fit a dense table.
    #[error(transparent)]
    FlatTable(#[from] FlatTableError),
}

/// Reasons a persisted array set is rejected on load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// No root state.
    #[error("snapshot has no states")]
    Empty,
    /// Parallel arrays disagree in length.
    #[error("{field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        /// Offending array
        field: &'static str,
        /// Length implied by the state count
        expected: usize,
        /// Length found
        actual: usize,
    },
    /// More slots than indices can address.
    #[error("snapshot has {slots} slots, limit is {limit}")]
    TooLarge {
        /// Slots found
        slots: usize,
        /// Largest accepted
        limit: usize,
    },
    /// A base offset is beyond the representable range.
    #[error("state {state} has base offset {offset} out of range")]
    BaseOutOfRange {
        /// Offending state
        state: usize,
        /// Offset found
        offset: u32,
    },
    /// The root slot is recorded as owned.
    #[error("root slot has an owner")]
    OwnedRoot,
    /// A slot names an owner whose children cannot land there.
    #[error("slot {slot} claims owner {owner}, which cannot reach it")]
    DanglingCheck {
        /// Offending slot
        slot: usize,
        /// Owner recorded in `check`
        owner: i32,
    },
    /// A free slot carries a base or terminal flag.
    #[error("free slot {slot} carries state data")]
    OrphanSlot {
        /// Offending slot
        slot: usize,
    },
    /// An owned slot cannot be reached from the root.
    #[error("slot {slot} is owned but unreachable from the root")]
    Unreachable {
        /// Offending slot
        slot: usize,
    },
    /// A transition targets a state that does not exist (or the root).
    #[error("transition at {slot} targets invalid state {target}")]
    DanglingTarget {
        /// Offending slot or cell
        slot: usize,
        /// Target found
        target: u32,
    },
    /// The state graph reachable from the root contains a cycle.
    #[error("state graph has a cycle through state {state}")]
    Cyclic {
        /// A state on the cycle
        state: StateId,
    },
    /// Terminal markers disagree with each other.
    #[error("terminal flags of state {state} are inconsistent")]
    TerminalMismatch {
        /// Offending state
        state: StateId,
    },
    /// The stored word count disagrees with the automaton.
    #[error("snapshot records {expected} words but encodes {actual}")]
    WordCountMismatch {
        /// Recorded count
        expected: u64,
        /// Count derived from the arrays
        actual: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::alphabet::encode;
    use super::double_array_trie::DoubleArrayTrie;
    use super::*;

    #[test]
    fn test_lookup_helpers() {
        assert!(Lookup::Word.is_word());
        assert!(!Lookup::NotTerminal.is_word());
        assert!(Lookup::NotTerminal.has_path());
        assert!(!Lookup::NoLink.has_path());
        assert_eq!(Lookup::NotTerminal.to_string(), "not-terminal");
    }

    #[test]
    fn test_default_lookup_through_nodes() {
        let dict = DoubleArrayTrie::from_terms(["cat", "cart"]).unwrap();
        let root = dict.root();
        assert!(root.has_edge(Symbol::from_char('c').unwrap()));
        assert_eq!(root.edge_count(), 1);

        let car = encode("car").unwrap();
        let mut node = dict.root();
        for &s in &car {
            node = node.transition(s).unwrap();
        }
        assert!(!node.is_final());
        assert_eq!(dict.lookup(&car), Lookup::NotTerminal);
    }

    #[test]
    fn test_contains_rejects_foreign_characters() {
        let dict = DoubleArrayTrie::from_terms(["don"]).unwrap();
        assert!(dict.contains("DON"));
        assert!(!dict.contains("don't"));
    }
}
