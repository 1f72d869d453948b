//! # libdarray
//!
//! Compact word dictionaries over the alphabet `A-Z`, stored as double-array
//! tries and reduced to minimal acyclic automata.
//!
//! Building happens in two tiers:
//!
//! 1. [`DoubleArrayTrie`](dictionary::double_array_trie::DoubleArrayTrie) is
//!    mutable: each state owns one slot of two parallel arrays (`base`,
//!    `check`), and a transition is one addition plus one comparison.
//! 2. [`ExplicitTrie::reduce`](dictionary::explicit_trie::ExplicitTrie::reduce)
//!    merges equivalent subtrees into a
//!    [`MinimalAutomaton`](dictionary::reduce::MinimalAutomaton), which is then
//!    linearized into a read-only
//!    [`LinkedDoubleArray`](dictionary::linked_double_array::LinkedDoubleArray)
//!    or, for small automata, a dense
//!    [`FlatTable`](dictionary::flat_table::FlatTable).
//!
//! Every representation answers the same three-way [`Lookup`](dictionary::Lookup)
//! and implements the [`Dictionary`](dictionary::Dictionary) trait, so they
//! can be compared and converted generically.
//!
//! ## Example
//!
//! ```rust
//! use libdarray::prelude::*;
//!
//! let words = ["tap", "taps", "top", "tops"];
//! let trie = DoubleArrayTrie::from_terms(words).unwrap();
//! assert!(trie.contains("taps"));
//!
//! let automaton = ExplicitTrie::from_terms(words).unwrap().reduce();
//! assert_eq!(automaton.num_states(), 5);
//!
//! let linked = automaton.to_linked_double_array(DoubleArrayConfig::default()).unwrap();
//! assert_eq!(linked.lookup(&encode("to").unwrap()), Lookup::NotTerminal);
//! assert_eq!(linked.lookup(&encode("tops").unwrap()), Lookup::Word);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dictionary;

#[cfg(feature = "serialization")]
pub mod serialization;

/// Randomized probe workloads
#[cfg(feature = "rand")]
pub mod corpus;

/// CLI interface and utilities
#[cfg(feature = "cli")]
pub mod cli;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::dictionary::alphabet::{decode, encode, Symbol, Word};
    pub use crate::dictionary::double_array::{DoubleArrayConfig, DoubleArrayStore};
    pub use crate::dictionary::double_array_trie::DoubleArrayTrie;
    pub use crate::dictionary::explicit_trie::ExplicitTrie;
    pub use crate::dictionary::factory::{
        DictionaryBackend, DictionaryContainer, DictionaryFactory,
    };
    pub use crate::dictionary::flat_table::FlatTable;
    pub use crate::dictionary::linked_double_array::LinkedDoubleArray;
    pub use crate::dictionary::reduce::MinimalAutomaton;
    pub use crate::dictionary::{Dictionary, DictionaryError, DictionaryNode, Lookup};

    #[cfg(feature = "serialization")]
    pub use crate::serialization::{
        BincodeSerializer, DictionaryFromTerms, DictionarySerializer, JsonSerializer,
        PlainTextSerializer,
    };

    #[cfg(feature = "compression")]
    pub use crate::serialization::GzipSerializer;
}
