//! Dictionary serialization support.
//!
//! Structural formats (bincode, JSON, optionally gzip-wrapped) persist the
//! arrays themselves through each dictionary's validated snapshot type, so a
//! loaded dictionary is bit-for-bit the one that was saved. Corrupt input is
//! rejected while deserializing, never at lookup time.
//!
//! The plain-text format stores only the word list and rebuilds on load.
//!
//! # Example
//!
//! ```rust
//! use libdarray::prelude::*;
//! use libdarray::serialization::{BincodeSerializer, DictionarySerializer};
//!
//! let dict = DoubleArrayTrie::from_terms(["test", "testing"]).unwrap();
//!
//! let mut buffer = Vec::new();
//! BincodeSerializer::serialize(&dict, &mut buffer).unwrap();
//!
//! let loaded: DoubleArrayTrie = BincodeSerializer::deserialize(&buffer[..]).unwrap();
//! assert_eq!(loaded, dict);
//! ```

use crate::dictionary::alphabet::{self, Symbol};
use crate::dictionary::double_array_trie::DoubleArrayTrie;
use crate::dictionary::explicit_trie::ExplicitTrie;
use crate::dictionary::flat_table::FlatTable;
use crate::dictionary::linked_double_array::LinkedDoubleArray;
use crate::dictionary::reduce::MinimalAutomaton;
use crate::dictionary::{Dictionary, DictionaryError, DictionaryNode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};

// Serializer implementations
mod bincode_impl;
mod json_impl;
mod plaintext_impl;

#[cfg(feature = "compression")]
mod compression_impl;

// Re-exports
pub use self::bincode_impl::BincodeSerializer;
pub use self::json_impl::JsonSerializer;
pub use self::plaintext_impl::{PlainTextSerializer, RejectedWord, WordList};

#[cfg(feature = "compression")]
pub use self::compression_impl::GzipSerializer;

/// Trait for serializing and deserializing dictionaries.
pub trait DictionarySerializer {
    /// Serialize a dictionary to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or writing fails.
    fn serialize<D, W>(dict: &D, writer: W) -> Result<(), SerializationError>
    where
        D: Serialize,
        W: Write;

    /// Deserialize a dictionary from a reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails, the bytes are not in this format,
    /// or the decoded arrays violate a structural invariant.
    fn deserialize<D, R>(reader: R) -> Result<D, SerializationError>
    where
        D: DeserializeOwned,
        R: Read;
}

/// Trait for dictionaries that can be rebuilt from a list of terms.
///
/// Used by [`PlainTextSerializer`], which stores words rather than arrays.
pub trait DictionaryFromTerms: Sized {
    /// Create a dictionary from an iterator of terms.
    fn from_terms<I: IntoIterator<Item = String>>(terms: I) -> Result<Self, DictionaryError>;
}

impl DictionaryFromTerms for DoubleArrayTrie {
    fn from_terms<I: IntoIterator<Item = String>>(terms: I) -> Result<Self, DictionaryError> {
        DoubleArrayTrie::from_terms(terms)
    }
}

impl DictionaryFromTerms for ExplicitTrie {
    fn from_terms<I: IntoIterator<Item = String>>(terms: I) -> Result<Self, DictionaryError> {
        ExplicitTrie::from_terms(terms)
    }
}

impl DictionaryFromTerms for MinimalAutomaton {
    fn from_terms<I: IntoIterator<Item = String>>(terms: I) -> Result<Self, DictionaryError> {
        MinimalAutomaton::from_terms(terms)
    }
}

impl DictionaryFromTerms for LinkedDoubleArray {
    fn from_terms<I: IntoIterator<Item = String>>(terms: I) -> Result<Self, DictionaryError> {
        Ok(MinimalAutomaton::from_terms(terms)?.to_linked_double_array(Default::default())?)
    }
}

impl DictionaryFromTerms for FlatTable {
    fn from_terms<I: IntoIterator<Item = String>>(terms: I) -> Result<Self, DictionaryError> {
        Ok(MinimalAutomaton::from_terms(terms)?.to_flat_table()?)
    }
}

/// Errors that can occur during serialization/deserialization.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// Error during bincode serialization, including rejected snapshots
    #[error("Bincode error: {0}")]
    Bincode(#[from] bincode::Error),
    /// Error during JSON serialization, including rejected snapshots
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A word list could not be turned into a dictionary
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),
    /// The dictionary accepts the empty word, which a word list cannot hold
    #[error("a word list cannot hold the empty word")]
    EmptyWord,
}

/// Collect every accepted word in symbol order.
///
/// Words are decoded to uppercase. The traversal expands shared suffixes, so
/// reduced automata yield the same list as the trie they came from.
pub fn extract_terms<D: Dictionary>(dict: &D) -> Vec<String> {
    fn dfs<N: DictionaryNode>(node: &N, current: &mut Vec<Symbol>, terms: &mut Vec<String>) {
        if node.is_final() {
            terms.push(alphabet::decode(current));
        }
        for (symbol, child) in node.edges() {
            current.push(symbol);
            dfs(&child, current, terms);
            current.pop();
        }
    }

    let mut terms = Vec::with_capacity(dict.len().unwrap_or(100));
    let mut current = Vec::with_capacity(32);
    dfs(&dict.root(), &mut current, &mut terms);
    terms
}
