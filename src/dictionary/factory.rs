//! Dictionary factory for building any backend from one word list.
//!
//! # Example
//!
//! ```rust
//! use libdarray::dictionary::factory::{DictionaryBackend, DictionaryFactory};
//! use libdarray::dictionary::double_array::DoubleArrayConfig;
//!
//! let dict = DictionaryFactory::create(
//!     DictionaryBackend::Linked,
//!     ["test", "testing", "tested"],
//!     DoubleArrayConfig::default(),
//! )
//! .unwrap();
//!
//! assert!(dict.contains("tested"));
//! assert!(!dict.contains("tester"));
//! ```

use super::alphabet::{self, Symbol, Word};
use super::double_array::DoubleArrayConfig;
use super::double_array_trie::DoubleArrayTrie;
use super::explicit_trie::ExplicitTrie;
use super::flat_table::FlatTable;
use super::linked_double_array::LinkedDoubleArray;
use super::{DictionaryError, Lookup};

/// Dictionary backend types
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DictionaryBackend {
    /// Mutable double-array trie (one state per slot)
    #[default]
    #[cfg_attr(feature = "cli", value(name = "trie"))]
    DoubleArray,
    /// Reduced automaton in a double array with a `next` table
    Linked,
    /// Reduced automaton in a dense table (small dictionaries only)
    Flat,
}

impl std::fmt::Display for DictionaryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DictionaryBackend::DoubleArray => write!(f, "trie"),
            DictionaryBackend::Linked => write!(f, "linked"),
            DictionaryBackend::Flat => write!(f, "flat"),
        }
    }
}

/// Unified dictionary container that can hold any backend type
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryContainer {
    /// Double-array trie
    DoubleArray(DoubleArrayTrie),
    /// Linked double array over a reduced automaton
    Linked(LinkedDoubleArray),
    /// Flat table over a reduced automaton
    Flat(FlatTable),
}

impl DictionaryContainer {
    /// Get the backend type of this container
    pub fn backend(&self) -> DictionaryBackend {
        match self {
            DictionaryContainer::DoubleArray(_) => DictionaryBackend::DoubleArray,
            DictionaryContainer::Linked(_) => DictionaryBackend::Linked,
            DictionaryContainer::Flat(_) => DictionaryBackend::Flat,
        }
    }

    /// Number of words
    pub fn len(&self) -> usize {
        match self {
            DictionaryContainer::DoubleArray(d) => d.len(),
            DictionaryContainer::Linked(d) => d.len(),
            DictionaryContainer::Flat(d) => d.len(),
        }
    }

    /// Check if the dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of states, root included
    pub fn num_states(&self) -> usize {
        match self {
            DictionaryContainer::DoubleArray(d) => d.state_count(),
            DictionaryContainer::Linked(d) => d.num_states(),
            DictionaryContainer::Flat(d) => d.num_states(),
        }
    }

    /// Bytes held by the backend's arrays
    pub fn memory_bytes(&self) -> usize {
        match self {
            DictionaryContainer::DoubleArray(d) => d.stats().bytes,
            DictionaryContainer::Linked(d) => d.memory_bytes(),
            DictionaryContainer::Flat(d) => d.memory_bytes(),
        }
    }

    /// Three-way lookup of an encoded word
    pub fn lookup(&self, word: &[Symbol]) -> Lookup {
        match self {
            DictionaryContainer::DoubleArray(d) => d.lookup(word),
            DictionaryContainer::Linked(d) => d.lookup(word),
            DictionaryContainer::Flat(d) => d.lookup(word),
        }
    }

    /// Check if a term exists in the dictionary
    pub fn contains(&self, term: &str) -> bool {
        alphabet::encode(term).is_ok_and(|word| self.lookup(&word).is_word())
    }

    /// Diagnostic dump of the backend's arrays
    pub fn dump(&self) -> String {
        match self {
            DictionaryContainer::DoubleArray(d) => d.dump().to_string(),
            DictionaryContainer::Linked(d) => d.dump().to_string(),
            DictionaryContainer::Flat(d) => d.dump().to_string(),
        }
    }

    /// Rebuild this dictionary's language with another backend
    pub fn convert(
        &self,
        backend: DictionaryBackend,
        config: DoubleArrayConfig,
    ) -> Result<DictionaryContainer, DictionaryError> {
        if backend == self.backend() {
            return Ok(self.clone());
        }
        let trie = match self {
            DictionaryContainer::DoubleArray(d) => ExplicitTrie::from_dictionary(d),
            DictionaryContainer::Linked(d) => ExplicitTrie::from_dictionary(d),
            DictionaryContainer::Flat(d) => ExplicitTrie::from_dictionary(d),
        };
        DictionaryFactory::from_explicit(backend, trie, config)
    }
}

/// Factory for creating dictionaries with different backends
pub struct DictionaryFactory;

impl DictionaryFactory {
    /// Create a dictionary with the specified backend
    ///
    /// # Arguments
    ///
    /// * `backend` - The backend implementation to use
    /// * `terms` - Words to insert; any character outside `A-Z` is an error
    /// * `config` - Growth settings for the double-array backends
    pub fn create<I, S>(
        backend: DictionaryBackend,
        terms: I,
        config: DoubleArrayConfig,
    ) -> Result<DictionaryContainer, DictionaryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = terms
            .into_iter()
            .map(|term| alphabet::encode(term.as_ref()))
            .collect::<Result<Vec<Word>, _>>()?;
        Self::from_words(backend, words, config)
    }

    /// Create a dictionary from already-encoded words
    pub fn from_words<I, W>(
        backend: DictionaryBackend,
        words: I,
        config: DoubleArrayConfig,
    ) -> Result<DictionaryContainer, DictionaryError>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<[Symbol]>,
    {
        match backend {
            DictionaryBackend::DoubleArray => {
                let mut trie = DoubleArrayTrie::with_config(config)?;
                for word in words {
                    trie.insert(word.as_ref())?;
                }
                Ok(DictionaryContainer::DoubleArray(trie))
            }
            DictionaryBackend::Linked | DictionaryBackend::Flat => {
                Self::from_explicit(backend, ExplicitTrie::from_words(words), config)
            }
        }
    }

    fn from_explicit(
        backend: DictionaryBackend,
        trie: ExplicitTrie,
        config: DoubleArrayConfig,
    ) -> Result<DictionaryContainer, DictionaryError> {
        match backend {
            DictionaryBackend::DoubleArray => {
                let mut dat = DoubleArrayTrie::with_config(config)?;
                let mut word = Word::new();
                insert_paths(&trie, super::ROOT, &mut word, &mut dat)?;
                Ok(DictionaryContainer::DoubleArray(dat))
            }
            DictionaryBackend::Linked => Ok(DictionaryContainer::Linked(
                trie.reduce().to_linked_double_array(config)?,
            )),
            DictionaryBackend::Flat => Ok(DictionaryContainer::Flat(trie.reduce().to_flat_table()?)),
        }
    }
}

fn insert_paths(
    trie: &ExplicitTrie,
    state: super::StateId,
    word: &mut Word,
    dat: &mut DoubleArrayTrie,
) -> Result<(), DictionaryError> {
    let node = &trie.nodes()[state as usize];
    if node.is_final() {
        dat.insert(word)?;
    }
    for (symbol, child) in node.children() {
        word.push(symbol);
        insert_paths(trie, child, word, dat)?;
        word.pop();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: [&str; 6] = ["hello", "help", "world", "word", "work", "he"];

    #[test]
    fn test_every_backend_agrees() {
        for backend in [
            DictionaryBackend::DoubleArray,
            DictionaryBackend::Linked,
            DictionaryBackend::Flat,
        ] {
            let dict = DictionaryFactory::create(backend, WORDS, DoubleArrayConfig::default())
                .unwrap();
            assert_eq!(dict.backend(), backend);
            assert_eq!(dict.len(), WORDS.len());
            for word in WORDS {
                assert!(dict.contains(word), "{backend}: {word}");
            }
            assert!(!dict.contains("hel"));
            assert!(!dict.contains("worlds"));
            assert!(!dict.dump().is_empty());
        }
    }

    #[test]
    fn test_reduced_backends_have_fewer_states() {
        let trie =
            DictionaryFactory::create(DictionaryBackend::DoubleArray, WORDS, Default::default())
                .unwrap();
        let linked =
            DictionaryFactory::create(DictionaryBackend::Linked, WORDS, Default::default())
                .unwrap();
        assert!(linked.num_states() < trie.num_states());
    }

    #[test]
    fn test_convert_round_trip() {
        let linked =
            DictionaryFactory::create(DictionaryBackend::Linked, WORDS, Default::default())
                .unwrap();
        let back = linked
            .convert(DictionaryBackend::DoubleArray, Default::default())
            .unwrap();
        assert_eq!(back.backend(), DictionaryBackend::DoubleArray);
        assert_eq!(back.len(), WORDS.len());
        for word in WORDS {
            assert!(back.contains(word));
        }
    }

    #[test]
    fn test_invalid_word_is_reported() {
        let err = DictionaryFactory::create(
            DictionaryBackend::Flat,
            ["fine", "not-fine"],
            Default::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DictionaryError::Alphabet(_)));
    }
}
