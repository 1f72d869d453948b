//! Double-Array Trie (DAT) with incremental insertion.
//!
//! A [`DoubleArrayTrie`] keeps its transition table in a
//! [`DoubleArrayStore`]: one `base` word and one `check` word per slot, with
//! states living at the slot their parent points to.
//!
//! ## Transition Function
//!
//! ```text
//! next_state = BASE[current_state] + symbol
//! if CHECK[next_state] == current_state:
//!     transition is valid
//! ```
//!
//! ## Insertion
//!
//! Missing transitions are created as the word is walked:
//!
//! - a state without children gets the smallest base whose slot for the new
//!   symbol is free;
//! - a state whose slot for the new symbol is free just claims it;
//! - otherwise all of the state's children move to a base where the old
//!   children and the new symbol all fit.
//!
//! ## Performance Characteristics
//!
//! - **Memory**: 8 bytes per slot
//! - **Transitions**: O(1), a single array probe
//! - **Construction**: base search is linear in the array length in the worst
//!   case, bounded below by the first free slot

use super::alphabet::{self, Symbol};
use super::double_array::{
    DoubleArrayConfig, DoubleArrayError, DoubleArrayStore, StoreDump, StoreStats,
};
use super::{Dictionary, DictionaryError, DictionaryNode, Lookup, StateId, ROOT};

/// A compact dictionary over the double-array layout.
///
/// # Example
///
/// ```rust
/// use libdarray::prelude::*;
///
/// let dict = DoubleArrayTrie::from_terms(["he", "heat", "heal"]).unwrap();
///
/// assert!(dict.contains("heat"));
/// assert_eq!(dict.lookup_str("hea").unwrap(), Lookup::NotTerminal);
/// assert_eq!(dict.lookup_str("hello").unwrap(), Lookup::NoLink);
/// ```
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "DoubleArrayStore", into = "DoubleArrayStore")
)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DoubleArrayTrie {
    store: DoubleArrayStore,
    term_count: usize,
}

impl DoubleArrayTrie {
    /// An empty trie holding only the root.
    pub fn new() -> Self {
        Self {
            store: DoubleArrayStore::new(),
            term_count: 0,
        }
    }

    /// An empty trie whose arrays follow `config`.
    pub fn with_config(config: DoubleArrayConfig) -> Result<Self, DoubleArrayError> {
        Ok(Self {
            store: DoubleArrayStore::with_config(config)?,
            term_count: 0,
        })
    }

    /// Build a trie from raw strings.
    ///
    /// Fails on the first word outside the alphabet.
    pub fn from_terms<I, S>(terms: I) -> Result<Self, DictionaryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_terms_with_config(terms, DoubleArrayConfig::default())
    }

    /// Build a trie from raw strings with explicit growth settings.
    pub fn from_terms_with_config<I, S>(
        terms: I,
        config: DoubleArrayConfig,
    ) -> Result<Self, DictionaryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Self::with_config(config)?;
        for term in terms {
            trie.insert_str(term.as_ref())?;
        }
        Ok(trie)
    }

    /// Build a trie from encoded words.
    pub fn from_words<I, W>(words: I) -> Result<Self, DoubleArrayError>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<[Symbol]>,
    {
        let mut trie = Self::new();
        for word in words {
            trie.insert(word.as_ref())?;
        }
        Ok(trie)
    }

    /// Insert an encoded word.
    ///
    /// Returns `true` if the word was not present before. Inserting the same
    /// word again changes nothing.
    ///
    /// # Errors
    ///
    /// Fails only if the arrays cannot grow; the trie stays consistent and
    /// every earlier word remains present.
    pub fn insert(&mut self, word: &[Symbol]) -> Result<bool, DoubleArrayError> {
        let mut state = ROOT;
        for &symbol in word {
            state = match self.store.transition(state, symbol) {
                Some(next) => next,
                None => self.add_transition(state, symbol)?,
            };
        }

        if self.store.is_terminal(state) {
            return Ok(false);
        }
        self.store.set_terminal(state, true);
        self.term_count += 1;
        Ok(true)
    }

    /// Validate and insert a raw string.
    pub fn insert_str(&mut self, term: &str) -> Result<bool, DictionaryError> {
        let word = alphabet::encode(term)?;
        Ok(self.insert(&word)?)
    }

    /// Create `state --symbol-->` and return the new child state.
    fn add_transition(&mut self, state: StateId, symbol: Symbol) -> Result<StateId, DoubleArrayError> {
        let children = self.store.children(state);

        if children.is_empty() {
            let base = self.store.find_base(&[symbol])?;
            self.store.set_base(state, base);
        } else if !self.store.is_free(self.store.base(state) + symbol.code()) {
            let mut symbols = children.clone();
            symbols.push(symbol);
            let base = self.store.find_base(&symbols)?;
            self.store.relocate(state, base, &children);
        }

        let target = self.store.base(state) + symbol.code();
        self.store.ensure_len(target as usize + 1)?;
        self.store.set_check(target, state);
        Ok(target)
    }

    /// Walk `word` and report how far it got.
    pub fn lookup(&self, word: &[Symbol]) -> Lookup {
        let mut state = ROOT;
        for &symbol in word {
            match self.store.transition(state, symbol) {
                Some(next) => state = next,
                None => return Lookup::NoLink,
            }
        }
        if self.store.is_terminal(state) {
            Lookup::Word
        } else {
            Lookup::NotTerminal
        }
    }

    /// Whether `word` was inserted.
    #[inline]
    pub fn is_word(&self, word: &[Symbol]) -> bool {
        self.lookup(word).is_word()
    }

    /// Whether some inserted word starts with `prefix`.
    #[inline]
    pub fn has_prefix(&self, prefix: &[Symbol]) -> bool {
        self.lookup(prefix).has_path()
    }

    /// [`Self::lookup`] for a raw string.
    pub fn lookup_str(&self, term: &str) -> Result<Lookup, alphabet::AlphabetError> {
        Ok(self.lookup(&alphabet::encode(term)?))
    }

    /// Whether the raw string was inserted; invalid strings are absent.
    pub fn contains(&self, term: &str) -> bool {
        alphabet::encode(term).is_ok_and(|word| self.is_word(&word))
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.term_count
    }

    /// Whether no word was inserted.
    pub fn is_empty(&self) -> bool {
        self.term_count == 0
    }

    /// Number of states, root included.
    pub fn state_count(&self) -> usize {
        self.store.used_slots() + 1
    }

    /// Underlying arrays.
    pub fn store(&self) -> &DoubleArrayStore {
        &self.store
    }

    /// Drop trailing free slots.
    pub fn trim(&mut self) {
        self.store.trim();
    }

    /// Occupancy summary.
    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }

    /// Diagnostic table of every slot.
    pub fn dump(&self) -> StoreDump<'_> {
        self.store.dump()
    }
}

impl Default for DoubleArrayTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl From<DoubleArrayStore> for DoubleArrayTrie {
    fn from(store: DoubleArrayStore) -> Self {
        let term_count = store.terminal_count();
        Self { store, term_count }
    }
}

impl From<DoubleArrayTrie> for DoubleArrayStore {
    fn from(trie: DoubleArrayTrie) -> Self {
        trie.store
    }
}

/// Node handle into a [`DoubleArrayTrie`].
#[derive(Clone, Copy, Debug)]
pub struct DoubleArrayTrieNode<'a> {
    store: &'a DoubleArrayStore,
    state: StateId,
}

impl DoubleArrayTrieNode<'_> {
    /// State id (equal to its slot).
    pub fn state(&self) -> StateId {
        self.state
    }
}

impl DictionaryNode for DoubleArrayTrieNode<'_> {
    #[inline]
    fn is_final(&self) -> bool {
        self.store.is_terminal(self.state)
    }

    #[inline]
    fn transition(&self, symbol: Symbol) -> Option<Self> {
        self.store.transition(self.state, symbol).map(|state| Self {
            store: self.store,
            state,
        })
    }

    fn edges(&self) -> Box<dyn Iterator<Item = (Symbol, Self)> + '_> {
        Box::new(
            Symbol::all().filter_map(move |symbol| self.transition(symbol).map(|n| (symbol, n))),
        )
    }
}

impl Dictionary for DoubleArrayTrie {
    type Node<'a> = DoubleArrayTrieNode<'a>;

    fn root(&self) -> Self::Node<'_> {
        DoubleArrayTrieNode {
            store: &self.store,
            state: ROOT,
        }
    }

    fn len(&self) -> Option<usize> {
        Some(self.term_count)
    }

    fn lookup(&self, word: &[Symbol]) -> Lookup {
        DoubleArrayTrie::lookup(self, word)
    }
}
