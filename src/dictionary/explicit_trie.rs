//! Map-of-children trie used as input to [`reduce`](super::reduce).
//!
//! Nodes live in one arena and refer to their children by index, so the
//! reducer can redirect links to a representative without touching pointers.

use super::alphabet::{self, Symbol};
use super::traversal;
use super::{Dictionary, DictionaryError, DictionaryNode, Lookup, StateId, ROOT};
use std::collections::BTreeMap;

/// One state of an [`ExplicitTrie`] or of a reduced automaton.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrieNode {
    pub(crate) symbol: Option<Symbol>,
    pub(crate) is_final: bool,
    pub(crate) children: BTreeMap<Symbol, StateId>,
}

impl TrieNode {
    /// Label of the edge that created this node (`None` for the root).
    pub fn symbol(&self) -> Option<Symbol> {
        self.symbol
    }

    /// Whether a word ends here.
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Child reached by `symbol`.
    pub fn child(&self, symbol: Symbol) -> Option<StateId> {
        self.children.get(&symbol).copied()
    }

    /// Children in ascending symbol order.
    pub fn children(&self) -> impl Iterator<Item = (Symbol, StateId)> + '_ {
        self.children.iter().map(|(&s, &t)| (s, t))
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// Pointer-free trie: a vector of [`TrieNode`]s rooted at index 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplicitTrie {
    pub(crate) nodes: Vec<TrieNode>,
    pub(crate) term_count: usize,
}

impl ExplicitTrie {
    /// A trie holding only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            term_count: 0,
        }
    }

    /// Build from raw strings, failing on the first invalid word.
    pub fn from_terms<I, S>(terms: I) -> Result<Self, DictionaryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Self::new();
        for term in terms {
            trie.insert_str(term.as_ref())?;
        }
        Ok(trie)
    }

    /// Build from encoded words.
    pub fn from_words<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: AsRef<[Symbol]>,
    {
        let mut trie = Self::new();
        for word in words {
            trie.insert(word.as_ref());
        }
        trie
    }

    /// Copy the language of any dictionary.
    pub fn from_dictionary<D: Dictionary>(dict: &D) -> Self {
        fn copy<N: DictionaryNode>(node: &N, at: StateId, trie: &mut ExplicitTrie) {
            if node.is_final() {
                trie.nodes[at as usize].is_final = true;
                trie.term_count += 1;
            }
            for (symbol, child) in node.edges() {
                let id = trie.push_child(at, symbol);
                copy(&child, id, trie);
            }
        }

        let mut trie = Self::new();
        copy(&dict.root(), ROOT, &mut trie);
        trie
    }

    /// Insert an encoded word, returning `true` if it was new.
    pub fn insert(&mut self, word: &[Symbol]) -> bool {
        let mut state = ROOT;
        for &symbol in word {
            state = match self.nodes[state as usize].child(symbol) {
                Some(next) => next,
                None => self.push_child(state, symbol),
            };
        }

        let node = &mut self.nodes[state as usize];
        if node.is_final {
            return false;
        }
        node.is_final = true;
        self.term_count += 1;
        true
    }

    /// Validate and insert a raw string.
    pub fn insert_str(&mut self, term: &str) -> Result<bool, DictionaryError> {
        Ok(self.insert(&alphabet::encode(term)?))
    }

    fn push_child(&mut self, parent: StateId, symbol: Symbol) -> StateId {
        let id = self.nodes.len() as StateId;
        self.nodes.push(TrieNode {
            symbol: Some(symbol),
            ..TrieNode::default()
        });
        self.nodes[parent as usize].children.insert(symbol, id);
        id
    }

    /// Walk `word` and report how far it got.
    pub fn lookup(&self, word: &[Symbol]) -> Lookup {
        walk(&self.nodes, word)
    }

    /// Whether `word` was inserted.
    pub fn is_word(&self, word: &[Symbol]) -> bool {
        self.lookup(word).is_word()
    }

    /// Number of states, root included.
    pub fn num_states(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.term_count
    }

    /// Whether no word was inserted.
    pub fn is_empty(&self) -> bool {
        self.term_count == 0
    }

    /// State `id`, if it exists.
    pub fn node(&self, id: StateId) -> Option<&TrieNode> {
        self.nodes.get(id as usize)
    }

    /// All states, indexed by id.
    pub fn nodes(&self) -> &[TrieNode] {
        &self.nodes
    }

    /// States in pre-order (parents first, children by symbol).
    pub fn visit_pre(&self) -> Vec<StateId> {
        pre_order(&self.nodes)
    }

    /// States in post-order (children first, children by symbol).
    pub fn visit_post(&self) -> Vec<StateId> {
        post_order(&self.nodes)
    }
}

impl Default for ExplicitTrie {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn pre_order(nodes: &[TrieNode]) -> Vec<StateId> {
    traversal::pre_order(nodes.len(), ROOT, move |s| {
        nodes[s as usize].children.values().copied()
    })
}

pub(crate) fn post_order(nodes: &[TrieNode]) -> Vec<StateId> {
    traversal::post_order(nodes.len(), ROOT, move |s| {
        nodes[s as usize].children.values().copied()
    })
}

pub(crate) fn walk(nodes: &[TrieNode], word: &[Symbol]) -> Lookup {
    let mut state = ROOT;
    for symbol in word {
        match nodes[state as usize].children.get(symbol) {
            Some(&next) => state = next,
            None => return Lookup::NoLink,
        }
    }
    if nodes[state as usize].is_final {
        Lookup::Word
    } else {
        Lookup::NotTerminal
    }
}

/// Node handle over an arena of [`TrieNode`]s.
#[derive(Clone, Copy, Debug)]
pub struct TrieNodeRef<'a> {
    nodes: &'a [TrieNode],
    state: StateId,
}

impl<'a> TrieNodeRef<'a> {
    pub(crate) fn root(nodes: &'a [TrieNode]) -> Self {
        Self { nodes, state: ROOT }
    }

    /// State id.
    pub fn state(&self) -> StateId {
        self.state
    }
}

impl DictionaryNode for TrieNodeRef<'_> {
    fn is_final(&self) -> bool {
        self.nodes[self.state as usize].is_final
    }

    fn transition(&self, symbol: Symbol) -> Option<Self> {
        self.nodes[self.state as usize]
            .child(symbol)
            .map(|state| Self {
                nodes: self.nodes,
                state,
            })
    }

    fn edges(&self) -> Box<dyn Iterator<Item = (Symbol, Self)> + '_> {
        let nodes = self.nodes;
        Box::new(
            nodes[self.state as usize]
                .children()
                .map(move |(symbol, state)| (symbol, Self { nodes, state })),
        )
    }

    fn edge_count(&self) -> usize {
        self.nodes[self.state as usize].child_count()
    }
}

impl Dictionary for ExplicitTrie {
    type Node<'a> = TrieNodeRef<'a>;

    fn root(&self) -> Self::Node<'_> {
        TrieNodeRef::root(&self.nodes)
    }

    fn len(&self) -> Option<usize> {
        Some(self.term_count)
    }

    fn lookup(&self, word: &[Symbol]) -> Lookup {
        walk(&self.nodes, word)
    }
}
