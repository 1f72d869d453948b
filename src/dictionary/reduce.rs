//! Reduction of an [`ExplicitTrie`] to a minimal acyclic automaton.
//!
//! States are visited in post-order, so every child has already been replaced
//! by its representative when its parent is examined. Two states are
//! equivalent when they agree on the terminal flag and on their
//! `(symbol, target)` child pairs; equivalent states collapse into the first
//! one registered, which shares common suffixes across words.
//!
//! The register is keyed by that structural signature, the same suffix-cache
//! technique used for DAWG construction, so each state costs one hash lookup
//! instead of a scan over all canonical states.

use super::alphabet::Symbol;
use super::double_array::{DoubleArrayConfig, DoubleArrayError};
use super::explicit_trie::{post_order, walk, ExplicitTrie, TrieNode, TrieNodeRef};
use super::flat_table::{FlatTable, FlatTableError};
use super::linked_double_array::LinkedDoubleArray;
use super::{Dictionary, DictionaryError, Lookup, StateId, ROOT};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::collections::hash_map::Entry;

/// Structural identity of a state once its children are canonical.
#[derive(PartialEq, Eq, Hash)]
struct Signature {
    is_final: bool,
    edges: SmallVec<[(Symbol, StateId); 4]>,
}

impl Signature {
    fn of(node: &TrieNode) -> Self {
        Self {
            is_final: node.is_final,
            edges: node.children().collect(),
        }
    }
}

impl ExplicitTrie {
    /// Merge equivalent subtrees and renumber the survivors densely.
    ///
    /// The root keeps id 0 and is never merged. The language is unchanged.
    pub fn reduce(self) -> MinimalAutomaton {
        let ExplicitTrie {
            mut nodes,
            term_count,
        } = self;
        let states_before = nodes.len();

        let mut representative: Vec<StateId> = (0..states_before as StateId).collect();
        let mut register: FxHashMap<Signature, StateId> = FxHashMap::default();

        for state in post_order(&nodes) {
            let node = &mut nodes[state as usize];
            for target in node.children.values_mut() {
                *target = representative[*target as usize];
            }
            if state == ROOT {
                continue;
            }
            match register.entry(Signature::of(node)) {
                Entry::Occupied(canonical) => representative[state as usize] = *canonical.get(),
                Entry::Vacant(slot) => {
                    slot.insert(state);
                }
            }
        }

        let mut renumbered = vec![StateId::MAX; states_before];
        let mut survivors = Vec::with_capacity(register.len() + 1);
        for (old, node) in nodes.into_iter().enumerate() {
            if representative[old] as usize == old {
                renumbered[old] = survivors.len() as StateId;
                survivors.push(node);
            }
        }
        for node in &mut survivors {
            for target in node.children.values_mut() {
                *target = renumbered[*target as usize];
                debug_assert_ne!(*target, StateId::MAX, "link to a merged state survived");
            }
        }

        MinimalAutomaton {
            nodes: survivors,
            term_count,
            states_before,
        }
    }
}

/// Counts describing one reduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReduceStats {
    /// States in the explicit trie
    pub states_before: usize,
    /// States after merging
    pub states_after: usize,
    /// Edges after merging
    pub edges: usize,
}

impl ReduceStats {
    /// States removed by merging.
    pub fn merged(&self) -> usize {
        self.states_before - self.states_after
    }
}

/// A minimal acyclic automaton (DAWG) produced by [`ExplicitTrie::reduce`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinimalAutomaton {
    nodes: Vec<TrieNode>,
    term_count: usize,
    states_before: usize,
}

impl MinimalAutomaton {
    /// Build the explicit trie for `terms` and reduce it.
    pub fn from_terms<I, S>(terms: I) -> Result<Self, DictionaryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(ExplicitTrie::from_terms(terms)?.reduce())
    }

    /// Walk `word` and report how far it got.
    pub fn lookup(&self, word: &[Symbol]) -> Lookup {
        walk(&self.nodes, word)
    }

    /// Whether `word` is accepted.
    pub fn is_word(&self, word: &[Symbol]) -> bool {
        self.lookup(word).is_word()
    }

    /// Number of states, root included.
    pub fn num_states(&self) -> usize {
        self.nodes.len()
    }

    /// Number of accepted words.
    pub fn len(&self) -> usize {
        self.term_count
    }

    /// Whether no word is accepted.
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

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(TrieNode::child_count).sum()
    }

    /// Counts before and after reduction.
    pub fn stats(&self) -> ReduceStats {
        ReduceStats {
            states_before: self.states_before,
            states_after: self.num_states(),
            edges: self.edge_count(),
        }
    }

    /// Linearize into a double array with a separate `next` table.
    pub fn to_linked_double_array(
        &self,
        config: DoubleArrayConfig,
    ) -> Result<LinkedDoubleArray, DoubleArrayError> {
        LinkedDoubleArray::from_automaton(self, config)
    }

    /// Linearize into a dense `state × alphabet` table.
    pub fn to_flat_table(&self) -> Result<FlatTable, FlatTableError> {
        FlatTable::from_automaton(self)
    }
}

impl Dictionary for MinimalAutomaton {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::alphabet::encode;

    fn lookup(automaton: &MinimalAutomaton, word: &str) -> Lookup {
        automaton.lookup(&encode(word).unwrap())
    }

    #[test]
    fn test_shared_suffixes_collapse() {
        let trie = ExplicitTrie::from_terms(["tap", "taps", "top", "tops"]).unwrap();
        assert_eq!(trie.num_states(), 8);

        let automaton = trie.reduce();
        // root, T, {A,O}, {P,P'}, {S,S'}
        assert_eq!(automaton.num_states(), 5);
        assert_eq!(automaton.stats().merged(), 3);
        for word in ["tap", "taps", "top", "tops"] {
            assert_eq!(lookup(&automaton, word), Lookup::Word);
        }
        assert_eq!(lookup(&automaton, "ta"), Lookup::NotTerminal);
        assert_eq!(lookup(&automaton, "tip"), Lookup::NoLink);
        assert_eq!(lookup(&automaton, "tapss"), Lookup::NoLink);
    }

    #[test]
    fn test_terminal_flag_blocks_merge() {
        // "ab" ends at a final B, "cb" at a final B with a child: they differ.
        let automaton = MinimalAutomaton::from_terms(["ab", "cb", "cbd"]).unwrap();
        assert_eq!(lookup(&automaton, "ab"), Lookup::Word);
        assert_eq!(lookup(&automaton, "abd"), Lookup::NoLink);
        assert_eq!(lookup(&automaton, "cbd"), Lookup::Word);
    }

    #[test]
    fn test_root_is_kept_and_first() {
        let mut trie = ExplicitTrie::new();
        trie.insert(&[]);
        trie.insert(&encode("a").unwrap());
        let automaton = trie.reduce();
        assert_eq!(automaton.num_states(), 2);
        assert!(automaton.node(ROOT).unwrap().is_final());
        assert_eq!(lookup(&automaton, ""), Lookup::Word);
        assert_eq!(lookup(&automaton, "a"), Lookup::Word);
    }

    #[test]
    fn test_empty_trie_reduces_to_root() {
        let automaton = ExplicitTrie::new().reduce();
        assert_eq!(automaton.num_states(), 1);
        assert!(automaton.is_empty());
        assert_eq!(lookup(&automaton, ""), Lookup::NotTerminal);
    }

    #[test]
    fn test_links_are_dense() {
        let words = ["walk", "walked", "talk", "talked", "balk"];
        let trie = ExplicitTrie::from_terms(words).unwrap();
        let before = trie.num_states();
        let automaton = trie.reduce();

        let n = automaton.num_states() as StateId;
        for node in automaton.nodes() {
            for (_, target) in node.children() {
                assert!(target < n);
                assert_ne!(target, ROOT);
            }
        }
        // W and T share one ALK(ED) chain.
        assert!(automaton.num_states() < before);
        assert_eq!(automaton.stats().states_before, before);
    }

    #[test]
    fn test_reducing_twice_is_stable() {
        let words = ["he", "heat", "heal", "heap", "hem", "ha", "hat", "hate", "happy"];
        let once = MinimalAutomaton::from_terms(words).unwrap();
        let again = ExplicitTrie::from_dictionary(&once).reduce();
        assert_eq!(again.num_states(), once.num_states());
        assert_eq!(again.len(), once.len());
    }
}
