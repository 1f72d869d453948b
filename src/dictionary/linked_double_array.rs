//! Double array with a separate `next` table, used to store reduced automata.
//!
//! After reduction a state may have several parents, so it can no longer
//! live at "the" slot its parent points to. This layout separates the two
//! index spaces:
//!
//! - **BASE[s]**: indexed by state id; packed terminal flag and base offset.
//! - **CHECK[t]**: indexed by slot; the state that owns slot `t`.
//! - **NEXT[t]**: indexed by slot; the state the transition leads to.
//!
//! ```text
//! t = BASE[s] + c
//! if CHECK[t] == s:
//!     s = NEXT[t]
//! ```
//!
//! Every state's children are known when the array is built, so each state
//! is placed exactly once and nothing ever relocates.

use super::alphabet::{Symbol, ALPHABET_SIZE};
use super::double_array::{
    first_start, grown_len, reserve_slots, retry_start, scan_for_base, BaseWord, Children,
    DoubleArrayConfig, DoubleArrayError, MAX_SLOTS, MISSING_BASE, UNSET_BASE, UNSET_CHECK,
};
use super::explicit_trie::pre_order;
use super::reduce::MinimalAutomaton;
use super::traversal;
use super::{Dictionary, DictionaryNode, Lookup, SnapshotError, StateId, ROOT};
use smallvec::SmallVec;
use std::fmt;

/// Read-only double array over a minimal automaton.
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "LinkedSnapshot", into = "LinkedSnapshot")
)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkedDoubleArray {
    base: Vec<BaseWord>,
    check: Vec<i32>,
    next: Vec<StateId>,
    word_count: usize,
}

/// Slot arrays under construction.
struct SlotBuilder {
    check: Vec<i32>,
    next: Vec<StateId>,
    first_free: usize,
    config: DoubleArrayConfig,
}

impl SlotBuilder {
    fn new(config: DoubleArrayConfig) -> Result<Self, DoubleArrayError> {
        let mut builder = Self {
            check: vec![UNSET_CHECK],
            next: vec![ROOT],
            first_free: 1,
            config: config.with_growth_chunk(config.growth_chunk),
        };
        builder.extend(config.initial_capacity.saturating_sub(1))?;
        Ok(builder)
    }

    fn extend(&mut self, additional: usize) -> Result<(), DoubleArrayError> {
        let new_len = grown_len(self.check.len(), additional)?;
        reserve_slots(&mut self.check, additional)?;
        reserve_slots(&mut self.next, additional)?;
        self.check.resize(new_len, UNSET_CHECK);
        self.next.resize(new_len, ROOT);
        Ok(())
    }

    fn find_base(&mut self, symbols: &[Symbol]) -> Result<u32, DoubleArrayError> {
        let mut start = first_start(self.first_free, symbols);
        loop {
            if let Some(b) = scan_for_base(&self.check, start, symbols) {
                return Ok(b);
            }
            start = retry_start(start, self.check.len(), self.config.lookback, symbols);
            self.extend(self.config.growth_chunk)?;
        }
    }

    fn claim(&mut self, slot: u32, owner: StateId, target: StateId) {
        self.check[slot as usize] = owner as i32;
        self.next[slot as usize] = target;
        while self.first_free < self.check.len() && self.check[self.first_free] != UNSET_CHECK {
            self.first_free += 1;
        }
    }

    fn finish(mut self) -> (Vec<i32>, Vec<StateId>) {
        let keep = self
            .check
            .iter()
            .rposition(|&owner| owner != UNSET_CHECK)
            .map_or(1, |last| last + 1);
        self.check.truncate(keep);
        self.next.truncate(keep);
        self.check.shrink_to_fit();
        self.next.shrink_to_fit();
        (self.check, self.next)
    }
}

impl LinkedDoubleArray {
    /// Place every state of `automaton`, visiting states in pre-order.
    pub fn from_automaton(
        automaton: &MinimalAutomaton,
        config: DoubleArrayConfig,
    ) -> Result<Self, DoubleArrayError> {
        let nodes = automaton.nodes();
        let mut base = Vec::new();
        reserve_slots(&mut base, nodes.len())?;
        base.extend(nodes.iter().map(|n| BaseWord::new(UNSET_BASE, n.is_final())));

        let mut slots = SlotBuilder::new(config)?;
        for state in pre_order(nodes) {
            let node = &nodes[state as usize];
            if node.child_count() == 0 {
                continue;
            }
            let symbols: Children = node.children().map(|(symbol, _)| symbol).collect();
            let offset = slots.find_base(&symbols)?;
            base[state as usize] = base[state as usize].with_offset(offset);
            for (symbol, target) in node.children() {
                slots.claim(offset + symbol.code(), state, target);
            }
        }

        let (check, next) = slots.finish();
        Ok(Self {
            base,
            check,
            next,
            word_count: automaton.len(),
        })
    }

    /// Rebuild from raw arrays, validating links, acyclicity and word count.
    pub fn from_parts(
        base: Vec<u32>,
        check: Vec<i32>,
        next: Vec<u32>,
        word_count: u64,
    ) -> Result<Self, SnapshotError> {
        if base.is_empty() {
            return Err(SnapshotError::Empty);
        }
        if next.len() != check.len() {
            return Err(SnapshotError::LengthMismatch {
                field: "next",
                expected: check.len(),
                actual: next.len(),
            });
        }
        let largest = base.len().max(check.len());
        if largest > MAX_SLOTS {
            return Err(SnapshotError::TooLarge {
                slots: largest,
                limit: MAX_SLOTS,
            });
        }

        let base = base
            .into_iter()
            .enumerate()
            .map(|(state, raw)| {
                BaseWord::from_raw(raw).ok_or(SnapshotError::BaseOutOfRange {
                    state,
                    offset: raw & !(1 << 31),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let states = base.len();
        for (slot, (&owner, &target)) in check.iter().zip(&next).enumerate() {
            if owner == UNSET_CHECK {
                continue;
            }
            let reaches = usize::try_from(owner)
                .ok()
                .filter(|&o| o < states)
                .map(|o| {
                    let offset = base[o].offset() as usize;
                    slot > offset && slot <= offset + ALPHABET_SIZE
                })
                .unwrap_or(false);
            if !reaches {
                return Err(SnapshotError::DanglingCheck { slot, owner });
            }
            if target == ROOT || target as usize >= states {
                return Err(SnapshotError::DanglingTarget { slot, target });
            }
        }

        let dict = Self {
            base,
            check,
            next,
            word_count: 0,
        };
        let successors = |s: StateId| dict.targets(s);
        if let Some(state) = traversal::find_cycle(states, ROOT, successors) {
            return Err(SnapshotError::Cyclic { state });
        }
        let actual = traversal::count_words(states, ROOT, |s| dict.is_terminal(s), successors);
        if actual != word_count {
            return Err(SnapshotError::WordCountMismatch {
                expected: word_count,
                actual,
            });
        }

        Ok(Self {
            word_count: actual as usize,
            ..dict
        })
    }

    /// Raw `(base, check, next)` arrays, as accepted by [`Self::from_parts`].
    pub fn to_parts(&self) -> (Vec<u32>, Vec<i32>, Vec<u32>) {
        (
            self.base.iter().map(|w| w.raw()).collect(),
            self.check.clone(),
            self.next.clone(),
        )
    }

    /// Base offset of `s`, or [`MISSING_BASE`] for an unknown state.
    #[inline]
    pub fn base(&self, s: StateId) -> u32 {
        self.base.get(s as usize).map_or(MISSING_BASE, |w| w.offset())
    }

    /// Owner of `slot`, or [`UNSET_CHECK`].
    #[inline]
    pub fn check(&self, slot: u32) -> i32 {
        self.check.get(slot as usize).copied().unwrap_or(UNSET_CHECK)
    }

    /// Terminal flag of `s`.
    #[inline]
    pub fn is_terminal(&self, s: StateId) -> bool {
        self.base.get(s as usize).is_some_and(|w| w.is_terminal())
    }

    /// Follow `s --c-->`.
    #[inline]
    pub fn transition(&self, s: StateId, c: Symbol) -> Option<StateId> {
        let t = self.base(s) + c.code();
        (self.check(t) == s as i32).then(|| self.next[t as usize])
    }

    fn targets(&self, s: StateId) -> SmallVec<[StateId; ALPHABET_SIZE]> {
        Symbol::all().filter_map(|c| self.transition(s, c)).collect()
    }

    /// Walk `word` and report how far it got.
    pub fn lookup(&self, word: &[Symbol]) -> Lookup {
        let mut state = ROOT;
        for &symbol in word {
            match self.transition(state, symbol) {
                Some(next) => state = next,
                None => return Lookup::NoLink,
            }
        }
        if self.is_terminal(state) {
            Lookup::Word
        } else {
            Lookup::NotTerminal
        }
    }

    /// Whether `word` is accepted.
    pub fn is_word(&self, word: &[Symbol]) -> bool {
        self.lookup(word).is_word()
    }

    /// Number of accepted words.
    pub fn len(&self) -> usize {
        self.word_count
    }

    /// Whether no word is accepted.
    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    /// Number of states.
    pub fn num_states(&self) -> usize {
        self.base.len()
    }

    /// Number of transition slots.
    pub fn num_slots(&self) -> usize {
        self.check.len()
    }

    /// Bytes held by the three arrays.
    pub fn memory_bytes(&self) -> usize {
        self.base.len() * std::mem::size_of::<BaseWord>()
            + self.check.len() * (std::mem::size_of::<i32>() + std::mem::size_of::<StateId>())
    }

    /// Diagnostic tables of states and slots.
    pub fn dump(&self) -> LinkedDump<'_> {
        LinkedDump { dict: self }
    }
}

/// Persisted form of a [`LinkedDoubleArray`].
#[cfg(feature = "serialization")]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct LinkedSnapshot {
    /// Number of states (length of `base`)
    pub state_count: u32,
    /// Accepted words
    pub word_count: u64,
    /// Raw packed base words, by state
    pub base: Vec<u32>,
    /// Slot owners
    pub check: Vec<i32>,
    /// Slot targets
    pub next: Vec<u32>,
}

#[cfg(feature = "serialization")]
impl From<LinkedDoubleArray> for LinkedSnapshot {
    fn from(dict: LinkedDoubleArray) -> Self {
        let (base, check, next) = dict.to_parts();
        Self {
            state_count: base.len() as u32,
            word_count: dict.word_count as u64,
            base,
            check,
            next,
        }
    }
}

#[cfg(feature = "serialization")]
impl TryFrom<LinkedSnapshot> for LinkedDoubleArray {
    type Error = SnapshotError;

    fn try_from(snapshot: LinkedSnapshot) -> Result<Self, Self::Error> {
        if snapshot.base.len() != snapshot.state_count as usize {
            return Err(SnapshotError::LengthMismatch {
                field: "base",
                expected: snapshot.state_count as usize,
                actual: snapshot.base.len(),
            });
        }
        LinkedDoubleArray::from_parts(
            snapshot.base,
            snapshot.check,
            snapshot.next,
            snapshot.word_count,
        )
    }
}

/// Node handle into a [`LinkedDoubleArray`].
#[derive(Clone, Copy, Debug)]
pub struct LinkedNode<'a> {
    dict: &'a LinkedDoubleArray,
    state: StateId,
}

impl DictionaryNode for LinkedNode<'_> {
    fn is_final(&self) -> bool {
        self.dict.is_terminal(self.state)
    }

    fn transition(&self, symbol: Symbol) -> Option<Self> {
        self.dict.transition(self.state, symbol).map(|state| Self {
            dict: self.dict,
            state,
        })
    }

    fn edges(&self) -> Box<dyn Iterator<Item = (Symbol, Self)> + '_> {
        Box::new(
            Symbol::all().filter_map(move |symbol| self.transition(symbol).map(|n| (symbol, n))),
        )
    }
}

impl Dictionary for LinkedDoubleArray {
    type Node<'a> = LinkedNode<'a>;

    fn root(&self) -> Self::Node<'_> {
        LinkedNode {
            dict: self,
            state: ROOT,
        }
    }

    fn len(&self) -> Option<usize> {
        Some(self.word_count)
    }

    fn lookup(&self, word: &[Symbol]) -> Lookup {
        LinkedDoubleArray::lookup(self, word)
    }
}

/// Rendering of a [`LinkedDoubleArray`], see [`LinkedDoubleArray::dump`].
pub struct LinkedDump<'a> {
    dict: &'a LinkedDoubleArray,
}

impl fmt::Display for LinkedDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>10} {:>10} TERM", "STATE", "BASE")?;
        for (state, word) in self.dict.base.iter().enumerate() {
            writeln!(
                f,
                "{:>10} {:>10} {}",
                state,
                word.offset(),
                if word.is_terminal() { "T" } else { "." }
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{:>10} {:>10} {:>10}", "SLOT", "CHECK", "NEXT")?;
        for (slot, (&owner, &target)) in self.dict.check.iter().zip(&self.dict.next).enumerate() {
            if owner != UNSET_CHECK {
                writeln!(f, "{:>10} {:>10} {:>10}", slot, owner, target)?;
            }
        }
        Ok(())
    }
}
