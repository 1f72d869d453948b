//! Dense `state × alphabet` transition table for small automata.
//!
//! Each state owns one row of [`ROW_WIDTH`] cells:
//!
//! - column 0 holds the state's own terminal flag in the top bit;
//! - column `c` (1..=26) holds the target of `s --c-->`, or 0 when there is
//!   no such transition, with the top bit set when the target is terminal.
//!
//! State 0 is the root and is never the target of a transition in an acyclic
//! automaton, so 0 is free to mean "no transition".

use super::alphabet::{Symbol, ALPHABET_SIZE};
use super::reduce::MinimalAutomaton;
use super::traversal;
use super::{Dictionary, DictionaryNode, Lookup, SnapshotError, StateId, ROOT};
use smallvec::SmallVec;
use std::fmt;

/// Cells per state.
pub const ROW_WIDTH: usize = ALPHABET_SIZE + 1;

/// Top bit of a cell: terminal marker.
pub const TERMINAL_FLAG: u32 = 1 << 31;

const TARGET_MASK: u32 = !TERMINAL_FLAG;

/// Largest automaton [`FlatTable::from_automaton`] accepts.
pub const DEFAULT_MAX_STATES: usize = 1 << 16;

/// Failures building a [`FlatTable`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlatTableError {
    /// The table would be too large.
    #[error("automaton has {states} states, flat table limit is {limit}")]
    TooManyStates {
        /// States in the automaton
        states: usize,
        /// Configured limit
        limit: usize,
    },
    /// The allocator refused the table.
    #[error("failed to allocate {cells} table cells")]
    AllocationFailed {
        /// Cells requested
        cells: usize,
    },
}

/// Dense transition table.
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "FlatSnapshot", into = "FlatSnapshot")
)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatTable {
    cells: Vec<u32>,
    word_count: usize,
}

impl FlatTable {
    /// Lay out `automaton` with the [`DEFAULT_MAX_STATES`] limit.
    pub fn from_automaton(automaton: &MinimalAutomaton) -> Result<Self, FlatTableError> {
        Self::with_limit(automaton, DEFAULT_MAX_STATES)
    }

    /// Lay out `automaton`, refusing automata with more than `limit` states.
    pub fn with_limit(automaton: &MinimalAutomaton, limit: usize) -> Result<Self, FlatTableError> {
        let nodes = automaton.nodes();
        let limit = limit.min(TARGET_MASK as usize);
        if nodes.len() > limit {
            return Err(FlatTableError::TooManyStates {
                states: nodes.len(),
                limit,
            });
        }

        let len = nodes.len() * ROW_WIDTH;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| FlatTableError::AllocationFailed { cells: len })?;
        cells.resize(len, 0);

        let flag = |terminal: bool| if terminal { TERMINAL_FLAG } else { 0 };
        for (state, node) in nodes.iter().enumerate() {
            let row = state * ROW_WIDTH;
            cells[row] = flag(node.is_final());
            for (symbol, target) in node.children() {
                cells[row + symbol.code() as usize] =
                    target | flag(nodes[target as usize].is_final());
            }
        }

        Ok(Self {
            cells,
            word_count: automaton.len(),
        })
    }

    /// Rebuild from raw cells, validating targets, flags, acyclicity and word count.
    pub fn from_parts(cells: Vec<u32>, word_count: u64) -> Result<Self, SnapshotError> {
        if cells.is_empty() {
            return Err(SnapshotError::Empty);
        }
        if cells.len() % ROW_WIDTH != 0 {
            return Err(SnapshotError::LengthMismatch {
                field: "cells",
                expected: cells.len().next_multiple_of(ROW_WIDTH),
                actual: cells.len(),
            });
        }
        let states = cells.len() / ROW_WIDTH;
        let terminal = |state: usize| cells[state * ROW_WIDTH] & TERMINAL_FLAG != 0;

        for (state, row) in cells.chunks_exact(ROW_WIDTH).enumerate() {
            if row[0] & TARGET_MASK != 0 {
                return Err(SnapshotError::TerminalMismatch {
                    state: state as StateId,
                });
            }
            for (column, &cell) in row.iter().enumerate().skip(1) {
                let target = cell & TARGET_MASK;
                if target == 0 {
                    if cell != 0 {
                        return Err(SnapshotError::TerminalMismatch {
                            state: state as StateId,
                        });
                    }
                    continue;
                }
                if target as usize >= states {
                    return Err(SnapshotError::DanglingTarget {
                        slot: state * ROW_WIDTH + column,
                        target,
                    });
                }
                if (cell & TERMINAL_FLAG != 0) != terminal(target as usize) {
                    return Err(SnapshotError::TerminalMismatch { state: target });
                }
            }
        }

        let table = Self {
            cells,
            word_count: 0,
        };
        let successors = |s: StateId| table.targets(s);
        if let Some(state) = traversal::find_cycle(states, ROOT, successors) {
            return Err(SnapshotError::Cyclic { state });
        }
        let actual = traversal::count_words(states, ROOT, |s| table.is_terminal(s), successors);
        if actual != word_count {
            return Err(SnapshotError::WordCountMismatch {
                expected: word_count,
                actual,
            });
        }

        Ok(Self {
            word_count: actual as usize,
            ..table
        })
    }

    /// Raw cells, as accepted by [`Self::from_parts`].
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Follow `s --c-->`.
    #[inline]
    pub fn transition(&self, s: StateId, c: Symbol) -> Option<StateId> {
        let cell = *self.cells.get(s as usize * ROW_WIDTH + c.code() as usize)?;
        match cell & TARGET_MASK {
            0 => None,
            target => Some(target),
        }
    }

    /// Terminal flag of `s`.
    #[inline]
    pub fn is_terminal(&self, s: StateId) -> bool {
        self.cells
            .get(s as usize * ROW_WIDTH)
            .is_some_and(|&cell| cell & TERMINAL_FLAG != 0)
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

    /// Number of states (rows).
    pub fn num_states(&self) -> usize {
        self.cells.len() / ROW_WIDTH
    }

    /// Bytes held by the table.
    pub fn memory_bytes(&self) -> usize {
        self.cells.len() * std::mem::size_of::<u32>()
    }

    /// One line per state listing its transitions.
    pub fn dump(&self) -> FlatDump<'_> {
        FlatDump { table: self }
    }
}

/// Persisted form of a [`FlatTable`].
#[cfg(feature = "serialization")]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct FlatSnapshot {
    /// Number of rows
    pub state_count: u32,
    /// Accepted words
    pub word_count: u64,
    /// Row-major cells
    pub cells: Vec<u32>,
}

#[cfg(feature = "serialization")]
impl From<FlatTable> for FlatSnapshot {
    fn from(table: FlatTable) -> Self {
        Self {
            state_count: table.num_states() as u32,
            word_count: table.word_count as u64,
            cells: table.cells,
        }
    }
}

#[cfg(feature = "serialization")]
impl TryFrom<FlatSnapshot> for FlatTable {
    type Error = SnapshotError;

    fn try_from(snapshot: FlatSnapshot) -> Result<Self, Self::Error> {
        let expected = snapshot.state_count as usize * ROW_WIDTH;
        if snapshot.cells.len() != expected {
            return Err(SnapshotError::LengthMismatch {
                field: "cells",
                expected,
                actual: snapshot.cells.len(),
            });
        }
        FlatTable::from_parts(snapshot.cells, snapshot.word_count)
    }
}

/// Node handle into a [`FlatTable`].
#[derive(Clone, Copy, Debug)]
pub struct FlatNode<'a> {
    table: &'a FlatTable,
    state: StateId,
}

impl DictionaryNode for FlatNode<'_> {
    fn is_final(&self) -> bool {
        self.table.is_terminal(self.state)
    }

    fn transition(&self, symbol: Symbol) -> Option<Self> {
        self.table.transition(self.state, symbol).map(|state| Self {
            table: self.table,
            state,
        })
    }

    fn edges(&self) -> Box<dyn Iterator<Item = (Symbol, Self)> + '_> {
        Box::new(
            Symbol::all().filter_map(move |symbol| self.transition(symbol).map(|n| (symbol, n))),
        )
    }
}

impl Dictionary for FlatTable {
    type Node<'a> = FlatNode<'a>;

    fn root(&self) -> Self::Node<'_> {
        FlatNode {
            table: self,
            state: ROOT,
        }
    }

    fn len(&self) -> Option<usize> {
        Some(self.word_count)
    }

    fn lookup(&self, word: &[Symbol]) -> Lookup {
        FlatTable::lookup(self, word)
    }
}

/// Rendering of a [`FlatTable`], see [`FlatTable::dump`].
pub struct FlatDump<'a> {
    table: &'a FlatTable,
}

impl fmt::Display for FlatDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for state in 0..self.table.num_states() as StateId {
            write!(
                f,
                "{:>8} {}",
                state,
                if self.table.is_terminal(state) { "T" } else { "." }
            )?;
            for symbol in Symbol::all() {
                if let Some(target) = self.table.transition(state, symbol) {
                    write!(f, " {}->{}", symbol, target)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
