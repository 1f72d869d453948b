//! Double-array store: the `base`/`check` arrays behind [`DoubleArrayTrie`].
//!
//! ## Layout
//!
//! Both arrays are indexed by slot. In this layout a state *is* the slot it
//! occupies, so state ids and slot indices share one index space.
//!
//! - **BASE[s]**: packed word; bit 31 is the terminal flag, the remaining bits
//!   hold the offset added to a symbol code to locate a child slot.
//! - **CHECK[t]**: the state that owns slot `t`, or [`UNSET_CHECK`] when free.
//!
//! ```text
//! t = base(s) + c
//! if CHECK[t] == s:
//!     transition s --c--> t exists
//! ```
//!
//! ## Growth
//!
//! Arrays only grow, in chunks of [`DoubleArrayConfig::growth_chunk`] slots,
//! when a base search finds no candidate inside the current bounds. The only
//! way to shrink them is [`DoubleArrayStore::trim`], which drops trailing free
//! slots.
//!
//! [`DoubleArrayTrie`]: super::double_array_trie::DoubleArrayTrie

use super::alphabet::{Symbol, ALPHABET_SIZE};
use super::{SnapshotError, StateId, ROOT};
use smallvec::SmallVec;
use std::fmt;
use std::ops::Range;

/// Smallest offset from a base to one of its child slots.
pub const MIN_CHILD_OFFSET: u32 = 1;

/// Largest offset from a base to one of its child slots (26 symbols + root sentinel).
pub const MAX_CHILD_OFFSET: u32 = ALPHABET_SIZE as u32 + 1;

/// Exclusive upper bound for a base offset.
pub const MAX_BASE: u32 = (1 << 30) - MAX_CHILD_OFFSET;

/// Returned by [`DoubleArrayStore::base`] for states outside the arrays.
pub const MISSING_BASE: u32 = MAX_BASE;

/// Base of a state that has no children yet.
pub const UNSET_BASE: u32 = 0;

/// Owner recorded in a free slot.
pub const UNSET_CHECK: i32 = -1;

/// Largest number of slots a store may hold.
///
/// A scan only accepts `b` when `b + c` is inside the arrays, so this bound
/// keeps every base found by a scan below [`MAX_BASE`].
pub const MAX_SLOTS: usize = MAX_BASE as usize + MIN_CHILD_OFFSET as usize;

/// Default number of slots appended per growth step.
pub const DEFAULT_GROWTH_CHUNK: usize = 50;

/// Default distance a retried base search steps back from the old array end.
pub const DEFAULT_LOOKBACK: usize = ALPHABET_SIZE;

const TERMINAL_BIT: u32 = 1 << 31;
const OFFSET_MASK: u32 = !TERMINAL_BIT;

const _: () = assert!(MISSING_BASE & TERMINAL_BIT == 0);
const _: () = assert!(UNSET_BASE & TERMINAL_BIT == 0);
const _: () = assert!(MAX_BASE & OFFSET_MASK == MAX_BASE);
// `MISSING_BASE + c` must stay a representable (and always free) slot index.
const _: () = assert!((MISSING_BASE as u64 + MAX_CHILD_OFFSET as u64) < i32::MAX as u64);
const _: () = assert!(MAX_SLOTS <= i32::MAX as usize);

/// Packed `(terminal, base offset)` word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct BaseWord(u32);

impl BaseWord {
    /// No children, not terminal.
    pub const UNSET: BaseWord = BaseWord(UNSET_BASE);

    /// Pack an offset and a terminal flag.
    ///
    /// # Panics
    ///
    /// Panics if `offset >= MAX_BASE`.
    #[inline]
    pub const fn new(offset: u32, terminal: bool) -> Self {
        assert!(offset < MAX_BASE, "base offset out of range");
        BaseWord(offset | if terminal { TERMINAL_BIT } else { 0 })
    }

    /// Rebuild a word from its raw encoding, rejecting out-of-range offsets.
    #[inline]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        if raw & OFFSET_MASK < MAX_BASE {
            Some(BaseWord(raw))
        } else {
            None
        }
    }

    /// Raw encoding as persisted.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Base offset.
    #[inline]
    pub const fn offset(self) -> u32 {
        self.0 & OFFSET_MASK
    }

    /// Terminal flag.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        self.0 & TERMINAL_BIT != 0
    }

    /// Same terminal flag, new offset.
    #[inline]
    pub const fn with_offset(self, offset: u32) -> Self {
        BaseWord::new(offset, self.is_terminal())
    }

    /// Same offset, new terminal flag.
    #[inline]
    pub const fn with_terminal(self, terminal: bool) -> Self {
        BaseWord::new(self.offset(), terminal)
    }
}

impl fmt::Debug for BaseWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseWord")
            .field("offset", &self.offset())
            .field("terminal", &self.is_terminal())
            .finish()
    }
}

/// Tuning for array growth and base search.
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DoubleArrayConfig {
    /// Slots allocated up front (the root slot is always present).
    pub initial_capacity: usize,
    /// Slots appended each time a base search runs out of room.
    pub growth_chunk: usize,
    /// How far behind the old array end a retried search restarts.
    pub lookback: usize,
}

impl DoubleArrayConfig {
    /// Pre-size the arrays.
    pub fn with_initial_capacity(mut self, slots: usize) -> Self {
        self.initial_capacity = slots;
        self
    }

    /// Set the growth step (at least one slot).
    pub fn with_growth_chunk(mut self, slots: usize) -> Self {
        self.growth_chunk = slots.max(1);
        self
    }

    /// Set the retry lookback window.
    pub fn with_lookback(mut self, slots: usize) -> Self {
        self.lookback = slots;
        self
    }
}

impl Default for DoubleArrayConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1,
            growth_chunk: DEFAULT_GROWTH_CHUNK,
            lookback: DEFAULT_LOOKBACK,
        }
    }
}

/// Recoverable failures while growing the arrays.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DoubleArrayError {
    /// The allocator refused to reserve more slots.
    #[error("failed to allocate {additional} more slots")]
    AllocationFailed {
        /// Slots requested by the failed growth step
        additional: usize,
    },
    /// Growing would exceed the representable index space.
    #[error("double array would need {requested} slots, limit is {limit}")]
    CapacityExceeded {
        /// Total slots the growth step asked for
        requested: usize,
        /// [`MAX_SLOTS`]
        limit: usize,
    },
}

/// Child symbols of one state, in ascending order.
pub type Children = SmallVec<[Symbol; ALPHABET_SIZE]>;

/// Scan `check` for the smallest base `b >= start` whose child slots are all free.
///
/// Only bases with every child slot inside `check` are considered.
pub(crate) fn scan_for_base(check: &[i32], start: usize, symbols: &[Symbol]) -> Option<u32> {
    let max_c = symbols.iter().map(|s| s.code() as usize).max()?;
    let mut b = start;
    while b + max_c < check.len() {
        if symbols
            .iter()
            .all(|s| check[b + s.code() as usize] == UNSET_CHECK)
        {
            return Some(b as u32);
        }
        b += 1;
    }
    None
}

/// Where a base search begins: slots below `first_free` are owned, so no
/// smaller base can fit the lowest symbol.
pub(crate) fn first_start(first_free: usize, symbols: &[Symbol]) -> usize {
    let min_c = symbols
        .iter()
        .map(|s| s.code() as usize)
        .min()
        .unwrap_or(MIN_CHILD_OFFSET as usize);
    first_free.saturating_sub(min_c)
}

/// Where a search resumes after the arrays grow from `len` slots.
///
/// The restart trails the old end by `lookback`, but never lies past
/// `len - max_c`, the first base the old bounds could not test.
pub(crate) fn retry_start(start: usize, len: usize, lookback: usize, symbols: &[Symbol]) -> usize {
    let max_c = symbols
        .iter()
        .map(|s| s.code() as usize)
        .max()
        .unwrap_or(MAX_CHILD_OFFSET as usize);
    start.max(len.saturating_sub(lookback.max(max_c)))
}

/// Reserve `additional` slots on `vec` without aborting on allocation failure.
pub(crate) fn reserve_slots<T>(vec: &mut Vec<T>, additional: usize) -> Result<(), DoubleArrayError> {
    vec.try_reserve(additional)
        .map_err(|_| DoubleArrayError::AllocationFailed { additional })
}

/// Check that `len + additional` slots stay within [`MAX_SLOTS`].
pub(crate) fn grown_len(len: usize, additional: usize) -> Result<usize, DoubleArrayError> {
    len.checked_add(additional)
        .filter(|&n| n <= MAX_SLOTS)
        .ok_or(DoubleArrayError::CapacityExceeded {
            requested: len.saturating_add(additional),
            limit: MAX_SLOTS,
        })
}

/// The `base`/`check` arrays with slot search and relocation.
///
/// Accessors never fail: out-of-range reads return sentinels. Mutators require
/// their index to be inside the arrays and panic otherwise.
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "StoreSnapshot", into = "StoreSnapshot")
)]
#[derive(Clone, Debug)]
pub struct DoubleArrayStore {
    base: Vec<BaseWord>,
    check: Vec<i32>,
    /// Every slot in `1..first_free` is owned.
    first_free: usize,
    config: DoubleArrayConfig,
}

impl DoubleArrayStore {
    /// A store holding only the root.
    pub fn new() -> Self {
        Self {
            base: vec![BaseWord::UNSET],
            check: vec![UNSET_CHECK],
            first_free: 1,
            config: DoubleArrayConfig::default(),
        }
    }

    /// A store pre-sized according to `config`.
    pub fn with_config(config: DoubleArrayConfig) -> Result<Self, DoubleArrayError> {
        let mut store = Self::new();
        // deserialized configs may carry a zero chunk
        store.config = config.with_growth_chunk(config.growth_chunk);
        store.ensure_len(config.initial_capacity)?;
        Ok(store)
    }

    /// Rebuild a store from raw arrays, validating every ownership link.
    pub fn from_parts(base: Vec<u32>, check: Vec<i32>) -> Result<Self, SnapshotError> {
        if base.is_empty() {
            return Err(SnapshotError::Empty);
        }
        if check.len() != base.len() {
            return Err(SnapshotError::LengthMismatch {
                field: "check",
                expected: base.len(),
                actual: check.len(),
            });
        }
        if base.len() > MAX_SLOTS {
            return Err(SnapshotError::TooLarge {
                slots: base.len(),
                limit: MAX_SLOTS,
            });
        }

        let base = base
            .into_iter()
            .enumerate()
            .map(|(state, raw)| {
                BaseWord::from_raw(raw).ok_or(SnapshotError::BaseOutOfRange {
                    state,
                    offset: raw & OFFSET_MASK,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if check[ROOT as usize] != UNSET_CHECK {
            return Err(SnapshotError::OwnedRoot);
        }
        for (slot, &owner) in check.iter().enumerate().skip(1) {
            if owner == UNSET_CHECK {
                if base[slot] != BaseWord::UNSET {
                    return Err(SnapshotError::OrphanSlot { slot });
                }
                continue;
            }
            let in_range = usize::try_from(owner)
                .ok()
                .filter(|&o| o < base.len() && o != slot)
                .map(|o| {
                    let offset = base[o].offset() as usize;
                    slot > offset && slot <= offset + ALPHABET_SIZE
                })
                .unwrap_or(false);
            if !in_range {
                return Err(SnapshotError::DanglingCheck { slot, owner });
            }
        }

        // Every owned slot must hang off the root; each slot has one owner,
        // so this walk is a tree walk.
        let mut reached = vec![false; base.len()];
        reached[ROOT as usize] = true;
        let mut stack = vec![ROOT as usize];
        while let Some(state) = stack.pop() {
            let offset = base[state].offset() as usize;
            for c in Symbol::all() {
                let slot = offset + c.code() as usize;
                if slot < check.len() && check[slot] == state as i32 {
                    reached[slot] = true;
                    stack.push(slot);
                }
            }
        }
        if let Some(slot) = check
            .iter()
            .zip(&reached)
            .position(|(&owner, &seen)| owner != UNSET_CHECK && !seen)
        {
            return Err(SnapshotError::Unreachable { slot });
        }

        let mut store = Self {
            base,
            check,
            first_free: 1,
            config: DoubleArrayConfig::default(),
        };
        store.advance_first_free();
        Ok(store)
    }

    /// Raw `(base, check)` arrays, as accepted by [`Self::from_parts`].
    pub fn to_parts(&self) -> (Vec<u32>, Vec<i32>) {
        (
            self.base.iter().map(|w| w.raw()).collect(),
            self.check.clone(),
        )
    }

    /// Growth settings in effect.
    pub fn config(&self) -> DoubleArrayConfig {
        self.config
    }

    /// Replace the growth settings (array contents are untouched).
    pub fn set_config(&mut self, config: DoubleArrayConfig) {
        self.config = config.with_growth_chunk(config.growth_chunk);
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.check.len()
    }

    /// Always `false`: the root slot is never removed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.check.is_empty()
    }

    /// Base offset of `s`, or [`MISSING_BASE`] if `s` is outside the arrays.
    #[inline]
    pub fn base(&self, s: StateId) -> u32 {
        self.base
            .get(s as usize)
            .map_or(MISSING_BASE, |w| w.offset())
    }

    /// Packed word of `s` ([`BaseWord::UNSET`] outside the arrays).
    #[inline]
    pub fn base_word(&self, s: StateId) -> BaseWord {
        self.base.get(s as usize).copied().unwrap_or(BaseWord::UNSET)
    }

    /// Owner of `slot`, or [`UNSET_CHECK`] if free or outside the arrays.
    #[inline]
    pub fn check(&self, slot: u32) -> i32 {
        self.check.get(slot as usize).copied().unwrap_or(UNSET_CHECK)
    }

    /// Terminal flag of `s` (`false` outside the arrays).
    #[inline]
    pub fn is_terminal(&self, s: StateId) -> bool {
        self.base_word(s).is_terminal()
    }

    /// Whether `slot` could be claimed, growing the arrays if needed.
    ///
    /// The root slot is never free.
    #[inline]
    pub fn is_free(&self, slot: u32) -> bool {
        slot != ROOT
            && match self.check.get(slot as usize) {
                Some(&owner) => owner == UNSET_CHECK,
                None => (slot as usize) < MAX_SLOTS,
            }
    }

    /// Follow `s --c-->`, if the transition exists.
    #[inline]
    pub fn transition(&self, s: StateId, c: Symbol) -> Option<StateId> {
        // MISSING_BASE + c is always past the arrays, so an absent state has no children.
        let t = self.base(s) + c.code();
        (self.check(t) == s as i32).then_some(t)
    }

    /// Set the base offset of `s`, keeping its terminal flag.
    ///
    /// # Panics
    ///
    /// Panics if `s` is outside the arrays or `offset >= MAX_BASE`.
    pub fn set_base(&mut self, s: StateId, offset: u32) {
        let word = &mut self.base[s as usize];
        *word = word.with_offset(offset);
    }

    /// Record `owner` as the owner of `slot`.
    ///
    /// # Panics
    ///
    /// Panics if either index is outside the arrays or `slot` is the root.
    pub fn set_check(&mut self, slot: u32, owner: StateId) {
        assert!(slot != ROOT, "the root slot cannot be owned");
        assert!((owner as usize) < self.len(), "owner {owner} out of bounds");
        self.check[slot as usize] = owner as i32;
        if slot as usize == self.first_free {
            self.advance_first_free();
        }
    }

    /// Set the terminal flag of `s`.
    ///
    /// # Panics
    ///
    /// Panics if `s` is outside the arrays.
    pub fn set_terminal(&mut self, s: StateId, terminal: bool) {
        let word = &mut self.base[s as usize];
        *word = word.with_terminal(terminal);
    }

    /// Reset the base offset of `s` to [`UNSET_BASE`].
    pub fn clear_base(&mut self, s: StateId) {
        self.set_base(s, UNSET_BASE);
    }

    /// Free `slot`.
    pub fn clear_check(&mut self, slot: u32) {
        self.check[slot as usize] = UNSET_CHECK;
        self.first_free = self.first_free.min(slot as usize).max(1);
    }

    /// Clear the terminal flag of `s`.
    pub fn clear_terminal(&mut self, s: StateId) {
        self.set_terminal(s, false);
    }

    /// Append `additional` free slots.
    pub fn extend(&mut self, additional: usize) -> Result<(), DoubleArrayError> {
        let new_len = grown_len(self.len(), additional)?;
        reserve_slots(&mut self.base, additional)?;
        reserve_slots(&mut self.check, additional)?;
        self.base.resize(new_len, BaseWord::UNSET);
        self.check.resize(new_len, UNSET_CHECK);
        Ok(())
    }

    /// Grow to at least `len` slots.
    pub fn ensure_len(&mut self, len: usize) -> Result<(), DoubleArrayError> {
        match len.checked_sub(self.len()) {
            Some(additional) if additional > 0 => self.extend(additional),
            _ => Ok(()),
        }
    }

    /// Drop trailing free slots. The root slot always survives.
    pub fn trim(&mut self) {
        let keep = self
            .check
            .iter()
            .rposition(|&owner| owner != UNSET_CHECK)
            .map_or(1, |last| last + 1);
        self.base.truncate(keep);
        self.check.truncate(keep);
        self.base.shrink_to_fit();
        self.check.shrink_to_fit();
        self.first_free = self.first_free.min(keep);
    }

    /// Symbols `c` for which `s --c-->` exists.
    pub fn children(&self, s: StateId) -> Children {
        Symbol::all()
            .filter(|&c| self.transition(s, c).is_some())
            .collect()
    }

    /// Find the smallest base whose slots for `symbols` are all free,
    /// growing the arrays until one exists.
    ///
    /// # Panics
    ///
    /// Panics if `symbols` is empty.
    pub fn find_base(&mut self, symbols: &[Symbol]) -> Result<u32, DoubleArrayError> {
        assert!(!symbols.is_empty(), "find_base needs at least one symbol");
        let mut start = first_start(self.first_free, symbols);
        loop {
            if let Some(b) = scan_for_base(&self.check, start, symbols) {
                return Ok(b);
            }
            start = retry_start(start, self.len(), self.config.lookback, symbols);
            self.extend(self.config.growth_chunk)?;
        }
    }

    /// Move the children of `s` so that its base becomes `new_base`.
    ///
    /// Each child keeps its base and terminal flag, and every grandchild is
    /// re-pointed at the child's new slot before the old slot is released.
    /// `children` must be a snapshot of `self.children(s)` and every slot
    /// `new_base + c` must be free and inside the arrays.
    pub fn relocate(&mut self, s: StateId, new_base: u32, children: &[Symbol]) {
        let old_base = self.base(s);
        for &c in children {
            let old = old_base + c.code();
            let new = new_base + c.code();
            debug_assert_eq!(self.check(old), s as i32);
            debug_assert!(self.check(new) == UNSET_CHECK && (new as usize) < self.len());

            self.set_check(new, s);
            self.base[new as usize] = self.base[old as usize];

            let child_base = self.base(old);
            for d in Symbol::all() {
                let grandchild = child_base + d.code();
                if self.check(grandchild) == old as i32 {
                    self.set_check(grandchild, new);
                }
            }

            self.clear_base(old);
            self.clear_terminal(old);
            self.clear_check(old);
        }
        self.set_base(s, new_base);
    }

    /// Number of owned slots (every state except the root).
    pub fn used_slots(&self) -> usize {
        self.check.iter().filter(|&&owner| owner != UNSET_CHECK).count()
    }

    /// Number of terminal states.
    pub fn terminal_count(&self) -> usize {
        self.base.iter().filter(|w| w.is_terminal()).count()
    }

    /// Occupancy summary.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            slots: self.len(),
            used_slots: self.used_slots(),
            terminal_states: self.terminal_count(),
            bytes: self.len() * (std::mem::size_of::<BaseWord>() + std::mem::size_of::<i32>()),
        }
    }

    /// Diagnostic table of every slot.
    pub fn dump(&self) -> StoreDump<'_> {
        self.dump_range(0..self.len())
    }

    /// Diagnostic table restricted to `range` (clamped to the arrays).
    pub fn dump_range(&self, range: Range<usize>) -> StoreDump<'_> {
        let end = range.end.min(self.len());
        StoreDump {
            store: self,
            range: range.start.min(end)..end,
        }
    }

    fn advance_first_free(&mut self) {
        while self.first_free < self.check.len() && self.check[self.first_free] != UNSET_CHECK {
            self.first_free += 1;
        }
    }
}

impl Default for DoubleArrayStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for DoubleArrayStore {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base && self.check == other.check
    }
}

impl Eq for DoubleArrayStore {}

/// Persisted form of a [`DoubleArrayStore`].
#[cfg(feature = "serialization")]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct StoreSnapshot {
    /// Number of slots (and therefore of addressable states)
    pub state_count: u32,
    /// Raw packed base words
    pub base: Vec<u32>,
    /// Slot owners
    pub check: Vec<i32>,
}

#[cfg(feature = "serialization")]
impl From<DoubleArrayStore> for StoreSnapshot {
    fn from(store: DoubleArrayStore) -> Self {
        let (base, check) = store.to_parts();
        Self {
            state_count: base.len() as u32,
            base,
            check,
        }
    }
}

#[cfg(feature = "serialization")]
impl TryFrom<StoreSnapshot> for DoubleArrayStore {
    type Error = SnapshotError;

    fn try_from(snapshot: StoreSnapshot) -> Result<Self, Self::Error> {
        if snapshot.base.len() != snapshot.state_count as usize {
            return Err(SnapshotError::LengthMismatch {
                field: "base",
                expected: snapshot.state_count as usize,
                actual: snapshot.base.len(),
            });
        }
        DoubleArrayStore::from_parts(snapshot.base, snapshot.check)
    }
}

/// Occupancy summary of a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreStats {
    /// Slots allocated
    pub slots: usize,
    /// Slots owned by some state
    pub used_slots: usize,
    /// States flagged terminal
    pub terminal_states: usize,
    /// Bytes held by the two arrays
    pub bytes: usize,
}

impl StoreStats {
    /// Fraction of slots in use, root included.
    pub fn fill_ratio(&self) -> f64 {
        if self.slots == 0 {
            0.0
        } else {
            (self.used_slots + 1) as f64 / self.slots as f64
        }
    }
}

impl fmt::Display for StoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "slots:     {}", self.slots)?;
        writeln!(
            f,
            "states:    {} ({:.1}% fill)",
            self.used_slots + 1,
            self.fill_ratio() * 100.0
        )?;
        writeln!(f, "terminals: {}", self.terminal_states)?;
        write!(f, "bytes:     {}", self.bytes)
    }
}

/// Row-per-slot rendering of a store, see [`DoubleArrayStore::dump`].
pub struct StoreDump<'a> {
    store: &'a DoubleArrayStore,
    range: Range<usize>,
}

impl fmt::Display for StoreDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>10} {:>10} {:>10} TERM", "INDEX", "BASE", "CHECK")?;
        for slot in self.range.clone() {
            let word = self.store.base[slot];
            let owner = self.store.check[slot];
            let check = if owner == UNSET_CHECK {
                "-".to_string()
            } else {
                owner.to_string()
            };
            writeln!(
                f,
                "{:>10} {:>10} {:>10} {}",
                slot,
                word.offset(),
                check,
                if word.is_terminal() { "T" } else { "." }
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(ch: char) -> Symbol {
        Symbol::from_char(ch).unwrap()
    }

    fn sized(slots: usize) -> DoubleArrayStore {
        DoubleArrayStore::with_config(DoubleArrayConfig::default().with_initial_capacity(slots))
            .unwrap()
    }

    #[test]
    fn test_base_word_packing() {
        let word = BaseWord::new(1234, true);
        assert_eq!(word.offset(), 1234);
        assert!(word.is_terminal());
        assert_eq!(word.with_terminal(false).offset(), 1234);
        assert!(word.with_offset(7).is_terminal());
        assert_eq!(BaseWord::from_raw(word.raw()), Some(word));
        assert_eq!(BaseWord::from_raw(MAX_BASE), None);
    }

    #[test]
    #[should_panic]
    fn test_base_word_rejects_large_offset() {
        let _ = BaseWord::new(MAX_BASE, false);
    }

    #[test]
    fn test_out_of_range_reads_return_sentinels() {
        let store = DoubleArrayStore::new();
        assert_eq!(store.len(), 1);
        assert_eq!(store.base(99), MISSING_BASE);
        assert_eq!(store.check(99), UNSET_CHECK);
        assert!(!store.is_terminal(99));
        assert_eq!(store.transition(99, sym('a')), None);
    }

    #[test]
    #[should_panic]
    fn test_mutator_out_of_bounds_panics() {
        let mut store = DoubleArrayStore::new();
        store.set_base(5, 1);
    }

    #[test]
    #[should_panic]
    fn test_root_slot_cannot_be_owned() {
        let mut store = sized(4);
        store.set_check(0, 1);
    }

    #[test]
    fn test_terminal_flag_survives_base_update() {
        let mut store = sized(4);
        store.set_terminal(2, true);
        store.set_base(2, 40);
        assert!(store.is_terminal(2));
        assert_eq!(store.base(2), 40);
        store.clear_base(2);
        assert!(store.is_terminal(2));
        assert_eq!(store.base(2), UNSET_BASE);
        store.clear_terminal(2);
        assert!(!store.is_terminal(2));
    }

    #[test]
    fn test_find_base_prefers_smallest() {
        let mut store = sized(60);
        store.set_check(1, 0);
        store.set_check(2, 0);
        assert_eq!(store.find_base(&[sym('a')]).unwrap(), 2);

        store.set_check(5, 0);
        // b = 2 collides on C (slot 5); b = 3 leaves slots 4 and 6 free.
        assert_eq!(store.find_base(&[sym('a'), sym('c')]).unwrap(), 3);
    }

    #[test]
    fn test_find_base_grows_when_full() {
        let mut store = DoubleArrayStore::new();
        assert_eq!(store.len(), 1);
        let b = store.find_base(&[sym('z')]).unwrap();
        assert_eq!(b, 0);
        assert_eq!(store.len(), 1 + DEFAULT_GROWTH_CHUNK);
    }

    #[test]
    fn test_find_base_honours_growth_chunk() {
        let config = DoubleArrayConfig::default().with_growth_chunk(7);
        let mut store = DoubleArrayStore::with_config(config).unwrap();
        let b = store.find_base(&[sym('z')]).unwrap();
        assert_eq!(b, 0);
        // 1 + 7k must exceed 26 for the first window: k = 4.
        assert_eq!(store.len(), 29);
    }

    #[test]
    fn test_relocate_repoints_grandchildren() {
        let mut store = sized(60);
        // root --A--> 1 --B--> 12
        store.set_base(0, 0);
        store.set_check(1, 0);
        store.set_base(1, 10);
        store.set_check(12, 1);
        store.set_terminal(12, true);

        store.relocate(0, 20, &[sym('a')]);

        assert_eq!(store.base(0), 20);
        assert_eq!(store.check(21), 0);
        assert_eq!(store.base(21), 10);
        assert_eq!(store.check(12), 21);
        assert_eq!(store.check(1), UNSET_CHECK);
        assert_eq!(store.base_word(1), BaseWord::UNSET);
        assert_eq!(store.transition(0, sym('a')), Some(21));
        assert_eq!(store.transition(21, sym('b')), Some(12));
        assert!(store.is_terminal(12));
    }

    #[test]
    fn test_freed_slot_is_found_again() {
        let mut store = sized(60);
        for slot in 1..10 {
            store.set_check(slot, 0);
        }
        store.clear_check(3);
        assert_eq!(store.find_base(&[sym('a')]).unwrap(), 2);
    }

    #[test]
    fn test_trim_keeps_root() {
        let mut store = sized(100);
        store.trim();
        assert_eq!(store.len(), 1);

        let mut store = sized(100);
        store.set_check(30, 0);
        store.trim();
        assert_eq!(store.len(), 31);
    }

    #[test]
    fn test_extend_rejects_oversized_request() {
        let mut store = DoubleArrayStore::new();
        assert_eq!(
            store.extend(MAX_SLOTS),
            Err(DoubleArrayError::CapacityExceeded {
                requested: MAX_SLOTS + 1,
                limit: MAX_SLOTS,
            })
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_from_parts_validates_links() {
        assert_eq!(
            DoubleArrayStore::from_parts(vec![], vec![]),
            Err(SnapshotError::Empty)
        );
        assert_eq!(
            DoubleArrayStore::from_parts(vec![0, 0], vec![-1, 0, -1]),
            Err(SnapshotError::LengthMismatch {
                field: "check",
                expected: 2,
                actual: 3,
            })
        );
        // Slot 1 claims state 7, which does not exist.
        assert_eq!(
            DoubleArrayStore::from_parts(vec![0, 0], vec![-1, 7]),
            Err(SnapshotError::DanglingCheck { slot: 1, owner: 7 })
        );
        // Slot 3 is owned by the root but outside root's child range (base 5).
        assert_eq!(
            DoubleArrayStore::from_parts(vec![5, 0, 0, 0], vec![-1, -1, -1, 0]),
            Err(SnapshotError::DanglingCheck { slot: 3, owner: 0 })
        );

        // Slot 2 hangs off state 1, which nothing owns.
        assert_eq!(
            DoubleArrayStore::from_parts(vec![0, 0, 1 << 31], vec![-1, -1, 1]),
            Err(SnapshotError::Unreachable { slot: 2 })
        );
        // Slots 1 and 2 own each other without reaching the root.
        assert_eq!(
            DoubleArrayStore::from_parts(vec![30, 1, 0], vec![-1, 2, 1]),
            Err(SnapshotError::Unreachable { slot: 1 })
        );

        let store = DoubleArrayStore::from_parts(vec![0, 1 << 31], vec![-1, 0]).unwrap();
        assert!(store.is_terminal(1));
        assert_eq!(store.transition(0, sym('a')), Some(1));
    }

    #[test]
    fn test_dump_lists_slots() {
        let mut store = sized(3);
        store.set_check(1, 0);
        store.set_terminal(1, true);
        let text = store.dump().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("CHECK"));
        assert!(lines[2].trim_end().ends_with('T'));
        assert!(lines[3].contains('-'));
    }

    #[test]
    fn test_stats() {
        let mut store = sized(10);
        store.set_check(1, 0);
        store.set_terminal(1, true);
        let stats = store.stats();
        assert_eq!(stats.slots, 10);
        assert_eq!(stats.used_slots, 1);
        assert_eq!(stats.terminal_states, 1);
        assert_eq!(stats.bytes, 80);
        assert!(stats.to_string().contains("terminals: 1"));
    }
}
