//! Probe generation and the cross-check harness.

use crate::dictionary::alphabet::{self, Symbol, Word, ALPHABET_SIZE};
use crate::dictionary::Dictionary;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Workload shape for [`ProbeGenerator::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Random words to probe
    pub random_probes: usize,
    /// Length of each random word
    pub random_len: usize,
    /// Random letters appended to each known word before extension probing
    pub walk_steps: usize,
    /// Longest word the walk grows to
    pub max_len: usize,
}

impl ProbeConfig {
    /// Set the number of random probes.
    pub fn with_random_probes(mut self, count: usize) -> Self {
        self.random_probes = count;
        self
    }

    /// Set the number of random-walk steps per known word.
    pub fn with_walk_steps(mut self, steps: usize) -> Self {
        self.walk_steps = steps;
        self
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            random_probes: 100_000,
            random_len: 5,
            walk_steps: 10,
            max_len: 15,
        }
    }
}

/// A probe the dictionary answered wrongly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeFailure {
    /// The probe, uppercase
    pub word: String,
    /// Answer from the reference set
    pub expected: bool,
    /// Answer from the dictionary
    pub actual: bool,
}

/// Tally of one probe run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProbeReport {
    /// Probes answered correctly
    pub passed: usize,
    /// Probes answered wrongly
    pub failures: Vec<ProbeFailure>,
}

impl ProbeReport {
    /// Total probes run.
    pub fn total(&self) -> usize {
        self.passed + self.failures.len()
    }

    /// Whether every probe agreed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, word: &[Symbol], expected: bool, actual: bool) {
        if expected == actual {
            self.passed += 1;
        } else {
            self.failures.push(ProbeFailure {
                word: alphabet::decode(word),
                expected,
                actual,
            });
        }
    }
}

/// Seeded source of probe words.
///
/// # Example
///
/// ```rust
/// use libdarray::corpus::ProbeGenerator;
///
/// let mut a = ProbeGenerator::new(42);
/// let mut b = ProbeGenerator::new(42);
/// assert_eq!(a.random_word(5), b.random_word(5));
/// ```
pub struct ProbeGenerator {
    rng: StdRng,
}

impl ProbeGenerator {
    /// Create new generator with seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniformly random symbol.
    pub fn random_symbol(&mut self) -> Symbol {
        let code = self.rng.gen_range(1..=ALPHABET_SIZE as u8);
        Symbol::new(code).unwrap_or(Symbol::MIN)
    }

    /// Uniformly random word of `len` symbols.
    pub fn random_word(&mut self, len: usize) -> Word {
        (0..len).map(|_| self.random_symbol()).collect()
    }

    /// `word` followed by each letter of the alphabet in turn.
    pub fn extensions(word: &[Symbol]) -> impl Iterator<Item = Word> + '_ {
        Symbol::all().map(move |symbol| {
            let mut extended = Word::from_slice(word);
            extended.push(symbol);
            extended
        })
    }

    /// Prefixes of a random walk starting at `word`.
    ///
    /// Appends up to `steps` random letters, stopping before the word would
    /// exceed `max_len`, and yields the word after each step.
    pub fn random_walk(&mut self, word: &[Symbol], steps: usize, max_len: usize) -> Vec<Word> {
        let mut current = Word::from_slice(word);
        let mut walk = Vec::with_capacity(steps);
        for _ in 0..steps {
            if current.len() >= max_len {
                break;
            }
            current.push(self.random_symbol());
            walk.push(current.clone());
        }
        walk
    }

    /// Cross-check `dict` against `known`.
    ///
    /// Probes, in order: `random_probes` random words; every one-letter
    /// extension of each known word; every one-letter extension of each
    /// prefix along a random walk from each known word.
    pub fn run<D: Dictionary>(
        &mut self,
        dict: &D,
        known: &[Word],
        config: &ProbeConfig,
    ) -> ProbeReport {
        let reference: HashSet<&[Symbol]> = known.iter().map(|w| w.as_slice()).collect();
        let mut report = ProbeReport::default();
        let probe = |word: &[Symbol], report: &mut ProbeReport| {
            report.record(word, reference.contains(word), dict.is_word(word));
        };

        for _ in 0..config.random_probes {
            let word = self.random_word(config.random_len);
            probe(&word, &mut report);
        }

        for word in known {
            probe(word, &mut report);
            for extended in Self::extensions(word) {
                probe(&extended, &mut report);
            }
            for prefix in self.random_walk(word, config.walk_steps, config.max_len) {
                for extended in Self::extensions(&prefix) {
                    probe(&extended, &mut report);
                }
            }
        }

        report
    }
}
