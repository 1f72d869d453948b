//! Randomized probe workloads for cross-checking dictionaries.
//!
//! A dictionary is probed against the set of words it was built from: every
//! probe is answered by both and any disagreement is a failure. Probes are
//! random fixed-length words (mostly misses) and one-letter extensions of
//! known words (near misses that walk deep into the automaton).
//!
//! ```rust
//! use libdarray::corpus::{ProbeConfig, ProbeGenerator};
//! use libdarray::prelude::*;
//!
//! let words = ["cat", "cats", "dog"];
//! let dict = DoubleArrayTrie::from_terms(words).unwrap();
//! let known: Vec<Word> = words.iter().map(|w| encode(w).unwrap()).collect();
//!
//! let mut generator = ProbeGenerator::new(7);
//! let report = generator.run(&dict, &known, &ProbeConfig::default().with_random_probes(500));
//! assert!(report.is_success());
//! ```
//!
//! **Note**: This module requires the optional `rand` dependency.

mod probe;

pub use self::probe::{ProbeConfig, ProbeFailure, ProbeGenerator, ProbeReport};
