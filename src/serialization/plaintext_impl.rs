//! Plain text word lists.
//!
//! One word per line. Surrounding whitespace is trimmed, blank lines and
//! lines starting with `#` are skipped, and letters are case-folded:
//!
//! ```text
//! # fruit
//! apple
//! Banana
//! CHERRY
//! ```
//!
//! Unlike the structural formats this stores only the language, so loading
//! rebuilds the dictionary from scratch. The empty word has no line of its
//! own, so a dictionary that accepts it is refused with
//! [`SerializationError::EmptyWord`].
//!
//! # Example
//!
//! ```rust
//! use libdarray::prelude::*;
//! use libdarray::serialization::PlainTextSerializer;
//!
//! let dict = DoubleArrayTrie::from_terms(["apple", "banana", "cherry"]).unwrap();
//!
//! let mut buffer = Vec::new();
//! PlainTextSerializer::serialize(&dict, &mut buffer).unwrap();
//! assert_eq!(String::from_utf8(buffer.clone()).unwrap(), "APPLE\nBANANA\nCHERRY\n");
//!
//! let loaded: DoubleArrayTrie = PlainTextSerializer::deserialize(&buffer[..]).unwrap();
//! assert_eq!(loaded.len(), 3);
//! ```

use super::{extract_terms, DictionaryFromTerms, SerializationError};
use crate::dictionary::alphabet::{self, AlphabetError, Word};
use crate::dictionary::{Dictionary, DictionaryError, DictionaryNode};
use std::io::{BufRead, BufReader, Read, Write};

/// Plain text serializer using newline-delimited words.
pub struct PlainTextSerializer;

/// A line that did not encode to a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedWord {
    /// 1-based line number
    pub line: usize,
    /// Why it was rejected
    pub error: AlphabetError,
}

/// Result of a lenient read: the words that encoded and the lines that did not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    /// Encoded words in file order (duplicates kept)
    pub words: Vec<Word>,
    /// Lines skipped because of invalid characters
    pub rejected: Vec<RejectedWord>,
}

impl PlainTextSerializer {
    /// Write every word of `dict`, one per line, in symbol order.
    ///
    /// Fails with [`SerializationError::EmptyWord`] before writing anything
    /// if the root is final.
    pub fn serialize<D, W>(dict: &D, mut writer: W) -> Result<(), SerializationError>
    where
        D: Dictionary,
        W: Write,
    {
        if dict.root().is_final() {
            return Err(SerializationError::EmptyWord);
        }
        for term in extract_terms(dict) {
            writeln!(writer, "{}", term)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Build a dictionary from a word list, failing on the first invalid word.
    pub fn deserialize<D, R>(reader: R) -> Result<D, SerializationError>
    where
        D: DictionaryFromTerms,
        R: Read,
    {
        let mut terms = Vec::new();
        for line in BufReader::new(reader).lines() {
            let line = line?;
            if let Some(term) = entry(&line) {
                terms.push(term.to_string());
            }
        }
        Ok(D::from_terms(terms)?)
    }

    /// Read a word list, skipping lines with invalid characters.
    ///
    /// Stops after `max_words` accepted words when a limit is given.
    pub fn read_words<R: Read>(
        reader: R,
        max_words: Option<usize>,
    ) -> Result<WordList, SerializationError> {
        let mut list = WordList::default();
        for (index, line) in BufReader::new(reader).lines().enumerate() {
            if max_words.is_some_and(|max| list.words.len() >= max) {
                break;
            }
            let line = line?;
            let Some(term) = entry(&line) else {
                continue;
            };
            match alphabet::encode(term) {
                Ok(word) => list.words.push(word),
                Err(error) => list.rejected.push(RejectedWord {
                    line: index + 1,
                    error,
                }),
            }
        }
        Ok(list)
    }

    /// Read a word list, turning the first invalid line into an error.
    pub fn read_words_strict<R: Read>(reader: R) -> Result<Vec<Word>, SerializationError> {
        let list = Self::read_words(reader, None)?;
        match list.rejected.into_iter().next() {
            Some(rejected) => Err(DictionaryError::from(rejected.error).into()),
            None => Ok(list.words),
        }
    }
}

fn entry(line: &str) -> Option<&str> {
    let term = line.trim();
    (!term.is_empty() && !term.starts_with('#')).then_some(term)
}
