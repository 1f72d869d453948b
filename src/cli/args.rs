//! CLI argument definitions

use crate::dictionary::factory::DictionaryBackend;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "darray")]
#[command(about = "Build and query double-array word dictionaries")]
#[command(version)]
pub struct Cli {
    /// Custom configuration file path
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Build a dictionary from a word list
    Build {
        /// Word list, one word per line
        words: PathBuf,

        /// Output dictionary file
        #[arg(short, long)]
        output: PathBuf,

        /// Dictionary backend (from config if not specified)
        #[arg(short, long)]
        backend: Option<DictionaryBackend>,

        /// Serialization format (from the output extension if not specified)
        #[arg(short = 'f', long)]
        format: Option<SerializationFormat>,

        /// Stop after this many accepted words
        #[arg(short = 'n', long)]
        max_words: Option<usize>,

        /// Reduce to a minimal automaton (selects the linked backend unless
        /// --backend says otherwise)
        #[arg(short, long)]
        reduce: bool,

        /// Slots added each time the double array grows
        #[arg(long)]
        growth_chunk: Option<usize>,

        /// How far behind the old array end a retried base search restarts
        #[arg(long)]
        lookback: Option<usize>,

        /// Print build statistics
        #[arg(short, long)]
        verbose: bool,
    },

    /// Look up words
    Lookup {
        /// Dictionary file
        dict: PathBuf,

        /// Words to look up
        #[arg(required = true)]
        words: Vec<String>,

        /// Serialization format (auto-detected if not specified)
        #[arg(short = 'f', long)]
        format: Option<SerializationFormat>,
    },

    /// Display dictionary information
    Info {
        /// Dictionary file
        dict: PathBuf,

        /// Serialization format (auto-detected if not specified)
        #[arg(short = 'f', long)]
        format: Option<SerializationFormat>,
    },

    /// Print the backend's arrays
    Dump {
        /// Dictionary file
        dict: PathBuf,

        /// First row to print
        #[arg(long, default_value = "0")]
        start: usize,

        /// Rows to print (all if not specified)
        #[arg(long)]
        count: Option<usize>,

        /// Serialization format (auto-detected if not specified)
        #[arg(short = 'f', long)]
        format: Option<SerializationFormat>,
    },

    /// Cross-check every backend against a word list with random probes
    Probe {
        /// Word list, one word per line
        words: PathBuf,

        /// Stop after this many accepted words
        #[arg(short = 'n', long)]
        max_words: Option<usize>,

        /// Random seed (random if not specified)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Random five-letter probes
        #[arg(long, default_value = "100000")]
        count: usize,

        /// Print every failing probe
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show or update user settings
    Config {
        /// Show current settings
        #[arg(long)]
        show: bool,

        /// Set default format
        #[arg(long)]
        set_format: Option<SerializationFormat>,

        /// Set default backend
        #[arg(long)]
        set_backend: Option<DictionaryBackend>,

        /// Set default growth chunk
        #[arg(long)]
        set_growth_chunk: Option<usize>,

        /// Set default lookback
        #[arg(long)]
        set_lookback: Option<usize>,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}

/// On-disk dictionary formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SerializationFormat {
    /// Plain text (one word per line)
    Text,
    /// Bincode binary format
    Bincode,
    /// JSON format
    Json,
    /// Gzip-compressed Bincode format
    #[value(name = "bincode-gz")]
    #[serde(rename = "bincode-gz")]
    BincodeGzip,
    /// Gzip-compressed JSON format
    #[value(name = "json-gz")]
    #[serde(rename = "json-gz")]
    JsonGzip,
}

impl SerializationFormat {
    /// Whether the format stores arrays (as opposed to a word list).
    pub fn is_structural(self) -> bool {
        !matches!(self, Self::Text)
    }
}

impl std::fmt::Display for SerializationFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Bincode => write!(f, "bincode"),
            Self::Json => write!(f, "json"),
            Self::BincodeGzip => write!(f, "bincode-gz"),
            Self::JsonGzip => write!(f, "json-gz"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_build() {
        let cli = Cli::parse_from([
            "darray", "build", "words.txt", "-o", "out.bin", "--backend", "trie", "--reduce",
        ]);
        match cli.command {
            Commands::Build {
                backend, reduce, ..
            } => {
                assert_eq!(backend, Some(DictionaryBackend::DoubleArray));
                assert!(reduce);
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn test_format_names() {
        let format = SerializationFormat::from_str("json-gz", false).unwrap();
        assert_eq!(format, SerializationFormat::JsonGzip);
        assert_eq!(format.to_string(), "json-gz");
        assert!(!SerializationFormat::Text.is_structural());
    }
}
