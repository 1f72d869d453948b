//! CLI interface for libdarray
//!
//! Provides command-line utilities for building, inspecting and probing
//! dictionaries.

pub mod args;
pub mod commands;
pub mod detect;
pub mod paths;

pub use args::{Cli, Commands, SerializationFormat};
pub use detect::{detect_format, DetectionMethod, FormatDetection};
pub use paths::{config_dir, PersistentConfig};
