//! Default paths and persistent settings

use super::args::SerializationFormat;
use crate::dictionary::double_array::DoubleArrayConfig;
use crate::dictionary::factory::DictionaryBackend;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Get the configuration directory for libdarray
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine configuration directory")?;
    Ok(base.join("libdarray"))
}

/// Get the config file path with optional override
pub fn config_file_path(custom_path: Option<PathBuf>) -> Result<PathBuf> {
    match custom_path {
        Some(path) => {
            validate_config_path(&path)?;
            Ok(path)
        }
        None => Ok(config_dir()?.join("config.json")),
    }
}

/// Get file extension for a serialization format
pub fn file_extension(format: SerializationFormat) -> &'static str {
    match format {
        SerializationFormat::Text => "txt",
        SerializationFormat::Bincode => "bin",
        SerializationFormat::Json => "json",
        SerializationFormat::BincodeGzip => "bin.gz",
        SerializationFormat::JsonGzip => "json.gz",
    }
}

/// Validate that a config file path has .json extension
pub fn validate_config_path(path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => Ok(()),
        Some(ext) => Err(anyhow::anyhow!(
            "Config file must have .json extension, got .{}. Please use a .json file.",
            ext
        )),
        None => Err(anyhow::anyhow!(
            "Config file must have .json extension. Please add .json to the filename."
        )),
    }
}

/// User configuration stored in config file
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PersistentConfig {
    /// Default output format for `build`
    pub format: Option<SerializationFormat>,
    /// Default backend for `build`
    pub backend: Option<DictionaryBackend>,
    /// Slots added per growth step
    pub growth_chunk: Option<usize>,
    /// Retry lookback window
    pub lookback: Option<usize>,
    /// Reduce by default
    pub reduce: Option<bool>,
}

impl PersistentConfig {
    /// Load configuration from the default or a custom path
    ///
    /// A missing file yields the defaults.
    pub fn load_from(custom_path: Option<PathBuf>) -> Result<Self> {
        let path = config_file_path(custom_path)?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to the default or a custom path
    pub fn save_to(&self, custom_path: Option<PathBuf>) -> Result<PathBuf> {
        let path = config_file_path(custom_path)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(path)
    }

    /// Merge with command-line options (CLI options take precedence)
    pub fn merge_with_cli(
        &self,
        format: Option<SerializationFormat>,
        backend: Option<DictionaryBackend>,
        growth_chunk: Option<usize>,
        lookback: Option<usize>,
        reduce: Option<bool>,
    ) -> Self {
        Self {
            format: format.or(self.format),
            backend: backend.or(self.backend),
            growth_chunk: growth_chunk.or(self.growth_chunk),
            lookback: lookback.or(self.lookback),
            reduce: reduce.or(self.reduce),
        }
    }

    /// Growth settings with unset fields at their defaults
    pub fn double_array_config(&self) -> DoubleArrayConfig {
        let mut config = DoubleArrayConfig::default();
        if let Some(chunk) = self.growth_chunk {
            config = config.with_growth_chunk(chunk);
        }
        if let Some(lookback) = self.lookback {
            config = config.with_lookback(lookback);
        }
        config
    }
}

impl Default for PersistentConfig {
    fn default() -> Self {
        Self {
            format: Some(SerializationFormat::Bincode),
            backend: Some(DictionaryBackend::DoubleArray),
            growth_chunk: None,
            lookback: None,
            reduce: Some(false),
        }
    }
}
