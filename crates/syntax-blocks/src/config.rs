use crate::error::{BlockError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default floor of top-level blocks that boundary repair never trims into
pub const DEFAULT_MIN_BLOCK_COUNT: usize = 20;

/// Default number of parsed trees each language parser keeps
pub const DEFAULT_CACHE_CAPACITY: usize = 60;

/// Configuration for language parsers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum parsed trees cached per language
    pub cache_capacity: usize,

    /// Fraction of `cache_capacity` kept after an eviction (0..=1)
    pub cache_ratio: f64,

    /// Top-level blocks always kept by boundary repair
    pub min_block_count: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_ratio: 1.0,
            min_block_count: DEFAULT_MIN_BLOCK_COUNT,
        }
    }
}

impl ParserConfig {
    /// Create config for editors re-trimming streamed completions
    /// (few documents, short outputs)
    pub fn for_streaming() -> Self {
        Self {
            cache_capacity: 8,
            cache_ratio: 0.5,
            min_block_count: 5,
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(BlockError::invalid_config("cache_capacity must be > 0"));
        }

        if !self.cache_ratio.is_finite() || !(0.0..=1.0).contains(&self.cache_ratio) {
            return Err(BlockError::invalid_config(format!(
                "cache_ratio ({}) must be within 0..=1",
                self.cache_ratio
            )));
        }

        if self.min_block_count == 0 {
            return Err(BlockError::invalid_config("min_block_count must be > 0"));
        }

        Ok(())
    }
}
