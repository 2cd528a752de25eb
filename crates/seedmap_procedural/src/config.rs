//! # Generation Configuration
//!
//! Tunables loaded once at startup from TOML. Missing keys fall back to
//! their defaults.
//!
//! ```toml
//! biome_cache_capacity = 10000
//! default_range_chunks = 48
//! biome_sample_radius_chunks = 20
//! chunk_memo_capacity = 16384
//! find_memo_capacity = 512
//! max_search_radius = 100000
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::biome::DEFAULT_BIOME_CACHE_CAPACITY;
use crate::cache::{
    DEFAULT_CHUNK_MEMO_CAPACITY, DEFAULT_FIND_MEMO_CAPACITY, DEFAULT_MAX_SEARCH_RADIUS,
};
use crate::error::{GenerationError, GenerationResult};

/// Generation tunables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Per-block biome cache size.
    pub biome_cache_capacity: usize,
    /// Range (in chunks) used when a query does not name one.
    pub default_range_chunks: i32,
    /// Upper bound on the chunk radius of map biome previews.
    pub biome_sample_radius_chunks: u32,
    /// Per-chunk biome memo size.
    pub chunk_memo_capacity: usize,
    /// Number of remembered `find_structures` answers.
    pub find_memo_capacity: usize,
    /// Largest accepted search radius in blocks.
    pub max_search_radius: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            biome_cache_capacity: DEFAULT_BIOME_CACHE_CAPACITY,
            default_range_chunks: 48,
            biome_sample_radius_chunks: 20,
            chunk_memo_capacity: DEFAULT_CHUNK_MEMO_CAPACITY,
            find_memo_capacity: DEFAULT_FIND_MEMO_CAPACITY,
            max_search_radius: DEFAULT_MAX_SEARCH_RADIUS,
        }
    }
}

impl GenerationConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for malformed TOML or out-of-range values.
    pub fn from_toml_str(text: &str) -> GenerationResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| GenerationError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the file cannot be read or is invalid.
    pub fn from_toml_file(path: impl AsRef<Path>) -> GenerationResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            GenerationError::InvalidConfig(format!("{}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the offending key.
    pub fn validate(&self) -> GenerationResult<()> {
        if self.biome_cache_capacity == 0 {
            return Err(GenerationError::InvalidConfig(
                "biome_cache_capacity must be at least 1".to_string(),
            ));
        }
        if self.chunk_memo_capacity == 0 || self.find_memo_capacity == 0 {
            return Err(GenerationError::InvalidConfig(
                "chunk_memo_capacity and find_memo_capacity must be at least 1".to_string(),
            ));
        }
        if self.max_search_radius == 0 {
            return Err(GenerationError::InvalidConfig(
                "max_search_radius must be at least 1".to_string(),
            ));
        }
        if self.default_range_chunks < 0 {
            return Err(GenerationError::InvalidConfig(format!(
                "default_range_chunks must not be negative, got {}",
                self.default_range_chunks
            )));
        }
        Ok(())
    }
}

/// Where `MapSession::initialize` reads its configuration from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Built-in defaults.
    #[default]
    Default,
    /// Inline TOML text.
    Toml(String),
    /// TOML file on disk.
    File(PathBuf),
}

impl ConfigSource {
    /// Loads the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the source cannot be read or is invalid.
    pub fn load(&self) -> GenerationResult<GenerationConfig> {
        match self {
            Self::Default => Ok(GenerationConfig::default()),
            Self::Toml(text) => GenerationConfig::from_toml_str(text),
            Self::File(path) => GenerationConfig::from_toml_file(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.biome_cache_capacity, 10_000);
        assert_eq!(config.default_range_chunks, 48);
        assert_eq!(config.biome_sample_radius_chunks, 20);
        assert_eq!(config.chunk_memo_capacity, 16_384);
        assert_eq!(config.find_memo_capacity, 512);
        assert_eq!(config.max_search_radius, 100_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GenerationConfig::from_toml_str("default_range_chunks = 64").unwrap();
        assert_eq!(config.default_range_chunks, 64);
        assert_eq!(config.biome_cache_capacity, 10_000);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            GenerationConfig::from_toml_str("biome_cache_capacity = 0"),
            Err(GenerationError::InvalidConfig(_))
        ));
        assert!(matches!(
            GenerationConfig::from_toml_str("default_range_chunks = -1"),
            Err(GenerationError::InvalidConfig(_))
        ));
        assert!(matches!(
            GenerationConfig::from_toml_str("find_memo_capacity = 0"),
            Err(GenerationError::InvalidConfig(_))
        ));
        assert!(matches!(
            GenerationConfig::from_toml_str("max_search_radius = 0"),
            Err(GenerationError::InvalidConfig(_))
        ));
        assert!(matches!(
            GenerationConfig::from_toml_str("unknown_key = 1"),
            Err(GenerationError::InvalidConfig(_))
        ));
        assert!(matches!(
            GenerationConfig::from_toml_str("biome_cache_capacity = "),
            Err(GenerationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let source = ConfigSource::File(PathBuf::from("/nonexistent/seedmap.toml"));
        assert!(matches!(source.load(), Err(GenerationError::InvalidConfig(_))));
    }

    #[test]
    fn test_sources() {
        assert_eq!(ConfigSource::Default.load().unwrap(), GenerationConfig::default());
        let inline = ConfigSource::Toml("biome_sample_radius_chunks = 4".to_string());
        assert_eq!(inline.load().unwrap().biome_sample_radius_chunks, 4);
    }
}
