//! Operation engine configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for mass actions and panel listing.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct OpConfig {
    /// Copy buffer size in bytes.
    #[builder(default = "16 * 1024")]
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Minimum milliseconds between progress redraws.
    #[builder(default = "100")]
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,

    /// List directories before everything else.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub dirs_first: bool,
}

fn default_chunk_size() -> usize {
    16 * 1024
}

fn default_throttle_ms() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

impl OpConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(0) = self.chunk_size {
            return Err("Copy buffer size cannot be zero".to_string());
        }
        Ok(())
    }
}

impl OpConfig {
    /// Create a new config builder.
    pub fn builder() -> OpConfigBuilder {
        OpConfigBuilder::default()
    }
}

impl Default for OpConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            throttle_ms: default_throttle_ms(),
            dirs_first: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = OpConfig::builder()
            .chunk_size(4096usize)
            .throttle_ms(250u64)
            .build()
            .unwrap();

        assert_eq!(config.chunk_size, 4096);
        assert_eq!(config.throttle_ms, 250);
        assert!(config.dirs_first);
    }

    #[test]
    fn test_config_defaults() {
        let config = OpConfig::default();
        assert_eq!(config.chunk_size, 16 * 1024);
        assert_eq!(config.throttle_ms, 100);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let result = OpConfig::builder().chunk_size(0usize).build();
        assert!(result.is_err());
    }
}
