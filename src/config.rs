use bytesize::ByteSize;
use serde::{Deserialize, Serialize};

use crate::error::{NgramError, Result};
use crate::ngram::{NGramScheme, TextUnit};

/// NgramIndex configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Number of units per n-gram (default: 3)
    pub ngram_size: usize,

    /// Unit n-grams are measured in (default: chars)
    pub unit: TextUnit,

    /// Whether to record metrics through the `metrics` facade
    pub collect_metrics: bool,

    /// Log a warning once the estimated index footprint exceeds this size
    pub memory_warning: Option<ByteSize>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            ngram_size: 3,
            unit: TextUnit::Char,
            collect_metrics: false,
            memory_warning: None,
        }
    }
}

impl IndexConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the n-gram size
    pub fn with_ngram_size(mut self, ngram_size: usize) -> Self {
        self.ngram_size = ngram_size;
        self
    }

    /// Set the text unit
    pub fn with_unit(mut self, unit: TextUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Set whether to collect metrics
    pub fn with_collect_metrics(mut self, collect: bool) -> Self {
        self.collect_metrics = collect;
        self
    }

    /// Set the memory warning threshold
    pub fn with_memory_warning(mut self, threshold: ByteSize) -> Self {
        self.memory_warning = Some(threshold);
        self
    }

    /// Check that the configuration describes a usable index
    pub fn validate(&self) -> Result<()> {
        if self.ngram_size == 0 {
            return Err(NgramError::InvalidConfig(
                "ngram_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The decomposition scheme this configuration describes
    pub fn scheme(&self) -> NGramScheme {
        NGramScheme::new(self.ngram_size, self.unit)
    }

    /// Create a development configuration with metrics enabled
    pub fn development() -> Self {
        Self {
            collect_metrics: true,
            ..Default::default()
        }
    }

    /// Create a production configuration with a generous memory warning
    pub fn production() -> Self {
        Self {
            memory_warning: Some(ByteSize::gib(2)),
            ..Default::default()
        }
    }

    /// Create a low-memory configuration for resource-constrained environments
    pub fn low_memory() -> Self {
        Self {
            unit: TextUnit::Byte,
            memory_warning: Some(ByteSize::mib(20)),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_char_trigrams() {
        let config = IndexConfig::default();
        assert_eq!(config.scheme(), NGramScheme::new(3, TextUnit::Char));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = IndexConfig::new()
            .with_ngram_size(4)
            .with_unit(TextUnit::Byte)
            .with_collect_metrics(true)
            .with_memory_warning(ByteSize::mib(8));

        assert_eq!(config.ngram_size, 4);
        assert_eq!(config.unit, TextUnit::Byte);
        assert!(config.collect_metrics);
        assert_eq!(config.memory_warning, Some(ByteSize::mib(8)));
    }

    #[test]
    fn test_zero_ngram_size_is_rejected() {
        let config = IndexConfig::new().with_ngram_size(0);
        assert!(matches!(config.validate(), Err(NgramError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_json() {
        let config = IndexConfig::from_json(r#"{"ngram_size": 2, "unit": "byte"}"#).unwrap();
        assert_eq!(config.scheme(), NGramScheme::new(2, TextUnit::Byte));
        assert!(!config.collect_metrics);

        let config = IndexConfig::from_json("{}").unwrap();
        assert_eq!(config, IndexConfig::default());

        assert!(matches!(
            IndexConfig::from_json(r#"{"ngram_size": 0}"#),
            Err(NgramError::InvalidConfig(_))
        ));
        assert!(matches!(
            IndexConfig::from_json("not json"),
            Err(NgramError::JsonError(_))
        ));
    }

    #[test]
    fn test_presets() {
        assert!(IndexConfig::development().collect_metrics);
        assert!(IndexConfig::production().memory_warning.is_some());
        assert_eq!(IndexConfig::low_memory().unit, TextUnit::Byte);
    }
}
