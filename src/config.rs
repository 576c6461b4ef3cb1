//! Codec configuration

use crate::error::{Error, Result};

/// Default maximum nesting depth for arrays/objects (prevents stack overflow)
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default initial capacity of the encoder's output buffer
pub const DEFAULT_INITIAL_CAPACITY: usize = 256;

/// Encoder/decoder configuration options
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Write class names for typed objects. When off, every object is
    /// written as anonymous.
    pub class_mapping: bool,

    /// Maximum array/object nesting depth before `DepthExceeded`
    pub max_depth: usize,

    /// Decode objects whose class is not registered as generic records
    /// (keeping the class name) instead of failing with `ClassNotFound`
    pub allow_unregistered_classes: bool,

    /// Initial capacity of the encoder's output buffer
    pub initial_capacity: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            class_mapping: false,
            max_depth: DEFAULT_MAX_DEPTH,
            allow_unregistered_classes: false,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

impl CodecConfig {
    /// Strict mode - every named object must resolve to a registered class
    pub fn strict() -> Self {
        Self::default()
    }

    /// Lenient mode - unknown classes decode as named records
    pub fn lenient() -> Self {
        Self {
            allow_unregistered_classes: true,
            ..Default::default()
        }
    }

    /// Enable or disable class name mapping
    pub fn class_mapping(mut self, enabled: bool) -> Self {
        self.class_mapping = enabled;
        self
    }

    /// Set maximum nesting depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Allow or reject unregistered class names when decoding
    pub fn allow_unregistered_classes(mut self, allow: bool) -> Self {
        self.allow_unregistered_classes = allow;
        self
    }

    /// Set initial output buffer capacity
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(Error::Config("max_depth must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CodecConfig::default();
        assert!(!config.class_mapping);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(!config.allow_unregistered_classes);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = CodecConfig::lenient()
            .class_mapping(true)
            .max_depth(8)
            .initial_capacity(1024);

        assert!(config.class_mapping);
        assert!(config.allow_unregistered_classes);
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.initial_capacity, 1024);
    }

    #[test]
    fn test_validate_rejects_zero_depth() {
        let config = CodecConfig::strict().max_depth(0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
