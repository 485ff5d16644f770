//! Cache configuration

use serde::{Deserialize, Serialize};

/// Keyspace cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Initial capacity of the presence map
    pub initial_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.initial_capacity, 1024);
    }

    #[test]
    fn test_config_round_trip() {
        let config = CacheConfig {
            initial_capacity: 4096,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: CacheConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.initial_capacity, 4096);
    }
}
