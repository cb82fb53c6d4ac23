//! Configuration for the APEX simulator.
//!
//! All fields have hardware-faithful defaults; a JSON file can override any
//! subset of them. Use [`Config::default`] or [`Config::from_json`].

use serde::Deserialize;

use crate::common::constants;

/// Default timing and sizing parameters.
mod defaults {
    /// Execution latency of the integer ALU, in cycles.
    pub const INTEGER_LATENCY: u64 = 1;

    /// Execution latency of the multiplier, in cycles from dispatch.
    pub const MULTIPLIER_LATENCY: u64 = 3;

    /// Execution latency of the load/store unit, in cycles from dispatch.
    pub const LOAD_STORE_LATENCY: u64 = 4;
}

/// Tunable parameters of the simulated machine.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Size of the flat data memory, in words.
    pub data_memory_size: usize,
    /// Capacity of the retirement queue.
    pub retire_queue_capacity: usize,
    /// Integer ALU latency in cycles.
    pub integer_latency: u64,
    /// Multiplier latency in cycles.
    pub multiplier_latency: u64,
    /// Load/store unit latency in cycles.
    pub load_store_latency: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_memory_size: constants::DATA_MEMORY_SIZE,
            retire_queue_capacity: constants::RETIRE_QUEUE_CAPACITY,
            integer_latency: defaults::INTEGER_LATENCY,
            multiplier_latency: defaults::MULTIPLIER_LATENCY,
            load_store_latency: defaults::LOAD_STORE_LATENCY,
        }
    }
}

impl Config {
    /// Parses a configuration from a JSON document. Unknown fields are
    /// rejected; omitted fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_modeled_machine() {
        let config = Config::default();
        assert_eq!(config.data_memory_size, 4096);
        assert_eq!(config.integer_latency, 1);
        assert_eq!(config.multiplier_latency, 3);
        assert_eq!(config.load_store_latency, 4);
    }

    #[test]
    fn test_partial_json_override() {
        let config = Config::from_json(r#"{"multiplier_latency": 5}"#).unwrap();
        assert_eq!(config.multiplier_latency, 5);
        assert_eq!(config.load_store_latency, 4);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(Config::from_json(r#"{"mul_latency": 5}"#).is_err());
    }
}
