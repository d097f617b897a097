use serde::{Deserialize, Serialize};

use crate::syslog::EVENT_LOG_MAX_SIZE;

pub const START_MONEY: f64 = 5000.0;
pub const GROWTH_RATE: f64 = 0.15;
pub const INCOME_PER_POP: f64 = 1.2;
pub const PRODUCTION_PER_POP: f64 = 0.75;
pub const COLONY_START_POP: f64 = 1.0;
pub const COLONY_MAX_POP: f64 = 8.0;

// Tunables of the simulation, every field falls back to its constant when missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub start_money: f64,
    pub growth: f64,
    pub income_per_pop: f64,
    pub production_per_pop: f64,
    pub colony_start_pop: f64,
    pub colony_max_pop: f64,
    pub event_log_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            start_money: START_MONEY,
            growth: GROWTH_RATE,
            income_per_pop: INCOME_PER_POP,
            production_per_pop: PRODUCTION_PER_POP,
            colony_start_pop: COLONY_START_POP,
            colony_max_pop: COLONY_MAX_POP,
            event_log_size: EVENT_LOG_MAX_SIZE,
        }
    }
}

impl EngineConfig {
    pub fn from_json(data: &str) -> Result<EngineConfig, serde_json::Error> {
        serde_json::from_str(data)
    }
}

#[test]
fn test_config_defaults() {
    let config = EngineConfig::from_json(r#"{ "growth": 0.5, "start_money": 100 }"#).unwrap();
    assert_eq!(config.growth, 0.5);
    assert_eq!(config.start_money, 100.0);
    assert_eq!(config.income_per_pop, INCOME_PER_POP);
    assert_eq!(config.colony_max_pop, COLONY_MAX_POP);

    assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    assert!(EngineConfig::from_json(r#"{ "growth": "fast" }"#).is_err());
}
