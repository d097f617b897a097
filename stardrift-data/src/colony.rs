use serde::{Deserialize, Serialize};

use crate::civilization::CivId;
use crate::config::EngineConfig;
use crate::galaxy::SystemId;

pub mod manager;
pub mod queue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColonyId {
    pub civ: CivId,
    pub serial: u32,
}

impl ColonyId {
    pub fn new(civ: CivId, serial: u32) -> ColonyId {
        ColonyId { civ, serial }
    }
}

impl std::fmt::Display for ColonyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "col{}-{}", self.civ.0, self.serial)
    }
}

// Settlement on a system object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Colony {
    pub id: ColonyId,
    pub owner: Option<CivId>,
    pub system: SystemId,
    pub orbit: u8,
    population: f64,
    max_population: f64,
}

impl Colony {
    pub fn found(id: ColonyId, system: SystemId, orbit: u8, config: &EngineConfig) -> Colony {
        Colony {
            id,
            owner: Some(id.civ),
            system,
            orbit,
            population: config.colony_start_pop,
            max_population: config.colony_max_pop,
        }
    }

    pub fn population(&self) -> f64 {
        self.population
    }

    pub fn max_population(&self) -> f64 {
        self.max_population
    }

    pub fn update(&mut self, growth: f64) {
        if self.owner.is_some() && self.population < self.max_population {
            self.population = (self.population + growth).min(self.max_population);
        }
    }
}

#[test]
fn test_colony_growth_is_capped() {
    let config = EngineConfig::default();
    let mut colony = Colony::found(ColonyId::new(CivId(1), 1), SystemId(1), 1, &config);
    assert_eq!(colony.population(), 1.0);

    let mut increments = 0;
    while colony.population() < 8.0 {
        colony.update(0.15);
        increments += 1;
        assert!(colony.population() <= 8.0);
    }
    assert_eq!(increments, 47);

    colony.update(0.15);
    assert_eq!(colony.population(), colony.max_population());
}

#[test]
fn test_colony_needs_owner_to_grow() {
    let config = EngineConfig::default();
    let mut colony = Colony::found(ColonyId::new(CivId(1), 1), SystemId(1), 1, &config);
    colony.owner = None;
    colony.update(0.15);
    assert_eq!(colony.population(), 1.0);
}
