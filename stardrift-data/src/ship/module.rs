use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::resources::Cost;

pub const DEFAULT_FOOTPRINT: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleId(pub u16);

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mod{}", self.0)
    }
}

#[derive(
    EnumIter,
    EnumString,
    IntoStaticStr,
    Debug,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Clone,
    Copy,
)]
#[strum(ascii_case_insensitive)]
pub enum ModuleCategory {
    Engine,
    Sensor,
    Weapon,
    Colonization,
}

// What fitting one unit of a module adds to a ship
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModuleDeltas {
    pub health: u32,
    pub speed: f64,
    pub range: f64,
    pub attack: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub name: String,
    pub category: ModuleCategory,
    pub footprint: u32,
    pub description: String,
    pub cost: Cost,
    pub deltas: ModuleDeltas,
}

impl Module {
    fn new<T: ToString>(id: ModuleId, name: T, category: ModuleCategory, cost: Cost) -> Module {
        Module {
            id,
            name: name.to_string(),
            category,
            footprint: DEFAULT_FOOTPRINT,
            description: String::new(),
            cost,
            deltas: ModuleDeltas::default(),
        }
    }

    pub fn engine<T: ToString>(
        id: ModuleId,
        name: T,
        cost: Cost,
        speed: f64,
        range: f64,
    ) -> Module {
        let mut module = Module::new(id, name, ModuleCategory::Engine, cost);
        module.deltas.speed = speed;
        module.deltas.range = range;
        module
    }

    pub fn sensor<T: ToString>(id: ModuleId, name: T, cost: Cost) -> Module {
        Module::new(id, name, ModuleCategory::Sensor, cost)
    }

    pub fn weapon<T: ToString>(id: ModuleId, name: T, cost: Cost, attack: u32) -> Module {
        let mut module = Module::new(id, name, ModuleCategory::Weapon, cost);
        module.deltas.attack = attack;
        module
    }

    pub fn colonization<T: ToString>(id: ModuleId, name: T, cost: Cost) -> Module {
        Module::new(id, name, ModuleCategory::Colonization, cost)
    }

    pub fn with_footprint(mut self, footprint: u32) -> Module {
        self.footprint = footprint;
        self
    }

    pub fn with_health(mut self, health: u32) -> Module {
        self.deltas.health = health;
        self
    }

    pub fn with_description<T: ToString>(mut self, desc: T) -> Module {
        self.description = desc.to_string();
        self
    }
}

#[test]
fn test_module_category_parsing() {
    use std::str::FromStr;
    assert_eq!(
        ModuleCategory::from_str("colonization"),
        Ok(ModuleCategory::Colonization)
    );
    let name: &'static str = ModuleCategory::Weapon.into();
    assert_eq!(name, "Weapon");

    let engine = Module::engine(ModuleId(1), "Flash Engine", Cost::new(10.0, 8.0), 3.0, 20.0);
    assert_eq!(engine.category, ModuleCategory::Engine);
    assert_eq!(engine.footprint, DEFAULT_FOOTPRINT);
    assert_eq!(engine.deltas.range, 20.0);
}
