use serde::{Deserialize, Serialize};

use loadout::Loadout;
use module::ModuleCategory;
use shipstats::ShipStats;
use spec::ShipSpec;

use crate::civilization::CivId;
use crate::galaxy::SystemId;

pub mod design;
pub mod fleet;
pub mod hull;
pub mod loadout;
pub mod module;
pub mod shipstats;
pub mod spec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShipId {
    pub civ: CivId,
    pub serial: u32,
}

impl ShipId {
    pub fn new(civ: CivId, serial: u32) -> ShipId {
        ShipId { civ, serial }
    }
}

impl std::fmt::Display for ShipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "shp{}-{}", self.civ.0, self.serial)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub id: ShipId,
    pub civ: CivId,
    pub type_name: String,
    pub loadout: Loadout,
    pub stats: ShipStats,
    pub health: u32,

    // None while travelling in deep space, or before docking anywhere
    #[serde(default)]
    pub system: Option<SystemId>,
}

impl Ship {
    pub fn from_spec(id: ShipId, spec: &ShipSpec) -> Ship {
        let stats = spec.stats();
        Ship {
            id,
            civ: spec.civ,
            type_name: spec.name.clone(),
            loadout: spec.loadout().clone(),
            health: stats.max_health,
            stats,
            system: None,
        }
    }

    #[inline]
    pub fn range(&self) -> f64 {
        self.stats.range
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.stats.speed
    }

    pub fn max_health(&self) -> u32 {
        self.stats.max_health
    }

    pub fn attack(&self) -> u32 {
        self.stats.attack
    }

    pub fn has(&self, category: ModuleCategory) -> bool {
        self.loadout.has_category(category)
    }

    pub fn is_colony_ship(&self) -> bool {
        self.has(ModuleCategory::Colonization)
    }

    // Public data of this ship, as shown to whoever can see it
    pub fn report(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id.to_string(),
            "civ": self.civ.0,
            "type": self.type_name,
            "health": self.health,
            "max_health": self.stats.max_health,
            "speed": self.stats.speed,
            "range": self.stats.range,
            "attack": self.stats.attack,
        })
    }
}

#[cfg(test)]
use crate::catalog::ModuleCatalog;

#[test]
fn test_ship_from_spec() {
    let catalog = ModuleCatalog::standard();
    let hull = catalog.hull_named("Small Hull").unwrap().clone();
    let engine = catalog.module_named("Headslam Engine").unwrap().clone();
    let spec = ShipSpec::new(CivId(1), "Scout", hull, [&engine]).unwrap();

    let ship = Ship::from_spec(ShipId::new(CivId(1), 1), &spec);
    assert_eq!(ship.type_name, "Scout");
    assert_eq!(ship.health, 15);
    assert_eq!(ship.speed(), 4.0);
    assert!(!ship.is_colony_ship());
    assert!(ship.system.is_none());
    assert_eq!(ship.health, ship.max_health());
    assert_eq!(ship.report()["id"], "shp1-1");
}
