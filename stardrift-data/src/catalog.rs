use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::civilization::CivId;
use crate::errors::Errcode;
use crate::ids::Serial;
use crate::resources::Cost;
use crate::ship::hull::{Hull, HullId};
use crate::ship::module::{Module, ModuleCategory, ModuleId};
use crate::ship::spec::SpecManager;

pub const COLONY_SHIP: &str = "Colony Ship";
pub const SCOUT: &str = "Scout";

// Hulls and modules a civilization can design ships with
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleCatalog {
    hulls: BTreeMap<HullId, Hull>,
    modules: BTreeMap<ModuleId, Module>,
    hull_serial: Serial,
    module_serial: Serial,
}

impl ModuleCatalog {
    pub fn empty() -> ModuleCatalog {
        ModuleCatalog::default()
    }

    pub fn standard() -> ModuleCatalog {
        let mut catalog = ModuleCatalog::empty();
        catalog.add_hull("Colony Hull", 1, 50, Cost::new(1.0, 1.0));
        catalog.add_hull("Small Hull", 15, 20, Cost::new(1.0, 1.0));
        catalog.add_hull("Medium Hull", 50, 40, Cost::new(3.0, 3.0));
        catalog.add_hull("Large Hull", 130, 80, Cost::new(10.0, 7.0));

        // The id given here is replaced by the catalog
        let id = ModuleId(0);
        let modules = [
            Module::engine(id, "Flash Engine", Cost::new(10.0, 8.0), 3.0, 20.0)
                .with_description("A slow but cheap engine"),
            Module::engine(id, "Headslam Engine", Cost::new(5.0, 8.0), 4.0, 9999.0)
                .with_description("A fast and cheap engine"),
            Module::engine(id, "Snail Engine", Cost::new(10.0, 11.0), 1.0, 40.0)
                .with_description("A slow engine with long range"),
            Module::sensor(id, "Tachyon Sensor", Cost::new(3.0, 3.0))
                .with_description("Scans for tachyons"),
            Module::sensor(id, "Gamma Sensor", Cost::new(3.0, 3.0))
                .with_description("Scans for gamma radiation"),
            Module::weapon(id, "Ripper", Cost::new(3.0, 4.0), 2)
                .with_description("Dangerous chainsaw launcher"),
            Module::weapon(id, "Breaker", Cost::new(5.0, 4.0), 4)
                .with_description("Fires a big hammer"),
            Module::weapon(id, "Slapper", Cost::new(1.0, 1.0), 1)
                .with_description("Fires bowling balls"),
            Module::colonization(id, "Aeres Colonization Module", Cost::new(8.0, 5.0)),
        ];
        for module in modules {
            catalog.add_module(module);
        }
        catalog
    }

    pub fn add_hull<T: ToString>(
        &mut self,
        name: T,
        max_health: u32,
        capacity: u32,
        cost: Cost,
    ) -> HullId {
        let id = HullId(self.hull_serial.next() as u16);
        self.hulls
            .insert(id, Hull::new(id, name, max_health, capacity, cost));
        id
    }

    pub fn add_module(&mut self, mut module: Module) -> ModuleId {
        let id = ModuleId(self.module_serial.next() as u16);
        module.id = id;
        self.modules.insert(id, module);
        id
    }

    pub fn hull(&self, id: HullId) -> Result<&Hull, Errcode> {
        self.hulls.get(&id).ok_or(Errcode::NoSuchHull(id))
    }

    pub fn hull_named(&self, name: &str) -> Option<&Hull> {
        self.hulls.values().find(|h| h.name == name)
    }

    pub fn hulls(&self) -> impl Iterator<Item = &Hull> {
        self.hulls.values()
    }

    pub fn module(&self, id: ModuleId) -> Result<&Module, Errcode> {
        self.modules.get(&id).ok_or(Errcode::NoSuchModule(id))
    }

    pub fn module_named(&self, name: &str) -> Option<&Module> {
        self.modules.values().find(|m| m.name == name)
    }

    pub fn all(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn of_category(&self, category: ModuleCategory) -> Vec<&Module> {
        self.modules
            .values()
            .filter(|m| m.category == category)
            .collect()
    }

    pub fn engines(&self) -> Vec<&Module> {
        self.of_category(ModuleCategory::Engine)
    }

    pub fn sensors(&self) -> Vec<&Module> {
        self.of_category(ModuleCategory::Sensor)
    }

    pub fn weapons(&self) -> Vec<&Module> {
        self.of_category(ModuleCategory::Weapon)
    }

    pub fn other(&self) -> Vec<&Module> {
        self.of_category(ModuleCategory::Colonization)
    }
}

fn part<'a>(catalog: &'a ModuleCatalog, name: &str) -> Result<&'a Module, Errcode> {
    catalog
        .module_named(name)
        .ok_or_else(|| Errcode::NoPartNamed(name.to_string()))
}

// Every civilization starts able to build colony ships and scouts
pub fn standard_specs(civ: CivId, catalog: &ModuleCatalog) -> Result<SpecManager, Errcode> {
    let mut specs = SpecManager::new(civ);
    let colony_hull = catalog
        .hull_named("Colony Hull")
        .ok_or_else(|| Errcode::NoPartNamed("Colony Hull".to_string()))?;
    let scout_hull = catalog
        .hull_named("Small Hull")
        .ok_or_else(|| Errcode::NoPartNamed("Small Hull".to_string()))?;

    specs.add_spec(
        COLONY_SHIP,
        colony_hull.clone(),
        [
            part(catalog, "Flash Engine")?,
            part(catalog, "Aeres Colonization Module")?,
        ],
    )?;
    specs.add_spec(
        SCOUT,
        scout_hull.clone(),
        [part(catalog, "Headslam Engine")?],
    )?;
    Ok(specs)
}

#[test]
fn test_standard_catalog() {
    let catalog = ModuleCatalog::standard();
    assert_eq!(catalog.hulls().count(), 4);
    assert_eq!(catalog.engines().len(), 3);
    assert_eq!(catalog.sensors().len(), 2);
    assert_eq!(catalog.weapons().len(), 3);
    assert_eq!(catalog.other().len(), 1);
    assert_eq!(catalog.all().count(), 9);

    let flash = catalog.module_named("Flash Engine").unwrap();
    assert_eq!(catalog.module(flash.id), Ok(flash));
    assert!(catalog.module(ModuleId(99)).is_err());
    assert_eq!(catalog.hull(HullId(4)).map(|h| h.capacity), Ok(80));
}

#[test]
fn test_standard_specs() {
    let catalog = ModuleCatalog::standard();
    let specs = standard_specs(CivId(1), &catalog).unwrap();
    assert_eq!(specs.names(), vec![COLONY_SHIP.to_string(), SCOUT.to_string()]);
    let scout = specs.get(SCOUT).unwrap();
    assert_eq!(scout.stats().range, 9999.0);
    assert_eq!(scout.civ, CivId(1));
    assert!(specs
        .get(COLONY_SHIP)
        .unwrap()
        .loadout()
        .has_category(ModuleCategory::Colonization));
}

#[test]
fn test_catalog_covers_every_category() {
    use strum::IntoEnumIterator;

    let catalog = ModuleCatalog::standard();
    for category in ModuleCategory::iter() {
        assert!(!catalog.of_category(category).is_empty(), "{category:?}");
    }
    assert_eq!("engine".parse::<ModuleCategory>(), Ok(ModuleCategory::Engine));
}
