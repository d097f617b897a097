use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::design::ShipDesign;
use super::hull::Hull;
use super::loadout::Loadout;
use super::module::Module;
use super::shipstats::ShipStats;
use super::{Ship, ShipId};
use crate::civilization::CivId;
use crate::errors::Errcode;
use crate::galaxy::system::StarSystem;
use crate::resources::Cost;

// Hull base values plus everything the modules add
pub(crate) fn derive_stats(loadout: &Loadout) -> ShipStats {
    let mut stats = loadout.stats();
    stats.max_health += loadout.hull().max_health;
    stats
}

// Template civilizations build their ships from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSpec {
    pub civ: CivId,
    pub name: String,
    loadout: Loadout,
    stats: ShipStats,
}

impl ShipSpec {
    pub fn new<'a, T, I>(civ: CivId, name: T, hull: Hull, modules: I) -> Result<ShipSpec, Errcode>
    where
        T: ToString,
        I: IntoIterator<Item = &'a Module>,
    {
        let loadout = Loadout::with_modules(hull, modules)?;
        ShipSpec::from_loadout(civ, name, loadout)
    }

    pub fn from_loadout<T: ToString>(
        civ: CivId,
        name: T,
        loadout: Loadout,
    ) -> Result<ShipSpec, Errcode> {
        let stats = derive_stats(&loadout);
        if stats.space_taken > loadout.hull().capacity {
            return Err(Errcode::CapacityExceeded {
                used: stats.space_taken,
                capacity: loadout.hull().capacity,
            });
        }
        Ok(ShipSpec {
            civ,
            name: name.to_string(),
            loadout,
            stats,
        })
    }

    // The loadout is replaced as a whole, the old one stays if the new one doesn't fit
    pub fn update_modules<'a, I>(&mut self, modules: I) -> Result<(), Errcode>
    where
        I: IntoIterator<Item = &'a Module>,
    {
        let loadout =
            Loadout::with_modules(self.hull().clone(), modules).map_err(|e| match e {
                Errcode::LoadoutOverflow { needed, capacity } => Errcode::CapacityExceeded {
                    used: needed,
                    capacity,
                },
                e => e,
            })?;
        self.stats = derive_stats(&loadout);
        self.loadout = loadout;
        Ok(())
    }

    pub fn hull(&self) -> &Hull {
        self.loadout.hull()
    }

    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    pub fn stats(&self) -> ShipStats {
        self.stats
    }

    pub fn cost(&self) -> Cost {
        self.stats.cost
    }

    pub fn space_taken(&self) -> u32 {
        self.stats.space_taken
    }

    // New ships are docked right away, they never go through deep space
    pub fn create(&self, id: ShipId, system: &mut StarSystem) -> ShipId {
        log::debug!("Ship {id} of type {:?} created in {}", self.name, system.name);
        system.enter(vec![Ship::from_spec(id, self)]);
        id
    }
}

// Ship specifications of a single civilization, by name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecManager {
    civ: CivId,
    specs: BTreeMap<String, ShipSpec>,
}

impl SpecManager {
    pub fn new(civ: CivId) -> SpecManager {
        SpecManager {
            civ,
            specs: BTreeMap::new(),
        }
    }

    fn check_name(&self, name: &str) -> Result<String, Errcode> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Errcode::InvalidSpecName);
        }
        if self.specs.contains_key(name) {
            return Err(Errcode::SpecAlreadyExists(name.to_string()));
        }
        Ok(name.to_string())
    }

    pub fn add_spec<'a, I>(&mut self, name: &str, hull: Hull, modules: I) -> Result<(), Errcode>
    where
        I: IntoIterator<Item = &'a Module>,
    {
        let name = self.check_name(name)?;
        let spec = ShipSpec::new(self.civ, &name, hull, modules)?;
        self.specs.insert(name, spec);
        Ok(())
    }

    pub fn update_spec<'a, I>(&mut self, name: &str, modules: I) -> Result<(), Errcode>
    where
        I: IntoIterator<Item = &'a Module>,
    {
        let Some(spec) = self.specs.get_mut(name) else {
            return Err(Errcode::NoSuchSpec(name.to_string()));
        };
        spec.update_modules(modules)
    }

    pub fn remove_spec(&mut self, name: &str) -> Result<ShipSpec, Errcode> {
        self.specs
            .remove(name)
            .ok_or_else(|| Errcode::NoSuchSpec(name.to_string()))
    }

    pub fn rename_spec(&mut self, old: &str, new: &str) -> Result<(), Errcode> {
        if !self.specs.contains_key(old) {
            return Err(Errcode::NoSuchSpec(old.to_string()));
        }
        let new = self.check_name(new)?;
        if let Some(mut spec) = self.specs.remove(old) {
            spec.name = new.clone();
            self.specs.insert(new, spec);
        }
        Ok(())
    }

    // Stores a design, replacing the spec it was opened from
    pub fn save(&mut self, design: &ShipDesign) -> Result<(), Errcode> {
        let name = design.name().trim();
        if name.is_empty() {
            return Err(Errcode::InvalidSpecName);
        }
        let replaced = design.original().filter(|orig| self.specs.contains_key(*orig));
        if replaced != Some(name) && self.specs.contains_key(name) {
            return Err(Errcode::SpecAlreadyExists(name.to_string()));
        }

        let spec = ShipSpec::from_loadout(self.civ, name, design.loadout().clone())?;
        if let Some(orig) = replaced {
            self.specs.remove(orig);
        }
        log::debug!("Saved ship specification {name:?}");
        self.specs.insert(name.to_string(), spec);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&ShipSpec, Errcode> {
        self.specs
            .get(name)
            .ok_or_else(|| Errcode::NoSuchSpec(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    pub fn list(&self) -> impl Iterator<Item = &ShipSpec> {
        self.specs.values()
    }

    pub fn names(&self) -> Vec<String> {
        self.specs.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn create(
        &self,
        name: &str,
        id: ShipId,
        system: &mut StarSystem,
    ) -> Result<ShipId, Errcode> {
        Ok(self.get(name)?.create(id, system))
    }
}

#[cfg(test)]
use crate::catalog::ModuleCatalog;

#[cfg(test)]
fn colony_ship_parts() -> (Hull, Module, Module) {
    let catalog = ModuleCatalog::standard();
    (
        catalog.hull_named("Colony Hull").unwrap().clone(),
        catalog.module_named("Flash Engine").unwrap().clone(),
        catalog.module_named("Aeres Colonization Module").unwrap().clone(),
    )
}

#[test]
fn test_spec_derived_stats() {
    let (hull, engine, colony) = colony_ship_parts();
    let spec = ShipSpec::new(CivId(1), "Colony Ship", hull, [&engine, &colony]).unwrap();
    let stats = spec.stats();
    assert_eq!(stats.max_health, 1);
    assert_eq!(stats.speed, 3.0);
    assert_eq!(stats.range, 20.0);
    assert_eq!(stats.space_taken, 10);
    assert_eq!(spec.cost(), Cost::new(1.0 + 10.0 + 8.0, 1.0 + 8.0 + 5.0));
}

#[test]
fn test_spec_overcapacity_keeps_previous_state() {
    let (hull, engine, colony) = colony_ship_parts();
    let mut spec = ShipSpec::new(CivId(1), "Colony Ship", hull, [&engine]).unwrap();
    let before = spec.clone();

    let too_much = vec![&colony; 11];
    let res = spec.update_modules(too_much);
    assert_eq!(
        res,
        Err(Errcode::CapacityExceeded {
            used: 55,
            capacity: 50
        })
    );
    assert_eq!(spec, before);

    spec.update_modules([&engine, &engine, &colony]).unwrap();
    assert_eq!(spec.stats().speed, 6.0);
    assert_eq!(spec.space_taken(), 15);
}

#[test]
fn test_spec_manager_names() {
    let (hull, engine, colony) = colony_ship_parts();
    let mut specs = SpecManager::new(CivId(1));
    assert_eq!(specs.add_spec("  ", hull.clone(), [&engine]), Err(Errcode::InvalidSpecName));
    specs
        .add_spec(" Colony Ship ", hull.clone(), [&engine, &colony])
        .unwrap();
    assert!(specs.has("Colony Ship"));
    assert_eq!(
        specs.add_spec("Colony Ship", hull.clone(), [&engine]),
        Err(Errcode::SpecAlreadyExists("Colony Ship".to_string()))
    );
    assert_eq!(specs.get("Colony Ship").unwrap().loadout().count(colony.id), 1);

    specs.rename_spec("Colony Ship", "Settler").unwrap();
    assert_eq!(specs.names(), vec!["Settler".to_string()]);
    assert!(specs.get("Colony Ship").is_err());

    specs.update_spec("Settler", [&engine]).unwrap();
    assert!(!specs.get("Settler").unwrap().loadout().has_category(colony.category));
    assert!(specs.update_spec("Nope", [&engine]).is_err());

    assert!(specs.remove_spec("Settler").is_ok());
    assert!(specs.is_empty());
    assert_eq!(
        specs.remove_spec("Settler"),
        Err(Errcode::NoSuchSpec("Settler".to_string()))
    );
}
