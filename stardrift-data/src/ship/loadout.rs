use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::hull::Hull;
use super::module::{Module, ModuleCategory, ModuleId};
use super::shipstats::ShipStats;
use crate::errors::Errcode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadoutEntry {
    pub module: Module,
    pub count: u32,
}

// The modules fitted into a hull, never more than the hull can hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    hull: Hull,
    used: u32,
    modules: BTreeMap<ModuleId, LoadoutEntry>,
}

impl Loadout {
    pub fn new(hull: Hull) -> Loadout {
        Loadout {
            hull,
            used: 0,
            modules: BTreeMap::new(),
        }
    }

    // Every module has to fit, or nothing is built at all
    pub fn with_modules<'a, I>(hull: Hull, modules: I) -> Result<Loadout, Errcode>
    where
        I: IntoIterator<Item = &'a Module>,
    {
        let mut loadout = Loadout::new(hull);
        let mut needed = 0;
        let mut overflow = false;
        for module in modules {
            needed += module.footprint;
            if !loadout.add(module) {
                overflow = true;
            }
        }
        if overflow {
            return Err(Errcode::LoadoutOverflow {
                needed,
                capacity: loadout.hull.capacity,
            });
        }
        Ok(loadout)
    }

    // Rebuilds the content of another loadout on the given hull
    pub fn refit(hull: Hull, other: &Loadout) -> Result<Loadout, Errcode> {
        if other.used > hull.capacity {
            return Err(Errcode::LoadoutOverflow {
                needed: other.used,
                capacity: hull.capacity,
            });
        }
        let mut loadout = Loadout::new(hull);
        for entry in other.modules.values() {
            for _ in 0..entry.count {
                if !loadout.add(&entry.module) {
                    return Err(Errcode::LoadoutOverflow {
                        needed: other.used,
                        capacity: loadout.hull.capacity,
                    });
                }
            }
        }
        Ok(loadout)
    }

    pub fn add(&mut self, module: &Module) -> bool {
        if self.used + module.footprint > self.hull.capacity {
            log::debug!(
                "{} doesn't fit in {} ({}/{} used)",
                module.name,
                self.hull.name,
                self.used,
                self.hull.capacity
            );
            return false;
        }

        if let Some(entry) = self.modules.get_mut(&module.id) {
            entry.count += 1;
        } else {
            self.modules.insert(
                module.id,
                LoadoutEntry {
                    module: module.clone(),
                    count: 1,
                },
            );
        }
        self.used += module.footprint;
        true
    }

    pub fn remove(&mut self, id: ModuleId) -> Result<(), Errcode> {
        let Some(entry) = self.modules.get_mut(&id) else {
            return Err(Errcode::NoSuchModule(id));
        };
        self.used -= entry.module.footprint;
        entry.count -= 1;
        if entry.count == 0 {
            self.modules.remove(&id);
        }
        Ok(())
    }

    pub fn stats(&self) -> ShipStats {
        let mut stats = ShipStats {
            cost: self.hull.cost,
            space_taken: self.used,
            ..Default::default()
        };
        for entry in self.modules.values() {
            let deltas = &entry.module.deltas;
            stats.max_health += deltas.health * entry.count;
            stats.speed += deltas.speed * (entry.count as f64);
            stats.range += deltas.range * (entry.count as f64);
            stats.attack += deltas.attack * entry.count;
            stats.cost += entry.module.cost * entry.count;
        }
        stats
    }

    pub fn hull(&self) -> &Hull {
        &self.hull
    }

    pub fn space_taken(&self) -> u32 {
        self.used
    }

    pub fn space_left(&self) -> u32 {
        self.hull.capacity - self.used
    }

    pub fn count(&self, id: ModuleId) -> u32 {
        self.modules.get(&id).map(|e| e.count).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn has_category(&self, category: ModuleCategory) -> bool {
        self.modules
            .values()
            .any(|e| e.module.category == category)
    }

    pub fn entries(&self) -> Vec<LoadoutEntry> {
        self.modules.values().cloned().collect()
    }

    pub fn of_category(&self, category: ModuleCategory) -> Vec<LoadoutEntry> {
        self.modules
            .values()
            .filter(|e| e.module.category == category)
            .cloned()
            .collect()
    }

    pub fn engines(&self) -> Vec<LoadoutEntry> {
        self.of_category(ModuleCategory::Engine)
    }

    pub fn sensors(&self) -> Vec<LoadoutEntry> {
        self.of_category(ModuleCategory::Sensor)
    }

    pub fn weapons(&self) -> Vec<LoadoutEntry> {
        self.of_category(ModuleCategory::Weapon)
    }

    pub fn other(&self) -> Vec<LoadoutEntry> {
        self.of_category(ModuleCategory::Colonization)
    }

    // One module per fitted unit, in module id order
    pub fn flatten(&self) -> Vec<Module> {
        self.modules
            .values()
            .flat_map(|e| std::iter::repeat(e.module.clone()).take(e.count as usize))
            .collect()
    }
}

#[cfg(test)]
use super::hull::HullId;
#[cfg(test)]
use crate::resources::Cost;

#[cfg(test)]
fn small_hull() -> Hull {
    Hull::new(HullId(1), "Small Hull", 15, 20, Cost::new(1.0, 1.0))
}

#[test]
fn test_loadout_capacity() {
    let sizes = [5, 10, 4, 3, 1, 7, 2];
    let mut loadout = Loadout::new(small_hull());
    let mut accepted = 0;
    for (n, size) in sizes.iter().enumerate() {
        let module =
            Module::sensor(ModuleId(n as u16), "Sensor", Cost::new(1.0, 1.0)).with_footprint(*size);
        let fits = accepted + size <= 20;
        assert_eq!(loadout.add(&module), fits, "module {n} of size {size}");
        if fits {
            accepted += size;
        }
        assert_eq!(loadout.stats().space_taken, accepted);
    }
    assert_eq!(accepted, 20);
    assert_eq!(loadout.space_left(), 0);
}

#[test]
fn test_loadout_stats_count_every_unit() {
    let engine = Module::engine(ModuleId(1), "Flash Engine", Cost::new(10.0, 8.0), 3.0, 20.0);
    let weapon = Module::weapon(ModuleId(2), "Ripper", Cost::new(3.0, 4.0), 2).with_health(1);
    let loadout = Loadout::with_modules(small_hull(), [&engine, &weapon, &weapon]).unwrap();

    let stats = loadout.stats();
    assert_eq!(stats.speed, 3.0);
    assert_eq!(stats.range, 20.0);
    assert_eq!(stats.attack, 4);
    assert_eq!(stats.max_health, 2);
    assert_eq!(stats.space_taken, 15);
    assert_eq!(stats.cost, Cost::new(1.0 + 10.0 + 6.0, 1.0 + 8.0 + 8.0));
    assert_eq!(loadout.count(ModuleId(2)), 2);
    assert_eq!(loadout.weapons().len(), 1);
    assert!(loadout.has_category(crate::ship::module::ModuleCategory::Engine));
    assert!(!loadout.has_category(crate::ship::module::ModuleCategory::Colonization));
    assert_eq!(loadout.flatten().len(), 3);
}

#[test]
fn test_loadout_remove() {
    let weapon = Module::weapon(ModuleId(2), "Ripper", Cost::new(3.0, 4.0), 2);
    let mut loadout = Loadout::with_modules(small_hull(), [&weapon, &weapon]).unwrap();
    assert_eq!(loadout.remove(ModuleId(2)), Ok(()));
    assert_eq!(loadout.space_taken(), 5);
    assert_eq!(loadout.remove(ModuleId(2)), Ok(()));
    assert!(loadout.is_empty());
    assert_eq!(loadout.remove(ModuleId(2)), Err(Errcode::NoSuchModule(ModuleId(2))));
    assert_eq!(loadout.space_taken(), 0);
}

#[test]
fn test_loadout_overflow_is_fatal() {
    let big = Module::sensor(ModuleId(3), "Dish", Cost::new(1.0, 1.0)).with_footprint(15);
    let res = Loadout::with_modules(small_hull(), [&big, &big]);
    assert_eq!(
        res,
        Err(Errcode::LoadoutOverflow {
            needed: 30,
            capacity: 20
        })
    );

    let medium = Hull::new(HullId(2), "Medium Hull", 50, 40, Cost::new(3.0, 3.0));
    let full = Loadout::with_modules(medium, [&big, &big]).unwrap();
    assert!(Loadout::refit(small_hull(), &full).is_err());

    let large = Hull::new(HullId(3), "Large Hull", 130, 80, Cost::new(10.0, 7.0));
    let refitted = Loadout::refit(large, &full).unwrap();
    assert_eq!(refitted.space_taken(), 30);
    assert_eq!(refitted.count(ModuleId(3)), 2);
    assert_eq!(refitted.stats().cost, Cost::new(12.0, 9.0));
}
