use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::queue::ConstructionQueue;
use super::{Colony, ColonyId};
use crate::civilization::CivId;
use crate::config::EngineConfig;
use crate::errors::Errcode;
use crate::galaxy::system::StarSystem;
use crate::galaxy::SystemId;
use crate::ids::IdSource;
use crate::ship::spec::ShipSpec;
use crate::syslog::TurnEvent;

// Colonies of a civilization within one system, they share a single shipyard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemEconomy {
    pub system: SystemId,
    colonies: Vec<Colony>,
    income: f64,
    production: f64,
    queue: ConstructionQueue,
}

impl SystemEconomy {
    fn new(system: SystemId) -> SystemEconomy {
        SystemEconomy {
            system,
            colonies: vec![],
            income: 0.0,
            production: 0.0,
            queue: ConstructionQueue::new(),
        }
    }

    fn population(&self) -> f64 {
        self.colonies.iter().map(|c| c.population()).sum()
    }

    fn recompute(&mut self, income_rate: f64, production_rate: f64) {
        let pop = self.population();
        self.income = pop * income_rate - self.queue.cost();
        self.production = pop * production_rate;
    }

    pub fn colonies(&self) -> &[Colony] {
        &self.colonies
    }

    pub fn income(&self) -> f64 {
        self.income
    }

    pub fn production(&self) -> f64 {
        self.production
    }

    pub fn queue(&self) -> &ConstructionQueue {
        &self.queue
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColonyManager {
    civ: CivId,
    systems: BTreeMap<SystemId, SystemEconomy>,
    income: f64,
    income_rate: f64,
    production_rate: f64,
}

impl ColonyManager {
    pub fn new(civ: CivId, home: Colony, config: &EngineConfig) -> ColonyManager {
        let mut mgr = ColonyManager {
            civ,
            systems: BTreeMap::new(),
            income: 0.0,
            income_rate: config.income_per_pop,
            production_rate: config.production_per_pop,
        };
        mgr.register(home);
        mgr.refresh();
        mgr
    }

    fn register(&mut self, colony: Colony) {
        self.systems
            .entry(colony.system)
            .or_insert_with(|| SystemEconomy::new(colony.system))
            .colonies
            .push(colony);
    }

    // Settles an object of the system, one colony ship of ours docked there is used up
    pub fn colonize(
        &mut self,
        ids: &mut IdSource,
        system: &mut StarSystem,
        orbit: u8,
        config: &EngineConfig,
    ) -> Result<ColonyId, Errcode> {
        let Some(obj) = system.object(orbit) else {
            return Err(Errcode::NoSuchSystemObject(system.id, orbit));
        };
        if obj.colony.is_some() {
            return Err(Errcode::AlreadyColonized(system.id, orbit));
        }
        let Some(shipid) = system.find_ship(self.civ, |s| s.is_colony_ship()) else {
            return Err(Errcode::NoColonyShip(system.id));
        };

        system.leave(&[shipid]);
        let colony = Colony::found(ids.next_colony(), system.id, orbit, config);
        let id = colony.id;
        if let Some(obj) = system.object_mut(orbit) {
            obj.colony = Some(id);
        }
        log::debug!("Colony {id} founded on {} using ship {shipid}", system.name);
        // Income and production only account for it from the next update
        self.register(colony);
        Ok(id)
    }

    pub fn build(&mut self, system: SystemId, spec: &ShipSpec) -> Result<(), Errcode> {
        let Some(economy) = self.systems.get_mut(&system) else {
            return Err(Errcode::NoColonyInSystem(system));
        };
        economy.queue.build(spec, economy.production);
        Ok(())
    }

    // Queues work with last turn's production, growth only shows up next turn
    pub fn update(
        &mut self,
        systems: &mut BTreeMap<SystemId, StarSystem>,
        growth: f64,
        ids: &mut IdSource,
    ) -> Vec<TurnEvent> {
        let mut events = vec![];
        for (sysid, economy) in self.systems.iter_mut() {
            let Some(system) = systems.get_mut(sysid) else {
                log::error!("Civilization {} has colonies in unknown system {sysid}", self.civ);
                continue;
            };
            if let Some(evt) = economy.queue.update(economy.production, system, ids) {
                events.push(evt);
            }
            for colony in economy.colonies.iter_mut() {
                colony.update(growth);
            }
        }
        self.refresh();
        events
    }

    // Recomputes the economy without advancing anything
    pub fn refresh(&mut self) {
        let mut income = 0.0;
        for economy in self.systems.values_mut() {
            economy.recompute(self.income_rate, self.production_rate);
            income += economy.income;
        }
        self.income = income;
    }

    pub fn income(&self) -> f64 {
        self.income
    }

    pub fn production(&self) -> f64 {
        self.systems.values().map(|e| e.production).sum()
    }

    pub fn systems(&self) -> Vec<SystemId> {
        self.systems.keys().copied().collect()
    }

    pub fn owns(&self, system: SystemId) -> bool {
        self.systems.contains_key(&system)
    }

    pub fn economy(&self, system: SystemId) -> Option<&SystemEconomy> {
        self.systems.get(&system)
    }

    pub fn colonies(&self) -> impl Iterator<Item = &Colony> {
        self.systems.values().flat_map(|e| e.colonies.iter())
    }
}

#[cfg(test)]
use crate::catalog::{standard_specs, ModuleCatalog, COLONY_SHIP, SCOUT};
#[cfg(test)]
use crate::galaxy::body::{Body, PlanetType};
#[cfg(test)]
use crate::galaxy::{system::StarType, GridPos};

#[cfg(test)]
fn home_and_colony() -> (StarSystem, ColonyManager, IdSource) {
    let config = EngineConfig::default();
    let mut ids = IdSource::new(CivId(1));
    let mut system = StarSystem::new(
        SystemId(1),
        "Alon",
        GridPos::new(9, 2),
        StarType::Yellow,
        vec![Body::planet(PlanetType::Jungle), Body::planet(PlanetType::Barren)],
    );
    let home = Colony::found(ids.next_colony(), system.id, 1, &config);
    if let Some(obj) = system.object_mut(1) {
        obj.colony = Some(home.id);
    }
    let mgr = ColonyManager::new(CivId(1), home, &config);
    (system, mgr, ids)
}

#[test]
fn test_colonize_requires_colony_ship() {
    let config = EngineConfig::default();
    let (mut system, mut mgr, mut ids) = home_and_colony();
    let specs = standard_specs(CivId(1), &ModuleCatalog::standard()).unwrap();

    specs.create(SCOUT, ids.next_ship(), &mut system).unwrap();
    assert_eq!(
        mgr.colonize(&mut ids, &mut system, 2, &config),
        Err(Errcode::NoColonyShip(SystemId(1)))
    );
    assert_eq!(system.ship_count(), 1);
    assert_eq!(mgr.colonies().count(), 1);

    specs.create(COLONY_SHIP, ids.next_ship(), &mut system).unwrap();
    specs.create(COLONY_SHIP, ids.next_ship(), &mut system).unwrap();
    assert_eq!(
        mgr.colonize(&mut ids, &mut system, 1, &config),
        Err(Errcode::AlreadyColonized(SystemId(1), 1))
    );
    assert_eq!(
        mgr.colonize(&mut ids, &mut system, 7, &config),
        Err(Errcode::NoSuchSystemObject(SystemId(1), 7))
    );

    let colony = mgr.colonize(&mut ids, &mut system, 2, &config).unwrap();
    assert_eq!(system.ship_count(), 2);
    assert!(system.has_ships(CivId(1), |s| s.is_colony_ship()));
    assert_eq!(mgr.colonies().count(), 2);
    assert_eq!(system.object(2).and_then(|o| o.colony), Some(colony));
    assert_eq!(mgr.systems(), vec![SystemId(1)]);
}

#[test]
fn test_economy_follows_population() {
    let (system, mut mgr, mut ids) = home_and_colony();
    assert_eq!(mgr.income(), 1.2);
    assert_eq!(mgr.production(), 0.75);
    let specs = standard_specs(CivId(1), &ModuleCatalog::standard()).unwrap();
    assert_eq!(
        mgr.build(SystemId(2), specs.get(SCOUT).unwrap()),
        Err(Errcode::NoColonyInSystem(SystemId(2)))
    );

    let mut systems = BTreeMap::new();
    systems.insert(system.id, system);
    let events = mgr.update(&mut systems, 1.0, &mut ids);
    assert!(events.is_empty());
    assert_eq!(mgr.income(), 2.0 * 1.2);
    assert_eq!(mgr.production(), 2.0 * 0.75);
}

#[test]
fn test_construction_cost_lowers_income() {
    let (system, mut mgr, mut ids) = home_and_colony();
    let specs = standard_specs(CivId(1), &ModuleCatalog::standard()).unwrap();
    let scout = specs.get(SCOUT).unwrap();
    mgr.build(SystemId(1), scout).unwrap();
    let planned = mgr.economy(SystemId(1)).and_then(|e| e.queue().head()).map(|e| e.turn_cost);

    let mut systems = BTreeMap::new();
    systems.insert(system.id, system);
    mgr.update(&mut systems, 0.0, &mut ids);
    let paid = mgr.economy(SystemId(1)).map(|e| e.queue().cost());
    assert_eq!(paid, planned);
    assert_eq!(mgr.income(), 1.2 - planned.unwrap_or_default());
}

#[test]
fn test_new_colony_counts_from_next_update() {
    let config = EngineConfig::default();
    let (mut system, mut mgr, mut ids) = home_and_colony();
    let specs = standard_specs(CivId(1), &ModuleCatalog::standard()).unwrap();
    specs.create(COLONY_SHIP, ids.next_ship(), &mut system).unwrap();
    mgr.colonize(&mut ids, &mut system, 2, &config).unwrap();
    assert_eq!(mgr.colonies().count(), 2);
    assert_eq!(mgr.income(), 1.2);
    assert_eq!(mgr.production(), 0.75);

    let mut systems = BTreeMap::new();
    systems.insert(system.id, system);
    mgr.update(&mut systems, 1.0, &mut ids);
    assert_eq!(mgr.income(), 4.0 * 1.2);
    assert_eq!(mgr.production(), 4.0 * 0.75);
}
