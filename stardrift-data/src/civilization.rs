use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{standard_specs, ModuleCatalog};
use crate::colony::manager::ColonyManager;
use crate::colony::queue::QueueEntry;
use crate::colony::{Colony, ColonyId};
use crate::config::EngineConfig;
use crate::errors::Errcode;
use crate::galaxy::system::StarSystem;
use crate::galaxy::SystemId;
use crate::ids::IdSource;
use crate::ship::design::ShipDesign;
use crate::ship::fleet::FleetId;
use crate::ship::hull::HullId;
use crate::ship::spec::SpecManager;
use crate::ship::{Ship, ShipId};
use crate::syslog::{EventLog, TurnEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CivId(pub u16);

impl std::fmt::Display for CivId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "civ{}", self.0)
    }
}

// What a civilization can tell about a ship it sees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSighting {
    pub id: ShipId,
    pub civ: CivId,
    pub type_name: String,
}

impl From<&Ship> for ShipSighting {
    fn from(ship: &Ship) -> ShipSighting {
        ShipSighting {
            id: ship.id,
            civ: ship.civ,
            type_name: ship.type_name.clone(),
        }
    }
}

// State of a system the last time we had eyes on it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sighting {
    pub civs: Vec<CivId>,
    pub ships: Vec<ShipSighting>,
}

impl Sighting {
    fn of(system: &StarSystem) -> Sighting {
        Sighting {
            civs: system.civs(),
            ships: system.ships().map(ShipSighting::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub system: SystemId,
    pub income: f64,
    pub production: f64,
    pub queue: Vec<QueueEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Civilization {
    pub id: CivId,
    pub name: String,
    pub kind: String,
    pub home: SystemId,
    money: f64,
    income: f64,
    growth: f64,
    config: EngineConfig,
    modules: ModuleCatalog,
    specs: SpecManager,
    colonies: ColonyManager,
    visited: BTreeMap<SystemId, Sighting>,
    ids: IdSource,
    events: EventLog,
}

impl Civilization {
    pub fn new<T: ToString, U: ToString>(
        id: CivId,
        name: T,
        kind: U,
        home: &mut StarSystem,
        config: &EngineConfig,
    ) -> Result<Civilization, Errcode> {
        Civilization::with_catalog(id, name, kind, home, config, ModuleCatalog::standard())
    }

    // The home object is only claimed once the starting designs could be built
    pub fn with_catalog<T: ToString, U: ToString>(
        id: CivId,
        name: T,
        kind: U,
        home: &mut StarSystem,
        config: &EngineConfig,
        modules: ModuleCatalog,
    ) -> Result<Civilization, Errcode> {
        let Some(orbit) = home
            .objects()
            .first()
            .filter(|o| o.colony.is_none())
            .map(|o| o.orbit)
        else {
            return Err(Errcode::HomeUnavailable(home.id));
        };

        let specs = standard_specs(id, &modules)?;
        let mut ids = IdSource::new(id);
        let colony = Colony::found(ids.next_colony(), home.id, orbit, config);
        if let Some(obj) = home.object_mut(orbit) {
            obj.colony = Some(colony.id);
        }

        let colonies = ColonyManager::new(id, colony, config);
        let mut civ = Civilization {
            id,
            name: name.to_string(),
            kind: kind.to_string(),
            home: home.id,
            money: config.start_money,
            income: colonies.income(),
            growth: config.growth,
            config: config.clone(),
            modules,
            specs,
            colonies,
            visited: BTreeMap::new(),
            ids,
            events: EventLog::with_capacity(config.event_log_size),
        };
        civ.visit(home);
        log::debug!("Civilization {} ({}) settled in {}", civ.name, civ.id, home.name);
        Ok(civ)
    }

    // Last turn's income goes to the treasury before anything is built
    pub fn update(
        &mut self,
        systems: &mut BTreeMap<SystemId, StarSystem>,
        turn: u32,
    ) -> Vec<TurnEvent> {
        self.money += self.income;
        let events = self.colonies.update(systems, self.growth, &mut self.ids);
        self.income = self.colonies.income();
        for evt in events.iter() {
            self.record(turn, evt.clone());
        }
        events
    }

    pub fn visit(&mut self, system: &StarSystem) {
        self.visited.insert(system.id, Sighting::of(system));
    }

    pub fn visited(&self, system: SystemId) -> bool {
        self.colonies.owns(system) || self.visited.contains_key(&system)
    }

    pub fn known_systems(&self) -> Vec<SystemId> {
        let mut known: BTreeSet<SystemId> = self.visited.keys().copied().collect();
        known.extend(self.colonies.systems());
        known.into_iter().collect()
    }

    // Colonies or ships of ours in the system, the data is live
    fn sees(&self, system: &StarSystem) -> bool {
        self.colonies.owns(system.id) || system.has_ships(self.id, |_| true)
    }

    pub fn civs_in(&self, system: &StarSystem) -> Vec<CivId> {
        if self.sees(system) {
            return system.civs();
        }
        self.visited
            .get(&system.id)
            .map(|s| s.civs.clone())
            .unwrap_or_default()
    }

    pub fn ships_in(&self, system: &StarSystem) -> Vec<ShipSighting> {
        if self.sees(system) {
            return system.ships().map(ShipSighting::from).collect();
        }
        self.visited
            .get(&system.id)
            .map(|s| s.ships.clone())
            .unwrap_or_default()
    }

    pub fn system_info(&self, system: SystemId) -> Option<SystemInfo> {
        let economy = self.colonies.economy(system)?;
        Some(SystemInfo {
            system,
            income: economy.income(),
            production: economy.production(),
            queue: economy.queue().building(),
        })
    }

    pub fn colonize(&mut self, system: &mut StarSystem, orbit: u8) -> Result<ColonyId, Errcode> {
        let id = self
            .colonies
            .colonize(&mut self.ids, system, orbit, &self.config)?;
        self.visit(system);
        Ok(id)
    }

    pub fn build(&mut self, system: SystemId, spec: &str) -> Result<(), Errcode> {
        let spec = self.specs.get(spec)?;
        self.colonies.build(system, spec)
    }

    pub fn create_ship(&mut self, spec: &str, system: &mut StarSystem) -> Result<ShipId, Errcode> {
        let spec = self.specs.get(spec)?;
        Ok(spec.create(self.ids.next_ship(), system))
    }

    pub fn new_design(&self, hull: HullId) -> Result<ShipDesign, Errcode> {
        Ok(ShipDesign::new(self.modules.hull(hull)?.clone()))
    }

    pub fn edit_design(&self, spec: &str) -> Result<ShipDesign, Errcode> {
        Ok(ShipDesign::from_spec(self.specs.get(spec)?))
    }

    pub fn save_design(&mut self, design: &ShipDesign) -> Result<(), Errcode> {
        self.specs.save(design)
    }

    pub fn delete_design(&mut self, spec: &str) -> Result<(), Errcode> {
        self.specs.remove_spec(spec).map(|_| ())
    }

    pub fn rename_design(&mut self, old: &str, new: &str) -> Result<(), Errcode> {
        self.specs.rename_spec(old, new)
    }

    pub(crate) fn next_fleet_id(&mut self) -> FleetId {
        self.ids.next_fleet()
    }

    pub(crate) fn record(&mut self, turn: u32, evt: TurnEvent) {
        self.events.push(turn, evt);
    }

    pub fn events(&self) -> impl Iterator<Item = &(u32, TurnEvent)> {
        self.events.iter()
    }

    pub fn drain_events(&mut self) -> Vec<(u32, TurnEvent)> {
        self.events.remove_all()
    }

    pub fn money(&self) -> f64 {
        self.money
    }

    pub fn income(&self) -> f64 {
        self.income
    }

    pub fn production(&self) -> f64 {
        self.colonies.production()
    }

    pub fn growth(&self) -> f64 {
        self.growth
    }

    pub fn modules(&self) -> &ModuleCatalog {
        &self.modules
    }

    pub fn specs(&self) -> &SpecManager {
        &self.specs
    }

    pub fn colonies(&self) -> &ColonyManager {
        &self.colonies
    }

    pub fn report(&self) -> serde_json::Value {
        let systems: Vec<serde_json::Value> = self
            .colonies
            .systems()
            .into_iter()
            .filter_map(|id| self.system_info(id))
            .map(|info| {
                serde_json::json!({
                    "system": info.system.to_string(),
                    "income": info.income,
                    "production": info.production,
                    "queue": info.queue.iter().map(|e| e.report()).collect::<Vec<_>>(),
                })
            })
            .collect();
        serde_json::json!({
            "id": self.id.to_string(),
            "name": self.name,
            "kind": self.kind,
            "money": self.money,
            "income": self.income,
            "production": self.production(),
            "colonies": self.colonies.colonies().count(),
            "known_systems": self.known_systems().len(),
            "systems": systems,
        })
    }
}

#[cfg(test)]
use crate::catalog::{COLONY_SHIP, SCOUT};
#[cfg(test)]
use crate::galaxy::body::{Body, PlanetType};
#[cfg(test)]
use crate::galaxy::{system::StarType, GridPos};

#[cfg(test)]
fn homeworld() -> StarSystem {
    StarSystem::new(
        SystemId(1),
        "Alon",
        GridPos::new(2, 9),
        StarType::Yellow,
        vec![Body::planet(PlanetType::Jungle), Body::planet(PlanetType::Barren)],
    )
}

#[test]
fn test_civ_starts_with_home_colony() {
    let config = EngineConfig::default();
    let mut home = homeworld();
    let civ = Civilization::new(CivId(1), "Alon", "Empire", &mut home, &config).unwrap();
    assert_eq!(civ.money(), 5000.0);
    assert_eq!(civ.income(), 1.2);
    assert_eq!(civ.production(), 0.75);
    assert!(civ.visited(home.id));
    assert_eq!(civ.known_systems(), vec![home.id]);
    assert!(civ.specs().has(COLONY_SHIP) && civ.specs().has(SCOUT));
    assert_eq!(home.civs(), vec![CivId(1)]);
    assert!(home.object(1).and_then(|o| o.colony).is_some());

    let mut empty = StarSystem::new(SystemId(2), "Gva", GridPos::new(3, 5), StarType::Red, vec![]);
    assert_eq!(
        Civilization::new(CivId(2), "Gva", "Swarm", &mut empty, &config).err(),
        Some(Errcode::HomeUnavailable(SystemId(2)))
    );
    assert_eq!(
        Civilization::new(CivId(2), "Alon", "Swarm", &mut home, &config).err(),
        Some(Errcode::HomeUnavailable(SystemId(1)))
    );
}

#[test]
fn test_civ_without_designs_leaves_home_free() {
    let config = EngineConfig::default();
    let mut home = homeworld();
    let civ = Civilization::with_catalog(
        CivId(1),
        "Alon",
        "Empire",
        &mut home,
        &config,
        ModuleCatalog::empty(),
    );
    assert_eq!(civ.err(), Some(Errcode::NoPartNamed("Colony Hull".to_string())));
    assert!(home.object(1).and_then(|o| o.colony).is_none());
    assert!(home.civs().is_empty());
    assert!(Civilization::new(CivId(1), "Alon", "Empire", &mut home, &config).is_ok());
}

#[test]
fn test_civ_income_lags_one_turn() {
    let config = EngineConfig::default();
    let mut home = homeworld();
    let mut civ = Civilization::new(CivId(1), "Alon", "Empire", &mut home, &config).unwrap();
    let mut systems = BTreeMap::new();
    systems.insert(home.id, home);

    civ.update(&mut systems, 1);
    assert_eq!(civ.money(), 5000.0 + 1.2);
    assert_eq!(civ.income(), (1.0 + 0.15) * 1.2);

    civ.update(&mut systems, 2);
    assert_eq!(civ.money(), 5000.0 + 1.2 + (1.0 + 0.15) * 1.2);
}

#[test]
fn test_civ_designs() {
    let config = EngineConfig::default();
    let mut home = homeworld();
    let mut civ = Civilization::new(CivId(1), "Alon", "Empire", &mut home, &config).unwrap();

    let mut design = civ.edit_design(SCOUT).unwrap();
    let sensor = civ.modules().module_named("Tachyon Sensor").unwrap().clone();
    assert!(design.add(&sensor));
    design.rename("Watcher");
    civ.save_design(&design).unwrap();
    assert!(civ.specs().has("Watcher"));
    assert!(!civ.specs().has(SCOUT));

    assert!(civ.build(home.id, "Watcher").is_ok());
    assert_eq!(civ.build(home.id, SCOUT), Err(Errcode::NoSuchSpec(SCOUT.to_string())));
    civ.rename_design("Watcher", "Lookout").unwrap();
    assert_eq!(
        civ.rename_design("Watcher", "Lookout"),
        Err(Errcode::NoSuchSpec("Watcher".to_string()))
    );
    civ.rename_design("Lookout", "Watcher").unwrap();
    civ.delete_design("Watcher").unwrap();
    assert!(civ.delete_design("Watcher").is_err());
    assert!(civ.new_design(HullId(42)).is_err());
}
