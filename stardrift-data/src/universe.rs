use std::collections::{BTreeMap, HashMap};

use crate::civilization::{CivId, Civilization, ShipSighting, SystemInfo};
use crate::colony::ColonyId;
use crate::config::EngineConfig;
use crate::errors::Errcode;
use crate::galaxy::body::Body;
use crate::galaxy::deepspace::{DeepSpace, Transit};
use crate::galaxy::system::{StarSystem, StarType};
use crate::galaxy::{get_distance, GridPos, GridUnit, SystemId};
use crate::ids::Serial;
use crate::ship::design::ShipDesign;
use crate::ship::fleet::{Fleet, FleetId};
use crate::ship::ShipId;
use crate::syslog::TurnEvent;

pub struct Universe {
    pub width: GridUnit,
    pub height: GridUnit,
    config: EngineConfig,
    systems: BTreeMap<SystemId, StarSystem>,
    names: HashMap<String, SystemId>,
    coords: HashMap<GridPos, SystemId>,
    civs: BTreeMap<CivId, Civilization>,
    deep_space: DeepSpace,
    turn: u32,
    system_serial: Serial,
    civ_serial: Serial,
}

impl Universe {
    pub fn new(width: GridUnit, height: GridUnit) -> Universe {
        Universe::with_config(width, height, EngineConfig::default())
    }

    pub fn with_config(width: GridUnit, height: GridUnit, config: EngineConfig) -> Universe {
        Universe {
            width,
            height,
            config,
            systems: BTreeMap::new(),
            names: HashMap::new(),
            coords: HashMap::new(),
            civs: BTreeMap::new(),
            deep_space: DeepSpace::new(),
            turn: 0,
            system_serial: Serial::default(),
            civ_serial: Serial::default(),
        }
    }

    pub fn add_system<T: ToString>(
        &mut self,
        name: T,
        pos: GridPos,
        star: StarType,
        bodies: Vec<Body>,
    ) -> Result<SystemId, Errcode> {
        let name = name.to_string().trim().to_string();
        if pos.row >= self.height || pos.col >= self.width {
            return Err(Errcode::OutOfBounds(pos.row, pos.col));
        }
        if self.names.contains_key(&name) {
            return Err(Errcode::SystemAlreadyExists(name));
        }
        if self.coords.contains_key(&pos) {
            return Err(Errcode::PositionTaken(pos.row, pos.col));
        }

        let id = SystemId(self.system_serial.next() as u16);
        log::debug!("System {name} ({id}) placed at {}:{}", pos.row, pos.col);
        self.names.insert(name.clone(), id);
        self.coords.insert(pos, id);
        self.systems
            .insert(id, StarSystem::new(id, name, pos, star, bodies));
        Ok(id)
    }

    pub fn add_civ<T: ToString, U: ToString>(
        &mut self,
        name: T,
        kind: U,
        home: SystemId,
    ) -> Result<CivId, Errcode> {
        let Some(system) = self.systems.get_mut(&home) else {
            return Err(Errcode::NoSuchSystem(home));
        };
        let id = CivId(self.civ_serial.last() as u16 + 1);
        let civ = Civilization::new(id, name, kind, system, &self.config)?;
        self.civ_serial.next();
        self.civs.insert(id, civ);
        Ok(id)
    }

    pub fn system(&self, id: SystemId) -> Result<&StarSystem, Errcode> {
        self.systems.get(&id).ok_or(Errcode::NoSuchSystem(id))
    }

    pub fn system_by_name(&self, name: &str) -> Result<&StarSystem, Errcode> {
        let Some(id) = self.names.get(name.trim()) else {
            return Err(Errcode::NoSystemNamed(name.to_string()));
        };
        self.system(*id)
    }

    pub fn system_at(&self, row: GridUnit, col: GridUnit) -> Option<&StarSystem> {
        self.coords
            .get(&GridPos::new(row, col))
            .and_then(|id| self.systems.get(id))
    }

    pub fn systems(&self) -> impl Iterator<Item = &StarSystem> {
        self.systems.values()
    }

    pub fn civ(&self, id: CivId) -> Result<&Civilization, Errcode> {
        self.civs.get(&id).ok_or(Errcode::NoSuchCiv(id))
    }

    pub fn civ_mut(&mut self, id: CivId) -> Result<&mut Civilization, Errcode> {
        self.civs.get_mut(&id).ok_or(Errcode::NoSuchCiv(id))
    }

    pub fn civs(&self) -> impl Iterator<Item = &Civilization> {
        self.civs.values()
    }

    pub fn distance(&self, a: SystemId, b: SystemId) -> Result<f64, Errcode> {
        Ok(self.system(a)?.distance_to(self.system(b)?))
    }

    pub fn get_distance(&self, a: &GridPos, b: &GridPos) -> f64 {
        get_distance(a, b)
    }

    pub fn deep_space(&self) -> &DeepSpace {
        &self.deep_space
    }

    pub fn in_transit(&self, civ: CivId) -> Vec<&Transit> {
        self.deep_space.in_transit(civ)
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn known_systems(&self, civ: CivId) -> Result<Vec<SystemId>, Errcode> {
        Ok(self.civ(civ)?.known_systems())
    }

    pub fn civs_in(&self, civ: CivId, system: SystemId) -> Result<Vec<CivId>, Errcode> {
        Ok(self.civ(civ)?.civs_in(self.system(system)?))
    }

    pub fn ships_in(&self, civ: CivId, system: SystemId) -> Result<Vec<ShipSighting>, Errcode> {
        Ok(self.civ(civ)?.ships_in(self.system(system)?))
    }

    pub fn system_info(&self, civ: CivId, system: SystemId) -> Result<Option<SystemInfo>, Errcode> {
        self.system(system)?;
        Ok(self.civ(civ)?.system_info(system))
    }

    pub fn create_ship(
        &mut self,
        civ: CivId,
        spec: &str,
        system: SystemId,
    ) -> Result<ShipId, Errcode> {
        let Some(sys) = self.systems.get_mut(&system) else {
            return Err(Errcode::NoSuchSystem(system));
        };
        let Some(owner) = self.civs.get_mut(&civ) else {
            return Err(Errcode::NoSuchCiv(civ));
        };
        owner.create_ship(spec, sys)
    }

    pub fn assemble_fleet(
        &mut self,
        civ: CivId,
        system: SystemId,
        ships: &[ShipId],
    ) -> Result<Fleet, Errcode> {
        let Some(sys) = self.systems.get(&system) else {
            return Err(Errcode::NoSuchSystem(system));
        };
        let Some(owner) = self.civs.get_mut(&civ) else {
            return Err(Errcode::NoSuchCiv(civ));
        };
        if ships.is_empty() {
            return Err(Errcode::EmptyFleet);
        }
        Fleet::assemble(owner.next_fleet_id(), civ, sys, ships)
    }

    // Everything send_fleet verifies, without moving anything
    pub fn check_departure(
        &self,
        fleet: &Fleet,
        dest: SystemId,
    ) -> Result<(SystemId, f64), Errcode> {
        let Some(origin) = fleet.system else {
            return Err(Errcode::FleetInTransit);
        };
        if fleet.is_empty() {
            return Err(Errcode::EmptyFleet);
        }
        self.civ(fleet.civ)?;
        let from = self.system(origin)?;
        let distance = from.distance_to(self.system(dest)?);
        if !fleet.can_reach(distance) {
            return Err(Errcode::OutOfRange(distance, fleet.range()));
        }
        for ship in fleet.ships() {
            if from.ship(&ship.id).filter(|s| s.civ == fleet.civ).is_none() {
                return Err(Errcode::ShipNotInSystem(ship.id));
            }
        }
        Ok((origin, distance))
    }

    // The fleet is handed back along with the error when it can't leave
    pub fn send_fleet(
        &mut self,
        mut fleet: Fleet,
        dest: SystemId,
    ) -> Result<FleetId, (Fleet, Errcode)> {
        let (origin, distance) = match self.check_departure(&fleet, dest) {
            Ok(res) => res,
            Err(e) => return Err((fleet, e)),
        };
        let Some(from) = self.systems.get_mut(&origin) else {
            return Err((fleet, Errcode::NoSuchSystem(origin)));
        };

        let docked = from.leave(&fleet.ship_ids());
        fleet.take_ships();
        fleet.add_ships(docked);
        fleet.refresh();

        let id = fleet.id;
        let civ = fleet.civ;
        self.deep_space.enter(fleet, origin, dest, distance);
        if let Some(owner) = self.civs.get_mut(&civ) {
            owner.record(
                self.turn,
                TurnEvent::FleetDeparted {
                    civ,
                    fleet: id,
                    origin,
                    destination: dest,
                    distance,
                },
            );
        }
        Ok(id)
    }

    pub fn colonize(
        &mut self,
        civ: CivId,
        system: SystemId,
        orbit: u8,
    ) -> Result<ColonyId, Errcode> {
        let Some(sys) = self.systems.get_mut(&system) else {
            return Err(Errcode::NoSuchSystem(system));
        };
        let Some(owner) = self.civs.get_mut(&civ) else {
            return Err(Errcode::NoSuchCiv(civ));
        };
        let colony = owner.colonize(sys, orbit)?;
        owner.record(
            self.turn,
            TurnEvent::Colonized {
                civ,
                system,
                orbit,
                colony,
            },
        );
        Ok(colony)
    }

    pub fn build(&mut self, civ: CivId, system: SystemId, spec: &str) -> Result<(), Errcode> {
        self.system(system)?;
        self.civ_mut(civ)?.build(system, spec)
    }

    pub fn save_design(&mut self, civ: CivId, design: &ShipDesign) -> Result<(), Errcode> {
        self.civ_mut(civ)?.save_design(design)
    }

    pub fn delete_design(&mut self, civ: CivId, spec: &str) -> Result<(), Errcode> {
        self.civ_mut(civ)?.delete_design(spec)
    }

    pub fn rename_design(&mut self, civ: CivId, old: &str, new: &str) -> Result<(), Errcode> {
        self.civ_mut(civ)?.rename_design(old, new)
    }

    // Fleets move first so arrivals are seen by the civilizations this same turn
    pub fn update(&mut self) -> Vec<TurnEvent> {
        self.turn += 1;
        let mut events = self.deep_space.update(&mut self.systems, &mut self.civs);
        for evt in events.iter() {
            if let Some(civ) = self.civs.get_mut(&evt.civ()) {
                civ.record(self.turn, evt.clone());
            }
        }
        for civ in self.civs.values_mut() {
            events.extend(civ.update(&mut self.systems, self.turn));
        }
        log::info!(
            "Turn {} done, {} events, {} fleets in deep space",
            self.turn,
            events.len(),
            self.deep_space.len()
        );
        events
    }
}

#[cfg(test)]
use crate::catalog::{COLONY_SHIP, SCOUT};
#[cfg(test)]
use crate::galaxy::body::PlanetType;

#[cfg(test)]
fn small_universe() -> (Universe, CivId, CivId) {
    let mut universe = Universe::new(10, 10);
    let alon = universe
        .add_system(
            "Alon",
            GridPos::new(2, 9),
            StarType::Yellow,
            vec![Body::planet(PlanetType::Jungle), Body::planet(PlanetType::Barren)],
        )
        .unwrap();
    let gatnic = universe
        .add_system(
            "Gatnic",
            GridPos::new(1, 1),
            StarType::Red,
            vec![Body::planet(PlanetType::Barren)],
        )
        .unwrap();
    universe
        .add_system("Tado", GridPos::new(6, 6), StarType::Blue, vec![])
        .unwrap();
    let a = universe.add_civ("Alon", "Empire", alon).unwrap();
    let b = universe.add_civ("Marak", "Federation", gatnic).unwrap();
    (universe, a, b)
}

#[test]
fn test_universe_layout() {
    let (mut universe, a, _) = small_universe();
    assert_eq!(universe.systems().count(), 3);
    assert_eq!(universe.system_at(6, 6).map(|s| s.name.as_str()), Some("Tado"));
    assert!(universe.system_at(0, 0).is_none());
    assert_eq!(universe.distance(SystemId(1), SystemId(3)), Ok(5.0));
    assert_eq!(
        universe.system_by_name("Nowhere").err(),
        Some(Errcode::NoSystemNamed("Nowhere".to_string()))
    );

    assert_eq!(
        universe.add_system("Far", GridPos::new(10, 0), StarType::Red, vec![]),
        Err(Errcode::OutOfBounds(10, 0))
    );
    assert_eq!(
        universe.add_system("Tado", GridPos::new(0, 0), StarType::Red, vec![]),
        Err(Errcode::SystemAlreadyExists("Tado".to_string()))
    );
    assert_eq!(
        universe.add_system("Omic", GridPos::new(6, 6), StarType::Red, vec![]),
        Err(Errcode::PositionTaken(6, 6))
    );
    assert_eq!(
        universe.add_civ("Tado", "Swarm", SystemId(3)),
        Err(Errcode::HomeUnavailable(SystemId(3)))
    );
    assert_eq!(universe.civs().count(), 2);
    assert_eq!(universe.known_systems(a), Ok(vec![SystemId(1)]));
}

#[test]
fn test_universe_turn_income() {
    let (mut universe, a, _) = small_universe();
    let events = universe.update();
    assert!(events.is_empty());
    assert_eq!(universe.turn(), 1);
    let civ = universe.civ(a).unwrap();
    assert_eq!(civ.money(), 5000.0 + 1.2);
    assert_eq!(civ.income(), (1.0 + 0.15) * 1.2);
}

#[test]
fn test_universe_fleet_range() {
    let mut universe = Universe::new(100, 100);
    let home = universe
        .add_system(
            "Alon",
            GridPos::new(2, 9),
            StarType::Yellow,
            vec![Body::planet(PlanetType::Jungle)],
        )
        .unwrap();
    let far = universe
        .add_system("Odot", GridPos::new(90, 90), StarType::Red, vec![])
        .unwrap();
    let civ = universe.add_civ("Alon", "Empire", home).unwrap();
    let colony_ship = universe.create_ship(civ, COLONY_SHIP, home).unwrap();

    let fleet = universe.assemble_fleet(civ, home, &[colony_ship]).unwrap();
    assert!(matches!(
        universe.check_departure(&fleet, far),
        Err(Errcode::OutOfRange(..))
    ));
    assert_eq!(universe.check_departure(&fleet, home), Ok((home, 0.0)));
    let (fleet, err) = universe.send_fleet(fleet, far).unwrap_err();
    assert!(matches!(err, Errcode::OutOfRange(_, range) if range == 20.0));
    assert_eq!(fleet.len(), 1);
    assert!(universe.system(home).unwrap().ship(&colony_ship).is_some());
    assert!(universe.deep_space().is_empty());

    assert_eq!(universe.assemble_fleet(civ, home, &[]).err(), Some(Errcode::EmptyFleet));
    let ghost = ShipId::new(civ, 99);
    assert_eq!(
        universe.assemble_fleet(civ, home, &[ghost]).err(),
        Some(Errcode::ShipNotInSystem(ghost))
    );
    let lost = Fleet::new(fleet.id, civ, None, vec![]);
    assert_eq!(universe.send_fleet(lost, far).map_err(|(_, e)| e), Err(Errcode::FleetInTransit));
}

#[test]
fn test_universe_transit_takes_whole_turns() {
    let mut universe = Universe::new(20, 20);
    let home = universe
        .add_system(
            "Alon",
            GridPos::new(0, 0),
            StarType::Yellow,
            vec![Body::planet(PlanetType::Jungle)],
        )
        .unwrap();
    let dest = universe
        .add_system("Kyky", GridPos::new(0, 12), StarType::Yellow, vec![])
        .unwrap();
    let civ = universe.add_civ("Alon", "Empire", home).unwrap();

    let mut design = universe.civ(civ).unwrap().edit_design(SCOUT).unwrap();
    let snail = universe
        .civ(civ)
        .unwrap()
        .modules()
        .module_named("Snail Engine")
        .unwrap()
        .clone();
    assert!(design.add(&snail));
    design.rename("Courier");
    universe.save_design(civ, &design).unwrap();
    let courier = universe.create_ship(civ, "Courier", home).unwrap();

    let fleet = universe.assemble_fleet(civ, home, &[courier]).unwrap();
    assert_eq!(fleet.speed(), 5.0);
    assert_eq!(universe.check_departure(&fleet, dest), Ok((home, 12.0)));
    universe.send_fleet(fleet, dest).map_err(|(_, e)| e).unwrap();
    assert_eq!(universe.system(home).unwrap().ship_count(), 0);

    for left in [7.0, 2.0] {
        universe.update();
        assert_eq!(universe.in_transit(civ)[0].distance, left);
        assert_eq!(universe.system(home).unwrap().ship_count(), 0);
        assert_eq!(universe.system(dest).unwrap().ship_count(), 0);
    }
    let events = universe.update();
    assert!(events.iter().any(|e| matches!(e, TurnEvent::FleetArrived { .. })));
    assert!(universe.in_transit(civ).is_empty());
    assert_eq!(universe.system(home).unwrap().ship_count(), 0);
    assert_eq!(universe.system(dest).unwrap().ship_count(), 1);
}

#[test]
fn test_universe_scouting() {
    let (mut universe, a, b) = small_universe();
    let gatnic = SystemId(2);
    let tado = SystemId(3);
    let scout = universe.create_ship(a, SCOUT, SystemId(1)).unwrap();
    assert!(universe.ships_in(a, gatnic).unwrap().is_empty());
    assert!(universe.civs_in(a, gatnic).unwrap().is_empty());

    let fleet = universe.assemble_fleet(a, SystemId(1), &[scout]).unwrap();
    let distance = universe.distance(SystemId(1), gatnic).unwrap();
    let id = universe.send_fleet(fleet, gatnic).map_err(|(_, e)| e).unwrap();
    assert_eq!(universe.system(SystemId(1)).unwrap().ship_count(), 0);
    assert_eq!(universe.in_transit(a).len(), 1);

    let turns = (distance / 4.0).ceil() as u32;
    let mut arrived = vec![];
    for _ in 0..turns {
        arrived.extend(
            universe
                .update()
                .into_iter()
                .filter(|e| matches!(e, TurnEvent::FleetArrived { .. })),
        );
    }
    assert_eq!(arrived.len(), 1);
    assert_eq!(universe.known_systems(a), Ok(vec![SystemId(1), gatnic]));
    assert_eq!(universe.civs_in(a, gatnic), Ok(vec![b]));
    assert!(universe
        .civ(a)
        .unwrap()
        .events()
        .any(|(_, e)| matches!(e, TurnEvent::FleetDeparted { fleet, .. } if *fleet == id)));

    // Once the scout is gone, only the old sighting remains
    let fleet = universe.assemble_fleet(a, gatnic, &[scout]).unwrap();
    universe.send_fleet(fleet, tado).map_err(|(_, e)| e).unwrap();
    let newcomer = universe.create_ship(b, SCOUT, gatnic).unwrap();
    let seen = universe.ships_in(a, gatnic).unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].id, scout);
    assert!(universe
        .ships_in(b, gatnic)
        .unwrap()
        .iter()
        .any(|s| s.id == newcomer));
}

#[test]
fn test_universe_queries_are_idempotent() {
    let (mut universe, a, _) = small_universe();
    universe.create_ship(a, COLONY_SHIP, SystemId(1)).unwrap();
    universe.build(a, SystemId(1), SCOUT).unwrap();

    let before = universe.civ(a).unwrap().money();
    let known = universe.known_systems(a);
    let ships = universe.ships_in(a, SystemId(1));
    let info = universe.system_info(a, SystemId(1));
    assert_eq!(universe.known_systems(a), known);
    assert_eq!(universe.ships_in(a, SystemId(1)), ships);
    assert_eq!(universe.system_info(a, SystemId(1)), info);
    assert_eq!(universe.civ(a).unwrap().money(), before);
    assert!(info.unwrap().is_some());
    assert_eq!(universe.system_info(a, SystemId(2)), Ok(None));
}

#[test]
fn test_universe_colonize() {
    let (mut universe, a, _) = small_universe();
    assert_eq!(universe.colonize(a, SystemId(1), 2), Err(Errcode::NoColonyShip(SystemId(1))));
    universe.create_ship(a, COLONY_SHIP, SystemId(1)).unwrap();
    let colony = universe.colonize(a, SystemId(1), 2).unwrap();
    assert_eq!(universe.system(SystemId(1)).unwrap().ship_count(), 0);
    assert_eq!(universe.civ(a).unwrap().colonies().colonies().count(), 2);
    assert!(universe
        .civ(a)
        .unwrap()
        .events()
        .any(|(_, e)| matches!(e, TurnEvent::Colonized { colony: c, .. } if *c == colony)));

    // The new colony pays nothing on the turn it was founded
    assert_eq!(universe.civ(a).unwrap().income(), 1.2);
    universe.update();
    let civ = universe.civ(a).unwrap();
    assert_eq!(civ.money(), 5000.0 + 1.2);
    let pop = 1.0 + 0.15;
    assert_eq!(civ.income(), (pop + pop) * 1.2);
}
