use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Ship, ShipId};
use crate::civilization::CivId;
use crate::errors::Errcode;
use crate::galaxy::system::StarSystem;
use crate::galaxy::SystemId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FleetId {
    pub civ: CivId,
    pub serial: u32,
}

impl FleetId {
    pub fn new(civ: CivId, serial: u32) -> FleetId {
        FleetId { civ, serial }
    }
}

impl std::fmt::Display for FleetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "flt{}-{}", self.civ.0, self.serial)
    }
}

// Ships grouped to travel together, as fast and as far as the weakest of them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    pub id: FleetId,
    pub civ: CivId,
    // Set while docked, cleared once the fleet is in deep space
    pub system: Option<SystemId>,
    ships: BTreeMap<ShipId, Ship>,
    range: f64,
    speed: f64,
    mp: f64,
}

impl Fleet {
    pub fn new(id: FleetId, civ: CivId, system: Option<SystemId>, ships: Vec<Ship>) -> Fleet {
        let mut fleet = Fleet {
            id,
            civ,
            system,
            ships: BTreeMap::new(),
            range: 0.0,
            speed: 0.0,
            mp: 0.0,
        };
        fleet.add_ships(ships);
        fleet.mp = fleet.speed;
        fleet
    }

    // Groups ships docked in a system, they stay there until the fleet is sent
    pub fn assemble(
        id: FleetId,
        civ: CivId,
        system: &StarSystem,
        ids: &[ShipId],
    ) -> Result<Fleet, Errcode> {
        let mut ships = vec![];
        for shipid in ids {
            let Some(ship) = system.ship(shipid).filter(|s| s.civ == civ) else {
                return Err(Errcode::ShipNotInSystem(*shipid));
            };
            ships.push(ship.clone());
        }
        Ok(Fleet::new(id, civ, Some(system.id), ships))
    }

    // Movement points are not touched
    fn update_range_speed(&mut self) {
        self.range = self
            .ships
            .values()
            .map(|s| s.range())
            .min_by(|a, b| a.total_cmp(b))
            .unwrap_or(0.0);
        self.speed = self
            .ships
            .values()
            .map(|s| s.speed())
            .min_by(|a, b| a.total_cmp(b))
            .unwrap_or(0.0);
        if self.ships.is_empty() {
            self.mp = 0.0;
        }
    }

    pub fn add_ships(&mut self, ships: Vec<Ship>) {
        for ship in ships {
            self.ships.insert(ship.id, ship);
        }
        self.update_range_speed();
    }

    pub fn remove_ships(&mut self, ids: &[ShipId]) -> Vec<Ship> {
        let removed = ids.iter().filter_map(|id| self.ships.remove(id)).collect();
        self.update_range_speed();
        removed
    }

    pub(crate) fn take_ships(&mut self) -> Vec<Ship> {
        let ships = std::mem::take(&mut self.ships);
        self.update_range_speed();
        ships.into_values().collect()
    }

    pub fn range(&self) -> f64 {
        self.range
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn mp(&self) -> f64 {
        self.mp
    }

    pub fn ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships.values()
    }

    pub fn ship_ids(&self) -> Vec<ShipId> {
        self.ships.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    pub fn shortest_range_ship(&self) -> Option<&Ship> {
        self.ships
            .values()
            .min_by(|a, b| a.range().total_cmp(&b.range()))
    }

    pub fn can_reach(&self, distance: f64) -> bool {
        distance <= self.range
    }

    // Called once per turn while in deep space
    pub(crate) fn refresh(&mut self) {
        self.mp = self.speed;
    }

    pub(crate) fn spend(&mut self, amnt: f64) {
        self.mp = (self.mp - amnt).max(0.0);
    }
}

#[cfg(test)]
use super::hull::{Hull, HullId};
#[cfg(test)]
use super::module::{Module, ModuleId};
#[cfg(test)]
use super::spec::ShipSpec;
#[cfg(test)]
use crate::resources::Cost;

#[cfg(test)]
pub(crate) fn test_ship(serial: u32, range: f64, speed: f64) -> Ship {
    let hull = Hull::new(HullId(1), "Small Hull", 15, 20, Cost::new(1.0, 1.0));
    let engine = Module::engine(ModuleId(serial as u16), "Engine", Cost::ZERO, speed, range);
    let spec = ShipSpec::new(CivId(1), "Test", hull, [&engine]).unwrap();
    Ship::from_spec(ShipId::new(CivId(1), serial), &spec)
}

#[test]
fn test_fleet_takes_weakest_member() {
    let ships = vec![
        test_ship(1, 20.0, 3.0),
        test_ship(2, 35.0, 5.0),
        test_ship(3, 50.0, 2.0),
    ];
    let mut fleet = Fleet::new(FleetId::new(CivId(1), 1), CivId(1), Some(SystemId(1)), ships);
    assert_eq!(fleet.range(), 20.0);
    assert_eq!(fleet.speed(), 2.0);
    assert_eq!(fleet.mp(), 2.0);
    assert_eq!(fleet.shortest_range_ship().map(|s| s.id.serial), Some(1));

    let removed = fleet.remove_ships(&[ShipId::new(CivId(1), 1), ShipId::new(CivId(1), 3)]);
    assert_eq!(removed.len(), 2);
    assert_eq!(fleet.range(), 35.0);
    assert_eq!(fleet.speed(), 5.0);
    assert!(fleet.can_reach(35.0));
    assert!(!fleet.can_reach(35.1));
}

#[test]
fn test_empty_fleet() {
    let fleet = Fleet::new(FleetId::new(CivId(1), 1), CivId(1), Some(SystemId(1)), vec![]);
    assert!(fleet.is_empty());
    assert_eq!(fleet.range(), 0.0);
    assert_eq!(fleet.speed(), 0.0);
    assert_eq!(fleet.mp(), 0.0);
    assert!(fleet.can_reach(0.0));
    assert!(!fleet.can_reach(1.0));
}
