use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::system::StarSystem;
use super::SystemId;
use crate::civilization::{CivId, Civilization};
use crate::ship::fleet::{Fleet, FleetId};
use crate::syslog::TurnEvent;

// A fleet between two systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transit {
    pub fleet: Fleet,
    pub origin: SystemId,
    pub destination: SystemId,
    pub distance: f64,
}

// The space between star systems, where fleets spend turns covering distance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeepSpace {
    fleets: BTreeMap<FleetId, Transit>,
}

impl DeepSpace {
    pub fn new() -> DeepSpace {
        DeepSpace::default()
    }

    pub fn enter(
        &mut self,
        mut fleet: Fleet,
        origin: SystemId,
        destination: SystemId,
        distance: f64,
    ) {
        log::debug!(
            "Fleet {} left {origin} for {destination}, {distance:.2} to go",
            fleet.id
        );
        fleet.system = None;
        self.fleets.insert(
            fleet.id,
            Transit {
                fleet,
                origin,
                destination,
                distance,
            },
        );
    }

    pub fn leave(&mut self, id: &FleetId) -> Option<Transit> {
        self.fleets.remove(id)
    }

    pub fn get(&self, id: &FleetId) -> Option<&Transit> {
        self.fleets.get(id)
    }

    pub fn fleets(&self) -> impl Iterator<Item = &Transit> {
        self.fleets.values()
    }

    pub fn in_transit(&self, civ: CivId) -> Vec<&Transit> {
        self.fleets.values().filter(|t| t.fleet.civ == civ).collect()
    }

    pub fn len(&self) -> usize {
        self.fleets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fleets.is_empty()
    }

    // Moves every fleet by its speed, the ones covering their remaining distance arrive
    pub fn update(
        &mut self,
        systems: &mut BTreeMap<SystemId, StarSystem>,
        civs: &mut BTreeMap<CivId, Civilization>,
    ) -> Vec<TurnEvent> {
        let mut arrived = vec![];
        for (id, transit) in self.fleets.iter_mut() {
            transit.fleet.refresh();
            let mp = transit.fleet.mp();
            if transit.distance > mp {
                transit.distance -= mp;
                transit.fleet.spend(mp);
            } else {
                transit.fleet.spend(transit.distance);
                transit.distance = 0.0;
                arrived.push(*id);
            }
        }

        let mut events = vec![];
        for id in arrived {
            let Some(mut transit) = self.fleets.remove(&id) else {
                continue;
            };
            let Some(system) = systems.get_mut(&transit.destination) else {
                log::error!(
                    "Fleet {id} is heading to {} which doesn't exist",
                    transit.destination
                );
                self.fleets.insert(id, transit);
                continue;
            };

            let ships = transit.fleet.take_ships();
            let nships = ships.len();
            system.enter(ships);
            if let Some(civ) = civs.get_mut(&transit.fleet.civ) {
                civ.visit(system);
            }
            log::debug!("Fleet {id} arrived in {}", system.name);
            events.push(TurnEvent::FleetArrived {
                civ: transit.fleet.civ,
                fleet: id,
                system: transit.destination,
                ships: nships,
            });
        }
        events
    }
}

#[cfg(test)]
use super::GridPos;
#[cfg(test)]
use crate::ship::fleet::test_ship;

#[test]
fn test_transit_partial_moves() {
    let red = super::system::StarType::Red;
    let origin = StarSystem::new(SystemId(1), "Gva", GridPos::new(0, 0), red, vec![]);
    let dest = StarSystem::new(SystemId(2), "Kyky", GridPos::new(0, 12), red, vec![]);
    let mut systems = BTreeMap::new();
    systems.insert(origin.id, origin);
    systems.insert(dest.id, dest);
    let mut civs = BTreeMap::new();

    let ship = test_ship(1, 50.0, 5.0);
    let fleet = Fleet::new(FleetId::new(CivId(1), 1), CivId(1), Some(SystemId(1)), vec![ship]);
    let mut space = DeepSpace::new();
    space.enter(fleet, SystemId(1), SystemId(2), 12.0);
    assert!(space.get(&FleetId::new(CivId(1), 1)).unwrap().fleet.system.is_none());

    assert!(space.update(&mut systems, &mut civs).is_empty());
    assert_eq!(space.fleets().next().map(|t| t.distance), Some(7.0));
    assert!(space.update(&mut systems, &mut civs).is_empty());
    assert_eq!(space.fleets().next().map(|t| t.distance), Some(2.0));
    assert_eq!(systems[&SystemId(2)].ship_count(), 0);

    let events = space.update(&mut systems, &mut civs);
    assert_eq!(events.len(), 1);
    assert!(space.is_empty());
    let dest = &systems[&SystemId(2)];
    assert_eq!(dest.ship_count(), 1);
    assert_eq!(
        dest.ships().next().and_then(|s| s.system),
        Some(SystemId(2))
    );
}
