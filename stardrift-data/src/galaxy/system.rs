use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use super::body::Body;
use super::{get_distance, GridPos, SystemId};
use crate::civilization::CivId;
use crate::colony::ColonyId;
use crate::ship::{Ship, ShipId};

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
    Clone,
    Copy,
)]
#[strum(ascii_case_insensitive)]
pub enum StarType {
    Red,
    Yellow,
    Blue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub kind: StarType,
    pub radius: f64,
    pub mass: f64,
}

impl Star {
    pub fn new(kind: StarType) -> Star {
        let (radius, mass) = match kind {
            StarType::Red => (0.6, 0.4),
            StarType::Yellow => (1.1, 1.1),
            StarType::Blue => (2.3, 3.5),
        };
        Star { kind, radius, mass }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemObject {
    pub orbit: u8,
    pub name: String,
    pub body: Body,
    pub colony: Option<ColonyId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarSystem {
    pub id: SystemId,
    pub name: String,
    pub pos: GridPos,
    pub star: Star,
    objects: Vec<SystemObject>,
    ships: BTreeMap<ShipId, Ship>,
}

impl StarSystem {
    pub fn new<T: ToString>(
        id: SystemId,
        name: T,
        pos: GridPos,
        star: StarType,
        bodies: Vec<Body>,
    ) -> StarSystem {
        let name = name.to_string();
        let objects = bodies
            .into_iter()
            .enumerate()
            .map(|(n, body)| SystemObject {
                orbit: (n + 1) as u8,
                name: format!("{} {}", name, n + 1),
                body,
                colony: None,
            })
            .collect();
        StarSystem {
            id,
            name,
            pos,
            star: Star::new(star),
            objects,
            ships: BTreeMap::new(),
        }
    }

    pub fn objects(&self) -> &[SystemObject] {
        &self.objects
    }

    pub fn object(&self, orbit: u8) -> Option<&SystemObject> {
        self.objects.iter().find(|o| o.orbit == orbit)
    }

    pub(crate) fn object_mut(&mut self, orbit: u8) -> Option<&mut SystemObject> {
        self.objects.iter_mut().find(|o| o.orbit == orbit)
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships.values()
    }

    pub fn ship(&self, id: &ShipId) -> Option<&Ship> {
        self.ships.get(id)
    }

    pub fn ship_count(&self) -> usize {
        self.ships.len()
    }

    pub fn enter(&mut self, ships: Vec<Ship>) {
        for mut ship in ships {
            ship.system = Some(self.id);
            self.ships.insert(ship.id, ship);
        }
    }

    pub fn leave(&mut self, ids: &[ShipId]) -> Vec<Ship> {
        let mut left = vec![];
        for id in ids {
            if let Some(mut ship) = self.ships.remove(id) {
                ship.system = None;
                left.push(ship);
            }
        }
        left
    }

    // Civilizations owning a colony here, in orbit order
    pub fn civs(&self) -> Vec<CivId> {
        let mut civs = vec![];
        for obj in self.objects.iter() {
            if let Some(colony) = obj.colony {
                if !civs.contains(&colony.civ) {
                    civs.push(colony.civ);
                }
            }
        }
        civs
    }

    pub fn has_civs(&self) -> bool {
        self.objects.iter().any(|o| o.colony.is_some())
    }

    pub fn has_ships<F: Fn(&Ship) -> bool>(&self, civ: CivId, pred: F) -> bool {
        self.find_ship(civ, pred).is_some()
    }

    pub fn find_ship<F: Fn(&Ship) -> bool>(&self, civ: CivId, pred: F) -> Option<ShipId> {
        self.ships
            .values()
            .find(|s| s.civ == civ && pred(s))
            .map(|s| s.id)
    }

    pub fn distance_to(&self, other: &StarSystem) -> f64 {
        get_distance(&self.pos, &other.pos)
    }
}

#[cfg(test)]
use super::body::PlanetType;

#[test]
fn test_system_objects_are_named_by_orbit() {
    let sys = StarSystem::new(
        SystemId(1),
        "Alon",
        GridPos::new(9, 2),
        StarType::Yellow,
        vec![Body::planet(PlanetType::Jungle), Body::asteroid_field()],
    );
    assert_eq!(sys.objects().len(), 2);
    assert_eq!(sys.object(1).map(|o| o.name.as_str()), Some("Alon 1"));
    assert_eq!(sys.object(2).map(|o| o.body.class()), Some("AsteroidField"));
    assert!(sys.object(3).is_none());
    assert!(sys.civs().is_empty());
    assert_eq!(sys.star.mass, 1.1);
}

#[test]
fn test_star_types() {
    use strum::IntoEnumIterator;

    let radii: Vec<f64> = StarType::iter().map(|k| Star::new(k).radius).collect();
    assert_eq!(radii, vec![0.6, 1.1, 2.3]);
    assert_eq!("blue".parse::<StarType>(), Ok(StarType::Blue));
}
