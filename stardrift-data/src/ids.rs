use serde::{Deserialize, Serialize};

use crate::civilization::CivId;
use crate::colony::ColonyId;
use crate::ship::fleet::FleetId;
use crate::ship::ShipId;

// Monotonic counter, owned by whoever hands out the identifiers
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Serial(u32);

impl Serial {
    pub fn next(&mut self) -> u32 {
        self.0 += 1;
        self.0
    }

    pub fn last(&self) -> u32 {
        self.0
    }
}

// Identifiers of everything a civilization brings into the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdSource {
    civ: CivId,
    ships: Serial,
    fleets: Serial,
    colonies: Serial,
}

impl IdSource {
    pub fn new(civ: CivId) -> IdSource {
        IdSource {
            civ,
            ships: Serial::default(),
            fleets: Serial::default(),
            colonies: Serial::default(),
        }
    }

    pub fn civ(&self) -> CivId {
        self.civ
    }

    pub fn next_ship(&mut self) -> ShipId {
        ShipId::new(self.civ, self.ships.next())
    }

    pub fn next_fleet(&mut self) -> FleetId {
        FleetId::new(self.civ, self.fleets.next())
    }

    pub fn next_colony(&mut self) -> ColonyId {
        ColonyId::new(self.civ, self.colonies.next())
    }
}

#[test]
fn test_ids_are_scoped_per_civ() {
    let mut alon = IdSource::new(CivId(1));
    let mut marak = IdSource::new(CivId(2));
    let a = alon.next_ship();
    let b = marak.next_ship();
    assert_eq!(a.serial, b.serial);
    assert_ne!(a, b);
    assert_ne!(alon.next_ship(), a);
    assert_eq!(alon.next_fleet().serial, 1);
}
