use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::civilization::CivId;
use crate::colony::ColonyId;
use crate::galaxy::SystemId;
use crate::ship::fleet::FleetId;
use crate::ship::ShipId;

pub const EVENT_LOG_MAX_SIZE: usize = 64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, IntoStaticStr)]
pub enum TurnEvent {
    FleetDeparted {
        civ: CivId,
        fleet: FleetId,
        origin: SystemId,
        destination: SystemId,
        distance: f64,
    },
    FleetArrived {
        civ: CivId,
        fleet: FleetId,
        system: SystemId,
        ships: usize,
    },
    ShipBuilt {
        civ: CivId,
        system: SystemId,
        ship: ShipId,
        spec: String,
    },
    Colonized {
        civ: CivId,
        system: SystemId,
        orbit: u8,
        colony: ColonyId,
    },
}

impl TurnEvent {
    pub fn civ(&self) -> CivId {
        match self {
            TurnEvent::FleetDeparted { civ, .. }
            | TurnEvent::FleetArrived { civ, .. }
            | TurnEvent::ShipBuilt { civ, .. }
            | TurnEvent::Colonized { civ, .. } => *civ,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

// Latest events of a civilization, the oldest ones are dropped once full
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventLog {
    capacity: usize,
    events: VecDeque<(u32, TurnEvent)>,
}

impl Default for EventLog {
    fn default() -> Self {
        EventLog::with_capacity(EVENT_LOG_MAX_SIZE)
    }
}

impl EventLog {
    pub fn with_capacity(capacity: usize) -> EventLog {
        EventLog {
            capacity: capacity.max(1),
            events: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    pub fn push(&mut self, turn: u32, evt: TurnEvent) {
        log::debug!("Civ {} got event {evt:?} on turn {turn}", evt.civ());
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back((turn, evt));
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(u32, TurnEvent)> {
        self.events.iter()
    }

    pub fn remove_all(&mut self) -> Vec<(u32, TurnEvent)> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
fn built(serial: u32) -> TurnEvent {
    TurnEvent::ShipBuilt {
        civ: CivId(1),
        system: SystemId(1),
        ship: ShipId::new(CivId(1), serial),
        spec: "Scout".to_string(),
    }
}

#[test]
fn test_event_log_drops_oldest() {
    let size = 10;
    let mut log = EventLog::with_capacity(size);

    log.push(0, built(0));
    assert_eq!(log.remove_all(), vec![(0, built(0))]);
    assert!(log.is_empty());

    let ntest = size + 5;
    for n in 0..ntest {
        log.push(n as u32, built(n as u32));
        assert_eq!(log.len(), (n + 1).min(size), "iter {}", n);
    }

    let all = log.remove_all();
    assert_eq!(all.len(), size);
    assert_eq!(all.first(), Some(&((ntest - size) as u32, built((ntest - size) as u32))));
    assert_eq!(all.last(), Some(&((ntest - 1) as u32, built((ntest - 1) as u32))));
    assert_eq!(all[0].1.kind(), "ShipBuilt");
}
