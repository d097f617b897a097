use serde::{Deserialize, Serialize};

use crate::galaxy::system::StarSystem;
use crate::ids::IdSource;
use crate::resources::Cost;
use crate::ship::spec::ShipSpec;
use crate::syslog::TurnEvent;

// Turns needed to put `remaining` production points in, infinite without production
fn calc_eta(remaining: f64, production: f64) -> f64 {
    if production > 0.0 {
        (remaining / production).ceil()
    } else {
        f64::INFINITY
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub spec: ShipSpec,
    pub progress: f64,
    pub expenses: f64,
    pub turn_cost: f64,
    pub cost: Cost,
    pub eta: f64,
}

impl QueueEntry {
    pub fn remaining_money(&self) -> f64 {
        self.cost.money - self.expenses
    }

    pub fn report(&self) -> serde_json::Value {
        serde_json::json!({
            "spec": self.spec.name,
            "progress": self.progress,
            "total": self.cost.production,
            "paid": self.expenses,
            "turn_cost": self.turn_cost,
            "eta": if self.eta.is_finite() { Some(self.eta) } else { None },
        })
    }
}

// Ships waiting to be built in a system, only the first one gets the production
// Money is paid a bit every turn instead of upfront
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstructionQueue {
    queue: Vec<QueueEntry>,
    cost: f64,
}

impl ConstructionQueue {
    pub fn new() -> ConstructionQueue {
        ConstructionQueue::default()
    }

    fn last_eta(&self) -> f64 {
        self.queue.last().map(|e| e.eta).unwrap_or(0.0)
    }

    pub fn build(&mut self, spec: &ShipSpec, production: f64) {
        let cost = spec.cost();
        let eta = calc_eta(cost.production, production) + self.last_eta();
        let turn_cost = if self.queue.is_empty() {
            cost.money / eta
        } else {
            0.0
        };
        log::debug!("{:?} queued, ready in {eta} turns", spec.name);
        self.queue.push(QueueEntry {
            spec: spec.clone(),
            progress: 0.0,
            expenses: 0.0,
            turn_cost,
            cost,
            eta,
        });
    }

    // Everything after the head waits for the ones before it
    fn refresh_etas(&mut self, production: f64) {
        let mut running = match self.queue.first() {
            Some(head) => head.eta,
            None => return,
        };
        for entry in self.queue.iter_mut().skip(1) {
            running += calc_eta(entry.cost.production - entry.progress, production);
            entry.eta = running;
        }
    }

    pub fn update(
        &mut self,
        production: f64,
        system: &mut StarSystem,
        ids: &mut IdSource,
    ) -> Option<TurnEvent> {
        let Some(head) = self.queue.first_mut() else {
            if self.cost != 0.0 {
                self.cost = 0.0;
            }
            return None;
        };

        if head.progress + production < head.cost.production {
            head.progress += production;
            if production > 0.0 {
                let eta = calc_eta(head.cost.production - head.progress, production);
                let remaining = head.remaining_money();
                // Never charge past the total, production may have dropped since last turn
                let charged = head.turn_cost.min(remaining).max(0.0);
                self.cost = charged;
                head.expenses += charged;
                head.eta = eta;
                head.turn_cost = if eta > 1.0 {
                    remaining / eta
                } else {
                    head.remaining_money()
                };
            } else {
                head.eta = f64::INFINITY;
                head.turn_cost = 0.0;
                self.cost = 0.0;
            }
            self.refresh_etas(production);
            return None;
        }

        let mut done = self.queue.remove(0);
        // Last payment settles whatever is left
        self.cost = done.remaining_money();
        done.expenses = done.cost.money;
        let shipid = done.spec.create(ids.next_ship(), system);

        // Its accumulated eta still counts this turn, start it over
        if let Some(next) = self.queue.first_mut() {
            next.eta = calc_eta(next.cost.production - next.progress, production);
            next.turn_cost = next.cost.money / next.eta;
        }
        self.refresh_etas(production);

        Some(TurnEvent::ShipBuilt {
            civ: ids.civ(),
            system: system.id,
            ship: shipid,
            spec: done.spec.name,
        })
    }

    // Money spent on construction during the last update
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn building(&self) -> Vec<QueueEntry> {
        self.queue.clone()
    }

    pub fn head(&self) -> Option<&QueueEntry> {
        self.queue.first()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
use crate::civilization::CivId;
#[cfg(test)]
use crate::galaxy::{system::StarType, GridPos, SystemId};
#[cfg(test)]
use crate::ship::hull::{Hull, HullId};
#[cfg(test)]
use crate::ship::module::{Module, ModuleId};

#[cfg(test)]
fn costly_spec() -> ShipSpec {
    let hull = Hull::new(HullId(1), "Test Hull", 10, 20, Cost::new(100.0, 30.0));
    let sensor = Module::sensor(ModuleId(1), "Test Sensor", Cost::new(20.0, 10.0));
    ShipSpec::new(CivId(1), "Freighter", hull, [&sensor]).unwrap()
}

#[cfg(test)]
fn shipyard() -> (StarSystem, IdSource) {
    let system = StarSystem::new(SystemId(1), "Alon", GridPos::new(9, 2), StarType::Yellow, vec![]);
    (system, IdSource::new(CivId(1)))
}

#[test]
fn test_queue_amortized_payment() {
    let spec = costly_spec();
    assert_eq!(spec.cost(), Cost::new(120.0, 40.0));
    let (mut system, mut ids) = shipyard();

    let mut queue = ConstructionQueue::new();
    queue.build(&spec, 10.0);
    assert_eq!(queue.head().map(|e| e.eta), Some(4.0));
    assert_eq!(queue.head().map(|e| e.turn_cost), Some(30.0));

    let mut charged = vec![];
    for _ in 0..3 {
        assert!(queue.update(10.0, &mut system, &mut ids).is_none());
        charged.push(queue.cost());
    }
    assert_eq!(system.ship_count(), 0);
    assert_eq!(queue.head().map(|e| e.eta), Some(1.0));

    let evt = queue.update(10.0, &mut system, &mut ids);
    charged.push(queue.cost());
    assert!(matches!(evt, Some(TurnEvent::ShipBuilt { .. })));
    assert_eq!(charged, vec![30.0, 40.0, 45.0, 5.0]);
    assert_eq!(charged.iter().sum::<f64>(), 120.0);
    assert_eq!(system.ship_count(), 1);
    assert!(queue.is_empty());

    assert!(queue.update(10.0, &mut system, &mut ids).is_none());
    assert_eq!(queue.cost(), 0.0);
}

#[test]
fn test_queue_waiting_entries() {
    let spec = costly_spec();
    let (mut system, mut ids) = shipyard();
    let mut queue = ConstructionQueue::new();
    queue.build(&spec, 10.0);
    queue.build(&spec, 10.0);
    let etas: Vec<f64> = queue.building().iter().map(|e| e.eta).collect();
    assert_eq!(etas, vec![4.0, 8.0]);
    assert_eq!(queue.building()[1].turn_cost, 0.0);

    // Slower production pushes back everything
    queue.update(5.0, &mut system, &mut ids);
    let etas: Vec<f64> = queue.building().iter().map(|e| e.eta).collect();
    assert_eq!(etas, vec![7.0, 15.0]);

    for _ in 0..4 {
        queue.update(10.0, &mut system, &mut ids);
    }
    assert_eq!(system.ship_count(), 1);
    assert_eq!(queue.len(), 1);
    let head = queue.head().unwrap();
    assert_eq!(head.eta, 4.0);
    assert_eq!(head.turn_cost, 30.0);
    assert_eq!(head.progress, 0.0);
}

#[test]
fn test_queue_without_production() {
    let spec = costly_spec();
    let (mut system, mut ids) = shipyard();
    let mut queue = ConstructionQueue::new();
    queue.build(&spec, 0.0);
    assert!(queue.head().unwrap().eta.is_infinite());
    assert_eq!(queue.head().unwrap().turn_cost, 0.0);

    queue.update(0.0, &mut system, &mut ids);
    assert_eq!(queue.cost(), 0.0);
    assert!(queue.head().unwrap().eta.is_infinite());
    assert_eq!(queue.head().unwrap().progress, 0.0);
}

#[test]
fn test_queue_payment_never_exceeds_total() {
    let spec = costly_spec();
    let (mut system, mut ids) = shipyard();
    let mut queue = ConstructionQueue::new();
    queue.build(&spec, 10.0);

    let mut paid = 0.0;
    for _ in 0..3 {
        queue.update(10.0, &mut system, &mut ids);
        paid += queue.cost();
    }
    // Production drops right when the last payment was planned
    while queue.update(2.0, &mut system, &mut ids).is_none() {
        paid += queue.cost();
    }
    paid += queue.cost();
    assert_eq!(paid, 120.0);
    assert_eq!(system.ship_count(), 1);
}

#[test]
fn test_queue_sudden_production_settles_balance() {
    let spec = costly_spec();
    let (mut system, mut ids) = shipyard();
    let mut queue = ConstructionQueue::new();
    queue.build(&spec, 10.0);

    queue.update(10.0, &mut system, &mut ids);
    assert_eq!(queue.cost(), 30.0);
    assert!(queue.update(100.0, &mut system, &mut ids).is_some());
    assert_eq!(queue.cost(), 90.0);
}

#[test]
fn test_queue_next_entry_starts_fresh() {
    let spec = costly_spec();
    let (mut system, mut ids) = shipyard();
    let mut queue = ConstructionQueue::new();
    queue.build(&spec, 10.0);
    queue.build(&spec, 10.0);

    for _ in 0..3 {
        queue.update(10.0, &mut system, &mut ids);
    }
    assert_eq!(queue.building()[1].eta, 5.0);

    // Completing the head hands the next one a full schedule from this turn on
    assert!(queue.update(10.0, &mut system, &mut ids).is_some());
    let head = queue.head().unwrap();
    assert_eq!(head.eta, 4.0);
    assert_eq!(head.turn_cost, 30.0);

    let mut charged = vec![];
    while queue.update(10.0, &mut system, &mut ids).is_none() {
        charged.push(queue.cost());
    }
    charged.push(queue.cost());
    assert_eq!(charged, vec![30.0, 40.0, 45.0, 5.0]);
    assert_eq!(system.ship_count(), 2);
}
