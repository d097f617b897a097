use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use stardrift_data::catalog::{COLONY_SHIP, SCOUT};
use stardrift_data::civilization::CivId;
use stardrift_data::config::EngineConfig;
use stardrift_data::errors::Errcode;
use stardrift_data::galaxy::body::{Body, PlanetType};
use stardrift_data::galaxy::system::{StarSystem, StarType};
use stardrift_data::galaxy::{GridPos, SystemId};
use stardrift_data::ship::{Ship, ShipId};
use stardrift_data::universe::Universe;

const UNIVERSE_SIZE: u32 = 10;
const STARTING_SCOUTS: usize = 3;
const MAX_SCOUTS: usize = 5;
const SCOUT_BUDGET: f64 = 100.0;

// Name, column, row, star and the bodies orbiting it
type SystemDef = (&'static str, u32, u32, StarType, &'static [PlanetType]);

const SYSTEMS: [SystemDef; 9] = [
    ("Alon", 9, 2, StarType::Yellow, &[PlanetType::Jungle, PlanetType::Barren]),
    ("Omic", 3, 7, StarType::Blue, &[PlanetType::Water]),
    ("Gatnic", 1, 1, StarType::Red, &[PlanetType::Barren]),
    ("Gva", 5, 3, StarType::Red, &[]),
    ("Kyky", 9, 4, StarType::Yellow, &[]),
    ("Tado", 6, 6, StarType::Blue, &[]),
    ("Odot", 4, 7, StarType::Red, &[]),
    ("Khiti", 0, 3, StarType::Yellow, &[]),
    ("Mtim", 4, 5, StarType::Red, &[]),
];

const CIVS: [(&str, &str, &str); 2] = [
    ("Alon", "Empire", "Alon"),
    ("Marak", "Federation", "Gatnic"),
];

pub fn create_universe(config: EngineConfig) -> Result<Universe, Errcode> {
    let mut universe = Universe::with_config(UNIVERSE_SIZE, UNIVERSE_SIZE, config);
    for (name, col, row, star, planets) in SYSTEMS {
        let bodies = planets.iter().map(|p| Body::planet(*p)).collect();
        universe.add_system(name, GridPos::new(row, col), star, bodies)?;
    }

    for (name, kind, home) in CIVS {
        let home = universe.system_by_name(home)?.id;
        let civ = universe.add_civ(name, kind, home)?;
        universe.create_ship(civ, COLONY_SHIP, home)?;
        for _ in 0..STARTING_SCOUTS {
            universe.create_ship(civ, SCOUT, home)?;
        }
    }
    Ok(universe)
}

fn free_orbit(system: &StarSystem) -> Option<u8> {
    system
        .objects()
        .iter()
        .find(|o| o.colony.is_none())
        .map(|o| o.orbit)
}

// Scripted opponent, settles whatever it finds and keeps scouts moving
pub struct Player {
    pub civ: CivId,
    rng: StdRng,
}

impl Player {
    pub fn new(civ: CivId, seed: u64) -> Player {
        Player {
            civ,
            rng: StdRng::seed_from_u64(seed.wrapping_add(civ.0 as u64)),
        }
    }

    pub fn play(&mut self, universe: &mut Universe) {
        self.settle(universe);
        self.explore(universe);
        self.expand(universe);
    }

    fn docked<F: Fn(&Ship) -> bool>(
        &self,
        universe: &Universe,
        pred: F,
    ) -> Vec<(SystemId, ShipId)> {
        universe
            .systems()
            .flat_map(|sys| {
                sys.ships()
                    .filter(|s| s.civ == self.civ && pred(s))
                    .map(move |s| (sys.id, s.id))
            })
            .collect()
    }

    fn send(&self, universe: &mut Universe, from: SystemId, ships: &[ShipId], to: SystemId) {
        let fleet = match universe.assemble_fleet(self.civ, from, ships) {
            Ok(fleet) => fleet,
            Err(e) => {
                log::warn!("{} couldn't assemble a fleet in {from}: {}", self.civ, e.errmsg());
                return;
            }
        };
        if let Err((fleet, e)) = universe.send_fleet(fleet, to) {
            log::warn!("Fleet {} stays in {from}: {}", fleet.id, e.errmsg());
        }
    }

    // Known systems with room for a colony, closest first
    fn settle_targets(&self, universe: &Universe, from: SystemId) -> Vec<SystemId> {
        let Ok(known) = universe.known_systems(self.civ) else {
            return vec![];
        };
        let mut targets: Vec<(f64, SystemId)> = known
            .into_iter()
            .filter(|id| *id != from)
            .filter_map(|id| universe.system(id).ok())
            .filter(|sys| free_orbit(sys).is_some())
            .filter_map(|sys| universe.distance(from, sys.id).ok().map(|d| (d, sys.id)))
            .collect();
        targets.sort_by(|a, b| a.0.total_cmp(&b.0));
        targets.into_iter().map(|(_, id)| id).collect()
    }

    fn settle(&mut self, universe: &mut Universe) {
        for (sysid, shipid) in self.docked(universe, |s| s.is_colony_ship()) {
            let orbit = universe.system(sysid).ok().and_then(free_orbit);
            if let Some(orbit) = orbit {
                match universe.colonize(self.civ, sysid, orbit) {
                    Ok(colony) => log::info!("{} founded colony {colony} in {sysid}", self.civ),
                    Err(e) => log::warn!("{} couldn't colonize {sysid}: {}", self.civ, e.errmsg()),
                }
                continue;
            }
            if let Some(target) = self.settle_targets(universe, sysid).first() {
                self.send(universe, sysid, &[shipid], *target);
            }
        }
    }

    fn explore(&mut self, universe: &mut Universe) {
        let known: BTreeSet<SystemId> = universe
            .known_systems(self.civ)
            .unwrap_or_default()
            .into_iter()
            .collect();
        for (sysid, shipid) in self.docked(universe, |s| !s.is_colony_ship()) {
            let unknown: Vec<SystemId> = universe
                .systems()
                .map(|s| s.id)
                .filter(|id| *id != sysid && !known.contains(id))
                .collect();
            let candidates = if unknown.is_empty() {
                universe.systems().map(|s| s.id).filter(|id| *id != sysid).collect()
            } else {
                unknown
            };
            if candidates.is_empty() {
                continue;
            }
            let target = candidates[self.rng.random_range(0..candidates.len())];
            self.send(universe, sysid, &[shipid], target);
        }
    }

    fn colony_ships(&self, universe: &Universe) -> usize {
        let docked = self.docked(universe, |s| s.is_colony_ship()).len();
        let travelling: usize = universe
            .in_transit(self.civ)
            .iter()
            .map(|t| t.fleet.ships().filter(|s| s.is_colony_ship()).count())
            .sum();
        docked + travelling
    }

    fn scouts(&self, universe: &Universe) -> usize {
        let docked = self.docked(universe, |s| !s.is_colony_ship()).len();
        let travelling: usize = universe
            .in_transit(self.civ)
            .iter()
            .map(|t| t.fleet.ships().filter(|s| !s.is_colony_ship()).count())
            .sum();
        docked + travelling
    }

    // Only builds at home, one ship at a time
    fn expand(&mut self, universe: &mut Universe) {
        let Ok(civ) = universe.civ(self.civ) else {
            return;
        };
        let home = civ.home;
        let money = civ.money();
        let idle = universe
            .system_info(self.civ, home)
            .ok()
            .flatten()
            .is_some_and(|info| info.queue.is_empty());
        if !idle {
            return;
        }

        let room_left = !self.settle_targets(universe, home).is_empty();
        let spec = if room_left && self.colony_ships(universe) == 0 {
            COLONY_SHIP
        } else if money > SCOUT_BUDGET && self.scouts(universe) < MAX_SCOUTS {
            SCOUT
        } else {
            return;
        };
        match universe.build(self.civ, home, spec) {
            Ok(()) => log::info!("{} started building a {spec}", self.civ),
            Err(e) => log::warn!("{} couldn't build a {spec}: {}", self.civ, e.errmsg()),
        }
    }
}

#[test]
fn test_scenario_universe() {
    let universe = create_universe(EngineConfig::default()).unwrap();
    assert_eq!(universe.systems().count(), 9);
    assert_eq!(universe.civs().count(), 2);
    let alon = universe.system_by_name("Alon").unwrap();
    assert_eq!(alon.pos, GridPos::new(2, 9));
    assert_eq!(alon.ship_count(), 1 + STARTING_SCOUTS);
    assert_eq!(alon.civs(), vec![CivId(1)]);
}

#[test]
fn test_players_are_deterministic() {
    let run = |seed: u64| {
        let mut universe = create_universe(EngineConfig::default()).unwrap();
        let mut players: Vec<Player> = universe.civs().map(|c| Player::new(c.id, seed)).collect();
        for _ in 0..20 {
            for player in players.iter_mut() {
                player.play(&mut universe);
            }
            universe.update();
        }
        universe
            .civs()
            .map(|c| (c.known_systems(), c.colonies().colonies().count()))
            .collect::<Vec<_>>()
    };
    let first = run(7);
    assert_eq!(first, run(7));
    // Alon settles its second planet right away
    assert!(first[0].1 >= 2);
}
