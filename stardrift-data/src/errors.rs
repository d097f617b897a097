use crate::civilization::CivId;
use crate::galaxy::SystemId;
use crate::ship::hull::HullId;
use crate::ship::module::ModuleId;
use crate::ship::ShipId;

#[derive(Debug, Clone, PartialEq)]
pub enum Errcode {
    CapacityExceeded { used: u32, capacity: u32 },
    LoadoutOverflow { needed: u32, capacity: u32 },
    NoSuchModule(ModuleId),
    NoSuchHull(HullId),
    NoPartNamed(String),
    NoSuchSpec(String),
    InvalidSpecName,
    SpecAlreadyExists(String),
    NoSuchSystem(SystemId),
    NoSystemNamed(String),
    NoSuchSystemObject(SystemId, u8),
    NoSuchCiv(CivId),
    ShipNotInSystem(ShipId),
    EmptyFleet,
    FleetInTransit,
    OutOfRange(f64, f64),
    NoColonyShip(SystemId),
    AlreadyColonized(SystemId, u8),
    NoColonyInSystem(SystemId),
    SystemAlreadyExists(String),
    PositionTaken(u32, u32),
    OutOfBounds(u32, u32),
    HomeUnavailable(SystemId),
}

impl Errcode {
    pub fn errmsg(&self) -> String {
        match self {
            Errcode::CapacityExceeded { used, capacity } => {
                format!("Cannot fit this much in this hull, {used} used out of {capacity}")
            }
            Errcode::LoadoutOverflow { needed, capacity } => format!(
                "The modules need at least {needed} of space but the hull only has {capacity}"
            ),
            Errcode::NoSuchModule(id) => format!("Module of id {id} doesn't exist"),
            Errcode::NoSuchHull(id) => format!("Hull of id {id} doesn't exist"),
            Errcode::NoPartNamed(name) => format!("No hull or module named {name:?}"),
            Errcode::NoSuchSpec(name) => format!("No ship specification named {name:?}"),
            Errcode::InvalidSpecName => "A ship specification needs a non-blank name".to_string(),
            Errcode::SpecAlreadyExists(name) => {
                format!("A ship specification named {name:?} already exists")
            }
            Errcode::NoSuchSystem(id) => format!("No star system with the id {id}"),
            Errcode::NoSystemNamed(name) => format!("No star system named {name:?}"),
            Errcode::NoSuchSystemObject(id, orbit) => {
                format!("Star system {id} has nothing on orbit {orbit}")
            }
            Errcode::NoSuchCiv(id) => format!("No civilization with the id {id}"),
            Errcode::ShipNotInSystem(id) => format!("Ship {id} is not docked in this system"),
            Errcode::EmptyFleet => "This fleet has no ships".to_string(),
            Errcode::FleetInTransit => "This fleet is already in deep space".to_string(),
            Errcode::OutOfRange(dist, range) => {
                format!("Destination is {dist:.2} away but the fleet range is {range}")
            }
            Errcode::NoColonyShip(id) => {
                format!("Colonization in system {id} failed due to lack of a colony ship")
            }
            Errcode::AlreadyColonized(id, orbit) => {
                format!("Orbit {orbit} of system {id} already has a colony")
            }
            Errcode::NoColonyInSystem(id) => format!("You don't own any colony in system {id}"),
            Errcode::SystemAlreadyExists(name) => format!("A system named {name:?} already exists"),
            Errcode::PositionTaken(row, col) => {
                format!("There is already a system at row {row}, column {col}")
            }
            Errcode::OutOfBounds(row, col) => {
                format!("Row {row}, column {col} is outside of the universe")
            }
            Errcode::HomeUnavailable(id) => {
                format!("System {id} cannot be used as a home system")
            }
        }
    }
}

impl std::fmt::Display for Errcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.errmsg())
    }
}

impl std::error::Error for Errcode {}
