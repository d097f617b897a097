use serde::{Deserialize, Serialize};

use crate::resources::Cost;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HullId(pub u16);

impl std::fmt::Display for HullId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hul{}", self.0)
    }
}

// Chassis of a ship, the capacity bounds what modules can be fitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hull {
    pub id: HullId,
    pub name: String,
    pub max_health: u32,
    pub capacity: u32,
    pub cost: Cost,
}

impl Hull {
    pub fn new<T: ToString>(
        id: HullId,
        name: T,
        max_health: u32,
        capacity: u32,
        cost: Cost,
    ) -> Hull {
        Hull {
            id,
            name: name.to_string(),
            max_health,
            capacity,
            cost,
        }
    }
}
