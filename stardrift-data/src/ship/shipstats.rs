use serde::{Deserialize, Serialize};

use crate::resources::Cost;

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipStats {
    pub max_health: u32,
    pub speed: f64,
    pub range: f64,
    pub attack: u32,
    pub cost: Cost,
    pub space_taken: u32,
}
