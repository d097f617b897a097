use serde::{Deserialize, Serialize};

pub mod body;
pub mod deepspace;
pub mod system;

pub type GridUnit = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SystemId(pub u16);

impl std::fmt::Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sys{}", self.0)
    }
}

// Cell of the starmap grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: GridUnit,
    pub col: GridUnit,
}

impl GridPos {
    pub const fn new(row: GridUnit, col: GridUnit) -> GridPos {
        GridPos { row, col }
    }
}

#[inline]
pub fn get_delta(a: &GridPos, b: &GridPos) -> (f64, f64) {
    (
        (b.row as f64) - (a.row as f64),
        (b.col as f64) - (a.col as f64),
    )
}

// Used for both the range check at departure and the transit countdown
#[inline]
pub fn get_distance(a: &GridPos, b: &GridPos) -> f64 {
    let delta = get_delta(a, b);
    (delta.0.powf(2.0) + delta.1.powf(2.0)).sqrt()
}

#[test]
fn test_grid_distance() {
    let a = GridPos::new(9, 2);
    let b = GridPos::new(6, 6);
    assert_eq!(get_distance(&a, &b), 5.0);
    assert_eq!(get_distance(&b, &a), 5.0);
    assert_eq!(get_distance(&a, &a), 0.0);
    assert_eq!(get_delta(&a, &b), (-3.0, 4.0));
}
