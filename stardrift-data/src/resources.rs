use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};

// What something costs to build, or how much a budget holds
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    pub money: f64,
    pub production: f64,
}

impl Cost {
    pub const ZERO: Cost = Cost {
        money: 0.0,
        production: 0.0,
    };

    pub const fn new(money: f64, production: f64) -> Cost {
        Cost { money, production }
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, other: Cost) -> Cost {
        Cost {
            money: self.money + other.money,
            production: self.production + other.production,
        }
    }
}

impl AddAssign for Cost {
    fn add_assign(&mut self, other: Cost) {
        self.money += other.money;
        self.production += other.production;
    }
}

impl Mul<u32> for Cost {
    type Output = Cost;

    fn mul(self, count: u32) -> Cost {
        Cost {
            money: self.money * (count as f64),
            production: self.production * (count as f64),
        }
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Cost {
        iter.fold(Cost::ZERO, |acc, c| acc + c)
    }
}

#[test]
fn test_cost_arithmetic() {
    let a = Cost::new(3.0, 4.0);
    let b = Cost::new(10.0, 7.0);
    assert_eq!(a + b, Cost::new(13.0, 11.0));
    assert_eq!(a * 3, Cost::new(9.0, 12.0));

    let total: Cost = vec![a, b, a].into_iter().sum();
    assert_eq!(total, Cost::new(16.0, 15.0));

    let mut acc = Cost::ZERO;
    acc += b;
    assert_eq!(acc, b);
}
