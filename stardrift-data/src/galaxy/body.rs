use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

pub const ASTEROID_FIELD_MASS: f64 = 0.0004;

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
pub enum PlanetType {
    Jungle,
    Barren,
    Water,
    Crystal,
    Mechanical,
    Ice,
    Lava,
    Vulcanic,
    Torn,
    Ocean,
    Exotic,
    GasGiant,
    IceGiant,
}

// Something orbiting a star that can be settled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Body {
    Planet {
        kind: PlanetType,
        mass: f64,
        radius: f64,
    },
    AsteroidField {
        mass: f64,
    },
}

impl Body {
    pub fn planet(kind: PlanetType) -> Body {
        Body::Planet {
            kind,
            mass: 5.0,
            radius: 5.0,
        }
    }

    pub fn asteroid_field() -> Body {
        Body::AsteroidField {
            mass: ASTEROID_FIELD_MASS,
        }
    }

    pub fn mass(&self) -> f64 {
        match self {
            Body::Planet { mass, .. } | Body::AsteroidField { mass } => *mass,
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Body::Planet { kind, .. } => (*kind).into(),
            Body::AsteroidField { .. } => "AsteroidField",
        }
    }
}

#[test]
fn test_body_class() {
    assert_eq!("gasgiant".parse::<PlanetType>(), Ok(PlanetType::GasGiant));
    assert_eq!(Body::planet(PlanetType::GasGiant).class(), "GasGiant");
    assert_eq!(Body::asteroid_field().class(), "AsteroidField");
    assert_eq!(Body::asteroid_field().mass(), ASTEROID_FIELD_MASS);
}
