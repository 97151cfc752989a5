use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::RulerError;

/// Display unit for measured distances. Distances are computed in kilometers and
/// scaled by [`Unit::factor`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum Unit {
    #[default]
    Kilometers,
    Miles,
    NauticalMiles,
}

impl Unit {
    pub const ALL: [Unit; 3] = [Unit::Kilometers, Unit::Miles, Unit::NauticalMiles];

    pub fn factor(self) -> f64 {
        match self {
            Unit::Kilometers => 1.0,
            Unit::Miles => 0.621371,
            Unit::NauticalMiles => 0.539957,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Kilometers => "km",
            Unit::Miles => "mi",
            Unit::NauticalMiles => "nmi",
        }
    }

    pub fn from_kilometers(self, km: f64) -> f64 {
        km * self.factor()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = RulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "km" => Ok(Unit::Kilometers),
            "mi" => Ok(Unit::Miles),
            "nmi" => Ok(Unit::NauticalMiles),
            other => Err(RulerError::UnknownUnit(other.to_string())),
        }
    }
}

impl TryFrom<String> for Unit {
    type Error = RulerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.symbol().to_string()
    }
}
