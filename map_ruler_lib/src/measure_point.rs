use std::str::FromStr;

use chrono::{DateTime, Utc};
use geo_types::Point;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A measured vertex. `position` is (x = longitude, y = latitude) in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeasurePoint {
    pub position: Point,
    pub captured_at: DateTime<Utc>,
}

impl MeasurePoint {
    pub fn new(position: Point, captured_at: DateTime<Utc>) -> Self {
        Self {
            position,
            captured_at,
        }
    }

    pub fn now(position: Point) -> Self {
        Self::new(position, Utc::now())
    }

    pub fn longitude(&self) -> f64 {
        self.position.x()
    }

    pub fn latitude(&self) -> f64 {
        self.position.y()
    }
}

impl From<Point> for MeasurePoint {
    fn from(position: Point) -> Self {
        Self::now(position)
    }
}

impl From<(f64, f64)> for MeasurePoint {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self::now(Point::new(lon, lat))
    }
}

/// Parses `"lon,lat"`.
impl FromStr for MeasurePoint {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lon, lat) = s.split_once(',').ok_or("expected lon,lat")?;
        let lon = lon.trim().parse::<f64>().map_err(|_| "invalid longitude")?;
        let lat = lat.trim().parse::<f64>().map_err(|_| "invalid latitude")?;
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return Err("coordinate out of range");
        }
        Ok(Self::from((lon, lat)))
    }
}

#[test]
fn parse_lon_lat() {
    let point: MeasurePoint = "10.196123, 56.175188".parse().unwrap();
    assert_eq!(point.longitude(), 10.196123);
    assert_eq!(point.latitude(), 56.175188);

    assert!("56.1".parse::<MeasurePoint>().is_err());
    assert!("10,95".parse::<MeasurePoint>().is_err());
}
