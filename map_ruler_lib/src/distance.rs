use geo::{Distance, Haversine};
use geo_types::Point;

/// Great-circle distance in meters between two (lon, lat) points, on a sphere of
/// mean Earth radius.
pub fn great_circle_distance(from: Point, to: Point) -> f64 {
    Haversine.distance(from, to)
}
