use geojson::{Feature, Geometry, JsonObject, Value};

use crate::measure_point::MeasurePoint;

/// The measured path as a GeoJSON `LineString` feature with empty properties.
pub fn line_feature(points: &[MeasurePoint]) -> Feature {
    let coordinates = points
        .iter()
        .map(|p| vec![p.longitude(), p.latitude()])
        .collect();

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(coordinates))),
        id: None,
        properties: Some(JsonObject::new()),
        foreign_members: None,
    }
}

pub fn line_coordinates(feature: &Feature) -> Option<Vec<(f64, f64)>> {
    match &feature.geometry.as_ref()?.value {
        Value::LineString(coordinates) => Some(coordinates.iter().map(|c| (c[0], c[1])).collect()),
        _ => None,
    }
}

#[test]
fn line_feature_keeps_lon_lat_order() {
    let points = [MeasurePoint::from((10.5, 56.1)), MeasurePoint::from((11., 55.9))];
    let feature = line_feature(&points);

    assert_eq!(line_coordinates(&feature), Some(vec![(10.5, 56.1), (11., 55.9)]));
    assert_eq!(line_coordinates(&line_feature(&[])), Some(vec![]));

    let json = feature.to_string();
    assert!(json.contains("\"LineString\""));
    assert!(json.contains("[10.5,56.1]"));
}
