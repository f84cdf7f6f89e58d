use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Value as JsonValue};

use crate::gpx_types::*;
use crate::options::ExportOptions;

/// Convert a processed track to a GeoJSON FeatureCollection for the map widget.
///
/// Yields the path as a LineString followed by start and finish markers.
pub fn to_feature_collection(track: &Track, opts: &ExportOptions) -> FeatureCollection {
    let mut features = Vec::new();

    if track.points.len() >= 2 {
        features.push(path_feature(track, opts));
    }

    if let Some(first) = track.points.first() {
        features.push(marker_feature(first, "start", opts));
    }
    if track.points.len() >= 2 {
        if let Some(last) = track.points.last() {
            features.push(marker_feature(last, "finish", opts));
        }
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn path_feature(track: &Track, opts: &ExportOptions) -> Feature {
    // Mixed 2D/3D positions are not valid in one LineString
    let with_elevation =
        opts.include_elevation && track.points.iter().all(|pt| pt.elevation.is_some());

    let coords: Vec<Vec<f64>> = track
        .points
        .iter()
        .map(|pt| point_coords(pt, with_elevation))
        .collect();

    let geometry = Geometry::new(Value::LineString(coords));

    let mut props = Map::new();
    props.insert(
        "trailType".to_string(),
        JsonValue::String("path".to_string()),
    );
    props.insert("name".to_string(), JsonValue::String(track.name.clone()));
    insert_number(&mut props, "distance", track.distance);
    insert_number(&mut props, "elevation", track.elevation);
    insert_number(&mut props, "duration", track.duration);

    if opts.include_time {
        insert_coordinate_times(&mut props, &track.points);
    }

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

fn marker_feature(pt: &TrackPoint, trail_type: &str, opts: &ExportOptions) -> Feature {
    let coords = point_coords(pt, opts.include_elevation);
    let geometry = Geometry::new(Value::Point(coords));

    let mut props = Map::new();
    props.insert(
        "trailType".to_string(),
        JsonValue::String(trail_type.to_string()),
    );
    if let Some(ele) = pt.elevation {
        insert_number(&mut props, "elevation", ele);
    }
    if opts.include_time {
        if let Some(ref time) = pt.timestamp {
            props.insert("time".to_string(), JsonValue::String(time.clone()));
        }
    }

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

/// Build [lng, lat] or [lng, lat, ele] coordinate array.
fn point_coords(pt: &TrackPoint, include_elevation: bool) -> Vec<f64> {
    match (include_elevation, pt.elevation) {
        (true, Some(ele)) => vec![pt.lng, pt.lat, ele],
        _ => vec![pt.lng, pt.lat],
    }
}

fn insert_number(props: &mut Map<String, JsonValue>, key: &str, value: f64) {
    props.insert(
        key.to_string(),
        JsonValue::Number(serde_json::Number::from_f64(value).unwrap_or(0.into())),
    );
}

fn insert_coordinate_times(props: &mut Map<String, JsonValue>, points: &[TrackPoint]) {
    let times: Vec<JsonValue> = points
        .iter()
        .map(|pt| match &pt.timestamp {
            Some(t) => JsonValue::String(t.clone()),
            None => JsonValue::Null,
        })
        .collect();

    // Only include if at least one time is present
    if times.iter().any(|t| !t.is_null()) {
        let mut coord_props = Map::new();
        coord_props.insert("times".to_string(), JsonValue::Array(times));
        props.insert(
            "coordinateProperties".to_string(),
            JsonValue::Object(coord_props),
        );
    }
}
