//! Summary statistics over a parsed point sequence.
//!
//! Everything here is total: degenerate input yields `0.0`, never an error.

use crate::gpx_types::TrackPoint;
use crate::options::DurationUnit;

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers (haversine).
pub fn haversine_km(a: &TrackPoint, b: &TrackPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lon = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Total horizontal distance along `points` in kilometers.
pub fn distance_km(points: &[TrackPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_km(&pair[0], &pair[1]))
        .sum()
}

/// Highest minus lowest recorded elevation, in meters.
///
/// This is the range, not cumulative ascent: a climb that returns to its
/// starting height reports only the height of the climb once.
pub fn elevation_range(points: &[TrackPoint]) -> f64 {
    let (min, max) = points
        .iter()
        .filter_map(|p| p.elevation)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), ele| {
            (min.min(ele), max.max(ele))
        });

    if min.is_finite() && max.is_finite() {
        max - min
    } else {
        0.0
    }
}

/// Declared total elapsed time converted to seconds.
pub fn duration_seconds(total_time: Option<f64>, unit: DurationUnit) -> f64 {
    match total_time {
        Some(total) if total.is_finite() && total > 0.0 => match unit {
            DurationUnit::Milliseconds => total / 1000.0,
            DurationUnit::Seconds => total,
        },
        _ => 0.0,
    }
}

/// Render seconds as the `"2h 30m"` text stored on a run record.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0h 0m".to_string();
    }
    let total = seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    format!("{hours}h {minutes}m")
}
