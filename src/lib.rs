pub mod converter;
pub mod error;
pub mod gpx_types;
#[cfg(target_arch = "wasm32")]
mod logging;
pub mod metrics;
pub mod options;
pub mod parser;
pub mod track;

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

use crate::error::TrailGpxError;
use crate::options::{ExportOptions, ParseOptions};
use crate::parser::QuickXmlParser;
use crate::track::TrackProcessor;

pub use crate::error::Result;
pub use crate::gpx_types::{RawTrack, RawTrackData, Track, TrackPoint};
pub use crate::parser::DocumentParser;
pub use crate::track::parse_track;

/// Parse a GPX string and return the annotated track as a JS object.
#[wasm_bindgen(js_name = parseGpx)]
pub fn parse_gpx(gpx_string: &str, options: JsValue) -> std::result::Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts: ParseOptions = parse_options(options)?;
    let track = TrackProcessor::new(QuickXmlParser, opts).process(gpx_string)?;
    to_js(&track)
}

/// Parse a GPX string and return the annotated track as a JSON string.
#[wasm_bindgen(js_name = parseGpxString)]
pub fn parse_gpx_string(gpx_string: &str, options: JsValue) -> std::result::Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let opts: ParseOptions = parse_options(options)?;
    let track = TrackProcessor::new(QuickXmlParser, opts).process(gpx_string)?;
    serde_json::to_string(&track).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Points of the first track, for drawing a stored run on the map.
#[wasm_bindgen(js_name = gpxPoints)]
pub fn gpx_points(gpx_string: &str) -> std::result::Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let points = TrackProcessor::default().process_points(gpx_string)?;
    to_js(&points)
}

/// Parse a GPX string and return its path and start/finish markers as GeoJSON.
#[wasm_bindgen(js_name = gpxToGeoJson)]
pub fn gpx_to_geojson(gpx_string: &str, options: JsValue) -> std::result::Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts: ExportOptions = parse_options(options)?;
    let track = TrackProcessor::new(QuickXmlParser, opts.parse.clone()).process(gpx_string)?;
    let fc = converter::to_feature_collection(&track, &opts);
    to_js(&fc)
}

/// Render seconds as `"2h 30m"`.
#[wasm_bindgen(js_name = formatDuration)]
pub fn format_duration(seconds: f64) -> String {
    metrics::format_duration(seconds)
}

/// Route `tracing` output to the browser console.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) {
    logging::init(level.as_deref());
}

fn parse_options<T: DeserializeOwned + Default>(options: JsValue) -> std::result::Result<T, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(T::default())
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| TrailGpxError::Options(e.to_string()).into())
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> std::result::Result<JsValue, JsValue> {
    // Plain objects rather than ES Maps for the nested GeoJSON properties
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
