use serde::Deserialize;

pub const DEFAULT_TRACK_NAME: &str = "Trail Track";

/// Options for turning a GPX document into a [`Track`](crate::gpx_types::Track).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOptions {
    /// Name used when the track declares none (default: "Trail Track")
    #[serde(default = "default_track_name")]
    pub fallback_name: String,

    /// Unit of the track-level total time (default: milliseconds)
    #[serde(default)]
    pub duration_unit: DurationUnit,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            fallback_name: default_track_name(),
            duration_unit: DurationUnit::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    #[default]
    Milliseconds,
    Seconds,
}

/// Options for GeoJSON export of a processed track.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    #[serde(flatten)]
    pub parse: ParseOptions,

    /// Include elevation as the 3rd coordinate value (default: true)
    #[serde(default = "default_true")]
    pub include_elevation: bool,

    /// Include timestamps in coordinateProperties.times (default: true)
    #[serde(default = "default_true")]
    pub include_time: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            include_elevation: true,
            include_time: true,
        }
    }
}

fn default_track_name() -> String {
    DEFAULT_TRACK_NAME.to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_object() {
        let opts: ParseOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.fallback_name, DEFAULT_TRACK_NAME);
        assert_eq!(opts.duration_unit, DurationUnit::Milliseconds);
    }

    #[test]
    fn test_camel_case_fields() {
        let opts: ParseOptions =
            serde_json::from_str(r#"{"fallbackName":"Untitled run","durationUnit":"seconds"}"#)
                .unwrap();
        assert_eq!(opts.fallback_name, "Untitled run");
        assert_eq!(opts.duration_unit, DurationUnit::Seconds);
    }

    #[test]
    fn test_export_options_flatten() {
        let opts: ExportOptions =
            serde_json::from_str(r#"{"includeElevation":false,"fallbackName":"Loop"}"#).unwrap();
        assert!(!opts.include_elevation);
        assert!(opts.include_time);
        assert_eq!(opts.parse.fallback_name, "Loop");
    }
}
