use serde::Serialize;

/// One recorded fix along the route (a `<trkpt>`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackPoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl TrackPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            elevation: None,
            timestamp: None,
        }
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }
}

/// Everything a [`DocumentParser`](crate::parser::DocumentParser) extracts from one document.
#[derive(Debug, Default)]
pub struct RawTrackData {
    pub tracks: Vec<RawTrack>,
}

/// A GPX track (<trk>) before any metrics are computed.
///
/// Points of all `<trkseg>` children are concatenated in document order.
#[derive(Debug, Default, Clone)]
pub struct RawTrack {
    pub name: Option<String>,
    pub points: Vec<TrackPoint>,
    /// Declared aggregate elapsed time, in the unit of the source document.
    pub total_time: Option<f64>,
}

/// The processed result handed back to the upload and detail-view flows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub name: String,
    pub points: Vec<TrackPoint>,
    /// Kilometers.
    pub distance: f64,
    /// Meters, highest minus lowest recorded elevation.
    pub elevation: f64,
    /// Seconds.
    pub duration: f64,
}
