use crate::error::Result;
use crate::gpx_types::*;
use crate::metrics;
use crate::options::ParseOptions;
use crate::parser::{DocumentParser, QuickXmlParser, parse_first_track};

/// Combine a parsed track with its computed metrics.
pub fn assemble(raw: RawTrack, opts: &ParseOptions) -> Track {
    let distance = metrics::distance_km(&raw.points);
    let elevation = metrics::elevation_range(&raw.points);
    let duration = metrics::duration_seconds(raw.total_time, opts.duration_unit);

    let name = raw
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| opts.fallback_name.clone());

    Track {
        name,
        points: raw.points,
        distance,
        elevation,
        duration,
    }
}

/// GPX text in, [`Track`] out.
#[derive(Debug, Clone)]
pub struct TrackProcessor<P = QuickXmlParser> {
    parser: P,
    options: ParseOptions,
}

impl Default for TrackProcessor {
    fn default() -> Self {
        Self::new(QuickXmlParser, ParseOptions::default())
    }
}

impl<P: DocumentParser> TrackProcessor<P> {
    pub fn new(parser: P, options: ParseOptions) -> Self {
        Self { parser, options }
    }

    /// Parse `text` and annotate its first track with distance, elevation and duration.
    pub fn process(&self, text: &str) -> Result<Track> {
        let raw = parse_first_track(&self.parser, text)?;
        Ok(assemble(raw, &self.options))
    }

    /// Only the first track's points, for drawing an already-stored run.
    pub fn process_points(&self, text: &str) -> Result<Vec<TrackPoint>> {
        Ok(parse_first_track(&self.parser, text)?.points)
    }
}

/// Process `text` with the quick-xml parser and default options.
pub fn parse_track(text: &str) -> Result<Track> {
    TrackProcessor::default().process(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrailGpxError;
    use crate::options::{DEFAULT_TRACK_NAME, DurationUnit};

    /// Returns a canned structure regardless of input.
    struct FakeParser(Vec<RawTrack>);

    impl DocumentParser for FakeParser {
        fn parse(&self, _text: &str) -> Result<RawTrackData> {
            Ok(RawTrackData {
                tracks: self.0.clone(),
            })
        }
    }

    fn raw(name: Option<&str>, points: Vec<TrackPoint>, total_time: Option<f64>) -> RawTrack {
        RawTrack {
            name: name.map(str::to_string),
            points,
            total_time,
        }
    }

    fn fake_processor(tracks: Vec<RawTrack>) -> TrackProcessor<FakeParser> {
        TrackProcessor::new(FakeParser(tracks), ParseOptions::default())
    }

    #[test]
    fn test_assemble_with_fake_parser() {
        let points = vec![
            TrackPoint::new(46.0, 7.0).with_elevation(1200.0),
            TrackPoint::new(46.00225, 7.0).with_elevation(1350.0),
            TrackPoint::new(46.0045, 7.0).with_elevation(1280.0),
        ];
        let processor = fake_processor(vec![raw(Some("Ridge"), points.clone(), Some(1_800_000.0))]);

        let track = processor.process("ignored").unwrap();
        assert_eq!(track.name, "Ridge");
        assert_eq!(track.points, points);
        assert!((track.distance - 0.5).abs() < 0.05);
        assert_eq!(track.elevation, 150.0);
        assert_eq!(track.duration, 1800.0);
    }

    #[test]
    fn test_no_tracks_propagated() {
        let err = fake_processor(Vec::new()).process("ignored").unwrap_err();
        assert!(matches!(err, TrailGpxError::NoTracksFound));
    }

    #[test]
    fn test_only_first_track_used() {
        let processor = fake_processor(vec![
            raw(Some("First"), vec![TrackPoint::new(1.0, 1.0)], None),
            raw(Some("Second"), vec![TrackPoint::new(2.0, 2.0), TrackPoint::new(3.0, 3.0)], None),
        ]);
        let track = processor.process("").unwrap();
        assert_eq!(track.name, "First");
        assert_eq!(track.points.len(), 1);
        assert_eq!(track.distance, 0.0);
    }

    #[test]
    fn test_degenerate_track_is_zeroed() {
        let track = assemble(raw(None, Vec::new(), None), &ParseOptions::default());
        assert_eq!(track.name, DEFAULT_TRACK_NAME);
        assert!(track.points.is_empty());
        assert_eq!(track.distance, 0.0);
        assert_eq!(track.elevation, 0.0);
        assert_eq!(track.duration, 0.0);
    }

    #[test]
    fn test_name_fallback_from_options() {
        let opts = ParseOptions {
            fallback_name: "Untitled".to_string(),
            ..Default::default()
        };
        assert_eq!(assemble(raw(Some(" "), Vec::new(), None), &opts).name, "Untitled");
        assert_eq!(assemble(raw(None, Vec::new(), None), &opts).name, "Untitled");
    }

    #[test]
    fn test_duration_unit_from_options() {
        let opts = ParseOptions {
            duration_unit: DurationUnit::Seconds,
            ..Default::default()
        };
        let track = assemble(raw(None, Vec::new(), Some(5400.0)), &opts);
        assert_eq!(track.duration, 5400.0);
    }

    #[test]
    fn test_process_points() {
        let points = vec![TrackPoint::new(1.0, 2.0), TrackPoint::new(3.0, 4.0)];
        let processor = fake_processor(vec![raw(None, points.clone(), None)]);
        assert_eq!(processor.process_points("").unwrap(), points);
    }

    #[test]
    fn test_parse_track_end_to_end() {
        let xml = r#"<gpx version="1.1"><trk>
  <time>5400000</time>
  <trkseg>
    <trkpt lat="37.8651" lon="-119.5383"/>
    <trkpt lat="37.8660" lon="-119.5370"/>
  </trkseg>
</trk></gpx>"#;
        let track = parse_track(xml).unwrap();
        assert_eq!(track.name, DEFAULT_TRACK_NAME);
        assert_eq!(track.duration, 5400.0);
        assert_eq!(track.elevation, 0.0);
        assert!(track.distance > 0.1 && track.distance < 0.2);
    }
}
