use quick_xml::Reader;
use quick_xml::errors::IllFormedError;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Result, TrailGpxError};
use crate::gpx_types::*;

/// Turns raw GPX text into track data.
///
/// Implementations fail only when the document itself cannot be read; an
/// empty track list is a valid result.
pub trait DocumentParser {
    fn parse(&self, text: &str) -> Result<RawTrackData>;
}

/// Streaming [`DocumentParser`] backed by quick-xml.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuickXmlParser;

impl DocumentParser for QuickXmlParser {
    fn parse(&self, text: &str) -> Result<RawTrackData> {
        parse_gpx(text)
    }
}

/// Run `parser` over `text` and keep only the first track.
pub fn parse_first_track<P: DocumentParser + ?Sized>(parser: &P, text: &str) -> Result<RawTrack> {
    let data = parser.parse(text)?;
    tracing::debug!(tracks = data.tracks.len(), "parsed GPX document");

    let track = data
        .tracks
        .into_iter()
        .next()
        .ok_or(TrailGpxError::NoTracksFound)?;
    tracing::debug!(
        name = ?track.name,
        points = track.points.len(),
        total_time = ?track.total_time,
        "using first track"
    );

    Ok(track)
}

/// Parse a GPX XML string into RawTrackData.
pub fn parse_gpx(xml: &str) -> Result<RawTrackData> {
    let mut reader = Reader::from_str(xml);
    let mut data = RawTrackData::default();
    let mut open_root: Option<Vec<u8>> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"trk" => data.tracks.push(parse_track(&mut reader)?),
                b"gpx" => open_root = Some(e.name().0.to_vec()),
                _ => {
                    // Waypoints, routes and metadata carry nothing we use
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"trk" {
                    data.tracks.push(RawTrack::default());
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"gpx" => open_root = None,
            Event::Eof => match open_root {
                Some(name) => return Err(missing_end_tag(&name)),
                None => break,
            },
            _ => {}
        }
    }

    Ok(data)
}

/// A document that ends while `name` is still open.
fn missing_end_tag(name: &[u8]) -> TrailGpxError {
    let name = String::from_utf8_lossy(name).into_owned();
    TrailGpxError::Xml(quick_xml::Error::IllFormed(IllFormedError::MissingEndTag(name)))
}

/// Parse lat/lon attributes from a `<trkpt>` start tag.
fn parse_lat_lon(e: &BytesStart<'_>) -> Result<(f64, f64)> {
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;

    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| TrailGpxError::Xml(e.into()))?;
        let val = std::str::from_utf8(&attr.value).unwrap_or_default();
        match attr.key.local_name().as_ref() {
            b"lat" => lat = Some(parse_coordinate("lat", val, 90.0)?),
            b"lon" => lon = Some(parse_coordinate("lon", val, 180.0)?),
            _ => {}
        }
    }

    let lat = lat.ok_or(TrailGpxError::MissingAttribute {
        element: "trkpt",
        attribute: "lat",
    })?;
    let lon = lon.ok_or(TrailGpxError::MissingAttribute {
        element: "trkpt",
        attribute: "lon",
    })?;

    Ok((lat, lon))
}

fn parse_coordinate(attribute: &'static str, val: &str, limit: f64) -> Result<f64> {
    val.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= limit)
        .ok_or_else(|| TrailGpxError::InvalidAttribute {
            element: "trkpt",
            attribute,
            value: val.to_string(),
        })
}

/// Parse a `<trkpt>` element and its children.
/// Called after receiving Event::Start for the point element.
fn parse_point<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<Option<TrackPoint>> {
    let (lat, lng) = match parse_lat_lon(start) {
        Ok(coords) => coords,
        Err(err) => {
            tracing::warn!("Skipping track point: {err}");
            reader.read_to_end(start.name())?;
            return Ok(None);
        }
    };

    let mut point = TrackPoint::new(lat, lng);
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"ele" => {
                    point.elevation = read_text_owned(reader, &e)?
                        .trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite());
                }
                b"time" => {
                    point.timestamp = Some(read_text_owned(reader, &e)?.trim().to_string());
                }
                _ => {
                    // name, extensions, hr, cad, speed...
                    reader.read_to_end(e.name())?;
                }
            },
            Event::End(e) if e.name().0 == end_name.as_slice() => break,
            Event::Eof => return Err(missing_end_tag(end_name.as_slice())),
            _ => {}
        }
    }

    Ok(Some(point))
}

/// Parse a `<trk>` element, flattening all of its segments.
fn parse_track(reader: &mut Reader<&[u8]>) -> Result<RawTrack> {
    let mut track = RawTrack::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"name" => {
                    let name = read_text_owned(reader, &e)?;
                    track.name = Some(name.trim().to_string()).filter(|n| !n.is_empty());
                }
                b"time" => track.total_time = parse_total_time(reader, &e)?,
                b"trkseg" => parse_segment(reader, &mut track.points)?,
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::End(e) if e.local_name().as_ref() == b"trk" => break,
            Event::Eof => return Err(missing_end_tag(b"trk")),
            _ => {}
        }
    }

    Ok(track)
}

/// Parse a `<trkseg>` element, appending its points onto `points`.
fn parse_segment(reader: &mut Reader<&[u8]>, points: &mut Vec<TrackPoint>) -> Result<()> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"trkpt" => {
                    if let Some(pt) = parse_point(&e, reader)? {
                        points.push(pt);
                    }
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"trkpt" {
                    match parse_lat_lon(&e) {
                        Ok((lat, lng)) => points.push(TrackPoint::new(lat, lng)),
                        Err(err) => tracing::warn!("Skipping track point: {err}"),
                    }
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"trkseg" => break,
            Event::Eof => return Err(missing_end_tag(b"trkseg")),
            _ => {}
        }
    }

    Ok(())
}

/// Parse the track-level aggregate `<time>`.
///
/// Accepts `<time>5400000</time>` and `<time><total>5400000</total></time>`.
/// Anything non-numeric (an ISO timestamp, say) yields `None`.
fn parse_total_time(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<Option<f64>> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();
    let mut total: Option<f64> = None;

    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                text.push_str(std::str::from_utf8(e.as_ref()).unwrap_or_default());
            }
            Event::Start(e) => match e.local_name().as_ref() {
                b"total" => total = read_text_owned(reader, &e)?.trim().parse::<f64>().ok(),
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::End(e) if e.name().0 == end_name.as_slice() => break,
            Event::Eof => return Err(missing_end_tag(end_name.as_slice())),
            _ => {}
        }
    }

    Ok(total.or_else(|| text.trim().parse::<f64>().ok()))
}

/// Read text content of an element as an owned String.
/// Handles regular text, CDATA sections, and entity references (Event::GeneralRef).
fn read_text_owned(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<String> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                text.push_str(std::str::from_utf8(e.as_ref()).unwrap_or_default());
            }
            Event::CData(e) => {
                text.push_str(std::str::from_utf8(e.as_ref()).unwrap_or_default());
            }
            Event::GeneralRef(e) => {
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    text.push(ch);
                } else {
                    match std::str::from_utf8(e.as_ref()).unwrap_or_default() {
                        "amp" => text.push('&'),
                        "lt" => text.push('<'),
                        "gt" => text.push('>'),
                        "quot" => text.push('"'),
                        "apos" => text.push('\''),
                        _ => {}
                    }
                }
            }
            Event::End(e) if e.name().0 == end_name.as_slice() => break,
            Event::Eof => return Err(missing_end_tag(end_name.as_slice())),
            _ => {}
        }
    }

    Ok(text)
}
