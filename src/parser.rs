use quick_xml::Reader;
use quick_xml::errors::IllFormedError;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::error::Gpx2SvgError;
use crate::gpx_types::*;

type Result<T> = std::result::Result<T, Gpx2SvgError>;

/// The three GPX elements that carry a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointElement {
    TrackPoint,
    RoutePoint,
    Waypoint,
}

impl PointElement {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"trkpt" => Some(Self::TrackPoint),
            b"rtept" => Some(Self::RoutePoint),
            b"wpt" => Some(Self::Waypoint),
            _ => None,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Self::TrackPoint => "trkpt",
            Self::RoutePoint => "rtept",
            Self::Waypoint => "wpt",
        }
    }
}

impl GpxData {
    fn push(&mut self, element: PointElement, point: Result<GpxPoint>) {
        match element {
            PointElement::TrackPoint => self.track_points.push(point),
            PointElement::RoutePoint => self.route_points.push(point),
            PointElement::Waypoint => self.waypoints.push(point),
        }
    }
}

/// Parse a GPX XML string into GpxData.
///
/// Elements are matched by local name, so GPX 1.0, GPX 1.1 and documents
/// without a namespace are all accepted. Points are collected wherever they
/// appear, in document order.
///
/// Malformed or truncated XML fails the whole parse. Invalid coordinates
/// are recorded on their category's [`PointList`] instead.
pub fn parse_gpx(xml: &str) -> Result<GpxData> {
    let mut reader = Reader::from_str(xml);
    let mut data = GpxData::default();
    // Local names of the currently open elements, points excluded.
    let mut open: Vec<Vec<u8>> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let local = e.local_name();
                if let Some(element) = PointElement::from_local_name(local.as_ref()) {
                    let point = parse_point(element, &e, &mut reader)?;
                    data.push(element, point);
                } else if local.as_ref() == b"name"
                    && data.name.is_none()
                    && matches!(
                        open.last().map(Vec::as_slice),
                        Some(b"metadata" | b"trk")
                    )
                {
                    let name = read_text_owned(&mut reader, &e)?;
                    let name = name.trim();
                    if !name.is_empty() {
                        data.name = Some(name.to_string());
                    }
                } else {
                    open.push(local.as_ref().to_vec());
                }
            }
            Event::Empty(e) => {
                if let Some(element) = PointElement::from_local_name(e.local_name().as_ref()) {
                    let (lat, lon) = point_attributes(&e)?;
                    let point = check_lat_lon(element, lat.as_deref(), lon.as_deref())
                        .map(|(lat, lon)| GpxPoint::new(lat, lon));
                    data.push(element, point);
                }
            }
            Event::End(_) => {
                open.pop();
            }
            Event::Eof => match open.last() {
                Some(name) => return Err(missing_end_tag(name)),
                None => break,
            },
            _ => {}
        }
    }

    debug!(
        track_points = data.track_points.points.len(),
        route_points = data.route_points.points.len(),
        waypoints = data.waypoints.points.len(),
        "parsed GPX document"
    );

    Ok(data)
}

fn missing_end_tag(name: &[u8]) -> Gpx2SvgError {
    let name = String::from_utf8_lossy(name).into_owned();
    Gpx2SvgError::XmlParse(quick_xml::Error::IllFormed(
        IllFormedError::MissingEndTag(name),
    ))
}

/// Parse and validate one coordinate attribute.
fn parse_coordinate(
    element: PointElement,
    attribute: &'static str,
    raw: &str,
    limit: f64,
) -> Result<f64> {
    let value = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Gpx2SvgError::InvalidAttribute {
            element: element.tag(),
            attribute,
            value: raw.to_string(),
        })?;

    if value.abs() > limit {
        return Err(Gpx2SvgError::OutOfRange {
            element: element.tag(),
            attribute,
            value: raw.to_string(),
        });
    }

    Ok(value)
}

/// Raw lat/lon attribute values of a point element's start tag.
fn point_attributes(e: &BytesStart<'_>) -> Result<(Option<String>, Option<String>)> {
    let mut lat: Option<String> = None;
    let mut lon: Option<String> = None;

    for attr_result in e.attributes() {
        let attr = attr_result?;
        let val = String::from_utf8_lossy(&attr.value).into_owned();
        match attr.key.local_name().as_ref() {
            b"lat" => lat = Some(val),
            b"lon" => lon = Some(val),
            _ => {}
        }
    }

    Ok((lat, lon))
}

fn check_lat_lon(
    element: PointElement,
    lat: Option<&str>,
    lon: Option<&str>,
) -> Result<(f64, f64)> {
    let lat = lat.ok_or(Gpx2SvgError::MissingAttribute {
        element: element.tag(),
        attribute: "lat",
    })?;
    let lon = lon.ok_or(Gpx2SvgError::MissingAttribute {
        element: element.tag(),
        attribute: "lon",
    })?;

    Ok((
        parse_coordinate(element, "lat", lat, 90.0)?,
        parse_coordinate(element, "lon", lon, 180.0)?,
    ))
}

fn check_elevation(element: PointElement, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Gpx2SvgError::InvalidElevation {
            element: element.tag(),
            value: raw.to_string(),
        })
}

/// Parse a point element (wpt, rtept, trkpt) and its children.
/// Called after receiving Event::Start for the point element.
///
/// The outer `Result` carries XML errors, the inner one validation errors.
fn parse_point<'a>(
    element: PointElement,
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<Result<GpxPoint>> {
    let (lat, lon) = point_attributes(start)?;
    let mut ele: Option<String> = None;
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"ele" && ele.is_none() => {
                ele = Some(reader.read_text(e.name())?.into_owned());
            }
            Event::Start(e) => {
                // time, name, extensions, ...
                reader.read_to_end(e.name())?;
            }
            Event::End(e) if e.name().0 == end_name.as_slice() => break,
            Event::Eof => return Err(missing_end_tag(&end_name)),
            _ => {}
        }
    }

    Ok(
        check_lat_lon(element, lat.as_deref(), lon.as_deref()).and_then(|(lat, lon)| {
            let point = GpxPoint::new(lat, lon);
            match ele {
                Some(raw) => Ok(point.with_ele(check_elevation(element, &raw)?)),
                None => Ok(point),
            }
        }),
    )
}

/// Read text content of an element as an owned String.
/// Handles regular text, CDATA sections, and entity references (Event::GeneralRef).
fn read_text_owned<'a>(reader: &mut Reader<&'a [u8]>, start: &BytesStart<'_>) -> Result<String> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Text(e) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
            Event::GeneralRef(e) => {
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    text.push(ch);
                } else {
                    match e.as_ref() {
                        b"amp" => text.push('&'),
                        b"lt" => text.push('<'),
                        b"gt" => text.push('>'),
                        b"quot" => text.push('"'),
                        b"apos" => text.push('\''),
                        _ => {}
                    }
                }
            }
            Event::Start(e) => {
                reader.read_to_end(e.name())?;
            }
            Event::End(e) if e.name().0 == end_name.as_slice() => break,
            Event::Eof => return Err(missing_end_tag(&end_name)),
            _ => {}
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_waypoint() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <wpt lat="35.6762" lon="139.6503"/>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.waypoints.points.len(), 1);
        assert!((data.waypoints.points[0].lat - 35.6762).abs() < 1e-10);
        assert!((data.waypoints.points[0].lon - 139.6503).abs() < 1e-10);
        assert_eq!(data.waypoints.points[0].ele, None);
    }

    #[test]
    fn test_waypoint_with_children() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <wpt lat="35.6762" lon="139.6503">
    <ele>40.5</ele>
    <time>2025-01-01T00:00:00Z</time>
    <name>Tokyo Tower</name>
    <sym>Flag</sym>
  </wpt>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        let pt = &data.waypoints.points[0];
        assert_eq!(pt.ele, Some(40.5));
        // a waypoint's name is not the document name
        assert_eq!(data.name, None);
    }

    #[test]
    fn test_simple_route() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <rte>
    <name>Test Route</name>
    <rtept lat="35.0" lon="139.0"/>
    <rtept lat="36.0" lon="140.0"><ele>12</ele></rtept>
    <rtept lat="37.0" lon="141.0"/>
  </rte>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert!(data.track_points.is_empty());
        assert_eq!(data.route_points.points.len(), 3);
        assert_eq!(data.route_points.points[1].ele, Some(12.0));
    }

    #[test]
    fn test_simple_track() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <trk>
    <name>Morning Run</name>
    <trkseg>
      <trkpt lat="35.0" lon="139.0"><ele>10.0</ele></trkpt>
      <trkpt lat="35.001" lon="139.001"><ele>11.0</ele></trkpt>
      <trkpt lat="35.002" lon="139.002"><ele>12.0</ele></trkpt>
    </trkseg>
  </trk>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.name.as_deref(), Some("Morning Run"));
        assert_eq!(data.track_points.points.len(), 3);
        assert_eq!(data.track_points.points[2], GpxPoint::new(35.002, 139.002).with_ele(12.0));
    }

    #[test]
    fn test_segments_concatenated_in_document_order() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <trk>
    <trkseg>
      <trkpt lat="35.0" lon="139.0"/>
      <trkpt lat="35.001" lon="139.001"/>
    </trkseg>
  </trk>
  <trk>
    <trkseg>
      <trkpt lat="36.0" lon="140.0"/>
    </trkseg>
  </trk>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        let lats: Vec<f64> = data.track_points.points.iter().map(|p| p.lat).collect();
        assert_eq!(lats, vec![35.0, 35.001, 36.0]);
    }

    #[test]
    fn test_empty_gpx() {
        let xml = r#"<?xml version="1.0"?><gpx version="1.1"></gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert!(data.waypoints.is_empty());
        assert!(data.route_points.is_empty());
        assert!(data.track_points.is_empty());
        assert!(data.name.is_none());
    }

    #[test]
    fn test_extensions_skipped() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <trk>
    <trkseg>
      <trkpt lat="35.0" lon="139.0">
        <extensions>
          <gpxtpx:TrackPointExtension xmlns:gpxtpx="http://www.garmin.com/xmlschemas/TrackPointExtension/v1">
            <gpxtpx:ele>999</gpxtpx:ele>
            <gpxtpx:hr>150</gpxtpx:hr>
          </gpxtpx:TrackPointExtension>
        </extensions>
        <ele>7</ele>
      </trkpt>
    </trkseg>
  </trk>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.track_points.points.len(), 1);
        assert_eq!(data.track_points.points[0].ele, Some(7.0));
    }

    #[test]
    fn test_with_namespace() {
        let xml = r#"<?xml version="1.0"?>
<gpx xmlns="http://www.topografix.com/GPX/1/1" version="1.1">
  <metadata><name>Namespaced</name></metadata>
  <trk><trkseg><trkpt lat="35.0" lon="139.0"><ele>3</ele></trkpt></trkseg></trk>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.name.as_deref(), Some("Namespaced"));
        assert_eq!(data.track_points.points.len(), 1);
        assert_eq!(data.track_points.points[0].ele, Some(3.0));
    }

    #[test]
    fn test_prefixed_elements() {
        let xml = r#"<?xml version="1.0"?>
<g:gpx xmlns:g="http://www.topografix.com/GPX/1/0" version="1.0">
  <g:rte><g:rtept lat="1.5" lon="2.5"><g:ele>4</g:ele></g:rtept></g:rte>
</g:gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.route_points.points, vec![GpxPoint::new(1.5, 2.5).with_ele(4.0)]);
    }

    #[test]
    fn test_cdata_name() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <metadata>
    <name><![CDATA[Test & Name]]></name>
  </metadata>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.name.as_deref(), Some("Test & Name"));
    }

    #[test]
    fn test_entity_in_name() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <trk><name>Up &amp; Down</name></trk>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.name.as_deref(), Some("Up & Down"));
    }

    fn track_error(xml: &str) -> Gpx2SvgError {
        parse_gpx(xml).unwrap().track_points.into_points().unwrap_err()
    }

    #[test]
    fn test_missing_lat_recorded() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <wpt lat="35.0" lon="139.0"><name>Good</name></wpt>
  <wpt lon="139.0"><name>Bad - no lat</name></wpt>
  <wpt lat="36.0" lon="140.0"/>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.waypoints.points.len(), 2);
        assert!(!data.waypoints.is_empty());
        assert!(matches!(
            data.waypoints.into_points(),
            Err(Gpx2SvgError::MissingAttribute {
                element: "wpt",
                attribute: "lat"
            })
        ));
    }

    #[test]
    fn test_invalid_point_only_taints_its_category() {
        let xml = r#"<gpx>
  <wpt lon="1.0"/>
  <trk><trkseg><trkpt lat="1.0" lon="1.0"/><trkpt lat="1.1" lon="1.1"/></trkseg></trk>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert!(data.waypoints.error.is_some());
        assert_eq!(data.track_points.into_points().unwrap().len(), 2);
    }

    #[test]
    fn test_first_error_kept() {
        let xml = r#"<gpx><trk><trkseg>
            <trkpt lat="95.0" lon="1.0"/>
            <trkpt lat="1.0"/>
        </trkseg></trk></gpx>"#;
        assert!(matches!(
            track_error(xml),
            Gpx2SvgError::OutOfRange { attribute: "lat", .. }
        ));
    }

    #[test]
    fn test_non_numeric_lon_rejected() {
        let xml = r#"<gpx><trk><trkseg><trkpt lat="1.0" lon="east"/></trkseg></trk></gpx>"#;
        match track_error(xml) {
            Gpx2SvgError::InvalidAttribute {
                element,
                attribute,
                value,
            } => {
                assert_eq!(element, "trkpt");
                assert_eq!(attribute, "lon");
                assert_eq!(value, "east");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nan_rejected() {
        let xml = r#"<gpx><wpt lat="NaN" lon="1.0"/></gpx>"#;
        assert!(matches!(
            parse_gpx(xml).unwrap().waypoints.into_points(),
            Err(Gpx2SvgError::InvalidAttribute { attribute: "lat", .. })
        ));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let xml = r#"<gpx><rte><rtept lat="91.0" lon="1.0"/></rte></gpx>"#;
        assert!(matches!(
            parse_gpx(xml).unwrap().route_points.into_points(),
            Err(Gpx2SvgError::OutOfRange { attribute: "lat", .. })
        ));

        let xml = r#"<gpx><rte><rtept lat="10.0" lon="-180.5"/></rte></gpx>"#;
        assert!(matches!(
            parse_gpx(xml).unwrap().route_points.into_points(),
            Err(Gpx2SvgError::OutOfRange { attribute: "lon", .. })
        ));
    }

    #[test]
    fn test_range_bounds_accepted() {
        let xml = r#"<gpx><wpt lat="-90" lon="180"/><wpt lat="90" lon="-180"/></gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.waypoints.into_points().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_elevation_rejected() {
        let xml = r#"<gpx><trk><trkseg>
            <trkpt lat="1.0" lon="1.0"><ele>high</ele></trkpt>
        </trkseg></trk></gpx>"#;
        assert!(matches!(
            track_error(xml),
            Gpx2SvgError::InvalidElevation { element: "trkpt", .. }
        ));
    }

    #[test]
    fn test_malformed_xml() {
        let xml = r#"<gpx><trk><trkseg><trkpt lat="1.0" lon="1.0"></trkseg></trk></gpx>"#;
        assert!(matches!(parse_gpx(xml), Err(Gpx2SvgError::XmlParse(_))));
    }

    #[test]
    fn test_truncated_inside_point() {
        let xml = r#"<gpx><trk><trkseg><trkpt lat="1.0" lon="1.0"><ele>5</ele></trkpt><trkpt lat="1.1" lon="1.1">"#;
        assert!(matches!(parse_gpx(xml), Err(Gpx2SvgError::XmlParse(_))));
    }

    #[test]
    fn test_truncated_after_points() {
        let xml = r#"<gpx><trk><trkseg><trkpt lat="1.0" lon="1.0"/><trkpt lat="1.1" lon="1.1"/>"#;
        let err = parse_gpx(xml).unwrap_err();
        assert!(matches!(err, Gpx2SvgError::XmlParse(_)));
        assert!(err.to_string().contains("trkseg"));
    }

    #[test]
    fn test_truncated_inside_name() {
        let xml = r#"<gpx><metadata><name>Unfinished"#;
        assert!(matches!(parse_gpx(xml), Err(Gpx2SvgError::XmlParse(_))));
    }

    #[test]
    fn test_gpx10_elements_ignored() {
        let xml = r#"<?xml version="1.0"?>
<gpx xmlns="http://www.topografix.com/GPX/1/0" version="1.0">
  <trk>
    <trkseg>
      <trkpt lat="35.0" lon="139.0">
        <speed>5.5</speed>
        <course>180.0</course>
      </trkpt>
      <trkpt lat="35.001" lon="139.001"/>
    </trkseg>
  </trk>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.track_points.points.len(), 2);
    }
}
