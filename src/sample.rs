use serde::Serialize;
use tracing::debug;

use crate::error::Gpx2SvgError;
use crate::gpx_types::{GpxData, GpxPoint, PointList};

/// One recorded track point, in degrees and meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub lat: f64,
    pub lon: f64,
    pub ele: f64,
}

impl Sample {
    pub fn new(lat: f64, lon: f64, ele: f64) -> Self {
        Self { lat, lon, ele }
    }
}

impl From<&GpxPoint> for Sample {
    fn from(pt: &GpxPoint) -> Self {
        Self::new(pt.lat, pt.lon, pt.ele.unwrap_or(0.0))
    }
}

/// GPX point category a sample sequence was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleSource {
    Track,
    Route,
    Waypoint,
}

impl SampleSource {
    /// Categories in the order they are tried.
    pub const PRIORITY: [SampleSource; 3] = [Self::Track, Self::Route, Self::Waypoint];

    fn take_points(self, data: &mut GpxData) -> PointList {
        std::mem::take(match self {
            Self::Track => &mut data.track_points,
            Self::Route => &mut data.route_points,
            Self::Waypoint => &mut data.waypoints,
        })
    }
}

impl std::fmt::Display for SampleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Track => f.write_str("track"),
            Self::Route => f.write_str("route"),
            Self::Waypoint => f.write_str("waypoint"),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Extraction {
    /// `None` when the document has no points at all.
    pub source: Option<SampleSource>,
    pub samples: Vec<Sample>,
}

/// Take the samples of the first non-empty category in [`SampleSource::PRIORITY`].
///
/// Only the chosen category is checked: an invalid point there fails the
/// extraction, while invalid points in the other categories are ignored.
pub fn extract_samples(mut data: GpxData) -> Result<Extraction, Gpx2SvgError> {
    for source in SampleSource::PRIORITY {
        let list = source.take_points(&mut data);
        if list.is_empty() {
            debug!(%source, "no points in category, falling back");
            continue;
        }

        let points = list.into_points()?;
        debug!(%source, count = points.len(), "extracted samples");
        return Ok(Extraction {
            source: Some(source),
            samples: points.iter().map(Sample::from).collect(),
        });
    }

    Ok(Extraction::default())
}
