use crate::error::Gpx2SvgError;

/// Points collected from a GPX document, grouped by the element they came from.
#[derive(Debug, Default)]
pub struct GpxData {
    /// First `<name>` of the document's `<metadata>` or `<trk>`.
    pub name: Option<String>,
    /// Every `<trkpt>` in document order, across all tracks and segments.
    pub track_points: PointList,
    /// Every `<rtept>` in document order, across all routes.
    pub route_points: PointList,
    pub waypoints: PointList,
}

/// Points of one category.
///
/// A point that fails validation is not stored; the first such failure is
/// kept in `error` and only surfaces if the category is used.
#[derive(Debug, Default)]
pub struct PointList {
    pub points: Vec<GpxPoint>,
    pub error: Option<Gpx2SvgError>,
}

impl PointList {
    /// True when the document had no element of this category at all.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.error.is_none()
    }

    pub fn push(&mut self, point: Result<GpxPoint, Gpx2SvgError>) {
        match point {
            Ok(point) => self.points.push(point),
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
    }

    /// The points, or the first validation error.
    pub fn into_points(self) -> Result<Vec<GpxPoint>, Gpx2SvgError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.points),
        }
    }
}

impl From<Vec<GpxPoint>> for PointList {
    fn from(points: Vec<GpxPoint>) -> Self {
        Self {
            points,
            error: None,
        }
    }
}

/// A single GPX point (used for wpt, rtept, trkpt).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpxPoint {
    pub lat: f64,
    pub lon: f64,
    pub ele: Option<f64>,
}

impl GpxPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ele: None,
        }
    }

    pub fn with_ele(mut self, ele: f64) -> Self {
        self.ele = Some(ele);
        self
    }
}
