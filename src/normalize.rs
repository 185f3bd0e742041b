//! Projection of geographic samples onto the drawing surface.
//!
//! The projection is a plain linear scaling of latitude/longitude degrees
//! with one uniform factor, so the track keeps its shape and fits the
//! canvas on its more constrained axis.

use serde::Serialize;

use crate::options::Canvas;
use crate::sample::Sample;

/// Mean earth radius used for great-circle distances.
pub const MEAN_EARTH_RADIUS_KM: f64 = 6371.0;

/// Latitude/longitude extent of a sample sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Returns `None` for an empty slice.
    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        let (first, rest) = samples.split_first()?;
        let init = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };

        Some(rest.iter().fold(init, |bbox, s| Self {
            min_lat: bbox.min_lat.min(s.lat),
            max_lat: bbox.max_lat.max(s.lat),
            min_lon: bbox.min_lon.min(s.lon),
            max_lon: bbox.max_lon.max(s.lon),
        }))
    }

    pub fn lat_range(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lon_range(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Uniform degrees-to-units factor that fits the box inside `canvas`.
    ///
    /// An axis with zero extent contributes a factor of 1.
    pub fn scale(&self, canvas: &Canvas) -> f64 {
        let lat_range = self.lat_range();
        let lon_range = self.lon_range();

        let scale_lat = if lat_range > 0.0 {
            canvas.inner_height() / lat_range
        } else {
            1.0
        };
        let scale_lon = if lon_range > 0.0 {
            canvas.inner_width() / lon_range
        } else {
            1.0
        };

        scale_lat.min(scale_lon)
    }
}

/// A point on the drawing surface. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawingPoint {
    pub x: f64,
    pub y: f64,
}

/// Cumulative distance and elevation at one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEntry {
    /// Rounded to 2 decimal places.
    pub distance_km: f64,
    /// Rounded to the nearest integer.
    pub elevation_m: f64,
}

/// Output of [`normalize`]; both vectors are index-aligned with the input.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Normalized {
    pub points: Vec<DrawingPoint>,
    pub profile: Vec<ProfileEntry>,
}

/// Great-circle distance between two lat/lon positions, in kilometers.
pub fn haversine_km(a_lat: f64, a_lon: f64, b_lat: f64, b_lon: f64) -> f64 {
    let dlat = (b_lat - a_lat).to_radians();
    let dlon = (b_lon - a_lon).to_radians();
    let h = (dlat / 2.0).sin().powi(2)
        + a_lat.to_radians().cos() * b_lat.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    // h can drift just above 1 for antipodal points
    let c = 2.0 * h.sqrt().min(1.0).asin();
    MEAN_EARTH_RADIUS_KM * c
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Project `samples` onto `canvas` and accumulate the distance profile.
pub fn normalize(samples: &[Sample], canvas: &Canvas) -> Normalized {
    let Some(bbox) = BoundingBox::from_samples(samples) else {
        return Normalized::default();
    };
    let scale = bbox.scale(canvas);

    let mut points = Vec::with_capacity(samples.len());
    let mut profile = Vec::with_capacity(samples.len());
    let mut cumulative_km = 0.0;
    let mut prev = samples[0];

    for sample in samples {
        points.push(DrawingPoint {
            x: canvas.margin + (sample.lon - bbox.min_lon) * scale,
            y: canvas.height - canvas.margin - (sample.lat - bbox.min_lat) * scale,
        });

        cumulative_km += haversine_km(prev.lat, prev.lon, sample.lat, sample.lon);
        prev = *sample;
        profile.push(ProfileEntry {
            distance_km: round_to_hundredths(cumulative_km),
            elevation_m: sample.ele.round_ties_even(),
        });
    }

    Normalized { points, profile }
}
