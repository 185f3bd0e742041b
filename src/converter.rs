use serde::Serialize;

use crate::error::Gpx2SvgError;
use crate::normalize::{ProfileEntry, normalize};
use crate::options::Canvas;
use crate::parser::parse_gpx;
use crate::path::build_path;
use crate::sample::{SampleSource, extract_samples};
use crate::svg::render_svg;

/// Result of converting one GPX document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub svg: String,
    pub profile: Vec<ProfileEntry>,
    pub source: SampleSource,
    pub point_count: usize,
}

/// Parse `xml` and render its first non-empty point category onto `canvas`.
pub fn convert(xml: &str, canvas: &Canvas) -> Result<Conversion, Gpx2SvgError> {
    let mut data = parse_gpx(xml)?;
    let title = data.name.take();
    let extraction = extract_samples(data)?;
    let source = extraction.source.ok_or(Gpx2SvgError::NoPoints)?;

    let normalized = normalize(&extraction.samples, canvas);
    let path = build_path(&normalized.points).ok_or(Gpx2SvgError::NoPoints)?;
    let svg = render_svg(&path, canvas, title.as_deref());

    Ok(Conversion {
        svg,
        point_count: path.len(),
        profile: normalized.profile,
        source,
    })
}
