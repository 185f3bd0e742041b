use std::fmt;

use crate::normalize::DrawingPoint;

/// An open polyline: move to the first point, then a straight line to each
/// following one.
///
/// `Display` renders SVG path data with two decimals per coordinate,
/// e.g. `M 20.00,580.00 L 780.00,200.00`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathDescription {
    points: Vec<DrawingPoint>,
}

impl PathDescription {
    pub fn points(&self) -> &[DrawingPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl fmt::Display for PathDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.points.iter().enumerate() {
            let command = if i == 0 { "M" } else { " L" };
            write!(f, "{command} {:.2},{:.2}", p.x, p.y)?;
        }
        Ok(())
    }
}

/// Build the path for `points`, or `None` when there is nothing to draw.
pub fn build_path(points: &[DrawingPoint]) -> Option<PathDescription> {
    if points.is_empty() {
        return None;
    }
    Some(PathDescription {
        points: points.to_vec(),
    })
}
