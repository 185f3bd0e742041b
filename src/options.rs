use serde::Deserialize;

use crate::error::Gpx2SvgError;

/// Drawing surface the track is projected onto, in SVG user units.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Canvas {
    /// Canvas width (default: 800)
    #[serde(default = "default_width")]
    pub width: f64,

    /// Canvas height (default: 600)
    #[serde(default = "default_height")]
    pub height: f64,

    /// Blank border kept on every side (default: 20)
    #[serde(default = "default_margin")]
    pub margin: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margin: default_margin(),
        }
    }
}

impl Canvas {
    pub fn new(width: f64, height: f64, margin: f64) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    /// Width available to the track once margins are removed.
    pub fn inner_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    /// Height available to the track once margins are removed.
    pub fn inner_height(&self) -> f64 {
        self.height - 2.0 * self.margin
    }

    pub fn validate(&self) -> Result<(), Gpx2SvgError> {
        let all_finite = [self.width, self.height, self.margin]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(Gpx2SvgError::InvalidCanvas(
                "dimensions must be finite".to_string(),
            ));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(Gpx2SvgError::InvalidCanvas(format!(
                "size {}x{} must be positive",
                self.width, self.height
            )));
        }
        if self.margin < 0.0 || self.inner_width() <= 0.0 || self.inner_height() <= 0.0 {
            return Err(Gpx2SvgError::InvalidCanvas(format!(
                "margin {} leaves no drawable area on a {}x{} canvas",
                self.margin, self.width, self.height
            )));
        }
        Ok(())
    }
}

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    600.0
}

fn default_margin() -> f64 {
    20.0
}
