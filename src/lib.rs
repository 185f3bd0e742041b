pub mod converter;
pub mod error;
pub mod gpx_types;
pub mod normalize;
pub mod options;
pub mod output;
pub mod parser;
pub mod path;
pub mod sample;
pub mod svg;

use wasm_bindgen::prelude::*;

pub use crate::converter::{Conversion, convert};
pub use crate::error::Gpx2SvgError;
pub use crate::options::Canvas;

/// Convert a GPX string to an SVG drawing plus its profile, returned as a JS object
/// `{ svg, profile, source, pointCount }`.
#[wasm_bindgen(js_name = gpxToSvg)]
pub fn gpx_to_svg(gpx_string: &str, canvas: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let canvas = parse_canvas(canvas)?;
    let conversion = convert(gpx_string, &canvas)?;
    serde_wasm_bindgen::to_value(&conversion).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Convert a GPX string to an SVG document string.
#[wasm_bindgen(js_name = gpxToSvgString)]
pub fn gpx_to_svg_string(gpx_string: &str, canvas: JsValue) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let canvas = parse_canvas(canvas)?;
    Ok(convert(gpx_string, &canvas)?.svg)
}

fn parse_canvas(canvas: JsValue) -> Result<Canvas, JsValue> {
    let canvas = if canvas.is_undefined() || canvas.is_null() {
        Canvas::default()
    } else {
        serde_wasm_bindgen::from_value(canvas).map_err(|e| JsValue::from_str(&e.to_string()))?
    };
    canvas.validate()?;
    Ok(canvas)
}
