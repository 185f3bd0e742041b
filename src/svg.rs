use quick_xml::escape::escape;

use crate::options::Canvas;
use crate::path::PathDescription;

const STROKE: &str = "#d4df00";
const STROKE_WIDTH: u32 = 2;

/// Wrap `path` in a standalone SVG document sized to `canvas`.
pub fn render_svg(path: &PathDescription, canvas: &Canvas, title: Option<&str>) -> String {
    let title = title
        .map(|t| format!("  <title>{}</title>\n", escape(t)))
        .unwrap_or_default();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <svg viewBox=\"0 0 {width} {height}\" xmlns=\"http://www.w3.org/2000/svg\">\n\
         {title}  <path d=\"{path}\" fill=\"none\" stroke=\"{STROKE}\" stroke-width=\"{STROKE_WIDTH}\" \
         stroke-linecap=\"round\" stroke-linejoin=\"round\"/>\n\
         </svg>",
        width = canvas.width,
        height = canvas.height,
    )
}
