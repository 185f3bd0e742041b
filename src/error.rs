use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum Gpx2SvgError {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("Missing attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },

    #[error("Value '{value}' for attribute '{attribute}' on <{element}> is out of range")]
    OutOfRange {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },

    #[error("Invalid elevation '{value}' in <{element}>")]
    InvalidElevation { element: &'static str, value: String },

    #[error("Invalid canvas: {0}")]
    InvalidCanvas(String),

    #[error("No GPS points found")]
    NoPoints,

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<quick_xml::events::attributes::AttrError> for Gpx2SvgError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Self::XmlParse(e.into())
    }
}

impl From<Gpx2SvgError> for JsValue {
    fn from(e: Gpx2SvgError) -> Self {
        js_sys::Error::new(&e.to_string()).into()
    }
}
