use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum TrailGpxError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("No tracks found in GPX file")]
    NoTracksFound,

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

    #[error("Invalid options: {0}")]
    Options(String),
}

pub type Result<T> = std::result::Result<T, TrailGpxError>;

impl TrailGpxError {
    /// Name of the JS error class this error surfaces as.
    pub fn js_name(&self) -> &'static str {
        match self {
            Self::Xml(_) => "SyntaxError",
            _ => "ParseError",
        }
    }
}

impl From<TrailGpxError> for JsValue {
    fn from(e: TrailGpxError) -> Self {
        let err = js_sys::Error::new(&e.to_string());
        err.set_name(e.js_name());
        err.into()
    }
}
