/// Errors that can occur while talking to the catalog API.
#[derive(Debug, thiserror::Error)]
pub enum BggError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Connection to the catalog API failed: {0}")]
    Connection(String),

    #[error("Catalog API returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Catalog API still busy after {attempts} attempts: {url}")]
    RetriesExhausted { attempts: u32, url: String },

    #[error("Invalid request URL: {0}")]
    Url(String),

    #[error("Catalog API error: {0}")]
    Api(String),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BggError {
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    /// Whether the request may succeed if simply repeated.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
