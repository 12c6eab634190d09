/// Errors that can occur while writing to a search index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search index returned HTTP {status} for {url}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },

    #[error("Refusing to prune the index against an empty run")]
    EmptyRun,

    #[error("Invalid index URL: {0}")]
    Url(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IndexError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
