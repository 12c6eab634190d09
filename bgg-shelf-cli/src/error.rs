use thiserror::Error;

use bgg_shelf_client::BggError;
use bgg_shelf_enrich::EnrichError;
use bgg_shelf_index::IndexError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Configuration file missing or malformed
    #[error("Config error: {0}")]
    Config(String),

    /// Catalog API failure
    #[error("BoardGameGeek error: {0}")]
    Bgg(#[from] BggError),

    /// Nothing usable came back from the catalog
    #[error("{0}")]
    Enrich(#[from] EnrichError),

    /// Search index failure
    #[error("Index error: {0}")]
    Index(#[from] IndexError),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
