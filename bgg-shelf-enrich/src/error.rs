/// Errors that stop an enrichment run.
///
/// Missing link targets and absent statistics are not errors; they are
/// skipped or mapped to sentinel values during resolution.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    /// The owned-collection fetch returned nothing. The run must not reach
    /// the index prune step in this state.
    #[error("No games imported; check the boardgamegeek user name and collection parameters")]
    EmptyCollection,
}
