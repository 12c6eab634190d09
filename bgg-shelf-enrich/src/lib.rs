//! Collection enrichment: turns the flat records fetched from the catalog
//! into one nested, display-ready entity per owned base-game edition.
//!
//! The pipeline is pure and synchronous:
//! [`RecordStore`] → [`links::resolve`] → [`aggregate::enrich`].

pub mod aggregate;
pub mod aliases;
pub mod derived;
pub mod error;
pub mod links;
pub mod overrides;
pub mod store;
pub mod titles;

pub use error::EnrichError;
pub use overrides::LinkOverride;
pub use store::{FetchedRecords, RecordStore, detail_ids};

use bgg_shelf_core::ResolvedGameEntity;

/// Enrich one run's fetched records.
///
/// Fails with [`EnrichError::EmptyCollection`] when nothing owned was
/// fetched, so callers never prune an index against an empty run.
pub fn enrich_collection(records: FetchedRecords) -> Result<Vec<ResolvedGameEntity>, EnrichError> {
    enrich_collection_with(records, &[])
}

/// Like [`enrich_collection`] with extra expansion links on top of the
/// built-in corrections.
pub fn enrich_collection_with(
    records: FetchedRecords,
    extra_links: &[LinkOverride],
) -> Result<Vec<ResolvedGameEntity>, EnrichError> {
    let store = RecordStore::with_link_overrides(records, extra_links)?;
    Ok(aggregate::enrich(&store))
}

/// Totals reported after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    pub games: usize,
    pub expansions: usize,
    pub accessories: usize,
}

impl EnrichSummary {
    pub fn of(games: &[ResolvedGameEntity]) -> Self {
        Self {
            games: games.len(),
            expansions: games.iter().map(|g| g.expansions.len()).sum(),
            accessories: games.iter().map(|g| g.accessories.len()).sum(),
        }
    }
}
