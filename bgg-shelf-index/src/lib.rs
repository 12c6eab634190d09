//! Search-index side of the sync: turns enriched entities into flat search
//! records and pushes them to Algolia or a local JSON file.

pub mod algolia;
pub mod error;
pub mod json_dump;
pub mod record;

pub use algolia::{AlgoliaConfig, AlgoliaIndex, DEFAULT_HITS_PER_PAGE};
pub use error::IndexError;
pub use json_dump::JsonDumpIndex;
pub use record::{IndexRecord, PlayerFacet};

use bgg_shelf_core::ResolvedGameEntity;

/// A destination for enriched entities.
///
/// Callers upsert the full run and then prune, so the index ends up holding
/// exactly the records of the last run.
pub trait SearchIndex {
    /// Insert or replace one record per entity.
    fn upsert(&mut self, games: &[ResolvedGameEntity]) -> Result<(), IndexError>;

    /// Remove every record not produced by `games`.
    fn prune(&mut self, games: &[ResolvedGameEntity]) -> Result<(), IndexError>;
}
