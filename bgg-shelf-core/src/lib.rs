//! Shared data model for the collection sync pipeline.
//!
//! Raw records arrive from the catalog API client already deserialized; the
//! enrichment engine turns them into [`ResolvedGameEntity`] values that the
//! search-index collaborator uploads. Nothing in this crate performs I/O.

pub mod multimap;
pub mod types;

pub use multimap::MultiMap;
pub use types::*;
