//! [`SearchIndex`] that writes the records to a local JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use bgg_shelf_core::ResolvedGameEntity;

use crate::SearchIndex;
use crate::error::IndexError;
use crate::record::records;

/// Writes the full record set as a pretty-printed JSON array.
///
/// Every upsert rewrites the file, so pruning has nothing left to do.
#[derive(Debug, Clone)]
pub struct JsonDumpIndex {
    path: PathBuf,
}

impl JsonDumpIndex {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SearchIndex for JsonDumpIndex {
    fn upsert(&mut self, games: &[ResolvedGameEntity]) -> Result<(), IndexError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let records = records(games);
        let contents = serde_json::to_string_pretty(&records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        log::info!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    fn prune(&mut self, _games: &[ResolvedGameEntity]) -> Result<(), IndexError> {
        Ok(())
    }
}
