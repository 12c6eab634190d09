use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use bgg_shelf_client::{BggClient, ResponseCache, Transport};
use bgg_shelf_enrich::{EnrichSummary, FetchedRecords, detail_ids, enrich_collection_with};
use bgg_shelf_index::{AlgoliaConfig, AlgoliaIndex, JsonDumpIndex, SearchIndex};

use crate::cli_types::SyncArgs;
use crate::config::{self, Config};
use crate::error::CliError;

/// Fetch, enrich, and index the configured user's collection.
pub(crate) fn run_sync(config_path: &Path, args: SyncArgs) -> Result<(), CliError> {
    let config = config::load(config_path)?;

    let client = catalog_client(&config, args.cache_bgg)?;
    let records = fetch_records(&client, &config)?;

    publish(&config, records, &args, || {
        let algolia = algolia_config(&config, args.apikey.clone())?;
        Ok(AlgoliaIndex::connect(&algolia)?)
    })
}

/// Enrich fetched records and hand them to the dump file and the index.
/// The index is only connected once enrichment has succeeded.
fn publish<I, F>(
    config: &Config,
    records: FetchedRecords,
    args: &SyncArgs,
    connect: F,
) -> Result<(), CliError>
where
    I: SearchIndex,
    F: FnOnce() -> Result<I, CliError>,
{
    let games = enrich_collection_with(records, &config.expansion_links)?;
    let summary = EnrichSummary::of(&games);

    log::info!(
        "Imported {} games, {} expansions, and {} accessories from boardgamegeek.",
        summary.games.if_supports_color(Stdout, |t| t.bold()),
        summary.expansions.if_supports_color(Stdout, |t| t.bold()),
        summary.accessories.if_supports_color(Stdout, |t| t.bold()),
    );

    if let Some(path) = &args.dump {
        let mut dump = JsonDumpIndex::new(path);
        dump.upsert(&games)?;
        dump.prune(&games)?;
    }

    if args.no_indexing {
        log::info!("Skipped indexing.");
        return Ok(());
    }

    let mut index = connect()?;
    index.upsert(&games)?;
    index.prune(&games)?;

    log::info!(
        "Indexed {} games, {} expansions, and {} accessories in algolia, and removed everything else.",
        summary.games.if_supports_color(Stdout, |t| t.bold()),
        summary.expansions.if_supports_color(Stdout, |t| t.bold()),
        summary.accessories.if_supports_color(Stdout, |t| t.bold()),
    );
    Ok(())
}

fn catalog_client(config: &Config, cache: bool) -> Result<BggClient, CliError> {
    let client = BggClient::new()?;
    if !cache {
        return Ok(client);
    }
    let cache = ResponseCache::for_project(&config.project.name)?;
    log::debug!("Caching catalog responses in {}", cache.dir().display());
    Ok(client.with_cache(cache))
}

/// All raw records one run needs, in the order the catalog returns them.
fn fetch_records<T: Transport>(
    client: &BggClient<T>,
    config: &Config,
) -> Result<FetchedRecords, CliError> {
    let user = &config.boardgamegeek.user_name;

    let mut owned = Vec::new();
    for params in config.boardgamegeek.extra_params.requests()? {
        owned.extend(client.collection(user, &params)?);
    }
    let accessories = client.owned_accessories(user)?;
    let plays = client.plays(user)?;
    let details = client.things(&detail_ids(&owned, &accessories))?;

    log::debug!(
        "Fetched {} owned rows, {} accessories, {} plays, {} catalog records",
        owned.len(),
        accessories.len(),
        plays.len(),
        details.len()
    );
    Ok(FetchedRecords {
        owned,
        accessories,
        plays,
        details,
    })
}

fn algolia_config(config: &Config, api_key: Option<String>) -> Result<AlgoliaConfig, CliError> {
    let settings = config
        .algolia
        .as_ref()
        .ok_or_else(|| CliError::config("missing [algolia] section (or pass --no-indexing)"))?;
    let api_key = api_key
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| CliError::config("missing Algolia API key: pass --apikey or set ALGOLIA_API_KEY"))?;
    Ok(AlgoliaConfig {
        app_id: settings.app_id.clone(),
        api_key,
        index_name: settings.index_name.clone(),
        hits_per_page: settings.hits_per_page,
    })
}
