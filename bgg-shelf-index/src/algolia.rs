//! Algolia-backed [`SearchIndex`] over the REST API.

use std::collections::BTreeSet;
use std::time::Duration;

use bgg_shelf_core::ResolvedGameEntity;
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::SearchIndex;
use crate::error::IndexError;
use crate::record::records;

/// Operations per batch request.
pub const BATCH_SIZE: usize = 1000;
pub const DEFAULT_HITS_PER_PAGE: u32 = 48;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Sort orders offered by the frontend, one replica index each.
const REPLICA_SORTS: &[(&str, &str)] = &[
    ("rank_ascending", "asc(rank)"),
    ("numrated_descending", "desc(usersrated)"),
    ("numowned_descending", "desc(numowned)"),
    ("lastmod_descending", "desc(lastmodified)"),
];

const DEFAULT_RANKING: &[&str] = &[
    "typo",
    "geo",
    "words",
    "filters",
    "proximity",
    "attribute",
    "exact",
    "custom",
];

#[derive(Debug, Clone)]
pub struct AlgoliaConfig {
    pub app_id: String,
    pub api_key: String,
    pub index_name: String,
    pub hits_per_page: u32,
}

// ── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ObjectRef {
    #[serde(rename = "objectID")]
    object_id: String,
}

#[derive(Debug, Serialize)]
struct Operation<T> {
    action: &'static str,
    body: T,
}

#[derive(Debug, Serialize)]
struct Batch<T> {
    requests: Vec<Operation<T>>,
}

impl<T> Batch<T> {
    fn new(action: &'static str, bodies: impl IntoIterator<Item = T>) -> Self {
        Self {
            requests: bodies.into_iter().map(|body| Operation { action, body }).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct BrowsePage {
    #[serde(default)]
    hits: Vec<ObjectRef>,
    #[serde(default)]
    cursor: Option<String>,
}

// ── Index ───────────────────────────────────────────────────────────────────

pub struct AlgoliaIndex {
    http: Client,
    base: Url,
    index_name: String,
}

impl AlgoliaIndex {
    /// Build the client and push the index settings (searchable and facet
    /// attributes, page size, sort replicas).
    pub fn connect(config: &AlgoliaConfig) -> Result<Self, IndexError> {
        if config.app_id.trim().is_empty() || config.index_name.trim().is_empty() {
            return Err(IndexError::config("algolia app_id and index_name must be set"));
        }
        if config.api_key.trim().is_empty() {
            return Err(IndexError::config("missing algolia API key"));
        }

        let mut headers = HeaderMap::new();
        headers.insert("x-algolia-application-id", header_value(&config.app_id)?);
        let mut key = header_value(&config.api_key)?;
        key.set_sensitive(true);
        headers.insert("x-algolia-api-key", key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;
        let base = Url::parse(&format!("https://{}.algolia.net", config.app_id))
            .map_err(|e| IndexError::Url(e.to_string()))?;

        let index = Self {
            http,
            base,
            index_name: config.index_name.clone(),
        };
        index.configure(config.hits_per_page)?;
        Ok(index)
    }

    fn configure(&self, hits_per_page: u32) -> Result<(), IndexError> {
        let replicas = replica_names(&self.index_name);
        let url = self.index_url(&self.index_name, "settings")?;
        self.send(Method::PUT, url, &settings(hits_per_page, &replicas))?;

        for (replica, (_, sort)) in replicas.iter().zip(REPLICA_SORTS) {
            let url = self.index_url(replica, "settings")?;
            self.send(Method::PUT, url, &replica_settings(sort))?;
        }
        log::debug!(
            "Configured index {} with {} replicas",
            self.index_name,
            replicas.len()
        );
        Ok(())
    }

    fn object_ids(&self) -> Result<Vec<String>, IndexError> {
        let url = self.index_url(&self.index_name, "browse")?;
        let mut ids = Vec::new();
        let mut body = json!({ "attributesToRetrieve": ["objectID"], "hitsPerPage": BATCH_SIZE });
        loop {
            let text = self.send(Method::POST, url.clone(), &body)?;
            let page: BrowsePage = serde_json::from_str(&text)?;
            ids.extend(page.hits.into_iter().map(|hit| hit.object_id));
            match page.cursor {
                Some(cursor) => body = json!({ "cursor": cursor }),
                None => break,
            }
        }
        Ok(ids)
    }

    fn send_batches<T: Serialize>(
        &self,
        action: &'static str,
        bodies: Vec<T>,
    ) -> Result<usize, IndexError> {
        let url = self.index_url(&self.index_name, "batch")?;
        let mut sent = 0;
        let mut bodies = bodies.into_iter().peekable();
        while bodies.peek().is_some() {
            let batch = Batch::new(action, bodies.by_ref().take(BATCH_SIZE));
            sent += batch.requests.len();
            self.send(Method::POST, url.clone(), &batch)?;
            log::debug!("Sent {sent} {action} operations");
        }
        Ok(sent)
    }

    fn index_url(&self, index: &str, action: &str) -> Result<Url, IndexError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| IndexError::Url(self.base.to_string()))?
            .clear()
            .extend(["1", "indexes", index, action]);
        Ok(url)
    }

    fn send(&self, method: Method, url: Url, body: &impl Serialize) -> Result<String, IndexError> {
        let resp = self
            .http
            .request(method, url.clone())
            .body(serde_json::to_string(body)?)
            .send()?;
        let status = resp.status();
        let text = resp.text()?;
        if !status.is_success() {
            return Err(IndexError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                message: text.chars().take(200).collect(),
            });
        }
        Ok(text)
    }
}

impl SearchIndex for AlgoliaIndex {
    fn upsert(&mut self, games: &[ResolvedGameEntity]) -> Result<(), IndexError> {
        let sent = self.send_batches("updateObject", records(games))?;
        log::info!("Uploaded {sent} records to {}", self.index_name);
        Ok(())
    }

    fn prune(&mut self, games: &[ResolvedGameEntity]) -> Result<(), IndexError> {
        if games.is_empty() {
            return Err(IndexError::EmptyRun);
        }
        let keep: BTreeSet<String> = games.iter().map(|g| g.collection_id.to_string()).collect();
        let stale = stale_ids(self.object_ids()?, &keep);
        if stale.is_empty() {
            log::debug!("Nothing to prune from {}", self.index_name);
            return Ok(());
        }
        let refs: Vec<ObjectRef> = stale
            .into_iter()
            .map(|object_id| ObjectRef { object_id })
            .collect();
        let removed = self.send_batches("deleteObject", refs)?;
        log::info!("Removed {removed} stale records from {}", self.index_name);
        Ok(())
    }
}

// ── Request bodies ──────────────────────────────────────────────────────────

fn header_value(value: &str) -> Result<HeaderValue, IndexError> {
    HeaderValue::from_str(value).map_err(|e| IndexError::config(format!("invalid header value: {e}")))
}

fn replica_names(index_name: &str) -> Vec<String> {
    REPLICA_SORTS
        .iter()
        .map(|(suffix, _)| format!("{index_name}_{suffix}"))
        .collect()
}

fn settings(hits_per_page: u32, replicas: &[String]) -> Value {
    json!({
        "searchableAttributes": ["name", "alternate_names", "description"],
        "attributesForFaceting": [
            "searchable(categories)",
            "searchable(mechanics)",
            "players.level1",
            "players.level2",
            "weight",
            "playing_time",
            "searchable(previous_players)",
            "numplays",
            "year",
            "minage",
            "tags",
            "searchable(designers.name)",
            "searchable(publishers.name)",
            "searchable(artists.name)",
        ],
        "customRanking": ["asc(name)"],
        "hitsPerPage": hits_per_page,
        "replicas": replicas,
    })
}

fn replica_settings(sort: &str) -> Value {
    let ranking: Vec<&str> = std::iter::once(sort)
        .chain(DEFAULT_RANKING.iter().copied())
        .collect();
    json!({ "ranking": ranking })
}

/// Ids present in the index but absent from this run, first-seen order.
fn stale_ids(existing: Vec<String>, keep: &BTreeSet<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    existing
        .into_iter()
        .filter(|id| !keep.contains(id) && seen.insert(id.clone()))
        .collect()
}
