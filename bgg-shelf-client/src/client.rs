use std::cell::Cell;
use std::thread;
use std::time::{Duration, Instant};

use bgg_shelf_core::{ItemId, RawCollectionItem, RawGameDetail, RawPlayRecord};
use reqwest::Url;

use crate::cache::ResponseCache;
use crate::error::BggError;
use crate::xml;

pub const BASE_URL: &str = "https://boardgamegeek.com/xmlapi2";

/// Ids per `/thing` request; longer lists risk "414 URI too long".
pub const THING_BATCH_SIZE: usize = 20;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("bgg-shelf/", env!("CARGO_PKG_VERSION"));

// ── Transport ───────────────────────────────────────────────────────────────

/// Status and body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Issues a single GET. Retries, pacing and caching live in [`BggClient`].
pub trait Transport {
    /// Connection-level failures must be reported as
    /// [`BggError::Connection`] so they are retried.
    fn get(&self, url: &str) -> Result<HttpResponse, BggError>;
}

/// [`Transport`] backed by a blocking reqwest client.
pub struct HttpTransport {
    http: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, BggError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, BggError> {
        let resp = self.http.get(url).send().map_err(connection_error)?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(connection_error)?;
        Ok(HttpResponse { status, body })
    }
}

fn connection_error(e: reqwest::Error) -> BggError {
    if e.is_connect() || e.is_timeout() || e.is_request() || e.is_body() {
        BggError::Connection(e.to_string())
    } else {
        BggError::Http(e)
    }
}

// ── Retry policy ────────────────────────────────────────────────────────────

/// Fixed delay between attempts and how many extra attempts are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub delay: Duration,
    pub max_retries: u32,
}

impl Backoff {
    pub const fn new(delay: Duration, max_retries: u32) -> Self {
        Self { delay, max_retries }
    }
}

/// How the client reacts to each class of transient failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// HTTP 202: the request was queued and will be ready later.
    pub queued: Backoff,
    /// HTTP 429.
    pub throttled: Backoff,
    /// HTTP 502/503/504 and dropped connections.
    pub unavailable: Backoff,
    /// Minimum spacing between two requests.
    pub min_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            queued: Backoff::new(Duration::from_secs(5), 10),
            throttled: Backoff::new(Duration::from_secs(30), 3),
            unavailable: Backoff::new(Duration::from_secs(2), 3),
            min_interval: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Same retry counts without any waiting.
    pub fn immediate() -> Self {
        let default = Self::default();
        Self {
            queued: Backoff::new(Duration::ZERO, default.queued.max_retries),
            throttled: Backoff::new(Duration::ZERO, default.throttled.max_retries),
            unavailable: Backoff::new(Duration::ZERO, default.unavailable.max_retries),
            min_interval: Duration::ZERO,
        }
    }
}

// ── Client ──────────────────────────────────────────────────────────────────

/// Client for the catalog API with retry, request pacing and an optional
/// response cache.
///
/// Requests are issued one at a time from the calling thread.
pub struct BggClient<T: Transport = HttpTransport> {
    transport: T,
    policy: RetryPolicy,
    cache: Option<ResponseCache>,
    last_request: Cell<Option<Instant>>,
}

impl BggClient<HttpTransport> {
    pub fn new() -> Result<Self, BggError> {
        Ok(Self::with_transport(HttpTransport::new()?))
    }
}

impl<T: Transport> BggClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            policy: RetryPolicy::default(),
            cache: None,
            last_request: Cell::new(None),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Collection rows for `user`, one per owned edition.
    ///
    /// `extra` is appended to the query as-is (`own=1`, `subtype=...`).
    pub fn collection(
        &self,
        user: &str,
        extra: &[(String, String)],
    ) -> Result<Vec<RawCollectionItem>, BggError> {
        let mut params = vec![("username", user), ("version", "1")];
        params.extend(extra.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let url = endpoint("collection", &params)?;

        let items = xml::parse_collection(&self.fetch(&url)?)?;
        log::debug!("Collection request returned {} rows", items.len());
        Ok(items)
    }

    /// Owned accessories for `user`.
    pub fn owned_accessories(&self, user: &str) -> Result<Vec<RawCollectionItem>, BggError> {
        let extra = [
            ("subtype".to_string(), "boardgameaccessory".to_string()),
            ("own".to_string(), "1".to_string()),
        ];
        self.collection(user, &extra)
    }

    /// Every logged play of `user`, paging until an empty page comes back.
    pub fn plays(&self, user: &str) -> Result<Vec<RawPlayRecord>, BggError> {
        let mut plays = Vec::new();
        for page in 1u32.. {
            let page = page.to_string();
            let url = endpoint(
                "plays",
                &[("username", user), ("version", "1"), ("page", page.as_str())],
            )?;
            let batch = xml::parse_plays(&self.fetch(&url)?)?;
            if batch.is_empty() {
                break;
            }
            plays.extend(batch);
        }
        log::debug!("Fetched {} plays", plays.len());
        Ok(plays)
    }

    /// Catalog records for `ids`, with statistics, in batches of
    /// [`THING_BATCH_SIZE`].
    pub fn things(&self, ids: &[ItemId]) -> Result<Vec<RawGameDetail>, BggError> {
        let mut details = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(THING_BATCH_SIZE) {
            let id_list: Vec<String> = chunk.iter().map(ToString::to_string).collect();
            // Numeric ids only, so the comma list needs no escaping.
            let url = format!("{BASE_URL}/thing?id={}&stats=1", id_list.join(","));
            details.extend(xml::parse_things(&self.fetch(&url)?)?);
        }
        log::debug!("Fetched {} catalog records for {} ids", details.len(), ids.len());
        Ok(details)
    }

    fn fetch(&self, url: &str) -> Result<String, BggError> {
        if let Some(cache) = &self.cache {
            if let Some(body) = cache.get(url)? {
                log::debug!("Cache hit: {url}");
                return Ok(body);
            }
        }

        let body = self.fetch_with_retry(url)?;
        xml::check_api_errors(&body)?;

        if let Some(cache) = &self.cache {
            cache.put(url, &body)?;
        }
        Ok(body)
    }

    fn fetch_with_retry(&self, url: &str) -> Result<String, BggError> {
        let mut queued = 0;
        let mut throttled = 0;
        let mut unavailable = 0;

        loop {
            self.rate_limit();
            log::debug!("GET {url}");

            let (backoff, tries, failure) = match self.transport.get(url) {
                Ok(resp) => match resp.status {
                    200 => return Ok(resp.body),
                    202 => (self.policy.queued, &mut queued, None),
                    429 => (self.policy.throttled, &mut throttled, None),
                    502..=504 => (self.policy.unavailable, &mut unavailable, None),
                    status => {
                        return Err(BggError::Status {
                            status,
                            url: url.to_string(),
                        });
                    }
                },
                Err(e) if e.is_transient() => (self.policy.unavailable, &mut unavailable, Some(e)),
                Err(e) => return Err(e),
            };

            if *tries >= backoff.max_retries {
                return Err(failure.unwrap_or_else(|| BggError::RetriesExhausted {
                    attempts: *tries + 1,
                    url: url.to_string(),
                }));
            }
            *tries += 1;
            log::debug!(
                "Retrying in {:?} (attempt {} of {}): {url}",
                backoff.delay,
                *tries,
                backoff.max_retries
            );
            thread::sleep(backoff.delay);
        }
    }

    fn rate_limit(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < self.policy.min_interval {
                thread::sleep(self.policy.min_interval - elapsed);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }
}

fn endpoint(path: &str, params: &[(&str, &str)]) -> Result<String, BggError> {
    let url = Url::parse_with_params(&format!("{BASE_URL}/{path}"), params)
        .map_err(|e| BggError::Url(e.to_string()))?;
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_escapes_parameters() {
        let url = endpoint("collection", &[("username", "Jane Doe"), ("version", "1")]).unwrap();
        assert_eq!(
            url,
            "https://boardgamegeek.com/xmlapi2/collection?username=Jane+Doe&version=1"
        );
    }

    #[test]
    fn immediate_policy_keeps_retry_counts() {
        let policy = RetryPolicy::immediate();
        assert_eq!(policy.queued.max_retries, 10);
        assert_eq!(policy.throttled.max_retries, 3);
        assert_eq!(policy.unavailable.max_retries, 3);
        assert_eq!(policy.min_interval, Duration::ZERO);
    }
}
