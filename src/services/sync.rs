//! Cloud sync of the event collection.
//!
//! A device is connected by a human-shareable code (`PREFIX-XXXX-XXXX`). The
//! whole collection is pushed to, or pulled from, a remote key/value endpoint
//! under that code. There is no merge: a push overwrites whatever is stored, so
//! two devices editing at the same time silently clobber each other and the last
//! write wins.

use crate::{
    config::settings::SyncConfig,
    entities::Event,
    errors::{Error, Result},
};
use async_trait::async_trait;
use rand::Rng;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, error, info, instrument};

/// Characters used in sync codes: uppercase letters and digits without the
/// easily confused `I`, `O`, `0` and `1`.
pub const SYNC_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const SEGMENT_LEN: usize = 4;

/// Generates a new sync code such as `ICPBB-7KQ2-M9XD`.
#[must_use]
pub fn generate_sync_code(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let mut segment = || -> String {
        (0..SEGMENT_LEN)
            .map(|_| char::from(SYNC_CODE_ALPHABET[rng.gen_range(0..SYNC_CODE_ALPHABET.len())]))
            .collect()
    };
    let first = segment();
    let second = segment();
    format!("{prefix}-{first}-{second}")
}

/// Normalizes a code typed by a user: trims whitespace and uppercases.
///
/// # Errors
/// Returns [`Error::Validation`] for an empty code or one containing characters
/// other than letters, digits and dashes.
pub fn normalize_sync_code(code: &str) -> Result<String> {
    let normalized = code.trim().to_uppercase();
    if normalized.is_empty() {
        return Err(Error::validation("Sync code cannot be empty"));
    }
    if !normalized
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(Error::validation(format!("Invalid sync code '{code}'")));
    }
    Ok(normalized)
}

/// Remote storage for whole event collections, keyed by sync code.
#[async_trait]
pub trait SyncBackend: Send + Sync {
    /// Uploads `events`, replacing anything stored under `code`.
    async fn push(&self, code: &str, events: &[Event]) -> Result<()>;

    /// Downloads the collection stored under `code`; `Ok(None)` if there is none.
    async fn pull(&self, code: &str) -> Result<Option<Vec<Event>>>;
}

/// [`SyncBackend`] talking JSON over HTTP to `<base_url>/<code>`.
pub struct HttpSyncBackend {
    client: Client,
    base_url: String,
}

impl HttpSyncBackend {
    /// Builds a backend with the configured base URL and request timeout.
    ///
    /// # Errors
    /// Returns [`Error::Http`] if the HTTP client cannot be constructed.
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, code: &str) -> String {
        format!("{}/{code}", self.base_url)
    }
}

#[async_trait]
impl SyncBackend for HttpSyncBackend {
    #[instrument(skip(self, events), fields(count = events.len()))]
    async fn push(&self, code: &str, events: &[Event]) -> Result<()> {
        let response = self
            .client
            .post(self.url_for(code))
            .json(events)
            .send()
            .await
            .inspect_err(|e| error!("Failed to push to cloud: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            error!("Cloud rejected push with status {}", status);
            return Err(Error::Network {
                message: format!("push failed with status {status}"),
            });
        }

        info!("Pushed {} events to cloud", events.len());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn pull(&self, code: &str) -> Result<Option<Vec<Event>>> {
        let response = self
            .client
            .get(self.url_for(code))
            .send()
            .await
            .inspect_err(|e| error!("Failed to pull from cloud: {}", e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("Nothing stored under code {}", code);
            return Ok(None);
        }
        if !status.is_success() {
            error!("Cloud rejected pull with status {}", status);
            return Err(Error::Network {
                message: format!("pull failed with status {status}"),
            });
        }

        let events: Vec<Event> = response.json().await?;
        info!("Pulled {} events from cloud", events.len());
        Ok(Some(events))
    }
}

/// [`SyncBackend`] keeping serialized collections in memory.
///
/// Behaves like the HTTP endpoint (JSON in, JSON out, last write wins) without
/// the network; useful for tests and for running without a remote.
#[derive(Debug, Default)]
pub struct InMemorySyncBackend {
    blobs: Mutex<HashMap<String, String>>,
}

impl InMemorySyncBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of codes with stored data.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.lock().map_or(0, |blobs| blobs.len())
    }

    /// True when nothing has been pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.blobs.lock().map_err(|_| Error::Network {
            message: "in-memory sync store lock poisoned".to_string(),
        })
    }
}

#[async_trait]
impl SyncBackend for InMemorySyncBackend {
    async fn push(&self, code: &str, events: &[Event]) -> Result<()> {
        let json = serde_json::to_string(events)?;
        self.lock()?.insert(code.to_string(), json);
        Ok(())
    }

    async fn pull(&self, code: &str) -> Result<Option<Vec<Event>>> {
        let stored = self.lock()?.get(code).cloned();
        stored
            .map(|json| serde_json::from_str(&json).map_err(Error::from))
            .transpose()
    }
}
