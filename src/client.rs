use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{JobsError, Result};
use crate::types::{Item, ItemId};

pub const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";
pub const DEFAULT_FEED: &str = "jobstories";

/// Read-only access to the remote item index.
///
/// Implementations do no caching of their own; memoizing the index is the
/// controller's job.
#[async_trait]
pub trait ItemSource: Send + Sync + std::fmt::Debug {
    /// Fetch the full, ordered list of identifiers.
    async fn fetch_index(&self) -> Result<Vec<ItemId>>;

    /// Resolve one identifier. An absent or deleted item is `NotFound`.
    async fn fetch_item(&self, id: ItemId) -> Result<Item>;
}

pub struct HackerNews {
    client: Client,
    base_url: String,
    feed: String,
}

impl std::fmt::Debug for HackerNews {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HackerNews")
            .field("base_url", &self.base_url)
            .field("feed", &self.feed)
            .finish_non_exhaustive()
    }
}

impl HackerNews {
    pub fn new(base_url: &str, feed: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("hnjobs/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| JobsError::Config(e.to_string()))?;

        Ok(Self::with_client(client, base_url, feed))
    }

    pub fn with_client(client: Client, base_url: &str, feed: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            feed: feed.to_string(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(JobsError::Network(format!("{} returned {}", url, status)));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl ItemSource for HackerNews {
    async fn fetch_index(&self) -> Result<Vec<ItemId>> {
        let url = self.api_url(&format!("/{}.json", self.feed));
        debug!(%url, "fetching index");
        let body = self.get_text(&url).await?;
        parse_index(&body)
    }

    async fn fetch_item(&self, id: ItemId) -> Result<Item> {
        let url = self.api_url(&format!("/item/{}.json", id));
        debug!(%url, "fetching item");
        let body = self.get_text(&url).await?;
        parse_item(id, &body)
    }
}

// Hacker News API response types

#[derive(Deserialize)]
struct HnItem {
    id: u64,
    by: Option<String>,
    time: Option<i64>,
    title: Option<String>,
    url: Option<String>,
    #[serde(default)]
    deleted: bool,
    #[serde(default)]
    dead: bool,
}

/// Decode the index endpoint's body: a JSON array of integers.
pub fn parse_index(body: &str) -> Result<Vec<ItemId>> {
    serde_json::from_str::<Vec<ItemId>>(body)
        .map_err(|e| JobsError::Protocol(format!("index is not a list of ids: {}", e)))
}

/// Decode the item endpoint's body for `id`.
pub fn parse_item(id: ItemId, body: &str) -> Result<Item> {
    if body.trim().is_empty() {
        return Err(JobsError::NotFound(id));
    }

    let raw = serde_json::from_str::<Option<HnItem>>(body)
        .map_err(|e| JobsError::Protocol(format!("item {}: {}", id, e)))?;

    let Some(raw) = raw else {
        return Err(JobsError::NotFound(id));
    };

    if raw.deleted || raw.dead {
        return Err(JobsError::NotFound(id));
    }

    if raw.id != id.0 {
        return Err(JobsError::Protocol(format!(
            "requested item {} but got {}",
            id, raw.id
        )));
    }

    let created_at = raw
        .time
        .ok_or_else(|| JobsError::Protocol(format!("item {} has no time", id)))?;

    Ok(Item {
        id,
        url: raw.url,
        author: raw.by.unwrap_or_default(),
        created_at,
        title: raw.title.unwrap_or_default(),
    })
}
