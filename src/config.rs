use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

use crate::client::{DEFAULT_BASE_URL, DEFAULT_FEED};
use crate::controller::{MissingItems, Options, DEFAULT_PAGE_SIZE};
use crate::error::{JobsError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Name of the index endpoint, e.g. `jobstories`
    pub feed: String,
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            feed: DEFAULT_FEED.to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    pub page_size: usize,
    pub missing_items: MissingItems,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            missing_items: MissingItems::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub paging: PagingConfig,
}

pub fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("hnjobs").join("config.toml"))
}

impl Config {
    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Config::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Config::default();
        };

        match toml::from_str::<Config>(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.paging.page_size == 0 {
            return Err(JobsError::Config("page_size must be at least 1".into()));
        }
        if self.api.feed.trim().is_empty() {
            return Err(JobsError::Config("feed must not be empty".into()));
        }
        if self.api.base_url.trim().is_empty() {
            return Err(JobsError::Config("base_url must not be empty".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.api.timeout_secs.map(Duration::from_secs)
    }

    pub fn controller_options(&self) -> Options {
        Options {
            page_size: self.paging.page_size,
            missing: self.paging.missing_items,
        }
    }
}
