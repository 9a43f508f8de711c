use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::controller::MissingItems;

/// Browse Hacker News job postings
#[derive(Debug, Parser)]
#[command(name = "hnjobs", version, about)]
pub struct Args {
    /// Config file to read instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the item API
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Index endpoint to page through
    #[arg(long)]
    pub feed: Option<String>,

    /// Postings per page
    #[arg(long, value_name = "N")]
    pub page_size: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Leave out deleted postings instead of failing the page
    #[arg(long)]
    pub skip_missing: bool,

    /// Print postings to stdout instead of starting the TUI
    #[arg(long)]
    pub print: bool,

    /// Stop printing after this many pages
    #[arg(long, value_name = "N", requires = "print")]
    pub pages: Option<usize>,
}

impl Args {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(feed) = &self.feed {
            config.api.feed = feed.clone();
        }
        if let Some(size) = self.page_size {
            config.paging.page_size = size;
        }
        if let Some(secs) = self.timeout {
            config.api.timeout_secs = Some(secs);
        }
        if self.skip_missing {
            config.paging.missing_items = MissingItems::Skip;
        }
    }
}
