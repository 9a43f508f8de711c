//! Pagination over the remote index.
//!
//! The controller memoizes the identifier index for the lifetime of the
//! session and resolves it one fixed-size page at a time. A page is applied
//! to the accumulated item list all-or-nothing, in index order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::try_join_all;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::client::ItemSource;
use crate::error::{JobsError, Result};
use crate::types::{Item, ItemId};

pub const DEFAULT_PAGE_SIZE: usize = 6;

/// What to do when an identifier in a page resolves to nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingItems {
    /// The whole page request fails
    #[default]
    Fail,
    /// Absent items are left out and the rest of the page applies
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Exhausted,
}

/// Read-only view of the controller at one instant
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub pages_loaded: usize,
    pub items: Arc<Vec<Item>>,
    pub phase: Phase,
    /// `None` until the index has been fetched
    pub index_len: Option<usize>,
}

impl Snapshot {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.phase == Phase::Exhausted
    }

    pub fn has_more(&self) -> bool {
        !self.is_exhausted()
    }
}

/// Result of a single `advance()` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Loaded { page: usize, added: usize },
    Exhausted,
    /// A request was already in flight; nothing was done
    Busy,
}

#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub page_size: usize,
    pub missing: MissingItems,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            missing: MissingItems::default(),
        }
    }
}

#[derive(Debug, Default)]
struct State {
    index: Option<Arc<Vec<ItemId>>>,
    next_page: usize,
    items: Arc<Vec<Item>>,
    phase: Phase,
}

#[derive(Debug)]
pub struct PageController {
    source: Arc<dyn ItemSource>,
    options: Options,
    state: Mutex<State>,
}

impl PageController {
    pub fn new(source: Arc<dyn ItemSource>, options: Options) -> Self {
        let options = Options {
            page_size: options.page_size.max(1),
            ..options
        };
        Self {
            source,
            options,
            state: Mutex::new(State::default()),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.lock();
        Snapshot {
            pages_loaded: state.next_page,
            items: Arc::clone(&state.items),
            phase: state.phase,
            index_len: state.index.as_ref().map(|i| i.len()),
        }
    }

    /// Load the next page: page 0 on the first call, then each following one.
    ///
    /// Calls made while a load is in flight return `Advance::Busy` without
    /// touching the network. On failure the page counter is unchanged, so the
    /// next call retries the same page.
    pub async fn advance(&self) -> Result<Advance> {
        let (page, index) = {
            let mut state = self.lock();
            match state.phase {
                Phase::Loading => {
                    debug!("advance ignored, load already in flight");
                    return Ok(Advance::Busy);
                }
                Phase::Exhausted => return Ok(Advance::Exhausted),
                Phase::Idle => {}
            }
            state.phase = Phase::Loading;
            (state.next_page, state.index.clone())
        };

        let mut guard = LoadingGuard {
            controller: self,
            armed: true,
        };
        let result = self.load_page(page, index).await;
        guard.armed = false;

        let mut state = self.lock();
        match result {
            Ok(PageLoad::Empty) => {
                debug!(page, "no items left in index");
                state.phase = Phase::Exhausted;
                Ok(Advance::Exhausted)
            }
            Ok(PageLoad::Items { items, reached_end }) => {
                let added = items.len();
                let mut all = Vec::with_capacity(state.items.len() + added);
                all.extend(state.items.iter().cloned());
                all.extend(items);
                state.items = Arc::new(all);
                state.next_page = page + 1;
                state.phase = if reached_end {
                    Phase::Exhausted
                } else {
                    Phase::Idle
                };
                debug!(page, added, total = state.items.len(), "page applied");
                Ok(Advance::Loaded { page, added })
            }
            Err(e) => {
                debug!(page, error = %e, "page load failed");
                state.phase = Phase::Idle;
                Err(e)
            }
        }
    }

    async fn load_page(&self, page: usize, index: Option<Arc<Vec<ItemId>>>) -> Result<PageLoad> {
        let index = match index {
            Some(index) => index,
            None => {
                let fetched = Arc::new(self.source.fetch_index().await?);
                debug!(len = fetched.len(), "index resolved");
                self.lock().index = Some(Arc::clone(&fetched));
                fetched
            }
        };

        let size = self.options.page_size;
        let start = page.saturating_mul(size);
        if start >= index.len() {
            return Ok(PageLoad::Empty);
        }
        let end = start.saturating_add(size).min(index.len());
        let slice = &index[start..end];

        let missing = self.options.missing;
        let resolved = try_join_all(slice.iter().map(|&id| async move {
            match self.source.fetch_item(id).await {
                Ok(item) => Ok(Some(item)),
                Err(JobsError::NotFound(id)) if missing == MissingItems::Skip => {
                    warn!(%id, "skipping missing item");
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        }))
        .await?;

        Ok(PageLoad::Items {
            items: resolved.into_iter().flatten().collect(),
            reached_end: end >= index.len(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

enum PageLoad {
    Empty,
    Items { items: Vec<Item>, reached_end: bool },
}

/// Returns the controller to `Idle` if an in-flight `advance()` is dropped.
struct LoadingGuard<'a> {
    controller: &'a PageController,
    armed: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.controller.lock();
        if state.phase == Phase::Loading {
            state.phase = Phase::Idle;
        }
    }
}
