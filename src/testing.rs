//! In-memory `ItemSource` for controller and app tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::client::ItemSource;
use crate::error::{JobsError, Result};
use crate::types::{Item, ItemId};

#[derive(Debug, Default)]
struct Behavior {
    index_fails: bool,
    failing: HashSet<ItemId>,
    removed: HashSet<ItemId>,
    delays: HashMap<ItemId, Duration>,
    index_gate: Option<Arc<Notify>>,
}

#[derive(Debug, Default)]
pub struct FakeSource {
    ids: Vec<ItemId>,
    behavior: Mutex<Behavior>,
    index_calls: AtomicUsize,
    item_calls: Mutex<HashMap<ItemId, usize>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    index_entered: Notify,
}

pub fn item(id: u64) -> Item {
    Item {
        id: ItemId(id),
        url: Some(format!("https://jobs.example.com/{}", id)),
        author: format!("company{}", id),
        created_at: 1_700_000_000 + id as i64,
        title: format!("Job {}", id),
    }
}

impl FakeSource {
    pub fn with_ids(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            ids: ids.into_iter().map(ItemId).collect(),
            ..Self::default()
        }
    }

    pub fn fail_index(&self, fail: bool) {
        self.behavior.lock().unwrap().index_fails = fail;
    }

    pub fn fail_network(&self, id: ItemId) {
        self.behavior.lock().unwrap().failing.insert(id);
    }

    pub fn clear_failures(&self) {
        self.behavior.lock().unwrap().failing.clear();
    }

    /// Make `id` resolve to nothing, like a deleted posting
    pub fn remove(&self, id: ItemId) {
        self.behavior.lock().unwrap().removed.insert(id);
    }

    pub fn delay(&self, id: ItemId, delay: Duration) {
        self.behavior.lock().unwrap().delays.insert(id, delay);
    }

    /// Block index fetches until the returned gate is notified
    pub fn hold_index(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.behavior.lock().unwrap().index_gate = Some(Arc::clone(&gate));
        gate
    }

    pub async fn wait_for_index_call(&self) {
        self.index_entered.notified().await;
    }

    pub fn index_calls(&self) -> usize {
        self.index_calls.load(Ordering::SeqCst)
    }

    pub fn item_calls(&self) -> usize {
        self.item_calls.lock().unwrap().values().sum()
    }

    pub fn item_calls_for(&self, id: ItemId) -> usize {
        self.item_calls
            .lock()
            .unwrap()
            .get(&id)
            .copied()
            .unwrap_or(0)
    }

    pub fn max_concurrent_items(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ItemSource for FakeSource {
    async fn fetch_index(&self) -> Result<Vec<ItemId>> {
        self.index_calls.fetch_add(1, Ordering::SeqCst);
        self.index_entered.notify_one();

        let (gate, fails) = {
            let behavior = self.behavior.lock().unwrap();
            (behavior.index_gate.clone(), behavior.index_fails)
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if fails {
            return Err(JobsError::Network("connection reset".to_string()));
        }
        Ok(self.ids.clone())
    }

    async fn fetch_item(&self, id: ItemId) -> Result<Item> {
        *self.item_calls.lock().unwrap().entry(id).or_insert(0) += 1;
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let (delay, fails, removed) = {
            let behavior = self.behavior.lock().unwrap();
            (
                behavior.delays.get(&id).copied(),
                behavior.failing.contains(&id),
                behavior.removed.contains(&id),
            )
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if fails {
            Err(JobsError::Network(format!("timed out fetching {}", id)))
        } else if removed {
            Err(JobsError::NotFound(id))
        } else {
            Ok(item(id.0))
        }
    }
}
