//! Per-item cache of shop suggestions fetched on demand.
//!
//! Each key moves Absent → Pending → Resolved exactly once per cache. Fetches
//! run as tokio tasks and report back over an mpsc channel; the owner applies
//! completions with [`LazyFetchCache::poll_completions`] or
//! [`LazyFetchCache::next_completion`], so state is only touched from one task.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::WardrobeApi;
use crate::error::{Result, WardrobeError};
use crate::model::ExternalProduct;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FetchState<'a> {
    Absent,
    Pending,
    Resolved(&'a [ExternalProduct]),
}

impl FetchState<'_> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

#[derive(Debug)]
enum Entry {
    Pending,
    Resolved(Vec<ExternalProduct>),
}

struct Completion {
    key: String,
    result: Result<Vec<ExternalProduct>>,
}

pub struct LazyFetchCache<A> {
    api: Arc<A>,
    entries: HashMap<String, Entry>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl<A> std::fmt::Debug for LazyFetchCache<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyFetchCache")
            .field("entries", &self.entries)
            .finish()
    }
}

impl<A: WardrobeApi + 'static> LazyFetchCache<A> {
    pub fn new(api: Arc<A>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            entries: HashMap::new(),
            tx,
            rx,
        }
    }

    /// Start a fetch for `key` unless one is pending or already resolved.
    /// Must be called from within a tokio runtime.
    pub fn request(&mut self, key: &str) {
        if self.entries.contains_key(key) {
            tracing::trace!(key, "fetch already requested");
            return;
        }
        self.entries.insert(key.to_string(), Entry::Pending);
        tracing::debug!(key, "fetching shop suggestions");

        let api = self.api.clone();
        let tx = self.tx.clone();
        let key = key.to_string();
        tokio::spawn(async move {
            let names = vec![key.clone()];
            let result = api.web_recommendations(&names).await.map(|mut resp| {
                resp.web_recommendations
                    .remove(&key)
                    .unwrap_or_default()
            });
            // Receiver gone means the cache was dropped; the result is discarded.
            let _ = tx.send(Completion { key, result });
        });
    }

    /// Apply every completion that has already arrived. Returns the keys that
    /// became resolved.
    pub fn poll_completions(&mut self) -> Vec<String> {
        let mut resolved = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            if let Some(key) = self.apply(completion) {
                resolved.push(key);
            }
        }
        resolved
    }

    /// Wait for the next completion and apply it. Returns `None` immediately
    /// when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<String> {
        loop {
            if self.loading_count() == 0 {
                return None;
            }
            let completion = self.rx.recv().await?;
            if let Some(key) = self.apply(completion) {
                return Some(key);
            }
        }
    }

    fn apply(&mut self, completion: Completion) -> Option<String> {
        let Completion { key, result } = completion;
        if !matches!(self.entries.get(&key), Some(Entry::Pending)) {
            return None;
        }

        let products = match result {
            Ok(products) => {
                if products.is_empty() {
                    tracing::debug!(key = %key, "no shop suggestions");
                }
                products
            }
            Err(e) => {
                let err = WardrobeError::SecondaryFetch {
                    key: key.clone(),
                    message: e.to_string(),
                };
                tracing::warn!(error = %err, "shop suggestions unavailable");
                Vec::new()
            }
        };
        tracing::debug!(key = %key, count = products.len(), "shop suggestions resolved");
        self.entries.insert(key.clone(), Entry::Resolved(products));
        Some(key)
    }
}

impl<A> LazyFetchCache<A> {
    pub fn state(&self, key: &str) -> FetchState<'_> {
        match self.entries.get(key) {
            None => FetchState::Absent,
            Some(Entry::Pending) => FetchState::Pending,
            Some(Entry::Resolved(products)) => FetchState::Resolved(products),
        }
    }

    pub fn loading_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| matches!(e, Entry::Pending))
            .count()
    }

    pub fn resolved_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, e)| matches!(e, Entry::Resolved(_)))
            .map(|(k, _)| k.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }
}
