use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::{Mutex, OnceCell};
use tokio::task::JoinHandle;

use super::{get_json, FuzzyIndex, SearchMatch, SuggestionFetcher};
use crate::error::Result;
use crate::logs::{send_log, LogSender};
use crate::model::{Candidate, Query};

/// Fuzzy search over a corpus fetched once at construction.
///
/// Queries made before the corpus arrives (or after it failed to load) yield
/// no candidates instead of an error.
pub struct LocalIndex {
    index: Arc<OnceCell<FuzzyIndex>>,
    loader: Mutex<Option<JoinHandle<()>>>,
    limit: usize,
}

/// The corpus endpoint answers with either a plain list or, for an empty
/// `query`, the ranked form of every entry.
#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusResponse {
    Locations { locations: Vec<String> },
    Ranked { matches: Option<Vec<SearchMatch>> },
}

impl CorpusResponse {
    fn into_targets(self) -> Vec<String> {
        match self {
            CorpusResponse::Locations { locations } => locations,
            CorpusResponse::Ranked { matches } => matches
                .unwrap_or_default()
                .into_iter()
                .map(|m| m.target)
                .collect(),
        }
    }
}

impl LocalIndex {
    /// Starts loading the corpus in the background. Must be called inside a tokio runtime.
    pub fn load(
        client: reqwest::Client,
        corpus_url: impl Into<String>,
        limit: usize,
        log: Option<LogSender>,
    ) -> Self {
        let index = Arc::new(OnceCell::new());
        let cell = index.clone();
        let url = corpus_url.into();

        let loader = tokio::spawn(async move {
            match get_json::<CorpusResponse>(client.get(&url)).await {
                Ok(body) => {
                    let targets = body.into_targets();
                    let count = targets.len();
                    let _ = cell.set(FuzzyIndex::new(targets));
                    if let Some(ref tx) = log {
                        send_log(tx, "index", &format!("Loaded {count} locations from {url}"));
                    }
                }
                Err(e) => {
                    if let Some(ref tx) = log {
                        send_log(
                            tx,
                            "index",
                            &format!("{}: corpus load from {url} failed: {e}", e.kind().as_str()),
                        );
                    }
                }
            }
        });

        Self {
            index,
            loader: Mutex::new(Some(loader)),
            limit,
        }
    }

    /// An index that is ready immediately.
    pub fn from_corpus(targets: Vec<String>, limit: usize) -> Self {
        Self {
            index: Arc::new(OnceCell::new_with(Some(FuzzyIndex::new(targets)))),
            loader: Mutex::new(None),
            limit,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.index.initialized()
    }

    /// Waits for the background load to finish. Returns whether an index is available.
    pub async fn ready(&self) -> bool {
        if let Some(handle) = self.loader.lock().await.take() {
            let _ = handle.await;
        }
        self.is_ready()
    }

    /// Synchronous lookup; empty until the corpus has loaded.
    pub fn search(&self, query: &Query) -> Vec<Candidate> {
        let Some(index) = self.index.get() else {
            return Vec::new();
        };
        index
            .rank(query.as_str())
            .into_iter()
            .take(self.limit)
            .map(|r| Candidate::labelled(r.target).with_distance(r.distance))
            .collect()
    }
}

impl Drop for LocalIndex {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.loader.try_lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}

#[async_trait]
impl SuggestionFetcher for LocalIndex {
    async fn fetch(&self, query: &Query) -> Result<Vec<Candidate>> {
        Ok(self.search(query))
    }
}
