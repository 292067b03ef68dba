// src/repository/mod.rs

//! Lazily populated, time-bounded cache of ECO openings.
//!
//! The dataset moves between two states:
//!
//! ```text
//! EMPTY --(crawl ok)--> POPULATED --(ttl elapsed)--> EMPTY
//! EMPTY --(crawl fails)--> EMPTY
//! ```
//!
//! Any lookup on an empty dataset crawls first. Crawls are single-flight:
//! concurrent lookups wait for the in-flight crawl instead of starting
//! their own, and share its outcome, failures included. Each successful
//! crawl arms exactly one expiry task, aborting whichever task the previous
//! population armed.

mod dataset;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::error::{AppError, Result};
use crate::models::{Config, Opening};
use crate::services::{DocumentFetcher, MovePath, OpeningParser, fetcher_for, next_move};

use dataset::Dataset;

/// Time between a successful crawl and automatic invalidation.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(180);

/// Point-in-time view of the repository, without triggering a crawl.
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryStatus {
    pub populated: bool,
    pub record_count: usize,
    pub crawled_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Crawl attempts since the repository was created, failed ones included
    pub crawl_count: u64,
}

#[derive(Default)]
struct State {
    dataset: Option<Arc<Dataset>>,
    /// Bumped on every population; expiry tasks only clear their own.
    generation: u64,
    expiry: Option<JoinHandle<()>>,
}

struct Inner {
    fetcher: Arc<dyn DocumentFetcher>,
    parser: OpeningParser,
    ttl: Duration,
    state: RwLock<State>,
    /// Held for the whole crawl; holds the last attempt's failure, if any.
    crawl_gate: Mutex<Option<Arc<AppError>>>,
    crawls: AtomicU64,
    /// Crawl attempts that have finished, bumped while holding the gate.
    finished: AtomicU64,
}

impl Inner {
    async fn expire(&self, generation: u64) {
        let mut state = self.state.write().await;
        if state.generation != generation || state.dataset.is_none() {
            return;
        }
        log::info!("TTL expired. Clearing cache...");
        state.dataset = None;
        state.expiry = None;
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(expiry) = self.state.get_mut().expiry.take() {
            expiry.abort();
        }
    }
}

/// Shared handle to the opening cache. Clones share one dataset.
#[derive(Clone)]
pub struct OpeningRepository {
    inner: Arc<Inner>,
}

impl OpeningRepository {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, parser: OpeningParser, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                fetcher,
                parser,
                ttl,
                state: RwLock::new(State::default()),
                crawl_gate: Mutex::new(None),
                crawls: AtomicU64::new(0),
                finished: AtomicU64::new(0),
            }),
        }
    }

    /// Build a repository for the configured source, row limit and TTL.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            fetcher_for(&config.source)?,
            OpeningParser::new(config.source.row_limit)?,
            config.cache.ttl(),
        ))
    }

    /// All openings in page order.
    pub async fn list_all(&self) -> Result<Vec<Opening>> {
        Ok(self.snapshot().await?.openings().to_vec())
    }

    /// Opening for `code`, or `None` if the page has no such row.
    pub async fn get_by_code(&self, code: &str) -> Result<Option<Opening>> {
        Ok(self.snapshot().await?.get(code).cloned())
    }

    /// Move following the half-moves encoded in `path` (`CODE/m1/m2/…`).
    ///
    /// Returns an empty string for unknown codes and exhausted lines.
    pub async fn get_next_move(&self, path: &str) -> Result<String> {
        let path = MovePath::parse(path);
        let dataset = self.snapshot().await?;
        let next = dataset
            .get(path.code)
            .and_then(|opening| next_move(&opening.moves, path.played))
            .unwrap_or_default();
        Ok(next.to_string())
    }

    pub async fn status(&self) -> RepositoryStatus {
        let state = self.inner.state.read().await;
        let dataset = state.dataset.as_deref();
        RepositoryStatus {
            populated: dataset.is_some(),
            record_count: dataset.map_or(0, Dataset::len),
            crawled_at: dataset.map(Dataset::crawled_at),
            expires_at: dataset.and_then(Dataset::expires_at),
            crawl_count: self.inner.crawls.load(Ordering::Relaxed),
        }
    }

    /// Drop the dataset now and cancel its pending expiry.
    pub async fn invalidate(&self) {
        let mut state = self.inner.state.write().await;
        state.dataset = None;
        if let Some(expiry) = state.expiry.take() {
            expiry.abort();
        }
    }

    async fn current(&self) -> Option<Arc<Dataset>> {
        self.inner.state.read().await.dataset.clone()
    }

    /// Current dataset, crawling first if empty.
    async fn snapshot(&self) -> Result<Arc<Dataset>> {
        if let Some(dataset) = self.current().await {
            return Ok(dataset);
        }

        let seen = self.inner.finished.load(Ordering::Acquire);
        let mut gate = self.inner.crawl_gate.lock().await;
        // Another caller may have populated while we waited for the gate.
        if let Some(dataset) = self.current().await {
            return Ok(dataset);
        }
        // An attempt finished while we waited and left the dataset empty.
        if self.inner.finished.load(Ordering::Acquire) != seen {
            if let Some(failure) = gate.as_ref() {
                return Err(AppError::Shared(Arc::clone(failure)));
            }
        }

        let outcome = self.crawl().await;
        self.inner.finished.fetch_add(1, Ordering::Release);
        match outcome {
            Ok(dataset) => {
                *gate = None;
                let dataset = Arc::new(dataset);
                self.populate(Arc::clone(&dataset)).await;
                Ok(dataset)
            }
            Err(e) => {
                let failure = Arc::new(e);
                *gate = Some(Arc::clone(&failure));
                Err(AppError::Shared(failure))
            }
        }
    }

    async fn crawl(&self) -> Result<Dataset> {
        let inner = &self.inner;
        inner.crawls.fetch_add(1, Ordering::Relaxed);
        log::info!("Crawling ECO codes from {}", inner.fetcher.source());

        let openings = inner
            .fetcher
            .fetch()
            .await
            .and_then(|body| inner.parser.parse(&body))
            .inspect_err(|e| log::warn!("Crawl failed: {e}"))?;

        log::info!(
            "Crawled {} openings; cached for {}s",
            openings.len(),
            inner.ttl.as_secs()
        );
        Ok(Dataset::new(openings, inner.ttl))
    }

    async fn populate(&self, dataset: Arc<Dataset>) {
        let mut state = self.inner.state.write().await;
        state.generation += 1;
        let generation = state.generation;
        state.dataset = Some(dataset);
        if let Some(previous) = state.expiry.take() {
            previous.abort();
        }
        state.expiry = Some(spawn_expiry(
            Arc::downgrade(&self.inner),
            self.inner.ttl,
            generation,
        ));
    }
}

fn spawn_expiry(inner: Weak<Inner>, ttl: Duration, generation: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(ttl).await;
        if let Some(inner) = inner.upgrade() {
            inner.expire(generation).await;
        }
    })
}
