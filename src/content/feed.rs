// src/content/feed.rs
//! Per-kind view over the aggregated collection: the surface list pages use.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use metrics::gauge;
use serde::Serialize;
use tracing::debug;

use crate::content::aggregate::{Aggregator, SourceFailure, PARTIAL_LOAD_NOTICE};
use crate::content::filter::{filter_items, CategoryFilter};
use crate::content::paginate::{paginate, Page, DEFAULT_PAGE_SIZE};
use crate::content::sort::sort_items;
use crate::content::types::{Article, ContentItem, GalleryItem, NewsEvent, Resource, SourceId};

struct FeedState<T> {
    items: Vec<T>,
    failures: Vec<SourceFailure>,
    loaded: bool,
    refreshed_at: Option<DateTime<Utc>>,
}

impl<T> Default for FeedState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failures: Vec::new(),
            loaded: false,
            refreshed_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshOutcome {
    /// False when the result was dropped (superseded or feed closed).
    pub applied: bool,
    pub items: usize,
    pub failures: Vec<SourceFailure>,
}

/// Holds the latest aggregation for one content kind and answers page
/// requests against it. A refresh rebuilds the collection from scratch.
pub struct ContentFeed<T> {
    aggregator: Arc<Aggregator>,
    page_size: usize,
    state: RwLock<FeedState<T>>,
    generation: AtomicU64,
    in_flight: AtomicUsize,
    closed: AtomicBool,
    load_lock: tokio::sync::Mutex<()>,
}

impl<T: ContentItem> ContentFeed<T> {
    pub fn new(aggregator: Arc<Aggregator>, page_size: usize) -> Self {
        Self {
            aggregator,
            page_size: if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size },
            state: RwLock::new(FeedState::default()),
            generation: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
            load_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Re-run the aggregator. Only the most recently started refresh may
    /// publish its result, and nothing is published after [`close`](Self::close).
    pub async fn refresh(&self) -> RefreshOutcome {
        let gen = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let agg = self.aggregator.collect::<T>().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let now = Utc::now();
        let mut st = self.state.write().unwrap_or_else(PoisonError::into_inner);
        // Checked under the guard; a newer refresh or close() must not land in between.
        let stale = self.generation.load(Ordering::SeqCst) != gen;
        if stale || self.closed.load(Ordering::SeqCst) {
            drop(st);
            debug!(target: "content", kind = ?T::KIND, stale, "dropping refresh result");
            return RefreshOutcome {
                applied: false,
                items: agg.items.len(),
                failures: agg.failures,
            };
        }

        let outcome = RefreshOutcome {
            applied: true,
            items: agg.items.len(),
            failures: agg.failures.clone(),
        };
        st.items = agg.items;
        st.failures = agg.failures;
        st.loaded = true;
        st.refreshed_at = Some(now);
        drop(st);
        gauge!("content_last_refresh_ts").set(now.timestamp() as f64);
        outcome
    }

    /// First load on demand; concurrent callers share one aggregation.
    pub async fn ensure_loaded(&self) {
        if self.is_loaded() {
            return;
        }
        let _guard = self.load_lock.lock().await;
        if !self.is_loaded() {
            self.refresh().await;
        }
    }

    /// Stop accepting refresh results (the owning view went away).
    pub fn close(&self) {
        let _st = self.state.write().unwrap_or_else(PoisonError::into_inner);
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn is_loaded(&self) -> bool {
        self.read(|st| st.loaded)
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.read(|st| st.refreshed_at)
    }

    pub fn failures(&self) -> Vec<SourceFailure> {
        self.read(|st| st.failures.clone())
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.read(|st| (!st.failures.is_empty()).then_some(PARTIAL_LOAD_NOTICE))
    }

    /// Total records held, published or not.
    pub fn len(&self) -> usize {
        self.read(|st| st.items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read<R>(&self, f: impl FnOnce(&FeedState<T>) -> R) -> R {
        let st = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&st)
    }

    /// filter → sort → page.
    pub fn get_page(&self, search: &str, category: &CategoryFilter, page: usize) -> Page<T> {
        let sorted = self.read(|st| {
            let filtered = filter_items(&st.items, search, category);
            sort_items(filtered, T::sort_order(category))
        });
        paginate(&sorted, page, self.page_size)
    }

    /// Published item by its per-source id.
    pub fn find(&self, source: SourceId, id: &str) -> Option<T> {
        self.read(|st| {
            st.items
                .iter()
                .find(|it| it.source() == source && it.id() == id && it.status().is_published())
                .cloned()
        })
    }

    /// Distinct facet values among published items, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.read(|st| {
            st.items
                .iter()
                .filter(|it| it.status().is_published())
                .map(|it| it.facet().to_string())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        })
    }

    /// First `n` published items in default order.
    pub fn latest(&self, n: usize) -> Vec<T> {
        let mut sorted = self.read(|st| {
            let filtered = filter_items(&st.items, "", &CategoryFilter::All);
            sort_items(filtered, T::sort_order(&CategoryFilter::All))
        });
        sorted.truncate(n);
        sorted
    }
}

/// One feed per content kind, sharing a single aggregator.
pub struct Catalog {
    pub articles: ContentFeed<Article>,
    pub news: ContentFeed<NewsEvent>,
    pub gallery: ContentFeed<GalleryItem>,
    pub resources: ContentFeed<Resource>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogRefresh {
    pub articles: RefreshOutcome,
    pub news: RefreshOutcome,
    pub gallery: RefreshOutcome,
    pub resources: RefreshOutcome,
}

impl Catalog {
    pub fn new(aggregator: Arc<Aggregator>, page_size: usize) -> Self {
        Self {
            articles: ContentFeed::new(aggregator.clone(), page_size),
            news: ContentFeed::new(aggregator.clone(), page_size),
            gallery: ContentFeed::new(aggregator.clone(), page_size),
            resources: ContentFeed::new(aggregator, page_size),
        }
    }

    pub async fn refresh_all(&self) -> CatalogRefresh {
        let (articles, news, gallery, resources) = tokio::join!(
            self.articles.refresh(),
            self.news.refresh(),
            self.gallery.refresh(),
            self.resources.refresh(),
        );
        CatalogRefresh {
            articles,
            news,
            gallery,
            resources,
        }
    }
}
