// src/content/aggregate.rs
//! Merge seed records and both remote stores into one collection per kind.
//!
//! The two fetches run concurrently and the join waits for both. A failing
//! store contributes nothing for that run; the rest still comes back.

use std::sync::Arc;

use anyhow::Result;
use metrics::{counter, histogram};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::content::{CollectionsConfig, ContentConfig};
use crate::content::seed::SeedData;
use crate::content::sources::firestore::FirestoreStore;
use crate::content::sources::supabase::SupabaseStore;
use crate::content::sources::{DocumentStore, FieldFilter, OrderBy, TableStore};
use crate::content::types::{ContentItem, ContentKind, RawRecord, SourceId};

/// Shown to readers when a store could not be reached.
pub const PARTIAL_LOAD_NOTICE: &str = "Failed to load additional items";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFailure {
    pub source: SourceId,
    pub store: &'static str,
    pub message: String,
}

/// Output of one aggregation run, in arrival order (seed, document store,
/// relational store). Not deduplicated.
#[derive(Debug, Clone)]
pub struct Aggregation<T> {
    pub items: Vec<T>,
    pub failures: Vec<SourceFailure>,
}

impl<T> Aggregation<T> {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.is_partial().then_some(PARTIAL_LOAD_NOTICE)
    }
}

type Fetched = Option<(&'static str, Result<Vec<RawRecord>>)>;

/// Clients are injected; either may be absent, in which case that source is
/// simply not consulted.
#[derive(Clone)]
pub struct Aggregator {
    documents: Option<Arc<dyn DocumentStore>>,
    tables: Option<Arc<dyn TableStore>>,
    seed: Arc<SeedData>,
    collections: CollectionsConfig,
    table_order: Option<OrderBy>,
}

impl Aggregator {
    pub fn new(seed: SeedData) -> Self {
        Self {
            documents: None,
            tables: None,
            seed: Arc::new(seed),
            collections: CollectionsConfig::default(),
            table_order: None,
        }
    }

    pub fn with_document_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.documents = Some(store);
        self
    }

    pub fn with_table_store(mut self, store: Arc<dyn TableStore>) -> Self {
        self.tables = Some(store);
        self
    }

    pub fn with_collections(mut self, collections: CollectionsConfig) -> Self {
        self.collections = collections;
        self
    }

    pub fn with_table_order(mut self, order: Option<OrderBy>) -> Self {
        self.table_order = order;
        self
    }

    /// Composition root helper: build real clients for whichever stores the
    /// config enables.
    pub fn from_config(cfg: &ContentConfig, seed: SeedData) -> Self {
        let mut agg = Self::new(seed)
            .with_collections(cfg.collections.clone())
            .with_table_order(cfg.relational_store.order_by.clone().map(OrderBy::desc));

        if cfg.document_store_enabled() {
            let ds = &cfg.document_store;
            let key = Some(ds.api_key.clone());
            let store = match ds.base_url.as_deref() {
                Some(base) => FirestoreStore::with_base_url(base, &ds.project_id, &ds.database, key),
                None => FirestoreStore::new(&ds.project_id, &ds.database, key),
            };
            agg = agg.with_document_store(Arc::new(store));
        }
        if cfg.relational_store_enabled() {
            let rs = &cfg.relational_store;
            agg = agg.with_table_store(Arc::new(SupabaseStore::new(&rs.url, &rs.anon_key)));
        }

        info!(
            target: "content",
            document_store = cfg.document_store_enabled(),
            relational_store = cfg.relational_store_enabled(),
            "aggregator configured"
        );
        agg
    }

    fn collection_for(&self, kind: ContentKind) -> &str {
        match kind {
            ContentKind::Article => &self.collections.articles,
            ContentKind::NewsEvent => &self.collections.news,
            ContentKind::GalleryItem => &self.collections.gallery,
            ContentKind::Resource => &self.collections.resources,
        }
    }

    /// Fetch, normalize and concatenate every record of kind `T`.
    pub async fn collect<T: ContentItem>(&self) -> Aggregation<T> {
        let t0 = std::time::Instant::now();
        let kind = T::KIND;
        let status_filter = kind
            .has_status()
            .then(|| FieldFilter::eq("status", "Published"));
        let doc_filters: Vec<FieldFilter> = status_filter.iter().cloned().collect();

        let docs = async {
            let Some(store) = self.documents.as_ref() else {
                return None;
            };
            let res = store
                .query(self.collection_for(kind), &doc_filters, None)
                .await;
            Some((store.name(), res))
        };
        let tables = async {
            if !kind.in_relational_store() {
                return None;
            }
            let Some(store) = self.tables.as_ref() else {
                return None;
            };
            let res = store
                .select(
                    &self.collections.articles_table,
                    status_filter.as_ref(),
                    self.table_order.as_ref(),
                )
                .await;
            Some((store.name(), res))
        };
        let (docs, tables): (Fetched, Fetched) = tokio::join!(docs, tables);

        let mut items: Vec<T> = self
            .seed
            .records(kind)
            .iter()
            .map(|r| T::from_raw(r, SourceId::Seed))
            .collect();
        let mut failures = Vec::new();
        absorb(SourceId::DocumentStore, docs, &mut items, &mut failures);
        absorb(SourceId::RelationalStore, tables, &mut items, &mut failures);

        histogram!("content_aggregate_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        info!(
            target: "content",
            kind = ?kind,
            items = items.len(),
            failed_sources = failures.len(),
            "aggregation finished"
        );
        Aggregation { items, failures }
    }
}

fn absorb<T: ContentItem>(
    source: SourceId,
    fetched: Fetched,
    items: &mut Vec<T>,
    failures: &mut Vec<SourceFailure>,
) {
    let Some((store, res)) = fetched else {
        return;
    };
    match res {
        Ok(records) => {
            counter!("content_records_total", "source" => source.as_str())
                .increment(records.len() as u64);
            items.extend(records.iter().map(|r| T::from_raw(r, source)));
        }
        Err(e) => {
            warn!(target: "content", error = ?e, source = source.as_str(), store, "source fetch failed");
            counter!("content_source_errors_total", "source" => source.as_str()).increment(1);
            failures.push(SourceFailure {
                source,
                store,
                message: format!("{e:#}"),
            });
        }
    }
}
