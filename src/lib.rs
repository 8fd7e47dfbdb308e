// src/lib.rs
// Public library surface for integration tests and the binary.

pub mod api;
pub mod config;
pub mod content;
pub mod metrics;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;

use crate::content::{Aggregator, Catalog, SeedData};
use crate::metrics::Metrics;

// Convenient access: `crate_root::router` as well as `crate_root::api::router`
pub use crate::api::{router, AppState};
pub use crate::config::ContentConfig;

/// Build the full application Router: metrics recorder, catalog, background
/// warm-up of every feed, API routes and `/metrics`.
///
/// The recorder is installed before the warm-up is spawned so the initial load
/// is counted. Installing a recorder is once per process.
pub fn app(cfg: &ContentConfig, seed: SeedData) -> Result<Router> {
    let metrics = Metrics::init()?;

    let aggregator = Arc::new(Aggregator::from_config(cfg, seed));
    let catalog = Arc::new(Catalog::new(aggregator, cfg.pagination.page_size));

    let warm = catalog.clone();
    tokio::spawn(async move {
        let out = warm.refresh_all().await;
        tracing::info!(
            target: "content",
            articles = out.articles.items,
            news = out.news.items,
            gallery = out.gallery.items,
            resources = out.resources.items,
            "initial load finished"
        );
    });

    Ok(api::router(AppState::new(catalog)).merge(metrics.router()))
}
