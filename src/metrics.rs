use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and describe the content series so they
    /// show up on `/metrics` before the first aggregation.
    pub fn init() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_counter!(
            "content_records_total",
            "Raw records received from a remote store."
        );
        describe_counter!(
            "content_source_errors_total",
            "Remote store fetch failures."
        );
        describe_histogram!("content_fetch_ms", "Remote store round trip in milliseconds.");
        describe_histogram!(
            "content_aggregate_ms",
            "Full aggregation (both stores + normalize) in milliseconds."
        );
        describe_gauge!(
            "content_last_refresh_ts",
            "Unix ts of the last applied feed refresh."
        );

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
