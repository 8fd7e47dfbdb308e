// src/content/sources/supabase.rs
//! Relational store client over Supabase PostgREST.

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::histogram;
use serde_json::Value;

use crate::content::sort::Direction;
use crate::content::sources::{FieldFilter, OrderBy, TableStore};
use crate::content::types::RawRecord;

/// Supabase tables through PostgREST (`/rest/v1/{table}`).
pub struct SupabaseStore {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseStore {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }
}

fn literal(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// PostgREST query string: `select=*`, `col=eq.value`, `order=col.desc`.
pub fn query_params(filter: Option<&FieldFilter>, order: Option<&OrderBy>) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    if let Some(f) = filter {
        let op = if f.value.is_null() { "is" } else { "eq" };
        params.push((f.field.clone(), format!("{op}.{}", literal(&f.value))));
    }
    if let Some(o) = order {
        let dir = match o.direction {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        };
        params.push(("order".to_string(), format!("{}.{dir}", o.field)));
    }
    params
}

#[async_trait]
impl TableStore for SupabaseStore {
    async fn select(
        &self,
        table: &str,
        filter: Option<&FieldFilter>,
        order: Option<&OrderBy>,
    ) -> Result<Vec<RawRecord>> {
        let t0 = std::time::Instant::now();
        let rows: Vec<RawRecord> = self
            .client
            .get(self.table_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .query(&query_params(filter, order))
            .send()
            .await
            .with_context(|| format!("supabase select {table}"))?
            .error_for_status()
            .with_context(|| format!("supabase select {table} status"))?
            .json()
            .await
            .with_context(|| format!("decoding supabase rows for {table}"))?;

        histogram!("content_fetch_ms", "source" => "relational_store")
            .record(t0.elapsed().as_secs_f64() * 1_000.0);
        tracing::debug!(target: "content", table, rows = rows.len(), "supabase select");
        Ok(rows)
    }

    fn name(&self) -> &'static str {
        "supabase"
    }
}
