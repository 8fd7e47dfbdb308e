// src/content/sources/memory.rs
//! In-process stores with the same query contract as the remote ones.
//! Used by tests and for running the site without credentials.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;

use crate::content::sort::{parse_date, Direction};
use crate::content::sources::{DocumentStore, FieldFilter, OrderBy, TableStore};
use crate::content::types::RawRecord;

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => match (parse_date(x), parse_date(y)) {
            (Some(dx), Some(dy)) => dx.cmp(&dy),
            _ => x.cmp(y),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Equality filtering plus a stable order; records missing the order field
/// trail the rest.
fn apply(records: &[RawRecord], filters: &[&FieldFilter], order: Option<&OrderBy>) -> Vec<RawRecord> {
    let mut out: Vec<RawRecord> = records
        .iter()
        .filter(|r| filters.iter().all(|f| r.get(&f.field) == Some(&f.value)))
        .cloned()
        .collect();
    if let Some(o) = order {
        out.sort_by(|a, b| {
            let (va, vb) = (a.get(&o.field), b.get(&o.field));
            match (va.is_some(), vb.is_some(), o.direction) {
                (true, true, Direction::Descending) => compare_values(vb, va),
                _ => compare_values(va, vb),
            }
        });
    }
    out
}

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<String, Vec<RawRecord>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(self, name: &str, records: Vec<RawRecord>) -> Self {
        self.insert_all(name, records);
        self
    }

    pub fn insert_all(&self, name: &str, records: Vec<RawRecord>) {
        let mut guard = self.collections.lock().unwrap_or_else(PoisonError::into_inner);
        guard.entry(name.to_string()).or_default().extend(records);
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
        order: Option<&OrderBy>,
    ) -> Result<Vec<RawRecord>> {
        let guard = self.collections.lock().unwrap_or_else(PoisonError::into_inner);
        let filters: Vec<&FieldFilter> = filters.iter().collect();
        Ok(guard
            .get(collection)
            .map(|recs| apply(recs, &filters, order))
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "memory-documents"
    }
}

#[derive(Default)]
pub struct MemoryTableStore {
    tables: Mutex<HashMap<String, Vec<RawRecord>>>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(self, name: &str, rows: Vec<RawRecord>) -> Self {
        self.insert_all(name, rows);
        self
    }

    pub fn insert_all(&self, name: &str, rows: Vec<RawRecord>) {
        let mut guard = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        guard.entry(name.to_string()).or_default().extend(rows);
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn select(
        &self,
        table: &str,
        filter: Option<&FieldFilter>,
        order: Option<&OrderBy>,
    ) -> Result<Vec<RawRecord>> {
        let guard = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let filters: Vec<&FieldFilter> = filter.into_iter().collect();
        Ok(guard
            .get(table)
            .map(|rows| apply(rows, &filters, order))
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "memory-tables"
    }
}

/// Store that rejects every query, for exercising partial-failure paths.
pub struct FailingStore {
    message: String,
}

impl FailingStore {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn query(&self, collection: &str, _: &[FieldFilter], _: Option<&OrderBy>) -> Result<Vec<RawRecord>> {
        Err(anyhow!("{} ({collection})", self.message))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

#[async_trait]
impl TableStore for FailingStore {
    async fn select(&self, table: &str, _: Option<&FieldFilter>, _: Option<&OrderBy>) -> Result<Vec<RawRecord>> {
        Err(anyhow!("{} ({table})", self.message))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(v: Value) -> RawRecord {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn filters_conjunctively_and_orders() {
        let store = MemoryDocumentStore::new().with_collection(
            "news",
            vec![
                rec(json!({"id": "1", "status": "Published", "type": "news", "date": "2023-01-01"})),
                rec(json!({"id": "2", "status": "Draft", "type": "news", "date": "2023-03-01"})),
                rec(json!({"id": "3", "status": "Published", "type": "event", "date": "2023-02-01"})),
                rec(json!({"id": "4", "status": "Published", "type": "news", "date": "2023-04-01"})),
            ],
        );
        let out = store
            .query(
                "news",
                &[
                    FieldFilter::eq("status", "Published"),
                    FieldFilter::eq("type", "news"),
                ],
                Some(&OrderBy::desc("date")),
            )
            .await
            .unwrap();
        let ids: Vec<&str> = out.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["4", "1"]);
    }

    #[tokio::test]
    async fn missing_order_field_trails() {
        let store = MemoryTableStore::new().with_table(
            "articles",
            vec![
                rec(json!({"id": 1})),
                rec(json!({"id": 2, "published_date": "2023-01-01"})),
                rec(json!({"id": 3, "published_date": "2023-06-01"})),
            ],
        );
        let out = store
            .select("articles", None, Some(&OrderBy::desc("published_date")))
            .await
            .unwrap();
        let ids: Vec<i64> = out.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn unknown_collection_is_empty_and_failing_store_errors() {
        let store = MemoryDocumentStore::new();
        assert!(store.query("nope", &[], None).await.unwrap().is_empty());
        let failing = FailingStore::new("quota exceeded");
        let err = DocumentStore::query(&failing, "articles", &[], None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }
}
