// src/content/sources/mod.rs
//! Query contracts for the two remote stores.
//!
//! Both are external collaborators; only the narrow slice of their query
//! surface used by the aggregator is modelled here.

pub mod firestore;
pub mod memory;
pub mod supabase;

use anyhow::Result;
use serde_json::Value;

use crate::content::sort::Direction;
use crate::content::types::RawRecord;

/// `field == value` predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

impl FieldFilter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }
}

/// Document-oriented store (collections of loosely-typed documents).
/// Filters combine conjunctively.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
        order: Option<&OrderBy>,
    ) -> Result<Vec<RawRecord>>;

    fn name(&self) -> &'static str;
}

/// Relational store (tables with typed columns).
#[async_trait::async_trait]
pub trait TableStore: Send + Sync {
    async fn select(
        &self,
        table: &str,
        filter: Option<&FieldFilter>,
        order: Option<&OrderBy>,
    ) -> Result<Vec<RawRecord>>;

    fn name(&self) -> &'static str;
}
