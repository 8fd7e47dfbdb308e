// tests/aggregate_sources.rs
//
// Aggregation across the seed bundle and both stores:
// - union without deduplication
// - one store failing does not take the others down
// - end-to-end page for two stores

mod support;

use std::sync::Arc;

use press_content::content::filter::CategoryFilter;
use press_content::content::sources::memory::{FailingStore, MemoryDocumentStore, MemoryTableStore};
use press_content::content::{Aggregator, Article, ContentFeed, SeedData, SourceId};
use support::{published_article, published_row};

fn seed_with(n: usize) -> SeedData {
    SeedData {
        articles: (0..n)
            .map(|i| published_article(&format!("seed-{i}"), &format!("Seed {i}"), "2022-01-01"))
            .collect(),
        ..SeedData::default()
    }
}

#[tokio::test]
async fn union_keeps_every_record() {
    let docs = MemoryDocumentStore::new().with_collection(
        "articles",
        (0..4)
            .map(|i| published_article(&format!("a{i}"), "Doc", "2023-01-01"))
            .collect(),
    );
    let tables = MemoryTableStore::new().with_table(
        "articles",
        (0..3).map(|i| published_row(i, "Row", "2023-02-01")).collect(),
    );
    let agg = Aggregator::new(seed_with(2))
        .with_document_store(Arc::new(docs))
        .with_table_store(Arc::new(tables));

    let out = agg.collect::<Article>().await;
    assert_eq!(out.items.len(), 4 + 3 + 2);
    assert!(out.failures.is_empty());
}

#[tokio::test]
async fn colliding_ids_across_sources_are_not_merged() {
    let docs =
        MemoryDocumentStore::new().with_collection("articles", vec![published_article("1", "Same", "2023-01-01")]);
    let tables = MemoryTableStore::new().with_table("articles", vec![published_row(1, "Same", "2023-01-01")]);
    let agg = Aggregator::new(SeedData::empty())
        .with_document_store(Arc::new(docs))
        .with_table_store(Arc::new(tables));

    let out = agg.collect::<Article>().await;
    assert_eq!(out.items.len(), 2);
    assert_eq!(out.items[0].source, SourceId::DocumentStore);
    assert_eq!(out.items[1].source, SourceId::RelationalStore);
    assert_eq!(out.items[0].id, out.items[1].id);
}

#[tokio::test]
async fn document_store_failure_keeps_table_rows_and_seed() {
    let tables = MemoryTableStore::new().with_table(
        "articles",
        vec![published_row(1, "B1", "2023-01-01"), published_row(2, "B2", "2023-01-02")],
    );
    let agg = Aggregator::new(seed_with(1))
        .with_document_store(Arc::new(FailingStore::new("network unreachable")))
        .with_table_store(Arc::new(tables));

    let out = agg.collect::<Article>().await;
    let titles: Vec<&str> = out.items.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Seed 0", "B1", "B2"]);
    assert_eq!(out.failures.len(), 1);
    assert_eq!(out.failures[0].source, SourceId::DocumentStore);
    assert!(out.failures[0].message.contains("network unreachable"));
    assert!(out.notice().is_some());
}

#[tokio::test]
async fn both_stores_failing_still_returns_seed() {
    let agg = Aggregator::new(seed_with(3))
        .with_document_store(Arc::new(FailingStore::new("down")))
        .with_table_store(Arc::new(FailingStore::new("down")));
    let out = agg.collect::<Article>().await;
    assert_eq!(out.items.len(), 3);
    assert_eq!(out.failures.len(), 2);
}

#[tokio::test]
async fn two_stores_end_to_end_page() {
    let docs = MemoryDocumentStore::new()
        .with_collection("articles", vec![published_article("alpha", "Alpha", "2023-01-01")]);
    let tables = MemoryTableStore::new().with_table("articles", vec![published_row(1, "Beta", "2023-06-01")]);
    let agg = Aggregator::new(SeedData::empty())
        .with_document_store(Arc::new(docs))
        .with_table_store(Arc::new(tables));
    let feed: ContentFeed<Article> = ContentFeed::new(Arc::new(agg), 6);
    feed.refresh().await;

    let page = feed.get_page("", &CategoryFilter::All, 1);
    let titles: Vec<&str> = page.items.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Beta", "Alpha"]);
    assert_eq!(page.total_items, 2);
    assert_eq!(page.total_pages, 1);
}
