// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// The router is driven directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - GET /api/{kind} (page JSON, search, category, unknown kind)
// - GET /api/{kind}/categories
// - GET /api/{kind}/{source}/{id}
// - GET /api/home
// - POST /admin/refresh

mod support;

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use press_content::content::sources::memory::{FailingStore, MemoryDocumentStore, MemoryTableStore};
use press_content::content::{Aggregator, Catalog, SeedData};
use press_content::{router, AppState};
use support::{published_article, published_row, rec};

const BODY_LIMIT: usize = 1024 * 1024;

fn catalog() -> Arc<Catalog> {
    let docs = MemoryDocumentStore::new()
        .with_collection(
            "articles",
            vec![
                published_article("alpha", "Alpha", "2023-01-01"),
                published_article("gamma", "Gamma", "2023-03-01"),
            ],
        )
        .with_collection(
            "news",
            vec![rec(serde_json::json!({
                "id": "n1",
                "title": "Court opens",
                "type": "news",
                "date": "2023-05-01",
                "status": "Published",
            }))],
        );
    let tables = MemoryTableStore::new().with_table("articles", vec![published_row(7, "Beta", "2023-06-01")]);
    let agg = Aggregator::new(SeedData::empty())
        .with_document_store(Arc::new(docs))
        .with_table_store(Arc::new(tables));
    Arc::new(Catalog::new(Arc::new(agg), 2))
}

fn test_router() -> Router {
    router(AppState::new(catalog()))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build GET");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    (status, bytes)
}

async fn get_json(app: Router, uri: &str) -> Json {
    let (status, bytes) = get(app, uri).await;
    assert_eq!(status, StatusCode::OK, "{uri} should be 200");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let (status, bytes) = get(test_router(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(bytes).expect("utf8").trim(), "ok");
}

#[tokio::test]
async fn api_articles_first_page_is_newest_first() {
    let v = get_json(test_router(), "/api/articles").await;

    assert_eq!(v["totalItems"], 3);
    assert_eq!(v["totalPages"], 2);
    assert_eq!(v["page"], 1);
    assert_eq!(v["loading"], false);
    assert!(v["notice"].is_null());

    let titles: Vec<&str> = v["items"]
        .as_array()
        .expect("items array")
        .iter()
        .filter_map(|it| it["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Beta", "Gamma"]);
}

#[tokio::test]
async fn api_articles_second_page_and_search() {
    let v = get_json(test_router(), "/api/articles?page=2").await;
    assert_eq!(v["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(v["items"][0]["title"], "Alpha");

    let v = get_json(test_router(), "/api/articles?q=GAM").await;
    assert_eq!(v["totalItems"], 1);
    assert_eq!(v["items"][0]["title"], "Gamma");
}

#[tokio::test]
async fn api_category_filter_uses_exact_match() {
    let v = get_json(test_router(), "/api/articles?category=Uncategorized").await;
    assert_eq!(v["totalItems"], 3);

    let v = get_json(test_router(), "/api/articles?category=uncategorized").await;
    assert_eq!(v["totalItems"], 0);

    let v = get_json(test_router(), "/api/news?type=All%20Types").await;
    assert_eq!(v["totalItems"], 1);
}

#[tokio::test]
async fn api_unknown_kind_is_404() {
    let (status, _) = get(test_router(), "/api/podcasts").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_item_lookup_is_scoped_by_source() {
    let v = get_json(test_router(), "/api/articles/relational_store/7").await;
    assert_eq!(v["title"], "Beta");

    let (status, _) = get(test_router(), "/api/articles/document_store/7").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(test_router(), "/api/articles/elsewhere/7").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_categories_lists_published_facets() {
    let v = get_json(test_router(), "/api/news/categories").await;
    assert_eq!(v, serde_json::json!(["news"]));
}

#[tokio::test]
async fn api_home_returns_latest_articles_and_news() {
    let v = get_json(test_router(), "/api/home").await;
    assert_eq!(v["articles"].as_array().map(Vec::len), Some(3));
    assert_eq!(v["articles"][0]["title"], "Beta");
    assert_eq!(v["news"][0]["title"], "Court opens");
}

#[tokio::test]
async fn api_admin_refresh_reports_partial_failure() {
    let agg = Aggregator::new(SeedData::empty()).with_document_store(Arc::new(FailingStore::new("offline")));
    let app = router(AppState::new(Arc::new(Catalog::new(Arc::new(agg), 6))));

    let req = Request::builder()
        .method("POST")
        .uri("/admin/refresh")
        .body(Body::empty())
        .expect("build POST /admin/refresh");
    let resp = app.clone().oneshot(req).await.expect("oneshot /admin/refresh");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.expect("read body");
    let v: Json = serde_json::from_slice(&bytes).expect("json body");
    assert_eq!(v["articles"]["applied"], true);
    assert_eq!(v["articles"]["items"], 0);
    assert_eq!(v["articles"]["failures"].as_array().map(Vec::len), Some(1));

    let page = get_json(app, "/api/articles").await;
    assert_eq!(page["notice"], "Failed to load additional items");
}
