use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::content::feed::{Catalog, ContentFeed};
use crate::content::filter::CategoryFilter;
use crate::content::types::{Article, ContentItem, NewsEvent, SourceId};

const HOME_LATEST: usize = 3;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/home", get(home))
        .route("/api/{kind}", get(list))
        .route("/api/{kind}/categories", get(categories))
        .route("/api/{kind}/{source}/{id}", get(item))
        .route("/admin/refresh", post(admin_refresh))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    #[serde(default)]
    q: Option<String>,
    #[serde(default, alias = "type")]
    category: Option<String>,
    #[serde(default)]
    page: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageResp<T> {
    items: Vec<T>,
    total_items: usize,
    total_pages: usize,
    page: usize,
    loading: bool,
    notice: Option<&'static str>,
}

async fn page_of<T: ContentItem>(feed: &ContentFeed<T>, q: &ListQuery) -> Response {
    feed.ensure_loaded().await;
    let category = CategoryFilter::parse(q.category.as_deref());
    let page = q.page.unwrap_or(1);
    let p = feed.get_page(q.q.as_deref().unwrap_or_default(), &category, page);
    Json(PageResp {
        items: p.items,
        total_items: p.total_items,
        total_pages: p.total_pages,
        page,
        loading: feed.is_loading(),
        notice: feed.notice(),
    })
    .into_response()
}

async fn list(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(q): Query<ListQuery>,
) -> Response {
    let c = &state.catalog;
    match kind.as_str() {
        "articles" => page_of(&c.articles, &q).await,
        "news" => page_of(&c.news, &q).await,
        "gallery" => page_of(&c.gallery, &q).await,
        "resources" => page_of(&c.resources, &q).await,
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn categories_of<T: ContentItem>(feed: &ContentFeed<T>) -> Response {
    feed.ensure_loaded().await;
    Json(feed.categories()).into_response()
}

async fn categories(State(state): State<AppState>, Path(kind): Path<String>) -> Response {
    let c = &state.catalog;
    match kind.as_str() {
        "articles" => categories_of(&c.articles).await,
        "news" => categories_of(&c.news).await,
        "gallery" => categories_of(&c.gallery).await,
        "resources" => categories_of(&c.resources).await,
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn item_of<T: ContentItem>(feed: &ContentFeed<T>, source: SourceId, id: &str) -> Response {
    feed.ensure_loaded().await;
    match feed.find(source, id) {
        Some(it) => Json(it).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn item(
    State(state): State<AppState>,
    Path((kind, source, id)): Path<(String, String, String)>,
) -> Response {
    let Some(source) = SourceId::parse(&source) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let c = &state.catalog;
    match kind.as_str() {
        "articles" => item_of(&c.articles, source, &id).await,
        "news" => item_of(&c.news, source, &id).await,
        "gallery" => item_of(&c.gallery, source, &id).await,
        "resources" => item_of(&c.resources, source, &id).await,
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

#[derive(Serialize)]
struct HomeResp {
    articles: Vec<Article>,
    news: Vec<NewsEvent>,
}

async fn home(State(state): State<AppState>) -> Json<HomeResp> {
    let c = &state.catalog;
    tokio::join!(c.articles.ensure_loaded(), c.news.ensure_loaded());
    Json(HomeResp {
        articles: c.articles.latest(HOME_LATEST),
        news: c.news.latest(HOME_LATEST),
    })
}

async fn admin_refresh(State(state): State<AppState>) -> Response {
    let out = state.catalog.refresh_all().await;
    tracing::info!(
        target: "content",
        articles = out.articles.items,
        news = out.news.items,
        gallery = out.gallery.items,
        resources = out.resources.items,
        "catalog refreshed"
    );
    Json(out).into_response()
}
