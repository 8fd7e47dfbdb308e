// src/content/types.rs
//! Canonical content model shared by every stage of the pipeline.

use serde::{Deserialize, Serialize};

use crate::content::filter::CategoryFilter;
use crate::content::sort::{SortField, SortOrder};

/// One loosely-typed record as returned by a remote store or the seed bundle.
/// The store-side identifier is always present under the `id` key.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Where a record came from. Identifiers are only unique within one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    Seed,
    DocumentStore,
    RelationalStore,
}

impl SourceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Seed => "seed",
            SourceId::DocumentStore => "document_store",
            SourceId::RelationalStore => "relational_store",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "seed" => Some(SourceId::Seed),
            "document_store" => Some(SourceId::DocumentStore),
            "relational_store" => Some(SourceId::RelationalStore),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Published,
    Draft,
    Other(String),
}

impl Status {
    pub fn parse(s: &str) -> Self {
        match s {
            "Published" => Status::Published,
            "Draft" => Status::Draft,
            other => Status::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::Published => "Published",
            Status::Draft => "Draft",
            Status::Other(s) => s,
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, Status::Published)
    }
}

impl Serialize for Status {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Content families served by the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Article,
    NewsEvent,
    GalleryItem,
    Resource,
}

impl ContentKind {
    /// Whether records of this kind carry an editorial status. Kinds that do not
    /// are treated as published.
    pub fn has_status(&self) -> bool {
        matches!(self, ContentKind::Article | ContentKind::NewsEvent)
    }

    /// Only articles are maintained in the relational store as well.
    pub fn in_relational_store(&self) -> bool {
        matches!(self, ContentKind::Article)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub source: SourceId,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub date: String,
    pub image_src: String,
    pub status: Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsKind {
    News,
    Event,
}

impl NewsKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsKind::News => "news",
            NewsKind::Event => "event",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsEvent {
    pub id: String,
    pub source: SourceId,
    pub title: String,
    pub summary: String,
    #[serde(rename = "type")]
    pub kind: NewsKind,
    pub date: String,
    pub event_date: Option<String>,
    pub location: Option<String>,
    pub image_src: String,
    pub status: Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Document,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: String,
    pub source: SourceId,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub date: String,
    pub image_src: String,
    pub media: MediaKind,
    pub status: Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Document,
    Link,
    Video,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub source: SourceId,
    pub title: String,
    pub description: String,
    pub url: String,
    pub file_size: Option<String>,
    pub kind: ResourceKind,
    pub category: String,
    pub date: String,
    pub image_src: String,
    pub status: Status,
}

/// Behaviour every canonical item exposes to the filter, sort and page stages.
pub trait ContentItem: Clone + Send + Sync + Serialize + 'static {
    const KIND: ContentKind;

    /// Normalizer entry point. Never fails; missing fields get defaults.
    fn from_raw(raw: &RawRecord, source: SourceId) -> Self;

    fn id(&self) -> &str;
    fn source(&self) -> SourceId;
    fn title(&self) -> &str;
    fn status(&self) -> &Status;

    /// Value the category/type filter compares against.
    fn facet(&self) -> &str;

    /// Fields scanned by free-text search. Title is always first.
    fn search_fields(&self) -> Vec<&str>;

    /// Raw date string for the given sort field, if the item has one.
    fn date_field(&self, field: SortField) -> Option<&str>;

    /// Ordering applied to a filtered collection.
    fn sort_order(_filter: &CategoryFilter) -> SortOrder {
        SortOrder::newest_first()
    }
}

impl ContentItem for Article {
    const KIND: ContentKind = ContentKind::Article;

    fn from_raw(raw: &RawRecord, source: SourceId) -> Self {
        crate::content::normalize::article(raw, source)
    }

    fn id(&self) -> &str {
        &self.id
    }
    fn source(&self) -> SourceId {
        self.source
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn status(&self) -> &Status {
        &self.status
    }
    fn facet(&self) -> &str {
        &self.category
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.excerpt.as_str(), self.author.as_str()]
    }

    fn date_field(&self, field: SortField) -> Option<&str> {
        match field {
            SortField::Date => Some(self.date.as_str()),
            SortField::EventDate => None,
        }
    }
}

impl ContentItem for NewsEvent {
    const KIND: ContentKind = ContentKind::NewsEvent;

    fn from_raw(raw: &RawRecord, source: SourceId) -> Self {
        crate::content::normalize::news_event(raw, source)
    }

    fn id(&self) -> &str {
        &self.id
    }
    fn source(&self) -> SourceId {
        self.source
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn status(&self) -> &Status {
        &self.status
    }
    fn facet(&self) -> &str {
        self.kind.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut out = vec![self.title.as_str(), self.summary.as_str()];
        if let Some(loc) = &self.location {
            out.push(loc);
        }
        out
    }

    fn date_field(&self, field: SortField) -> Option<&str> {
        match field {
            SortField::Date => Some(self.date.as_str()),
            SortField::EventDate => self.event_date.as_deref(),
        }
    }

    /// Events list soonest first; everything else newest first.
    fn sort_order(filter: &CategoryFilter) -> SortOrder {
        if filter.value() == Some(NewsKind::Event.as_str()) {
            SortOrder::soonest_event_first()
        } else {
            SortOrder::newest_first()
        }
    }
}

impl ContentItem for GalleryItem {
    const KIND: ContentKind = ContentKind::GalleryItem;

    fn from_raw(raw: &RawRecord, source: SourceId) -> Self {
        crate::content::normalize::gallery_item(raw, source)
    }

    fn id(&self) -> &str {
        &self.id
    }
    fn source(&self) -> SourceId {
        self.source
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn status(&self) -> &Status {
        &self.status
    }
    fn facet(&self) -> &str {
        &self.category
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut out = vec![self.title.as_str()];
        if let Some(d) = &self.description {
            out.push(d);
        }
        out
    }

    fn date_field(&self, field: SortField) -> Option<&str> {
        match field {
            SortField::Date => Some(self.date.as_str()),
            SortField::EventDate => None,
        }
    }
}

impl ContentItem for Resource {
    const KIND: ContentKind = ContentKind::Resource;

    fn from_raw(raw: &RawRecord, source: SourceId) -> Self {
        crate::content::normalize::resource(raw, source)
    }

    fn id(&self) -> &str {
        &self.id
    }
    fn source(&self) -> SourceId {
        self.source
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn status(&self) -> &Status {
        &self.status
    }
    fn facet(&self) -> &str {
        &self.category
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }

    fn date_field(&self, field: SortField) -> Option<&str> {
        match field {
            SortField::Date => Some(self.date.as_str()),
            SortField::EventDate => None,
        }
    }
}

/// Category palettes offered to writers. Informative only; parsed records may
/// carry any category string.
pub const ARTICLE_CATEGORIES: &[&str] = &[
    "Constitutional Law",
    "Human Rights",
    "Criminal Law",
    "International Law",
    "Legal Education",
    "Opinion",
];

pub const GALLERY_CATEGORIES: &[&str] = &["Events", "Workshops", "Competitions", "Campus"];

pub const RESOURCE_CATEGORIES: &[&str] = &["Guides", "Templates", "Research", "Media"];
