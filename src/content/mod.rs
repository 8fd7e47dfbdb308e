// src/content/mod.rs
//! Content pipeline: stores → normalize → aggregate → filter → sort → page.

pub mod aggregate;
pub mod feed;
pub mod filter;
pub mod normalize;
pub mod paginate;
pub mod seed;
pub mod sort;
pub mod sources;
pub mod types;

pub use aggregate::{Aggregation, Aggregator, SourceFailure};
pub use feed::{Catalog, ContentFeed};
pub use filter::CategoryFilter;
pub use paginate::{Page, PageState};
pub use seed::SeedData;
pub use types::{Article, ContentItem, ContentKind, GalleryItem, NewsEvent, Resource, SourceId};
