// src/content/normalize.rs
//! Raw record → canonical item mapping.
//!
//! Every inbound field is treated as untrusted: a key may be missing, hold an
//! empty string, or hold a number where a string was expected. Normalization
//! never fails. Absent display fields are filled with fixed defaults and all
//! other fields are passed through untouched.

use once_cell::sync::OnceCell;
use regex::Regex;
use serde_json::Value;

use crate::content::types::{
    Article, ContentKind, GalleryItem, MediaKind, NewsEvent, NewsKind, RawRecord, Resource,
    ResourceKind, SourceId, Status,
};

pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_AUTHOR: &str = "Unknown";
pub const UNCATEGORIZED: &str = "Uncategorized";
pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.jpg";
pub const DATE_UNAVAILABLE: &str = "Date unavailable";

/// Length of an excerpt derived from body content, in characters.
pub const EXCERPT_CHARS: usize = 150;

/// Source-specific field names. The document store and the bundled seed use
/// camelCase keys; the relational store uses snake_case columns.
struct FieldKeys {
    date: &'static [&'static str],
    image: &'static [&'static str],
    event_date: &'static [&'static str],
    file_size: &'static [&'static str],
    media: &'static [&'static str],
    resource_kind: &'static [&'static str],
    url: &'static [&'static str],
}

const DOCUMENT_KEYS: FieldKeys = FieldKeys {
    date: &["date", "publishedDate", "createdAt"],
    image: &["imageSrc", "imageUrl", "image"],
    event_date: &["eventDate"],
    file_size: &["fileSize"],
    media: &["mediaType"],
    resource_kind: &["resourceType", "type"],
    url: &["url", "fileUrl", "link"],
};

const RELATIONAL_KEYS: FieldKeys = FieldKeys {
    date: &["published_date", "date", "created_at"],
    image: &["image_url", "image"],
    event_date: &["event_date"],
    file_size: &["file_size"],
    media: &["media_type"],
    resource_kind: &["resource_type", "type"],
    url: &["url", "file_url", "link"],
};

fn keys_for(source: SourceId) -> &'static FieldKeys {
    match source {
        SourceId::RelationalStore => &RELATIONAL_KEYS,
        SourceId::DocumentStore | SourceId::Seed => &DOCUMENT_KEYS,
    }
}

/// First present, non-blank value among `keys`, coerced to a string.
fn text(raw: &RawRecord, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match raw.get(*k)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn record_id(raw: &RawRecord) -> String {
    text(raw, &["id"]).unwrap_or_default()
}

fn status(raw: &RawRecord, kind: ContentKind) -> Status {
    match text(raw, &["status"]) {
        Some(s) => Status::parse(&s),
        None if kind.has_status() => Status::Draft,
        None => Status::Published,
    }
}

fn date(raw: &RawRecord, keys: &FieldKeys) -> String {
    text(raw, keys.date).unwrap_or_else(|| DATE_UNAVAILABLE.to_string())
}

fn image(raw: &RawRecord, keys: &FieldKeys) -> String {
    text(raw, keys.image).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
}

/// Strip rich-text markup: decode entities, drop tags, fold whitespace.
pub fn plain_text(s: &str) -> String {
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));

    let no_tags = re_tags.replace_all(s, " ");
    let decoded = html_escape::decode_html_entities(&no_tags);
    re_ws.replace_all(&decoded, " ").trim().to_string()
}

/// First [`EXCERPT_CHARS`] characters of the plain-text body plus an ellipsis.
/// Not word-aware: the cut may land mid-word.
pub fn derive_excerpt(content: &str) -> String {
    let plain = plain_text(content);
    if plain.is_empty() {
        return String::new();
    }
    let head: String = plain.chars().take(EXCERPT_CHARS).collect();
    format!("{head}...")
}

/// Lowercased file extension of a URL path, ignoring query and fragment.
pub fn url_extension(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let last = path.rsplit('/').next().unwrap_or_default();
    let (stem, ext) = last.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

const VIDEO_EXTS: &[&str] = &["mp4", "webm", "mov", "m4v", "avi", "mkv", "ogv"];
const DOCUMENT_EXTS: &[&str] = &[
    "pdf", "doc", "docx", "ppt", "pptx", "xls", "xlsx", "odt", "txt", "rtf",
];

/// Media kind guessed from the URL's extension. Unknown extensions are images.
pub fn sniff_media_kind(url: &str) -> MediaKind {
    match url_extension(url) {
        Some(ext) if VIDEO_EXTS.contains(&ext.as_str()) => MediaKind::Video,
        Some(ext) if DOCUMENT_EXTS.contains(&ext.as_str()) => MediaKind::Document,
        _ => MediaKind::Image,
    }
}

fn parse_media_kind(s: &str) -> Option<MediaKind> {
    match s.trim().to_ascii_lowercase().as_str() {
        "image" | "photo" => Some(MediaKind::Image),
        "video" => Some(MediaKind::Video),
        "document" | "pdf" => Some(MediaKind::Document),
        _ => None,
    }
}

/// Resource kind guessed from the target URL.
pub fn sniff_resource_kind(url: &str) -> ResourceKind {
    let lower = url.to_ascii_lowercase();
    if ["youtube.com/", "youtu.be/", "vimeo.com/"]
        .iter()
        .any(|h| lower.contains(h))
    {
        return ResourceKind::Video;
    }
    match url_extension(url) {
        Some(ext) if VIDEO_EXTS.contains(&ext.as_str()) => ResourceKind::Video,
        Some(ext) if DOCUMENT_EXTS.contains(&ext.as_str()) => ResourceKind::Document,
        _ => ResourceKind::Link,
    }
}

fn parse_resource_kind(s: &str) -> Option<ResourceKind> {
    match s.trim().to_ascii_lowercase().as_str() {
        "document" | "pdf" | "file" => Some(ResourceKind::Document),
        "link" | "website" => Some(ResourceKind::Link),
        "video" => Some(ResourceKind::Video),
        _ => None,
    }
}

pub fn article(raw: &RawRecord, source: SourceId) -> Article {
    let keys = keys_for(source);
    let content = text(raw, &["content", "body"]).unwrap_or_default();
    let excerpt = text(raw, &["excerpt", "summary"]).unwrap_or_else(|| derive_excerpt(&content));

    Article {
        id: record_id(raw),
        source,
        title: text(raw, &["title"]).unwrap_or_else(|| UNTITLED.to_string()),
        excerpt,
        content,
        author: text(raw, &["author", "author_name"]).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        category: text(raw, &["category"]).unwrap_or_else(|| UNCATEGORIZED.to_string()),
        date: date(raw, keys),
        image_src: image(raw, keys),
        status: status(raw, ContentKind::Article),
    }
}

pub fn news_event(raw: &RawRecord, source: SourceId) -> NewsEvent {
    let keys = keys_for(source);
    let event_date = text(raw, keys.event_date);
    let kind = match text(raw, &["type"]) {
        Some(t) if t.eq_ignore_ascii_case("event") => NewsKind::Event,
        Some(_) => NewsKind::News,
        None if event_date.is_some() => NewsKind::Event,
        None => NewsKind::News,
    };
    let summary = text(raw, &["summary", "description"]).unwrap_or_else(|| {
        derive_excerpt(&text(raw, &["content", "body"]).unwrap_or_default())
    });

    NewsEvent {
        id: record_id(raw),
        source,
        title: text(raw, &["title"]).unwrap_or_else(|| UNTITLED.to_string()),
        summary,
        kind,
        date: date(raw, keys),
        event_date,
        location: text(raw, &["location"]),
        image_src: image(raw, keys),
        status: status(raw, ContentKind::NewsEvent),
    }
}

pub fn gallery_item(raw: &RawRecord, source: SourceId) -> GalleryItem {
    let keys = keys_for(source);
    let stored_src = text(raw, keys.image);
    let media = text(raw, keys.media)
        .and_then(|m| parse_media_kind(&m))
        .unwrap_or_else(|| stored_src.as_deref().map(sniff_media_kind).unwrap_or(MediaKind::Image));

    GalleryItem {
        id: record_id(raw),
        source,
        title: text(raw, &["title"]).unwrap_or_else(|| UNTITLED.to_string()),
        description: text(raw, &["description", "caption"]),
        category: text(raw, &["category"]).unwrap_or_else(|| UNCATEGORIZED.to_string()),
        date: date(raw, keys),
        image_src: stored_src.unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        media,
        status: status(raw, ContentKind::GalleryItem),
    }
}

pub fn resource(raw: &RawRecord, source: SourceId) -> Resource {
    let keys = keys_for(source);
    let url = text(raw, keys.url).unwrap_or_default();
    let kind = text(raw, keys.resource_kind)
        .and_then(|k| parse_resource_kind(&k))
        .unwrap_or_else(|| sniff_resource_kind(&url));

    Resource {
        id: record_id(raw),
        source,
        title: text(raw, &["title"]).unwrap_or_else(|| UNTITLED.to_string()),
        description: text(raw, &["description"]).unwrap_or_default(),
        url,
        file_size: text(raw, keys.file_size),
        kind,
        category: text(raw, &["category"]).unwrap_or_else(|| UNCATEGORIZED.to_string()),
        date: date(raw, keys),
        image_src: image(raw, keys),
        status: status(raw, ContentKind::Resource),
    }
}
