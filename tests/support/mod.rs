// tests/support/mod.rs
//
// Shared fixtures for integration tests.
#![allow(dead_code)]

use serde_json::Value;

use press_content::content::types::RawRecord;

pub fn rec(v: Value) -> RawRecord {
    v.as_object().cloned().expect("fixture must be a JSON object")
}

pub fn published_article(id: &str, title: &str, date: &str) -> RawRecord {
    rec(serde_json::json!({
        "id": id,
        "title": title,
        "date": date,
        "status": "Published",
    }))
}

pub fn published_row(id: i64, title: &str, published_date: &str) -> RawRecord {
    rec(serde_json::json!({
        "id": id,
        "title": title,
        "published_date": published_date,
        "status": "Published",
    }))
}
