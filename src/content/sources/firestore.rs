// src/content/sources/firestore.rs
//! Document store client over the Firestore REST API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::histogram;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::content::sort::Direction;
use crate::content::sources::{DocumentStore, FieldFilter, OrderBy};
use crate::content::types::RawRecord;

const FIRESTORE_API: &str = "https://firestore.googleapis.com/v1";

#[derive(Debug, Deserialize)]
struct RunQueryRow {
    document: Option<Document>,
}

#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

/// Firestore over its REST surface (`documents:runQuery`).
pub struct FirestoreStore {
    client: reqwest::Client,
    documents_url: String,
    api_key: Option<String>,
}

impl FirestoreStore {
    pub fn new(project_id: &str, database: &str, api_key: Option<String>) -> Self {
        Self::with_base_url(FIRESTORE_API, project_id, database, api_key)
    }

    /// Point at an emulator or proxy instead of the public endpoint.
    pub fn with_base_url(
        base_url: &str,
        project_id: &str,
        database: &str,
        api_key: Option<String>,
    ) -> Self {
        let documents_url = format!(
            "{}/projects/{}/databases/{}/documents",
            base_url.trim_end_matches('/'),
            project_id,
            database
        );
        Self {
            client: reqwest::Client::new(),
            documents_url,
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }
}

/// JSON value → Firestore typed value.
pub fn encode_value(v: &Value) -> Value {
    match v {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) if n.is_i64() || n.is_u64() => json!({ "integerValue": n.to_string() }),
        Value::Number(n) => json!({ "doubleValue": n.as_f64() }),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            json!({ "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() } })
        }
        Value::Object(map) => {
            let fields: Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), encode_value(v)))
                .collect();
            json!({ "mapValue": { "fields": fields } })
        }
    }
}

/// Firestore typed value → plain JSON. Timestamps stay RFC 3339 strings and
/// integers (sent as strings) become numbers when they fit.
pub fn decode_value(v: &Value) -> Value {
    let Some(obj) = v.as_object() else {
        return Value::Null;
    };
    let Some((tag, inner)) = obj.iter().next() else {
        return Value::Null;
    };
    match tag.as_str() {
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "booleanValue" | "doubleValue" => inner.clone(),
        "integerValue" => match inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| inner.clone()),
            other => other.clone(),
        },
        "geoPointValue" => inner.clone(),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|vs| vs.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(decode_fields(
            inner.get("fields").and_then(Value::as_object),
        )),
        _ => Value::Null,
    }
}

fn decode_fields(fields: Option<&Map<String, Value>>) -> Map<String, Value> {
    fields
        .map(|f| f.iter().map(|(k, v)| (k.clone(), decode_value(v))).collect())
        .unwrap_or_default()
}

/// Flatten a document into a record; the last path segment of `name` is the id.
fn decode_document(doc: &Document) -> RawRecord {
    let mut rec = decode_fields(Some(&doc.fields));
    let id = doc.name.rsplit('/').next().unwrap_or_default().to_string();
    rec.insert("id".to_string(), Value::String(id));
    rec
}

pub fn structured_query(collection: &str, filters: &[FieldFilter], order: Option<&OrderBy>) -> Value {
    let mut q = Map::new();
    q.insert("from".into(), json!([{ "collectionId": collection }]));

    let mut field_filters: Vec<Value> = filters
        .iter()
        .map(|f| {
            json!({ "fieldFilter": {
                "field": { "fieldPath": f.field },
                "op": "EQUAL",
                "value": encode_value(&f.value),
            }})
        })
        .collect();
    match field_filters.len() {
        0 => {}
        1 => {
            q.insert("where".into(), field_filters.remove(0));
        }
        _ => {
            q.insert(
                "where".into(),
                json!({ "compositeFilter": { "op": "AND", "filters": field_filters } }),
            );
        }
    }

    if let Some(o) = order {
        let direction = match o.direction {
            Direction::Ascending => "ASCENDING",
            Direction::Descending => "DESCENDING",
        };
        q.insert(
            "orderBy".into(),
            json!([{ "field": { "fieldPath": o.field }, "direction": direction }]),
        );
    }

    json!({ "structuredQuery": Value::Object(q) })
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
        order: Option<&OrderBy>,
    ) -> Result<Vec<RawRecord>> {
        let t0 = std::time::Instant::now();
        let url = format!("{}:runQuery", self.documents_url);
        let mut req = self
            .client
            .post(&url)
            .json(&structured_query(collection, filters, order));
        if let Some(key) = &self.api_key {
            req = req.query(&[("key", key)]);
        }

        let rows: Vec<RunQueryRow> = req
            .send()
            .await
            .with_context(|| format!("firestore runQuery {collection}"))?
            .error_for_status()
            .with_context(|| format!("firestore runQuery {collection} status"))?
            .json()
            .await
            .with_context(|| format!("decoding firestore rows for {collection}"))?;

        let out: Vec<RawRecord> = rows
            .iter()
            .filter_map(|r| r.document.as_ref())
            .map(decode_document)
            .collect();

        histogram!("content_fetch_ms", "source" => "document_store")
            .record(t0.elapsed().as_secs_f64() * 1_000.0);
        tracing::debug!(target: "content", collection, rows = out.len(), "firestore query");
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "firestore"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_typed_fields_and_id() {
        let doc: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/articles/abc123",
            "fields": {
                "title": { "stringValue": "Alpha" },
                "views": { "integerValue": "42" },
                "score": { "doubleValue": 1.5 },
                "featured": { "booleanValue": true },
                "date": { "timestampValue": "2023-01-01T00:00:00Z" },
                "tags": { "arrayValue": { "values": [ { "stringValue": "law" } ] } },
                "meta": { "mapValue": { "fields": { "k": { "nullValue": null } } } },
                "empty": { "arrayValue": {} }
            }
        }))
        .unwrap();
        let rec = decode_document(&doc);
        assert_eq!(rec["id"], json!("abc123"));
        assert_eq!(rec["title"], json!("Alpha"));
        assert_eq!(rec["views"], json!(42));
        assert_eq!(rec["score"], json!(1.5));
        assert_eq!(rec["featured"], json!(true));
        assert_eq!(rec["date"], json!("2023-01-01T00:00:00Z"));
        assert_eq!(rec["tags"], json!(["law"]));
        assert_eq!(rec["meta"], json!({ "k": null }));
        assert_eq!(rec["empty"], json!([]));
    }

    #[test]
    fn single_filter_is_not_wrapped() {
        let q = structured_query("articles", &[FieldFilter::eq("status", "Published")], None);
        let w = &q["structuredQuery"]["where"];
        assert_eq!(w["fieldFilter"]["field"]["fieldPath"], json!("status"));
        assert_eq!(w["fieldFilter"]["value"], json!({ "stringValue": "Published" }));
        assert!(q["structuredQuery"].get("orderBy").is_none());
    }

    #[test]
    fn multiple_filters_and_order() {
        let q = structured_query(
            "news",
            &[
                FieldFilter::eq("status", "Published"),
                FieldFilter::eq("type", "event"),
            ],
            Some(&OrderBy::asc("eventDate")),
        );
        let sq = &q["structuredQuery"];
        assert_eq!(sq["from"][0]["collectionId"], json!("news"));
        assert_eq!(sq["where"]["compositeFilter"]["op"], json!("AND"));
        assert_eq!(
            sq["where"]["compositeFilter"]["filters"]
                .as_array()
                .map(Vec::len),
            Some(2)
        );
        assert_eq!(sq["orderBy"][0]["direction"], json!("ASCENDING"));
    }

    #[test]
    fn encode_integers_as_strings() {
        assert_eq!(encode_value(&json!(3)), json!({ "integerValue": "3" }));
        assert_eq!(encode_value(&json!(true)), json!({ "booleanValue": true }));
    }

    #[test]
    fn documents_url_shape() {
        let s = FirestoreStore::with_base_url("http://localhost:8080/v1/", "demo", "(default)", None);
        assert_eq!(
            s.documents_url,
            "http://localhost:8080/v1/projects/demo/databases/(default)/documents"
        );
        assert!(s.api_key.is_none());
    }
}
