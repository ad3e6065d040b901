//! Abstract document store interface

use super::path::{CollectionPath, DocumentPath};
use crate::Result;
use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use std::cmp::Ordering;

pub type Fields = Map<String, JsonValue>;

/// A stored document: its path plus its field map.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub path: DocumentPath,
    pub data: Fields,
}

impl Document {
    pub fn id(&self) -> &str {
        self.path.id()
    }

    /// Field map with the document id merged in under `id`.
    pub fn into_json_with_id(self) -> JsonValue {
        let mut data = Fields::with_capacity(self.data.len() + 1);
        data.insert("id".to_string(), JsonValue::String(self.path.id().to_string()));
        for (k, v) in self.data {
            if k != "id" {
                data.insert(k, v);
            }
        }
        JsonValue::Object(data)
    }
}

/// Descending ordering applied by [`DocumentStore::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
}

impl OrderBy {
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Compare two documents on the ordering field, highest value first.
    ///
    /// Documents missing the field sort after every document that has it.
    /// Ties fall back to the document id, ascending.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let ordering = match (a.data.get(&self.field), b.data.get(&self.field)) {
            (Some(x), Some(y)) => compare_values(x, y).reverse(),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        ordering.then_with(|| a.id().cmp(b.id()))
    }
}

/// Cross-type rank, matching PostgreSQL's jsonb ordering:
/// null < string < number < boolean < array < object.
fn type_rank(v: &JsonValue) -> u8 {
    match v {
        JsonValue::Null => 0,
        JsonValue::String(_) => 1,
        JsonValue::Number(_) => 2,
        JsonValue::Bool(_) => 3,
        JsonValue::Array(_) => 4,
        JsonValue::Object(_) => 5,
    }
}

/// Total order over JSON values: values of different types order by type
/// rank, numbers numerically, strings lexically.
pub fn compare_values(a: &JsonValue, b: &JsonValue) -> Ordering {
    match (a, b) {
        (JsonValue::Bool(x), JsonValue::Bool(y)) => x.cmp(y),
        (JsonValue::Number(x), JsonValue::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (JsonValue::String(x), JsonValue::String(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Hierarchical keyed document store.
///
/// Deleting a document never touches its sub-collections; callers that need
/// children removed go through the cascade service.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document. `Ok(None)` when it does not exist.
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>>;

    /// Create or fully replace a document.
    async fn set(&self, path: &DocumentPath, data: Fields) -> Result<()>;

    /// Create a document with a store-assigned id and return its path.
    async fn add(&self, collection: &CollectionPath, data: Fields) -> Result<DocumentPath>;

    /// Delete one document. Deleting a missing document succeeds.
    async fn delete(&self, path: &DocumentPath) -> Result<()>;

    /// All documents directly inside `collection`.
    async fn list(
        &self,
        collection: &CollectionPath,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Document>>;

    /// Delete every listed document, all or nothing.
    async fn batch_delete(&self, paths: &[DocumentPath]) -> Result<()>;

    /// Backend name for logs and health output.
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, data: JsonValue) -> Document {
        let path = CollectionPath::root("c").unwrap().doc(id).unwrap();
        let JsonValue::Object(data) = data else {
            panic!("object expected");
        };
        Document { path, data }
    }

    #[test]
    fn descending_order_puts_missing_field_last() {
        let order = OrderBy::descending("created");
        let mut docs = vec![
            doc("a", json!({ "created": 1 })),
            doc("b", json!({})),
            doc("c", json!({ "created": 3 })),
            doc("d", json!({ "created": 2 })),
        ];
        docs.sort_by(|x, y| order.compare(x, y));
        let ids: Vec<&str> = docs.iter().map(Document::id).collect();
        assert_eq!(ids, vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn strings_compare_lexically() {
        let order = OrderBy::descending("created");
        let mut docs = vec![
            doc("x", json!({ "created": "2023-12-31T00:00:00Z" })),
            doc("y", json!({ "created": "2024-03-01T00:00:00Z" })),
        ];
        docs.sort_by(|x, y| order.compare(x, y));
        assert_eq!(docs[0].id(), "y");
    }

    #[test]
    fn mixed_types_follow_jsonb_order() {
        let order = OrderBy::descending("created");
        let mut docs = vec![
            doc("null", json!({ "created": null })),
            doc("string", json!({ "created": "2024" })),
            doc("number", json!({ "created": 2024 })),
            doc("bool", json!({ "created": false })),
            doc("array", json!({ "created": [] })),
            doc("object", json!({ "created": {} })),
            doc("missing", json!({})),
        ];
        docs.sort_by(|x, y| order.compare(x, y));
        let ids: Vec<&str> = docs.iter().map(Document::id).collect();
        assert_eq!(
            ids,
            vec!["object", "array", "bool", "number", "string", "null", "missing"]
        );
    }

    #[test]
    fn id_merge_overrides_stored_id_field() {
        let d = doc("real", json!({ "id": "stale", "title": "Q1" }));
        assert_eq!(
            d.into_json_with_id(),
            json!({ "id": "real", "title": "Q1" })
        );
    }
}
