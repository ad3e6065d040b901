//! In-process `DocumentStore` implementation
//!
//! Documents are grouped per collection path, so removing a document leaves its
//! sub-collections in place exactly like a hierarchical document database would.
//! Used for tests and for running the server without Postgres.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    path::{CollectionPath, DocumentPath},
    traits::{Document, DocumentStore, Fields, OrderBy},
};
use crate::Result;

type Collection = BTreeMap<String, Fields>;

#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<CollectionPath, Collection>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents directly inside `collection`.
    pub async fn count(&self, collection: &CollectionPath) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map_or(0, BTreeMap::len)
    }

    /// Total number of documents across all collections.
    pub async fn total_documents(&self) -> usize {
        let collections = self.collections.read().await;
        collections.values().map(BTreeMap::len).sum()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        let data = collections
            .get(&path.parent())
            .and_then(|c| c.get(path.id()))
            .cloned();
        Ok(data.map(|data| Document {
            path: path.clone(),
            data,
        }))
    }

    async fn set(&self, path: &DocumentPath, data: Fields) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections
            .entry(path.parent())
            .or_default()
            .insert(path.id().to_string(), data);
        Ok(())
    }

    async fn add(&self, collection: &CollectionPath, data: Fields) -> Result<DocumentPath> {
        let path = collection.doc(Uuid::new_v4().simple().to_string())?;
        self.set(&path, data).await?;
        Ok(path)
    }

    async fn delete(&self, path: &DocumentPath) -> Result<()> {
        let mut collections = self.collections.write().await;
        let parent = path.parent();
        if let Some(collection) = collections.get_mut(&parent) {
            collection.remove(path.id());
            if collection.is_empty() {
                collections.remove(&parent);
            }
        }
        Ok(())
    }

    async fn list(
        &self,
        collection: &CollectionPath,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut documents: Vec<Document> = match collections.get(collection) {
            Some(docs) => docs
                .iter()
                .map(|(id, data)| {
                    Ok(Document {
                        path: collection.doc(id.clone())?,
                        data: data.clone(),
                    })
                })
                .collect::<Result<_>>()?,
            None => Vec::new(),
        };
        if let Some(order) = order_by {
            documents.sort_by(|a, b| order.compare(a, b));
        }
        Ok(documents)
    }

    async fn batch_delete(&self, paths: &[DocumentPath]) -> Result<()> {
        // One write guard for the whole batch: readers see all or none of it.
        let mut collections = self.collections.write().await;
        for path in paths {
            let parent = path.parent();
            if let Some(collection) = collections.get_mut(&parent) {
                collection.remove(path.id());
                if collection.is_empty() {
                    collections.remove(&parent);
                }
            }
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
