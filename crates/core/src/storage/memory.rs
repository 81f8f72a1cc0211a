use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::CoreError;
use super::document_store::{merge_documents, update_fields, Document, DocumentStore};

type DocumentKey = (String, String);

/// Process-local document store. Useful for tests and for runs that never
/// need to outlive the process.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<DocumentKey, Document>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents across all collections.
    pub fn len(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn key(collection: &str, key: &str) -> DocumentKey {
    (collection.to_string(), key.to_string())
}

fn poisoned<T>(_: T) -> CoreError {
    CoreError::Storage("memory store lock poisoned".into())
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl DocumentStore for MemoryDocumentStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, CoreError> {
        let documents = self.documents.read().map_err(poisoned)?;
        Ok(documents.get(&key(collection, id)).cloned())
    }

    async fn set(&self, collection: &str, id: &str, document: Document) -> Result<(), CoreError> {
        let mut documents = self.documents.write().map_err(poisoned)?;
        documents.insert(key(collection, id), document);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<(), CoreError> {
        let mut documents = self.documents.write().map_err(poisoned)?;
        let existing = documents
            .get_mut(&key(collection, id))
            .ok_or_else(|| CoreError::DocumentNotFound {
                collection: collection.to_string(),
                key: id.to_string(),
            })?;
        update_fields(existing, fields);
        Ok(())
    }

    async fn merge(&self, collection: &str, id: &str, document: Document) -> Result<(), CoreError> {
        let mut documents = self.documents.write().map_err(poisoned)?;
        let existing = documents.entry(key(collection, id)).or_default();
        merge_documents(existing, document);
        Ok(())
    }
}
