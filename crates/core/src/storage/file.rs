use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::errors::CoreError;
use super::document_store::{merge_documents, update_fields, Document, DocumentStore};

/// Document store backed by a directory tree: one pretty-printed JSON file
/// per document at `<root>/<collection>/<key>.json` (native only).
///
/// Document I/O goes through `tokio::fs`. Writes go to a temporary file
/// first and are renamed into place, so a crash never leaves a
/// half-written document behind.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    root: PathBuf,
}

impl FileDocumentStore {
    /// Use (and create if needed) `root` as the store directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, collection: &str, key: &str) -> PathBuf {
        self.root
            .join(encode_segment(collection))
            .join(format!("{}.json", encode_segment(key)))
    }

    async fn read(&self, path: &Path) -> Result<Option<Document>, CoreError> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, path: &Path, document: &Document) -> Result<(), CoreError> {
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let text = serde_json::to_string_pretty(document)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize document: {e}")))?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, text).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

/// Keep file names portable: anything outside `[A-Za-z0-9._-]` is hex-escaped.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for b in segment.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_') || (b == b'.' && !out.is_empty()) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, CoreError> {
        self.read(&self.path_for(collection, key)).await
    }

    async fn set(&self, collection: &str, key: &str, document: Document) -> Result<(), CoreError> {
        self.write(&self.path_for(collection, key), &document).await
    }

    async fn update(&self, collection: &str, key: &str, fields: Document) -> Result<(), CoreError> {
        let path = self.path_for(collection, key);
        let mut existing = self.read(&path).await?.ok_or_else(|| CoreError::DocumentNotFound {
            collection: collection.to_string(),
            key: key.to_string(),
        })?;
        update_fields(&mut existing, fields);
        self.write(&path, &existing).await
    }

    async fn merge(&self, collection: &str, key: &str, document: Document) -> Result<(), CoreError> {
        let path = self.path_for(collection, key);
        let mut existing = self.read(&path).await?.unwrap_or_default();
        merge_documents(&mut existing, document);
        self.write(&path, &existing).await
    }
}
