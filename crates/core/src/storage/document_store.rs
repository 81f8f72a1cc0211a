use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::CoreError;

/// A stored document: a JSON object.
pub type Document = Map<String, Value>;

/// Storage port for the persisted artifacts (finished runs, cached quotes).
///
/// Documents live in named collections and are addressed by key. The
/// semantics follow a typical hosted document database:
/// - `set` overwrites the whole document;
/// - `update` overwrites the given top-level fields of an existing document;
/// - `merge` deep-merges nested objects and creates the document if needed.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait DocumentStore: Send + Sync {
    /// Human-readable backend name (for logs/errors).
    fn name(&self) -> &str;

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, CoreError>;

    async fn set(&self, collection: &str, key: &str, document: Document) -> Result<(), CoreError>;

    /// Fails with `DocumentNotFound` if the document does not exist.
    async fn update(&self, collection: &str, key: &str, fields: Document) -> Result<(), CoreError>;

    async fn merge(&self, collection: &str, key: &str, document: Document) -> Result<(), CoreError>;
}

/// Deep-merge `patch` into `target`. Objects merge recursively; anything
/// else (arrays included) replaces the old value.
pub fn merge_documents(target: &mut Document, patch: Document) {
    for (field, value) in patch {
        match (target.get_mut(&field), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_documents(existing, incoming);
            }
            (_, value) => {
                target.insert(field, value);
            }
        }
    }
}

/// Overwrite top-level fields of `target` with those in `fields`.
pub fn update_fields(target: &mut Document, fields: Document) {
    for (field, value) in fields {
        target.insert(field, value);
    }
}

/// Serialize a value into a document. Fails unless it serializes to a JSON object.
pub fn to_document<T: serde::Serialize>(value: &T) -> Result<Document, CoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(CoreError::Serialization(format!(
            "expected a JSON object, got {}",
            json_type(&other)
        ))),
        Err(e) => Err(CoreError::Serialization(e.to_string())),
    }
}

/// Deserialize a stored document into a typed value.
pub fn from_document<T: serde::de::DeserializeOwned>(document: Document) -> Result<T, CoreError> {
    serde_json::from_value(Value::Object(document))
        .map_err(|e| CoreError::Deserialization(e.to_string()))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
