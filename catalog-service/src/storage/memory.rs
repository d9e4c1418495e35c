use super::{
    document_id, select_in_process, DocumentCursor, FindOptions, StorageBackend, StorageError,
};
use crate::models::filter::FilterExpression;
use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use serde_json::Value;
use std::path::Path;
use uuid::Uuid;

/// Insertion-ordered document collection held in process.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    documents: Vec<Value>,
}

impl MemoryBackend {
    pub fn new(documents: Vec<Value>) -> Self {
        Self { documents }
    }

    /// Loads a JSON array of documents from disk.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            StorageError::Connection(format!("cannot read {}: {}", path.display(), e))
        })?;
        let documents: Vec<Value> = serde_json::from_str(&raw)?;
        Ok(Self::new(documents))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn find(
        &self,
        filter: &FilterExpression,
        options: FindOptions,
    ) -> Result<DocumentCursor, StorageError> {
        let page = select_in_process(&self.documents, filter, options);
        Ok(stream::iter(page.into_iter().map(Ok)).boxed())
    }

    async fn find_one(&self, id: Uuid) -> Result<Option<Value>, StorageError> {
        Ok(self
            .documents
            .iter()
            .find(|doc| document_id(doc) == Some(id))
            .cloned())
    }
}
