//! In-process documents.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::backend::{BackendError, DocumentSource};

/// A document map that can be rewritten while a store is polling it.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentSource {
    documents: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryDocumentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or replace the document under `key`.
    pub async fn set(&self, key: &str, document: impl Into<String>) {
        self.documents.write().await.insert(key.to_string(), document.into());
    }

    pub async fn remove(&self, key: &str) {
        self.documents.write().await.remove(key);
    }
}

#[async_trait]
impl DocumentSource for MemoryDocumentSource {
    async fn fetch(&self, key: &str) -> Result<String, BackendError> {
        self.documents
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_remove() {
        let source = MemoryDocumentSource::new();
        assert!(source.fetch("doc").await.is_err());

        source.set("doc", "{}").await;
        assert_eq!(source.fetch("doc").await.unwrap(), "{}");

        source.remove("doc").await;
        assert!(matches!(source.fetch("doc").await, Err(BackendError::NotFound(_))));
    }
}
