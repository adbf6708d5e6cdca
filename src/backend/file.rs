//! Documents read from a local directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::backend::{BackendError, DocumentSource};

/// Serves `<dir>/<key>.json`. Files are re-read on every fetch, so edits are
/// picked up on the next refresh tick.
#[derive(Debug, Clone)]
pub struct FileDocumentSource {
    dir: PathBuf,
}

impl FileDocumentSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl DocumentSource for FileDocumentSource {
    async fn fetch(&self, key: &str) -> Result<String, BackendError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BackendError::NotFound(key.to_string())),
            Err(e) => Err(BackendError::Io {
                path: path.display().to_string(),
                source: e,
            }),
        }
    }
}
