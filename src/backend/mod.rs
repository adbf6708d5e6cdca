//! Dynamic-configuration backend.
//!
//! # Data Flow
//! ```text
//! RegionSettingsStore refresh tick
//!     → DocumentSource::fetch(key)
//!         → file.rs   (<dir>/<key>.json)
//!         → http.rs   (GET <base_url>/<key>)
//!         → memory.rs (in-process documents, tests and local runs)
//!     → raw JSON text handed to settings::document for decoding
//! ```
//!
//! # Design Decisions
//! - Sources return raw text; decoding and cross-validation stay in the
//!   settings subsystem so every backend gets identical semantics
//! - A fetch failure is an ordinary error; the caller decides to keep serving
//!   the previous snapshot

pub mod file;
pub mod http;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileDocumentSource;
pub use http::HttpDocumentSource;
pub use memory::MemoryDocumentSource;

/// Errors raised while fetching a configuration document.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Reading a local document failed.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP request could not be completed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status} for key {key}")]
    Status { key: String, status: u16 },

    /// The backend has no document under this key.
    #[error("document not found: {0}")]
    NotFound(String),
}

/// A named-document store refreshable without a redeploy.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the raw JSON document stored under `key`.
    async fn fetch(&self, key: &str) -> Result<String, BackendError>;
}
