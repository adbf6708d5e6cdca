//! Documents served over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::backend::{BackendError, DocumentSource};

/// Fetches `GET <base_url>/<key>`.
#[derive(Debug, Clone)]
pub struct HttpDocumentSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDocumentSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch(&self, key: &str) -> Result<String, BackendError> {
        let url = self.url_for(key);
        tracing::debug!(url = %url, "Fetching settings document");

        let response = self.client.get(&url).send().await?;
        match response.status() {
            status if status.is_success() => Ok(response.text().await?),
            StatusCode::NOT_FOUND => Err(BackendError::NotFound(key.to_string())),
            status => Err(BackendError::Status {
                key: key.to_string(),
                status: status.as_u16(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_trims_trailing_slash() {
        let source = HttpDocumentSource::new("http://config.local/documents/", Duration::from_secs(1)).unwrap();
        assert_eq!(source.url_for("optimizer"), "http://config.local/documents/optimizer");
    }
}
