//! Document download by URL
//!
//! Bytes are decoded as lossy UTF-8; layout-aware PDF extraction is out of
//! scope, so binary content degrades to whatever text it contains.

use reqwest::Client;
use std::time::Duration;

use crate::config::FetchConfig;
use crate::error::{Error, Result};

/// Downloads documents and decodes them to text
pub struct DocumentFetcher {
    client: Client,
    max_bytes: usize,
}

impl DocumentFetcher {
    /// Create a new fetcher
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_bytes: config.max_document_bytes,
        })
    }

    /// Download a document and return its text
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| Error::invalid_input(format!("Invalid document URL '{}': {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::invalid_input(format!(
                "Unsupported document URL scheme: {}",
                parsed.scheme()
            )));
        }

        tracing::info!("Downloading document from {}", url);

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| Error::document_fetch(url, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::document_fetch(
                url,
                format!("HTTP {}", response.status()),
            ));
        }

        if let Some(len) = response.content_length() {
            self.check_size(url, len as usize)?;
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::document_fetch(url, e.to_string()))?;
        self.check_size(url, bytes.len())?;

        tracing::info!("Document downloaded, size: {} bytes", bytes.len());

        Ok(decode_text(&bytes))
    }

    fn check_size(&self, url: &str, len: usize) -> Result<()> {
        if len > self.max_bytes {
            return Err(Error::document_fetch(
                url,
                format!(
                    "Document too large: {} bytes (maximum {} bytes)",
                    len, self.max_bytes
                ),
            ));
        }
        Ok(())
    }
}

/// Decode raw document bytes to text
pub fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_lossy() {
        assert_eq!(decode_text(b"Plain text."), "Plain text.");
        let decoded = decode_text(&[b'A', 0xFF, b'B']);
        assert!(decoded.starts_with('A'));
        assert!(decoded.ends_with('B'));
    }

    #[tokio::test]
    async fn test_rejects_non_http_scheme() {
        let fetcher = DocumentFetcher::new(&FetchConfig::default()).unwrap();
        let err = fetcher.fetch_text("file:///etc/passwd").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = fetcher.fetch_text("not a url").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_size_limit() {
        let fetcher = DocumentFetcher::new(&FetchConfig {
            max_document_bytes: 10,
            timeout_secs: 1,
        })
        .unwrap();
        tokio_test::assert_ok!(fetcher.check_size("http://x", 10));
        assert!(matches!(
            fetcher.check_size("http://x", 11),
            Err(Error::DocumentFetch { .. })
        ));
    }
}
