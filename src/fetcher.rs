use std::time::Duration;

use reqwest::blocking::{Client, Response};
use tracing::{debug, info};
use url::Url;

use crate::types::{ReaderError, Result};

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "rss-reader/4.0".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Blocking HTTP client for feed and image downloads. One fetch per
/// invocation, no retry.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client })
    }

    /// GET the URL and return the response body as text.
    pub fn fetch(&self, url: &str) -> Result<String> {
        let response = self.get(url)?;
        let body = response.text()?;
        info!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }

    /// GET the URL and return the raw response bytes.
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url)?;
        let bytes = response.bytes()?;
        debug!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }

    fn get(&self, url: &str) -> Result<Response> {
        let parsed = Url::parse(url)?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ReaderError::UnsupportedScheme {
                    url: url.to_string(),
                    scheme: other.to_string(),
                })
            }
        }
        debug!("GET {}", url);
        let response = self.client.get(parsed).send()?.error_for_status()?;
        Ok(response)
    }
}
