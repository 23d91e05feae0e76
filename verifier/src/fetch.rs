use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifierError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Server unreachable at {url}: {message}")]
    Unreachable { url: String, message: String },
}

pub type VerifierResult<T> = Result<T, VerifierError>;

/// One fetched response, produced once per test case and then discarded.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub body: String,
    pub headers: HashMap<String, String>,
}

/// Seam over the HTTP client so the run loop can be exercised without a
/// live server.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> VerifierResult<FetchResult>;
}

/// Plain GET fetcher backed by reqwest, with a client-enforced per-request
/// timeout. A request that times out surfaces as a network error.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> VerifierResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> VerifierResult<FetchResult> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(FetchResult {
            status,
            body,
            headers,
        })
    }
}
