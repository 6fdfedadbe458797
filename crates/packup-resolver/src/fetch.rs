use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;

/// Blocking HTTP GET returning the whole response body.
///
/// Implementations must treat a non-success status as an error and never retry.
pub trait HttpFetcher {
    fn get(&self, url: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("packup/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl HttpFetcher for ReqwestFetcher {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(url, "http get");
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("unexpected HTTP status {status}"));
        }

        let body = response
            .bytes()
            .with_context(|| format!("failed reading response body from {url}"))?;
        Ok(body.to_vec())
    }
}
