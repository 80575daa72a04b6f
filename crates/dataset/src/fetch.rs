use crate::error::{DatasetError, FetchAttempt, Result};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;

/// Open-data portals can be slow; a full dataset download is still expected
/// to finish well inside this window.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(40);

const USER_AGENT: &str = "Mozilla/5.0 (ProyectoIA-FP/1.0)";
const ACCEPT: &str = "text/csv,*/*";

/// Byte-fetch capability: given a location, return the raw payload or a
/// network error. Implementations identify themselves with a custom
/// user-agent and send an accept hint for delimited text.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>>;
}

/// reqwest-backed fetcher with a hard per-request timeout.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, ACCEPT)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url}"))?;

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("reading body from {url}"))?;
        Ok(bytes.to_vec())
    }
}

/// Try each candidate location in order and return the first payload that
/// downloads, together with the location it came from. Every failure is
/// recorded; if no candidate succeeds the full chain is returned.
pub async fn fetch_first(fetcher: &dyn Fetcher, urls: &[String]) -> Result<(Vec<u8>, String)> {
    let mut attempts = Vec::with_capacity(urls.len());

    for url in urls {
        match fetcher.fetch(url).await {
            Ok(bytes) => {
                log::info!("downloaded {} bytes from {url}", bytes.len());
                return Ok((bytes, url.clone()));
            }
            Err(err) => {
                log::warn!("dataset location {url} failed: {err:#}");
                attempts.push(FetchAttempt {
                    url: url.clone(),
                    error: format!("{err:#}"),
                });
            }
        }
    }

    Err(DatasetError::Fetch(attempts))
}
